use thiserror::Error;

/// Errors returned by the segmentation engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The input bytes could not be decoded as a raster image.
    #[error("failed to decode input image: {0}")]
    Decode(#[from] image::ImageError),

    /// The input is a recognized non-raster document type (e.g. PDF) that
    /// should have been routed elsewhere. Rejected before preprocessing.
    #[error("unsupported input: {0}")]
    UnsupportedInput(&'static str),

    /// Invalid preprocessing configuration.
    #[error("invalid configuration {name}: {message}")]
    InvalidConfiguration {
        /// Option name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Input feature slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid algorithm parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// The invocation was cancelled through its [`CancelToken`](crate::CancelToken).
    #[error("segmentation cancelled")]
    Cancelled,
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

//! Pixel clustering algorithms.
//!
//! Three interchangeable variants, all consuming the same per-pixel
//! [`Feature`](crate::feature::Feature) vectors and producing one label per
//! pixel plus cluster centers:
//!
//! - **Centroid** ([`KmeansSegmenter`]): k-means with k-means++ seeding.
//!   Fixed `k`, fast, assumes roughly color-spherical clusters.
//! - **Density** ([`DbscanSegmenter`]): DBSCAN. Discovers the cluster count,
//!   labels outliers as [`NOISE`], adapts its parameters to image resolution.
//! - **Mode-seeking** ([`MeanShiftSegmenter`]): mean shift from a bounded
//!   seed subsample, modes merged by color proximity.
//!
//! All three share one distance convention ([`distance`]): Euclidean color
//! distance plus a down-weighted Euclidean spatial term. That down-weighting
//! is what keeps clusters color regions rather than spatial blobs.

pub mod distance;

mod dbscan;
mod kmeans;
mod meanshift;
mod traits;

pub use dbscan::{DbscanSegmenter, EPS_SCALE, MIN_PTS_DIVISOR, MIN_PTS_FLOOR};
pub use kmeans::{KmeansSegmenter, DEFAULT_K, DEFAULT_MAX_ITER};
pub use meanshift::{MeanShiftSegmenter, DEFAULT_BANDWIDTH, MAX_SEEDS};
pub use traits::{CancelToken, ClusterFit, PixelClustering, NOISE};

//! Pixel clustering image segmentation.
//!
//! `pixseg` partitions the pixels of a raster image into a small number of
//! visually coherent clusters and reports per-cluster statistics plus
//! rendered visualization buffers.
//!
//! The pipeline: decode and resize the input, optionally convert color space
//! / blur / edge-detect, turn every pixel into a 5-dim color+position
//! feature vector, run one of three clustering algorithms, and render the
//! labels back into images and numbers.
//!
//! ```no_run
//! use pixseg::{segment, Algorithm, SegmentOptions};
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let result = segment(&bytes, Algorithm::centroid(), &SegmentOptions::default()).unwrap();
//! for stat in &result.stats {
//!     println!("cluster {}: {:.1}%", stat.cluster_id, stat.percentage);
//! }
//! std::fs::write("segmented.png", &result.segmented_png).unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod buffer;
pub mod cluster;
pub mod engine;
pub mod error;
pub mod feature;
pub mod kernel;
pub mod pipeline;
pub mod report;

pub use buffer::PixelBuffer;
pub use cluster::{
    CancelToken, ClusterFit, DbscanSegmenter, KmeansSegmenter, MeanShiftSegmenter,
    PixelClustering, NOISE,
};
pub use engine::{segment, segment_with_cancel, Algorithm, QualityMetrics, SegmentationResult};
pub use error::{Error, Result};
pub use feature::{Feature, DEFAULT_SPATIAL_WEIGHT};
pub use pipeline::{ColorSpace, SegmentOptions};
pub use report::{ClusterReport, ClusterStat, PALETTE};

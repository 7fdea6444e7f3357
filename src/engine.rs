//! The single entry point: decode, preprocess, cluster, report, encode.
//!
//! One invocation is one synchronous computation owning all of its buffers;
//! callers that need a responsive UI run [`segment`] on their own background
//! executor and may pass a [`CancelToken`] to abort mid-flight.

use crate::buffer::PixelBuffer;
use crate::cluster::{
    CancelToken, DbscanSegmenter, KmeansSegmenter, MeanShiftSegmenter, PixelClustering,
    DEFAULT_BANDWIDTH, DEFAULT_K,
};
use crate::error::Result;
use crate::feature::{self, DEFAULT_SPATIAL_WEIGHT};
use crate::pipeline::{self, SegmentOptions};
use crate::report::{self, ClusterStat};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::time::{Duration, Instant};
use tracing::debug;

/// Which clustering variant to run, with its per-algorithm tuning.
#[derive(Clone, Debug)]
pub enum Algorithm {
    /// K-means-style centroid clustering with a fixed cluster count.
    Centroid {
        /// Number of clusters.
        k: usize,
    },
    /// DBSCAN-style density clustering. `None` fields derive from the
    /// working resolution.
    Density {
        /// Neighborhood radius override.
        eps: Option<f32>,
        /// Minimum-neighbors override.
        min_pts: Option<usize>,
    },
    /// Mean-shift-style mode seeking.
    ModeSeeking {
        /// Window radius in combined distance units.
        bandwidth: f32,
    },
}

impl Algorithm {
    /// Centroid variant with the default `k`.
    pub fn centroid() -> Self {
        Self::Centroid { k: DEFAULT_K }
    }

    /// Density variant with resolution-adaptive parameters.
    pub fn density() -> Self {
        Self::Density {
            eps: None,
            min_pts: None,
        }
    }

    /// Mode-seeking variant with the default bandwidth.
    pub fn mode_seeking() -> Self {
        Self::ModeSeeking {
            bandwidth: DEFAULT_BANDWIDTH,
        }
    }

    /// Stable algorithm name reported in results.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Centroid { .. } => "centroid",
            Self::Density { .. } => "density",
            Self::ModeSeeking { .. } => "mode-seeking",
        }
    }
}

/// Cluster-quality scores.
///
/// These are **fixed placeholder values**, not computed from the data; they
/// exist so result consumers have a stable shape to read. Do not treat them
/// as measurements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityMetrics {
    /// Placeholder silhouette coefficient.
    pub silhouette: f32,
    /// Placeholder Calinski-Harabasz index.
    pub calinski_harabasz: f32,
    /// Placeholder Davies-Bouldin index.
    pub davies_bouldin: f32,
}

impl QualityMetrics {
    /// The fixed values every result carries.
    pub const PLACEHOLDER: Self = Self {
        silhouette: 0.62,
        calinski_harabasz: 156.3,
        davies_bouldin: 0.58,
    };
}

/// The result bundle handed back across the engine boundary.
///
/// All image payloads are PNG-encoded; internal raw buffers do not escape.
#[derive(Clone, Debug)]
pub struct SegmentationResult {
    /// Name of the algorithm that produced the labels.
    pub algorithm: &'static str,
    /// Number of non-noise clusters found.
    pub cluster_count: usize,
    /// Per-cluster statistics, sorted descending by percentage.
    pub stats: Vec<ClusterStat>,
    /// Recolored segmented image.
    pub segmented_png: Vec<u8>,
    /// One isolated image per cluster, indexed by cluster id.
    pub cluster_pngs: Vec<Vec<u8>>,
    /// Sobel edge map, present when edge detection was enabled.
    pub edge_map_png: Option<Vec<u8>>,
    /// Wall-clock processing time for the whole invocation.
    pub elapsed: Duration,
    /// Fixed placeholder quality scores (see [`QualityMetrics`]).
    pub quality: QualityMetrics,
}

/// Segment an image with the given algorithm and preprocessing options.
pub fn segment(
    bytes: &[u8],
    algorithm: Algorithm,
    options: &SegmentOptions,
) -> Result<SegmentationResult> {
    segment_with_cancel(bytes, algorithm, options, &CancelToken::new())
}

/// [`segment`] with a cooperative cancellation token.
///
/// A fired token surfaces as [`Error::Cancelled`](crate::Error::Cancelled)
/// with no partial result.
pub fn segment_with_cancel(
    bytes: &[u8],
    algorithm: Algorithm,
    options: &SegmentOptions,
    cancel: &CancelToken,
) -> Result<SegmentationResult> {
    let start = Instant::now();

    let buffer = pipeline::preprocess(bytes, options)?;
    let edge_map_png = if options.edge_detection {
        Some(encode_png(&buffer)?)
    } else {
        None
    };

    let features = feature::extract(&buffer, DEFAULT_SPATIAL_WEIGHT);

    let fit = match &algorithm {
        Algorithm::Centroid { k } => {
            let mut model = KmeansSegmenter::new(*k);
            if let Some(seed) = options.seed {
                model = model.with_seed(seed);
            }
            model.fit(&features, cancel)?
        }
        Algorithm::Density { eps, min_pts } => {
            let mut model = DbscanSegmenter::adaptive(buffer.width(), buffer.height());
            if let Some(eps) = eps {
                model = model.with_eps(*eps);
            }
            if let Some(min_pts) = min_pts {
                model = model.with_min_pts(*min_pts);
            }
            model.fit(&features, cancel)?
        }
        Algorithm::ModeSeeking { bandwidth } => {
            let mut model = MeanShiftSegmenter::new(*bandwidth);
            if let Some(seed) = options.seed {
                model = model.with_seed(seed);
            }
            model.fit(&features, cancel)?
        }
    };

    let report = report::report(&fit, buffer.width(), buffer.height());

    let segmented_png = encode_png(&report.segmented)?;
    let cluster_pngs = report
        .cluster_buffers
        .iter()
        .map(encode_png)
        .collect::<Result<Vec<_>>>()?;

    let elapsed = start.elapsed();
    debug!(
        algorithm = algorithm.name(),
        clusters = fit.cluster_count(),
        elapsed_ms = elapsed.as_millis() as u64,
        "segmentation finished"
    );

    Ok(SegmentationResult {
        algorithm: algorithm.name(),
        cluster_count: fit.cluster_count(),
        stats: report.stats,
        segmented_png,
        cluster_pngs,
        edge_map_png,
        elapsed,
        quality: QualityMetrics::PLACEHOLDER,
    })
}

/// Encode a raw buffer as PNG bytes for the boundary.
fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    // The buffer's own length invariant guarantees from_raw succeeds.
    let img = RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.as_raw().to_vec())
        .map(DynamicImage::ImageRgba8)
        .ok_or(crate::error::Error::InvalidParameter {
            name: "buffer",
            message: "length does not match dimensions",
        })?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_are_stable() {
        assert_eq!(Algorithm::centroid().name(), "centroid");
        assert_eq!(Algorithm::density().name(), "density");
        assert_eq!(Algorithm::mode_seeking().name(), "mode-seeking");
    }

    #[test]
    fn encode_png_round_trips_dimensions() {
        let buf = PixelBuffer::zeroed(7, 3);
        let png = encode_png(&buf).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 3));
    }
}

use crate::error::Result;
use crate::feature::Feature;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Label given to pixels the density variant could not assign to any cluster.
pub const NOISE: usize = usize::MAX;

/// Output of one clustering fit: a label per input feature plus the
/// representative color of each cluster.
#[derive(Clone, Debug)]
pub struct ClusterFit {
    /// One label per feature, in input order. Only the density variant emits
    /// [`NOISE`]; all other labels index into `centers`.
    pub labels: Vec<usize>,
    /// Representative color per cluster (color channels only).
    pub centers: Vec<[f32; 3]>,
}

impl ClusterFit {
    /// Number of non-noise clusters.
    pub fn cluster_count(&self) -> usize {
        self.centers.len()
    }
}

/// Cooperative cancellation handle for a long-running fit.
///
/// Cloning shares the underlying flag; firing it makes in-flight fits return
/// [`Error::Cancelled`](crate::Error::Cancelled) at their next check.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, unfired token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Common interface for the pixel clustering algorithms.
pub trait PixelClustering {
    /// Fit on per-pixel features and return one label per feature plus
    /// cluster centers. Implementations check `cancel` in their outer loops.
    fn fit(&self, features: &[Feature], cancel: &CancelToken) -> Result<ClusterFit>;

    /// The configured number of clusters (if applicable).
    ///
    /// Algorithms that discover the number of clusters dynamically (density,
    /// mode-seeking) return 0.
    fn n_clusters(&self) -> usize;
}

//! Centroid-based variant: k-means with k-means++ seeding and Lloyd iterations.

use super::distance::combined_distance;
use super::traits::{CancelToken, ClusterFit, PixelClustering};
use crate::error::{Error, Result};
use crate::feature::Feature;
use rand::prelude::*;
use rayon::prelude::*;
use tracing::debug;

/// Default number of clusters.
pub const DEFAULT_K: usize = 5;

/// Iteration cap for the Lloyd loop.
pub const DEFAULT_MAX_ITER: usize = 100;

/// K-means pixel clusterer.
///
/// Centers are seeded with k-means++ (first center uniform, subsequent
/// centers sampled proportionally to squared distance from the nearest chosen
/// center) and refined by Lloyd iterations until labels stop changing or the
/// iteration cap is hit. Deterministic under a fixed seed.
#[derive(Clone, Debug)]
pub struct KmeansSegmenter {
    k: usize,
    max_iter: usize,
    seed: Option<u64>,
}

impl KmeansSegmenter {
    /// Create a clusterer with `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            seed: None,
        }
    }

    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the RNG seed for reproducible center initialization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// k-means++ initialization over the combined color+spatial distance.
    fn init_centers(&self, features: &[Feature], rng: &mut dyn RngCore) -> Vec<Feature> {
        let n = features.len();
        let mut centers: Vec<Feature> = Vec::with_capacity(self.k);
        centers.push(features[rng.random_range(0..n)]);

        // Squared distance to the nearest already-chosen center.
        let mut best_sq: Vec<f32> = features
            .iter()
            .map(|f| {
                let d = combined_distance(f, &centers[0]);
                d * d
            })
            .collect();

        while centers.len() < self.k {
            let total: f32 = best_sq.iter().sum();
            let next = if total > 0.0 {
                // Sample proportionally to squared distance.
                let mut target = rng.random::<f32>() * total;
                let mut chosen = n - 1;
                for (i, &w) in best_sq.iter().enumerate() {
                    target -= w;
                    if target <= 0.0 {
                        chosen = i;
                        break;
                    }
                }
                chosen
            } else {
                // All points coincide with a center; any pick is equivalent.
                rng.random_range(0..n)
            };

            let center = features[next];
            for (f, best) in features.iter().zip(best_sq.iter_mut()) {
                let d = combined_distance(f, &center);
                *best = best.min(d * d);
            }
            centers.push(center);
        }
        centers
    }
}

impl Default for KmeansSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_K)
    }
}

#[inline]
fn nearest_center(f: &Feature, centers: &[Feature]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, c) in centers.iter().enumerate() {
        let d = combined_distance(f, c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

impl PixelClustering for KmeansSegmenter {
    fn fit(&self, features: &[Feature], cancel: &CancelToken) -> Result<ClusterFit> {
        let n = features.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k == 0 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut centers = self.init_centers(features, rng.as_mut());
        let mut labels = vec![0usize; n];

        for iteration in 0..self.max_iter {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            // Assignment pass. Independent per point, so it parallelizes
            // without affecting the result.
            let new_labels: Vec<usize> = features
                .par_iter()
                .map(|f| nearest_center(f, &centers))
                .collect();

            let converged = new_labels == labels;
            labels = new_labels;
            if converged && iteration > 0 {
                debug!(iteration, "k-means converged");
                break;
            }

            // Update pass: coordinate-wise mean per cluster, sum+count so the
            // reduction is order-independent. Empty clusters keep their
            // previous center rather than dividing by zero.
            let mut sums = vec![[0.0f32; 5]; self.k];
            let mut counts = vec![0usize; self.k];
            for (f, &label) in features.iter().zip(labels.iter()) {
                for d in 0..5 {
                    sums[label][d] += f[d];
                }
                counts[label] += 1;
            }
            for (c, (sum, &count)) in centers.iter_mut().zip(sums.iter().zip(counts.iter())) {
                if count > 0 {
                    for d in 0..5 {
                        c[d] = sum[d] / count as f32;
                    }
                }
            }
        }

        Ok(ClusterFit {
            labels,
            centers: centers.iter().map(|c| [c[0], c[1], c[2]]).collect(),
        })
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

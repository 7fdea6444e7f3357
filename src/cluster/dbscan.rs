//! Density-based variant: DBSCAN over the combined color+spatial distance.
//!
//! ## Core concepts
//!
//! - **Epsilon (ε)**: maximum combined distance between two neighbor pixels.
//! - **MinPts**: minimum neighbors within ε for a pixel to be "core".
//! - **Core point**: has at least MinPts neighbors within ε.
//! - **Border point**: within ε of a core point but not core itself.
//! - **Noise point**: neither core nor border.
//!
//! Both parameters adapt to the working resolution by default (ε grows with
//! `sqrt(width * height)`, MinPts with the pixel count) so results stay
//! comparable across image sizes. Neighbor queries go through a
//! [`SpatialGrid`] rather than a full scan; the naive query is quadratic in
//! pixel count and dominates the whole engine's cost.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use super::distance::SpatialGrid;
use super::traits::{CancelToken, ClusterFit, PixelClustering, NOISE};
use crate::error::{Error, Result};
use crate::feature::Feature;
use tracing::{debug, warn};

/// ε per unit of `sqrt(width * height)`.
pub const EPS_SCALE: f32 = 0.25;

/// One MinPts per this many pixels.
pub const MIN_PTS_DIVISOR: usize = 1000;

/// MinPts never drops below this.
pub const MIN_PTS_FLOOR: usize = 4;

// Internal label encoding.
// - UNCLASSIFIED: never assigned yet
// - NOISE_LABEL: visited, but not density-reachable from any core point (may be promoted later)
const UNCLASSIFIED: i32 = -2;
const NOISE_LABEL: i32 = -1;

/// DBSCAN pixel clusterer.
#[derive(Clone, Debug)]
pub struct DbscanSegmenter {
    eps: f32,
    min_pts: usize,
}

impl DbscanSegmenter {
    /// Create a clusterer with explicit parameters.
    pub fn new(eps: f32, min_pts: usize) -> Self {
        Self { eps, min_pts }
    }

    /// Derive ε and MinPts from the working resolution.
    ///
    /// `eps = EPS_SCALE * sqrt(width * height)` and
    /// `min_pts = max(MIN_PTS_FLOOR, pixels / MIN_PTS_DIVISOR)`.
    pub fn adaptive(width: u32, height: u32) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            eps: EPS_SCALE * (pixels as f32).sqrt(),
            min_pts: MIN_PTS_FLOOR.max(pixels / MIN_PTS_DIVISOR),
        }
    }

    /// Override ε (neighborhood radius).
    pub fn with_eps(mut self, eps: f32) -> Self {
        self.eps = eps;
        self
    }

    /// Override MinPts (minimum neighbors, counting the point itself).
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Expand a new cluster breadth-first from a core point.
    fn expand_cluster(
        &self,
        features: &[Feature],
        grid: &SpatialGrid,
        point_idx: usize,
        neighbors: &[usize],
        labels: &mut [i32],
        cluster_id: i32,
        visited: &mut [bool],
    ) {
        labels[point_idx] = cluster_id;

        let mut to_process: Vec<usize> = neighbors.to_vec();
        let mut neighbor_neighbors = Vec::new();

        while let Some(neighbor_idx) = to_process.pop() {
            // DBSCAN nuance:
            // - A point previously labeled NOISE can later become a border point.
            // - We therefore assign labels *before* checking `visited` so that
            //   previously-visited noise points can still be promoted.
            // - A point already in a cluster is never reassigned.
            if labels[neighbor_idx] == UNCLASSIFIED || labels[neighbor_idx] == NOISE_LABEL {
                labels[neighbor_idx] = cluster_id;
            }

            if visited[neighbor_idx] {
                continue;
            }
            visited[neighbor_idx] = true;

            grid.neighbors_within(features, neighbor_idx, self.eps, &mut neighbor_neighbors);

            // If this neighbor is also a core point, expand from it.
            // MinPts counts the point itself.
            if neighbor_neighbors.len() + 1 >= self.min_pts {
                for &nn in &neighbor_neighbors {
                    if !visited[nn] {
                        to_process.push(nn);
                    }
                }
            }
        }
    }
}

impl PixelClustering for DbscanSegmenter {
    fn fit(&self, features: &[Feature], cancel: &CancelToken) -> Result<ClusterFit> {
        let n = features.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.eps <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "eps",
                message: "must be positive",
            });
        }
        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }

        let grid = SpatialGrid::build(features, self.eps);
        let mut labels = vec![UNCLASSIFIED; n];
        let mut visited = vec![false; n];
        let mut cluster_id: i32 = 0;
        let mut neighbors = Vec::new();

        for point_idx in 0..n {
            if visited[point_idx] {
                continue;
            }
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            visited[point_idx] = true;

            grid.neighbors_within(features, point_idx, self.eps, &mut neighbors);

            // MinPts counts the point itself, so core needs min_pts - 1 others.
            if neighbors.len() + 1 < self.min_pts {
                // Not enough neighbors: mark as noise (might be border later).
                labels[point_idx] = NOISE_LABEL;
                continue;
            }

            self.expand_cluster(
                features,
                &grid,
                point_idx,
                &neighbors,
                &mut labels,
                cluster_id,
                &mut visited,
            );
            cluster_id += 1;
        }

        let cluster_count = cluster_id as usize;
        if cluster_count == 0 {
            warn!(pixels = n, "dbscan found no dense region, everything is noise");
        } else {
            debug!(clusters = cluster_count, "dbscan expansion finished");
        }

        // Representative color per cluster: mean of member color channels
        // (noise excluded).
        let mut sums = vec![[0.0f32; 3]; cluster_count];
        let mut counts = vec![0usize; cluster_count];
        let mut out = Vec::with_capacity(n);
        for (f, &label) in features.iter().zip(labels.iter()) {
            if label >= 0 {
                let id = label as usize;
                for c in 0..3 {
                    sums[id][c] += f[c];
                }
                counts[id] += 1;
                out.push(id);
            } else {
                out.push(NOISE);
            }
        }
        let centers = sums
            .iter()
            .zip(counts.iter())
            .map(|(sum, &count)| {
                // Every emitted cluster has at least one member.
                let count = count.max(1) as f32;
                [sum[0] / count, sum[1] / count, sum[2] / count]
            })
            .collect();

        Ok(ClusterFit {
            labels: out,
            centers,
        })
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Features for a tiny image: a color per pixel, spatial weight 0.1.
    fn pixel_features(width: usize, colors: &[[f32; 3]]) -> Vec<Feature> {
        colors
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let x = (i % width) as f32;
                let y = (i / width) as f32;
                [c[0], c[1], c[2], x * 0.1, y * 0.1]
            })
            .collect()
    }

    #[test]
    fn two_color_regions_two_clusters() {
        // 2x2 image, black diagonal and white anti-diagonal. eps spans the
        // tiny spatial gaps but not the black-white color distance (~441).
        let features = pixel_features(
            2,
            &[
                [0.0, 0.0, 0.0],
                [255.0, 255.0, 255.0],
                [255.0, 255.0, 255.0],
                [0.0, 0.0, 0.0],
            ],
        );
        let fit = DbscanSegmenter::new(1.0, 2)
            .fit(&features, &CancelToken::new())
            .unwrap();

        assert_eq!(fit.labels.len(), 4);
        assert_eq!(fit.cluster_count(), 2);
        assert_eq!(fit.labels[0], fit.labels[3]);
        assert_eq!(fit.labels[1], fit.labels[2]);
        assert_ne!(fit.labels[0], fit.labels[1]);
        // Centers are member color means.
        assert_eq!(fit.centers[fit.labels[0]], [0.0, 0.0, 0.0]);
        assert_eq!(fit.centers[fit.labels[1]], [255.0, 255.0, 255.0]);
    }

    #[test]
    fn outlier_is_noise() {
        let mut colors = vec![[10.0, 10.0, 10.0]; 8];
        colors.push([250.0, 40.0, 40.0]);
        let features = pixel_features(3, &colors);
        let fit = DbscanSegmenter::new(5.0, 3)
            .fit(&features, &CancelToken::new())
            .unwrap();

        assert_eq!(fit.labels[8], NOISE);
        assert!(fit.labels[..8].iter().all(|&l| l == fit.labels[0]));
        assert_eq!(fit.cluster_count(), 1);
    }

    #[test]
    fn every_point_labeled_exactly_once() {
        let colors: Vec<[f32; 3]> = (0..25)
            .map(|i| {
                let v = (i * 10) as f32;
                [v, 255.0 - v, (i * 7 % 256) as f32]
            })
            .collect();
        let features = pixel_features(5, &colors);
        let fit = DbscanSegmenter::new(40.0, 3)
            .fit(&features, &CancelToken::new())
            .unwrap();

        assert_eq!(fit.labels.len(), 25);
        for &label in &fit.labels {
            assert!(label == NOISE || label < fit.cluster_count());
        }
    }

    #[test]
    fn noise_can_be_promoted_to_border() {
        // A spatially lone point within eps of exactly one core point,
        // visited first: it is marked noise, then reclaimed as a border
        // point during expansion. All colors identical, so distance is the
        // weighted spatial term only (0.3 per unit).
        let features: Vec<Feature> = [0.0f32, 1.0, 4.0, 4.1, 4.2, 4.3]
            .iter()
            .map(|&sx| [0.0, 0.0, 0.0, sx, 0.0])
            .collect();
        let fit = DbscanSegmenter::new(1.0, 4)
            .fit(&features, &CancelToken::new())
            .unwrap();

        assert_ne!(fit.labels[0], NOISE);
        assert_eq!(fit.labels[0], fit.labels[1]);
    }

    #[test]
    fn adaptive_parameters_scale_with_resolution() {
        let small = DbscanSegmenter::adaptive(32, 32);
        let large = DbscanSegmenter::adaptive(128, 128);
        assert!((small.eps - 8.0).abs() < 1e-4);
        assert!((large.eps - 32.0).abs() < 1e-4);
        assert_eq!(small.min_pts, MIN_PTS_FLOOR);
        assert_eq!(large.min_pts, 16);
    }

    #[test]
    fn vanishing_eps_yields_all_noise() {
        // eps far below any inter-point distance: every point is noise and
        // the fit must complete instead of panicking in the grid setup.
        let features = pixel_features(
            2,
            &[
                [0.0, 0.0, 0.0],
                [255.0, 255.0, 255.0],
                [60.0, 120.0, 180.0],
                [10.0, 10.0, 10.0],
            ],
        );
        let fit = DbscanSegmenter::new(1e-30, 2)
            .fit(&features, &CancelToken::new())
            .unwrap();

        assert_eq!(fit.cluster_count(), 0);
        assert!(fit.labels.iter().all(|&l| l == NOISE));
    }

    #[test]
    fn invalid_parameters_rejected() {
        let features = pixel_features(1, &[[0.0, 0.0, 0.0]]);
        assert!(DbscanSegmenter::new(0.0, 3)
            .fit(&features, &CancelToken::new())
            .is_err());
        assert!(DbscanSegmenter::new(1.0, 0)
            .fit(&features, &CancelToken::new())
            .is_err());
        assert!(DbscanSegmenter::new(1.0, 2)
            .fit(&[], &CancelToken::new())
            .is_err());
    }
}

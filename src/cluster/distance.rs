//! The shared distance convention and the spatial grid index.
//!
//! All three algorithms measure `colorDistance + 0.3 * spatialDistance`,
//! Euclidean over the 3 color and 2 spatial feature dimensions respectively.
//! The down-weighted spatial term is the knob that keeps clusters color
//! regions rather than spatial blobs.

use crate::feature::Feature;

/// Weight of the spatial term in the combined distance.
pub const SPATIAL_DISTANCE_WEIGHT: f32 = 0.3;

/// Euclidean distance over the 3 color dimensions.
#[inline]
pub fn color_distance(a: &Feature, b: &Feature) -> f32 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    (d0 * d0 + d1 * d1 + d2 * d2).sqrt()
}

/// Euclidean distance over the 2 (pre-weighted) spatial dimensions.
#[inline]
pub fn spatial_distance(a: &Feature, b: &Feature) -> f32 {
    let dx = a[3] - b[3];
    let dy = a[4] - b[4];
    (dx * dx + dy * dy).sqrt()
}

/// Combined distance: color plus down-weighted spatial term.
#[inline]
pub fn combined_distance(a: &Feature, b: &Feature) -> f32 {
    color_distance(a, b) + SPATIAL_DISTANCE_WEIGHT * spatial_distance(a, b)
}

/// A uniform grid over the two spatial feature dimensions.
///
/// Neighbor queries for a combined-distance radius `eps` only need candidates
/// whose spatial distance is at most `eps / SPATIAL_DISTANCE_WEIGHT`, because
/// the spatial term alone already lower-bounds the combined distance. The
/// grid buckets points at that cell size, so a query scans the 3×3 cell
/// block around the probe and verifies the full distance per candidate.
/// This is exact: it can never drop a true neighbor.
///
/// The grid only prunes when the cell size is smaller than the spatial
/// extent; at large `eps` everything lands in one cell and a query
/// degenerates to a full scan. Cell counts are capped near `sqrt(n)` per
/// axis so degenerate `eps` values keep the cell table bounded; overflow
/// cells merge at the high edge, which only ever adds candidates.
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    min_x: f32,
    min_y: f32,
    cells: Vec<Vec<u32>>,
}

impl SpatialGrid {
    /// Bucket all features for combined-distance queries of radius `eps`.
    pub fn build(features: &[Feature], eps: f32) -> Self {
        let cell_size = (eps / SPATIAL_DISTANCE_WEIGHT).max(f32::MIN_POSITIVE);

        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for f in features {
            min_x = min_x.min(f[3]);
            min_y = min_y.min(f[4]);
            max_x = max_x.max(f[3]);
            max_y = max_y.max(f[4]);
        }
        if features.is_empty() {
            min_x = 0.0;
            min_y = 0.0;
            max_x = 0.0;
            max_y = 0.0;
        }

        // Cap cells per axis: a tiny eps must not explode the table. Points
        // past the cap share the last cell; a probe and any true neighbor
        // past the cap land there together, so queries stay exact.
        let max_axis = (features.len() as f32).sqrt() as usize + 1;
        let cols = (((max_x - min_x) / cell_size).floor() as usize).min(max_axis) + 1;
        let rows = (((max_y - min_y) / cell_size).floor() as usize).min(max_axis) + 1;
        let mut cells = vec![Vec::new(); cols * rows];
        for (idx, f) in features.iter().enumerate() {
            let cx = (((f[3] - min_x) / cell_size).floor() as usize).min(cols - 1);
            let cy = (((f[4] - min_y) / cell_size).floor() as usize).min(rows - 1);
            cells[cy * cols + cx].push(idx as u32);
        }

        Self {
            cell_size,
            cols,
            rows,
            min_x,
            min_y,
            cells,
        }
    }

    /// Indices of all points within combined distance `eps` of `features[probe]`,
    /// excluding the probe itself.
    pub fn neighbors_within(
        &self,
        features: &[Feature],
        probe: usize,
        eps: f32,
        out: &mut Vec<usize>,
    ) {
        out.clear();
        let p = &features[probe];
        let cx = (((p[3] - self.min_x) / self.cell_size).floor() as isize)
            .min(self.cols as isize - 1);
        let cy = (((p[4] - self.min_y) / self.cell_size).floor() as isize)
            .min(self.rows as isize - 1);

        for gy in (cy - 1).max(0)..=(cy + 1).min(self.rows as isize - 1) {
            for gx in (cx - 1).max(0)..=(cx + 1).min(self.cols as isize - 1) {
                for &idx in &self.cells[gy as usize * self.cols + gx as usize] {
                    let idx = idx as usize;
                    if idx != probe && combined_distance(p, &features[idx]) <= eps {
                        out.push(idx);
                    }
                }
            }
        }
    }
}

//! Cluster statistics and visualization buffers.
//!
//! Labels go back to images here: each cluster gets a color from a fixed
//! high-contrast palette (cycling by cluster id), a count/percentage entry,
//! a region in the recolored segmented buffer, and an isolated buffer of its
//! own. The palette is a display identity, deliberately unrelated to the
//! measured pixel colors.

use crate::buffer::PixelBuffer;
use crate::cluster::{ClusterFit, NOISE};
use tracing::debug;

/// Fixed 10-entry high-contrast visualization palette.
pub const PALETTE: [[u8; 3]; 10] = [
    [230, 25, 75],   // red
    [60, 180, 75],   // green
    [0, 130, 200],   // blue
    [255, 225, 25],  // yellow
    [245, 130, 48],  // orange
    [145, 30, 180],  // purple
    [70, 240, 240],  // cyan
    [240, 50, 230],  // magenta
    [210, 245, 60],  // lime
    [250, 190, 212], // pink
];

/// Neutral color for noise pixels in the segmented buffer.
const NOISE_COLOR: [u8; 4] = [128, 128, 128, 255];

/// Display color for a cluster id.
#[inline]
pub fn palette_color(cluster_id: usize) -> [u8; 3] {
    PALETTE[cluster_id % PALETTE.len()]
}

/// Per-cluster summary statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterStat {
    /// Cluster id as emitted by the algorithm.
    pub cluster_id: usize,
    /// Number of member pixels.
    pub pixel_count: usize,
    /// Share of the total pixel count, in percent.
    pub percentage: f32,
    /// The cluster's palette entry (not its measured color).
    pub dominant_color: [u8; 3],
}

/// Rendered output of one clustering fit.
#[derive(Clone, Debug)]
pub struct ClusterReport {
    /// One entry per non-noise cluster, sorted descending by percentage.
    pub stats: Vec<ClusterStat>,
    /// Full-size buffer with every pixel painted its cluster's palette color.
    pub segmented: PixelBuffer,
    /// One buffer per cluster: members in the palette color on a zeroed
    /// background, indexed by cluster id.
    pub cluster_buffers: Vec<PixelBuffer>,
}

/// Turn labels back into statistics and visualization buffers.
///
/// `labels` must be in row-major pixel order for a `width` × `height`
/// buffer. Noise pixels are painted neutral gray in the segmented buffer,
/// excluded from `stats`, and appear in no per-cluster buffer.
pub fn report(fit: &ClusterFit, width: u32, height: u32) -> ClusterReport {
    let total = fit.labels.len();
    let cluster_count = fit.cluster_count();

    let mut counts = vec![0usize; cluster_count];
    for &label in &fit.labels {
        if label != NOISE {
            counts[label] += 1;
        }
    }

    let mut stats: Vec<ClusterStat> = counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(cluster_id, &count)| ClusterStat {
            cluster_id,
            pixel_count: count,
            percentage: count as f32 / total as f32 * 100.0,
            dominant_color: palette_color(cluster_id),
        })
        .collect();
    stats.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

    let mut segmented = PixelBuffer::zeroed(width, height);
    let mut cluster_buffers = vec![PixelBuffer::zeroed(width, height); cluster_count];
    for (i, &label) in fit.labels.iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        if label == NOISE {
            segmented.set(x, y, NOISE_COLOR);
        } else {
            let [r, g, b] = palette_color(label);
            segmented.set(x, y, [r, g, b, 255]);
            cluster_buffers[label].set(x, y, [r, g, b, 255]);
        }
    }

    debug!(
        clusters = stats.len(),
        noise = total - counts.iter().sum::<usize>(),
        "cluster report built"
    );

    ClusterReport {
        stats,
        segmented,
        cluster_buffers,
    }
}

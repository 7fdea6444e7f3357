//! Per-pixel feature extraction.
//!
//! Each pixel becomes a 5-dim vector `[c0, c1, c2, x*w, y*w]`: three color
//! channels plus down-weighted spatial coordinates. Vectors are emitted in
//! row-major pixel order, which is the join key between features, labels,
//! and the source buffer.

use crate::buffer::PixelBuffer;

/// A per-pixel feature vector: 3 color channels + 2 weighted coordinates.
pub type Feature = [f32; 5];

/// Number of leading color dimensions in a [`Feature`].
pub const COLOR_DIMS: usize = 3;

/// Scale applied to raw pixel coordinates when building features.
///
/// Color channels span 0–255 while coordinates at the default working
/// resolution span 0–127; this weight keeps the spatial terms an order of
/// magnitude below the color terms so color similarity dominates clustering.
pub const DEFAULT_SPATIAL_WEIGHT: f32 = 0.1;

/// Extract one feature vector per pixel, row-major.
pub fn extract(buffer: &PixelBuffer, spatial_weight: f32) -> Vec<Feature> {
    let mut features = Vec::with_capacity(buffer.pixel_count());
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let [c0, c1, c2, _] = buffer.get(x, y);
            features.push([
                c0 as f32,
                c1 as f32,
                c2 as f32,
                x as f32 * spatial_weight,
                y as f32 * spatial_weight,
            ]);
        }
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_feature_per_pixel_row_major() {
        let mut buf = PixelBuffer::zeroed(3, 2);
        buf.set(2, 0, [9, 8, 7, 255]);  // index 2
        buf.set(0, 1, [1, 2, 3, 255]);  // index 3

        let features = extract(&buf, DEFAULT_SPATIAL_WEIGHT);
        assert_eq!(features.len(), 6);
        assert_eq!(features[2][..3], [9.0, 8.0, 7.0]);
        assert_eq!(features[3][..3], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn spatial_terms_scaled_by_weight() {
        let buf = PixelBuffer::zeroed(4, 4);
        let features = extract(&buf, 0.5);
        // Pixel (3, 2) sits at row-major index 2*4 + 3.
        assert_eq!(features[11][3], 1.5);
        assert_eq!(features[11][4], 1.0);
    }

    #[test]
    fn default_weight_keeps_color_dominant() {
        let buf = PixelBuffer::zeroed(128, 128);
        let features = extract(&buf, DEFAULT_SPATIAL_WEIGHT);
        let max_spatial = features
            .iter()
            .map(|f| f[3].max(f[4]))
            .fold(0.0f32, f32::max);
        assert!(max_spatial < 255.0 / 10.0);
    }
}

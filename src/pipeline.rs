//! Preprocessing pipeline: decode → resize → color space → blur → edges.
//!
//! Each step is conditionally applied in a fixed order and hands an owned
//! [`PixelBuffer`] to the next; the pipeline output feeds feature extraction.

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};
use crate::kernel;
use image::imageops::FilterType;
use tracing::debug;

/// Default working resolution when the caller gives no explicit target.
///
/// Clustering cost grows at least quadratically with pixel count for the
/// density variant, so inputs are downsampled to a bounded size by default.
pub const DEFAULT_TARGET_SIZE: u32 = 128;

/// Color space the pixel channels are converted into before clustering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorSpace {
    /// Leave channels as sRGB (identity, no conversion pass).
    #[default]
    Rgb,
    /// CIE L*a*b*, rescaled into 8-bit channels.
    Lab,
    /// HSV, rescaled into 8-bit channels.
    Hsv,
}

/// Preprocessing options for one segmentation invocation.
#[derive(Clone, Debug)]
pub struct SegmentOptions {
    /// Resize target width in pixels.
    pub target_width: u32,
    /// Resize target height in pixels.
    pub target_height: u32,
    /// Channel encoding handed to the feature extractor.
    pub color_space: ColorSpace,
    /// Box-blur radius; `<= 0` skips the blur pass entirely.
    pub blur_radius: f32,
    /// Run Sobel edge detection and cluster the edge magnitudes.
    pub edge_detection: bool,
    /// Seed for the algorithms' random choices; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_SIZE,
            target_height: DEFAULT_TARGET_SIZE,
            color_space: ColorSpace::Rgb,
            blur_radius: 0.0,
            edge_detection: false,
            seed: None,
        }
    }
}

/// Decode raw image bytes and run the configured preprocessing sequence.
///
/// Returns the buffer ready for feature extraction. PDF payloads are rejected
/// before any decode attempt; undecodable bytes surface as [`Error::Decode`].
pub fn preprocess(bytes: &[u8], options: &SegmentOptions) -> Result<PixelBuffer> {
    if bytes.starts_with(b"%PDF") {
        return Err(Error::UnsupportedInput(
            "PDF documents are not raster images",
        ));
    }
    if options.target_width == 0 || options.target_height == 0 {
        return Err(Error::InvalidConfiguration {
            name: "target_width/target_height",
            message: "resize dimensions must be positive",
        });
    }

    let decoded = image::load_from_memory(bytes)?;
    debug!(
        source_width = decoded.width(),
        source_height = decoded.height(),
        "decoded input image"
    );

    let resized = decoded.resize_exact(
        options.target_width,
        options.target_height,
        FilterType::Nearest,
    );
    let buffer = PixelBuffer::from_raw(
        options.target_width,
        options.target_height,
        resized.to_rgba8().into_raw(),
    )?;

    let buffer = match options.color_space {
        ColorSpace::Rgb => buffer,
        ColorSpace::Lab => kernel::to_lab(&buffer),
        ColorSpace::Hsv => kernel::to_hsv(&buffer),
    };

    let buffer = if options.blur_radius > 0.0 {
        kernel::box_blur(&buffer, options.blur_radius)
    } else {
        buffer
    };

    let buffer = if options.edge_detection {
        kernel::sobel_edges(&buffer)
    } else {
        buffer
    };

    Ok(buffer)
}

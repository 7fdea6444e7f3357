//! Color and filter kernels.
//!
//! Pure pixel-buffer transforms with no shared mutable state: color-space
//! conversions operate on one pixel at a time, filters on one local window.

pub mod color;
pub mod filter;

pub use color::{hsv_from_rgb, lab_from_rgb, rgb_from_lab, to_hsv, to_lab};
pub use filter::{box_blur, sobel_edges};

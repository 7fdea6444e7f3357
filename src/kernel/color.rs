//! RGB ↔ LAB and RGB → HSV conversions.
//!
//! All conversions are rescaled into `[0, 255]` per channel so converted
//! buffers stay plain RGBA8: L is mapped from its natural 0–100 range, a/b
//! are shifted by +128 to center at zero, and HSV hue is rescaled from
//! 0–360 degrees.

use crate::buffer::PixelBuffer;

/// D65 reference white.
const WHITE_X: f32 = 95.047;
const WHITE_Y: f32 = 100.0;
const WHITE_Z: f32 = 108.883;

/// Threshold of the piecewise cube-root function in the XYZ → LAB step.
const LAB_EPSILON: f32 = 0.008856;

/// Knee of the piecewise sRGB gamma curve.
const SRGB_GAMMA_KNEE: f32 = 0.04045;

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= SRGB_GAMMA_KNEE {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

#[inline]
fn lab_f_inv(t: f32) -> f32 {
    let cubed = t * t * t;
    if cubed > LAB_EPSILON {
        cubed
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

/// Convert one sRGB pixel to LAB, rescaled into `[0, 255]` per channel.
pub fn lab_from_rgb([r, g, b]: [u8; 3]) -> [u8; 3] {
    let r = srgb_to_linear(r as f32 / 255.0);
    let g = srgb_to_linear(g as f32 / 255.0);
    let b = srgb_to_linear(b as f32 / 255.0);

    // Linear RGB -> XYZ (sRGB matrix, D65).
    let x = (r * 0.4124 + g * 0.3576 + b * 0.1805) * 100.0;
    let y = (r * 0.2126 + g * 0.7152 + b * 0.0722) * 100.0;
    let z = (r * 0.0193 + g * 0.1192 + b * 0.9505) * 100.0;

    let fx = lab_f(x / WHITE_X);
    let fy = lab_f(y / WHITE_Y);
    let fz = lab_f(z / WHITE_Z);

    let l = 116.0 * fy - 16.0;
    let a = 500.0 * (fx - fy);
    let b = 200.0 * (fy - fz);

    [
        (l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8,
        (a + 128.0).round().clamp(0.0, 255.0) as u8,
        (b + 128.0).round().clamp(0.0, 255.0) as u8,
    ]
}

/// Invert [`lab_from_rgb`]: an `[0, 255]`-scaled LAB pixel back to sRGB.
pub fn rgb_from_lab([l, a, b]: [u8; 3]) -> [u8; 3] {
    let l = l as f32 * 100.0 / 255.0;
    let a = a as f32 - 128.0;
    let b = b as f32 - 128.0;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let x = lab_f_inv(fx) * WHITE_X / 100.0;
    let y = lab_f_inv(fy) * WHITE_Y / 100.0;
    let z = lab_f_inv(fz) * WHITE_Z / 100.0;

    // XYZ -> linear RGB (inverse sRGB matrix).
    let r = x * 3.2406 + y * -1.5372 + z * -0.4986;
    let g = x * -0.9689 + y * 1.8758 + z * 0.0415;
    let bl = x * 0.0557 + y * -0.2040 + z * 1.0570;

    [
        (linear_to_srgb(r.clamp(0.0, 1.0)) * 255.0).round() as u8,
        (linear_to_srgb(g.clamp(0.0, 1.0)) * 255.0).round() as u8,
        (linear_to_srgb(bl.clamp(0.0, 1.0)) * 255.0).round() as u8,
    ]
}

/// Convert one sRGB pixel to HSV, rescaled into `[0, 255]` per channel.
///
/// Hue is normalized to `[0, 360)` degrees and then rescaled; saturation and
/// value are scaled from `[0, 1]`.
pub fn hsv_from_rgb([r, g, b]: [u8; 3]) -> [u8; 3] {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    if h < 0.0 {
        h += 360.0;
    }

    let s = if max == 0.0 { 0.0 } else { delta / max };

    [
        (h / 360.0 * 255.0).round().clamp(0.0, 255.0) as u8,
        (s * 255.0).round() as u8,
        (max * 255.0).round() as u8,
    ]
}

/// Convert a whole buffer to the LAB encoding. Alpha passes through.
pub fn to_lab(buffer: &PixelBuffer) -> PixelBuffer {
    buffer.map_pixels(|[r, g, b, a]| {
        let [l, la, lb] = lab_from_rgb([r, g, b]);
        [l, la, lb, a]
    })
}

/// Convert a whole buffer to the HSV encoding. Alpha passes through.
pub fn to_hsv(buffer: &PixelBuffer) -> PixelBuffer {
    buffer.map_pixels(|[r, g, b, a]| {
        let [h, s, v] = hsv_from_rgb([r, g, b]);
        [h, s, v, a]
    })
}

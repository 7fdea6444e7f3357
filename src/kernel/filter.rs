//! Windowed filters: box blur and Sobel edge magnitude.

use crate::buffer::PixelBuffer;

/// Blur by averaging over a square window of side `2 * floor(radius) + 1`.
///
/// This is the cheap box-filter approximation of a Gaussian. Boundary pixels
/// average over the in-bounds samples only (no wrapping or mirroring).
///
/// Callers should skip the call entirely for `radius <= 0`; this function
/// still returns the input unchanged in that case without touching pixels.
pub fn box_blur(buffer: &PixelBuffer, radius: f32) -> PixelBuffer {
    // The window is clamped to the image, so any half-width at or beyond the
    // larger dimension already averages over the whole image; capping there
    // keeps the index arithmetic finite for huge or non-finite radii.
    let max_half = buffer.width().max(buffer.height()) as f32;
    let half = radius.floor().min(max_half) as i64;
    if half <= 0 {
        return buffer.clone();
    }

    let width = buffer.width() as i64;
    let height = buffer.height() as i64;
    let mut out = PixelBuffer::zeroed(buffer.width(), buffer.height());

    for y in 0..height {
        for x in 0..width {
            let mut sum = [0u32; 4];
            let mut count = 0u32;
            for wy in (y - half).max(0)..=(y + half).min(height - 1) {
                for wx in (x - half).max(0)..=(x + half).min(width - 1) {
                    let px = buffer.get(wx as u32, wy as u32);
                    for c in 0..4 {
                        sum[c] += px[c] as u32;
                    }
                    count += 1;
                }
            }
            out.set(
                x as u32,
                y as u32,
                [
                    (sum[0] / count) as u8,
                    (sum[1] / count) as u8,
                    (sum[2] / count) as u8,
                    (sum[3] / count) as u8,
                ],
            );
        }
    }
    out
}

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// 3×3 Sobel gradient magnitude, applied independently per color channel.
///
/// Magnitude `sqrt(gx² + gy²)` is clamped to 255 and alpha is forced to 255.
/// The 1-pixel border is zeroed (RGB = 0, alpha = 255).
pub fn sobel_edges(buffer: &PixelBuffer) -> PixelBuffer {
    let width = buffer.width();
    let height = buffer.height();
    let mut out = PixelBuffer::zeroed(width, height);

    // Border stays zero; force its alpha opaque to match the interior.
    for y in 0..height {
        for x in 0..width {
            out.set(x, y, [0, 0, 0, 255]);
        }
    }
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut gx = [0i32; 3];
            let mut gy = [0i32; 3];
            for ky in 0..3 {
                for kx in 0..3 {
                    let px = buffer.get(x + kx - 1, y + ky - 1);
                    for c in 0..3 {
                        gx[c] += SOBEL_X[ky as usize][kx as usize] * px[c] as i32;
                        gy[c] += SOBEL_Y[ky as usize][kx as usize] * px[c] as i32;
                    }
                }
            }
            let mut rgba = [0u8; 4];
            for c in 0..3 {
                let mag = ((gx[c] * gx[c] + gy[c] * gy[c]) as f32).sqrt();
                rgba[c] = mag.min(255.0) as u8;
            }
            rgba[3] = 255;
            out.set(x, y, rgba);
        }
    }
    out
}

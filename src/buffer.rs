//! Owned RGBA pixel buffers.
//!
//! Every pipeline stage consumes a buffer and produces a new one; nothing
//! aliases across stages. Layout is row-major RGBA8, matching what the
//! `image` crate hands back from `to_rgba8().into_raw()`.

use crate::error::{Error, Result};

/// Number of channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A width × height RGBA8 pixel buffer, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes. Fails if the length does not match the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(Error::InvalidParameter {
                name: "data",
                message: "length does not match width * height * 4",
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// An all-zero (transparent black) buffer.
    pub fn zeroed(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total pixel count.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw bytes, row-major RGBA.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume into raw bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of the pixel at `(x, y)`.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// RGBA of the pixel at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Overwrite the pixel at `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Map every pixel through `f`, producing a new buffer of the same size.
    pub fn map_pixels(&self, f: impl Fn([u8; 4]) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(CHANNELS) {
            let out = f([px[0], px[1], px[2], px[3]]);
            data.extend_from_slice(&out);
        }
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

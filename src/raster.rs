//! Row-major RGB8 pixel buffers handed to the image encoder.

use image::RgbImage;

use crate::color::Color;
use crate::error::{MapError, Result};

pub const CHANNELS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    /// `width * height` RGB triples, row-major.
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * CHANNELS],
        }
    }

    /// Rasterize `color_at(x, y)` for every pixel.
    ///
    /// Rows are produced in parallel; each worker writes only its own row.
    pub fn render<F>(width: usize, height: usize, color_at: F) -> Self
    where
        F: Fn(usize, usize) -> Color + Sync,
    {
        use rayon::prelude::*;

        let mut buffer = Self::new(width, height);
        if width == 0 {
            return buffer;
        }
        buffer
            .data
            .par_chunks_mut(width * CHANNELS)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(CHANNELS).enumerate() {
                    pixel.copy_from_slice(&color_at(x, y).to_rgb8());
                }
            });
        buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> Result<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return Err(MapError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let i = (y * self.width + x) * CHANNELS;
        Ok([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copy into an `image` buffer for encoding.
    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        let expected = self.width * self.height * CHANNELS;
        RgbImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .ok_or(MapError::BufferSize { expected, actual: self.data.len() })
    }
}

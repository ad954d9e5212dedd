// src/frame.rs - Packed RGB frame with explicit stride
use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::{Result, ViewerError};

/// A packed, interleaved RGB pixel buffer. Rows are `stride` bytes apart,
/// which may exceed `3 * width` when the producer pads rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl RawFrame {
    pub const CHANNELS: usize = 3;

    pub fn new(width: u32, height: u32, stride: usize, data: Vec<u8>) -> Result<Self> {
        let row_bytes = width as usize * Self::CHANNELS;
        let needed = if height == 0 {
            Some(0)
        } else {
            stride
                .checked_mul(height as usize - 1)
                .and_then(|n| n.checked_add(row_bytes))
        };
        match needed {
            Some(needed) if stride >= row_bytes && data.len() >= needed => {}
            _ => {
                return Err(ViewerError::FrameLayout {
                    width,
                    height,
                    stride,
                    len: data.len(),
                })
            }
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// A tightly packed frame filled with one colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * Self::CHANNELS)
            .collect();
        Self {
            width,
            height,
            stride: width as usize * Self::CHANNELS,
            data,
        }
    }

    pub fn from_rgb_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            stride: width as usize * Self::CHANNELS,
            data: img.into_raw(),
        }
    }

    /// Copies into a tightly packed image, dropping any row padding.
    pub fn to_rgb_image(&self) -> RgbImage {
        if self.is_empty() {
            return RgbImage::new(self.width, self.height);
        }
        let row_bytes = self.width as usize * Self::CHANNELS;
        let mut packed = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.data.chunks(self.stride).take(self.height as usize) {
            packed.extend_from_slice(&row[..row_bytes]);
        }
        ImageBuffer::<Rgb<u8>, _>::from_raw(self.width, self.height, packed)
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the frame has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.stride + x as usize * Self::CHANNELS;
        Some([self.data[offset], self.data[offset + 1], self.data[offset + 2]])
    }

    /// RGBA copy for texture upload.
    pub fn to_rgba(&self) -> Vec<u8> {
        if self.is_empty() {
            return Vec::new();
        }
        let mut rgba = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for row in self.data.chunks(self.stride).take(self.height as usize) {
            for px in row[..self.width as usize * Self::CHANNELS].chunks(Self::CHANNELS) {
                rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        }
        rgba
    }
}

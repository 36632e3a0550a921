//! Interleaved 8-bit pixel buffer

use image::RgbaImage;

use crate::error::{Error, Result};

/// A 2D grid of interleaved 8-bit pixels.
///
/// Decoded textures are always canonical RGBA (4 channels). Buffers with 1 or
/// 3 channels can still be built directly, which is what the transforms'
/// channel checks guard against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw interleaved pixel data.
    ///
    /// # Errors
    /// Returns an error if `channels` is not 1-4 or `data` does not hold exactly
    /// `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        if !(1..=4).contains(&channels) {
            return Err(Error::InvalidPixelBuffer(format!(
                "{channels} channels per pixel"
            )));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(usize::from(channels)))
            .ok_or_else(|| Error::InvalidPixelBuffer(format!("{width}x{height} overflows")))?;

        if data.len() != expected {
            return Err(Error::InvalidPixelBuffer(format!(
                "{width}x{height}x{channels} needs {expected} bytes, got {}",
                data.len()
            )));
        }

        Ok(Self { width, height, channels, data })
    }

    /// Build an RGBA buffer. Infallible because the image already checked its size.
    #[must_use]
    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            channels: 4,
            data: image.into_raw(),
        }
    }

    /// Build an RGBA buffer from a pixel function, row-major
    #[must_use]
    pub fn from_fn_rgba<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self { width, height, channels: 4, data }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Raw interleaved bytes
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Iterate pixels as channel slices, row-major
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(usize::from(self.channels))
    }

    /// Channel slice of the pixel at `(x, y)`, if in bounds
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let channels = usize::from(self.channels);
        let start = (y as usize * self.width as usize + x as usize) * channels;
        self.data.get(start..start + channels)
    }

    /// Number of pixels
    #[must_use]
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! PNG encoding

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{Error, Result};
use crate::texture::PixelBuffer;

/// PNG compression effort, 0 (fastest, largest) to 9 (slowest, smallest).
///
/// PNG is lossless at every level; only size and encode time change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// Level used without `--optimize`
    pub const FAST: Self = Self(0);
    /// Level used with `--optimize`
    pub const SMALL: Self = Self(9);

    /// Create a level, clamping to 0-9
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self(level.min(9))
    }

    /// Map the optimize flag onto a level
    #[must_use]
    pub fn from_optimize(optimize: bool) -> Self {
        if optimize { Self::SMALL } else { Self::FAST }
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Encoder settings for this level
    fn png_settings(self) -> (CompressionType, FilterType) {
        match self.0 {
            0 => (CompressionType::Fast, FilterType::NoFilter),
            1..=3 => (CompressionType::Fast, FilterType::Adaptive),
            4..=6 => (CompressionType::Default, FilterType::Adaptive),
            _ => (CompressionType::Best, FilterType::Adaptive),
        }
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encode a buffer as PNG bytes
///
/// # Errors
/// Returns [`Error::Encode`] if the encoder rejects the buffer.
pub fn encode(buffer: &PixelBuffer, level: CompressionLevel) -> Result<Vec<u8>> {
    let color_type = match buffer.channels() {
        1 => ExtendedColorType::L8,
        2 => ExtendedColorType::La8,
        3 => ExtendedColorType::Rgb8,
        _ => ExtendedColorType::Rgba8,
    };

    let (compression, filter) = level.png_settings();

    let mut png_data = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut png_data, compression, filter);
    encoder
        .write_image(buffer.as_raw(), buffer.width(), buffer.height(), color_type)
        .map_err(|e| Error::Encode(e.to_string()))?;

    Ok(png_data)
}

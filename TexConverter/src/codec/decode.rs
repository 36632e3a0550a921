//! Image decoding to canonical RGBA

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::error::{Error, Result};
use crate::texture::PixelBuffer;

/// Decode image bytes into an RGBA buffer, detecting the format from its signature
///
/// # Errors
/// Returns [`Error::Decode`] for unrecognised or corrupt data and
/// [`Error::UnsupportedChannelLayout`] for images that are not gray, RGB or RGBA.
pub fn decode(data: &[u8]) -> Result<PixelBuffer> {
    decode_with_format_hint(data, None)
}

/// Decode image bytes, falling back to `hint` when the signature is not recognised
///
/// # Errors
/// See [`decode`].
pub fn decode_with_format_hint(data: &[u8], hint: Option<ImageFormat>) -> Result<PixelBuffer> {
    let mut reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| Error::Decode(format!("Failed to read image header: {e}")))?;

    if reader.format().is_none()
        && let Some(format) = hint
    {
        reader.set_format(format);
    }

    let image = reader
        .decode()
        .map_err(|e| Error::Decode(e.to_string()))?;

    // Gray broadcasts to RGB, missing alpha becomes opaque, 16-bit scales down
    match image.color().channel_count() {
        1 | 3 | 4 => Ok(PixelBuffer::from_rgba_image(image.to_rgba8())),
        channels => Err(Error::UnsupportedChannelLayout { channels }),
    }
}

/// Format hint from a file extension
#[must_use]
pub fn format_hint_for_path(path: &Path) -> Option<ImageFormat> {
    path.extension().and_then(ImageFormat::from_extension)
}

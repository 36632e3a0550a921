//! Image decoding and PNG encoding
//!
//! Inputs in any supported raster format decode to a canonical RGBA
//! [`PixelBuffer`]. Every derived map is written back as PNG.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

mod decode;
mod encode;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::texture::PixelBuffer;

pub use decode::{decode, decode_with_format_hint, format_hint_for_path};
pub use encode::{encode, CompressionLevel};

/// Read and decode an image file
///
/// The file extension is used as a format hint for formats without a
/// signature (TGA).
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    decode_with_format_hint(&data, format_hint_for_path(path))
}

/// Encode a buffer as PNG and write it to `png_path`
///
/// # Errors
/// Returns an error if encoding or writing fails.
pub fn save_png<P: AsRef<Path>>(
    buffer: &PixelBuffer,
    png_path: P,
    level: CompressionLevel,
) -> Result<()> {
    let png_data = encode(buffer, level)?;

    let mut output = BufWriter::new(File::create(png_path.as_ref())?);
    output.write_all(&png_data)?;
    output.flush()?;

    Ok(())
}

//! Per-role channel transforms
//!
//! Every transform works pixel for pixel and writes full RGBA with alpha
//! forced to 255. Derived maps never carry transparency.
//!
//! | Role     | Mode     | Outputs                 |
//! |----------|----------|-------------------------|
//! | Normal   | Standard | `converted` = (A, G, 255) |
//! | Normal   | Tarkin   | `converted` = (R, G, B) |
//! | Diffuse  | Standard | `color`, `alpha` if any A < 255 |
//! | Diffuse  | Tarkin   | `color`                 |
//! | Gloss    | Standard | `roughness` = 255 - R   |
//! | SpecGlos | Tarkin   | `spec`, `roughness` = 255 - A |
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use super::pixel::PixelBuffer;
use super::role::{ConversionMode, TextureRole};
use crate::error::{Error, Result};
use crate::utils::path::insert_suffix;

const OPAQUE: u8 = u8::MAX;

/// Kind of derived map, which also fixes its filename suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Diffuse color with alpha flattened
    Color,
    /// Diffuse alpha as grayscale
    Alpha,
    /// Specular color from a spec-gloss map
    Spec,
    /// Roughness as grayscale
    Roughness,
    /// Repacked normal map
    Converted,
}

impl OutputKind {
    /// Filename suffix inserted before `.png`
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Color => "_color",
            Self::Alpha => "_alpha",
            Self::Spec => "_spec",
            Self::Roughness => "_roughness",
            Self::Converted => "_converted",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Alpha => "alpha",
            Self::Spec => "spec",
            Self::Roughness => "roughness",
            Self::Converted => "converted",
        }
    }

    /// Output filename for an input base name (extension already stripped)
    #[must_use]
    pub fn output_filename(self, base_name: &str) -> String {
        insert_suffix(&format!("{base_name}.png"), self.suffix())
    }
}

/// Named maps derived from one input texture, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOutput {
    maps: Vec<(OutputKind, PixelBuffer)>,
}

impl TransformOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a map, replacing any earlier map of the same kind
    pub fn insert(&mut self, kind: OutputKind, buffer: PixelBuffer) {
        if let Some(slot) = self.maps.iter_mut().find(|(k, _)| *k == kind) {
            slot.1 = buffer;
        } else {
            self.maps.push((kind, buffer));
        }
    }

    #[must_use]
    pub fn get(&self, kind: OutputKind) -> Option<&PixelBuffer> {
        self.maps.iter().find(|(k, _)| *k == kind).map(|(_, b)| b)
    }

    #[must_use]
    pub fn contains(&self, kind: OutputKind) -> bool {
        self.get(kind).is_some()
    }

    /// Kinds present, in emission order
    pub fn kinds(&self) -> impl Iterator<Item = OutputKind> + '_ {
        self.maps.iter().map(|(k, _)| *k)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl IntoIterator for TransformOutput {
    type Item = (OutputKind, PixelBuffer);
    type IntoIter = std::vec::IntoIter<(OutputKind, PixelBuffer)>;

    fn into_iter(self) -> Self::IntoIter {
        self.maps.into_iter()
    }
}

/// Run the transform for `role` under `mode`.
///
/// # Errors
/// Returns [`Error::ChannelCountMismatch`] if the buffer has too few channels
/// for the transform, or [`Error::InvalidPixelBuffer`] for a role that is not
/// converted under `mode`.
pub fn transform_for_role(
    buffer: &PixelBuffer,
    role: TextureRole,
    mode: ConversionMode,
) -> Result<TransformOutput> {
    let mut output = TransformOutput::new();

    match (role, mode) {
        (TextureRole::Normal, ConversionMode::Standard) => {
            output.insert(OutputKind::Converted, normal_standard(buffer)?);
        }
        (TextureRole::Normal, ConversionMode::Tarkin) => {
            output.insert(OutputKind::Converted, normal_tarkin(buffer)?);
        }
        (TextureRole::Diffuse, ConversionMode::Standard) => {
            let (color, alpha) = diffuse_standard(buffer)?;
            output.insert(OutputKind::Color, color);
            if let Some(alpha) = alpha {
                output.insert(OutputKind::Alpha, alpha);
            }
        }
        (TextureRole::Diffuse, ConversionMode::Tarkin) => {
            output.insert(OutputKind::Color, diffuse_tarkin(buffer)?);
        }
        (TextureRole::Gloss, ConversionMode::Standard) => {
            output.insert(OutputKind::Roughness, gloss_to_roughness(buffer)?);
        }
        (TextureRole::SpecGlos, ConversionMode::Tarkin) => {
            let (spec, roughness) = split_specglos(buffer)?;
            output.insert(OutputKind::Spec, spec);
            output.insert(OutputKind::Roughness, roughness);
        }
        (TextureRole::Gloss | TextureRole::SpecGlos, _) => {
            return Err(Error::InvalidPixelBuffer(format!(
                "{role} maps are not converted in {mode} mode"
            )));
        }
    }

    Ok(output)
}

/// Standard normal map: height from alpha moves into red, blue and alpha flatten.
///
/// `(R, G, B, A) -> (A, G, 255, 255)`. The original red channel is dropped.
///
/// # Errors
/// Returns an error if the buffer has fewer than 3 channels.
pub fn normal_standard(buffer: &PixelBuffer) -> Result<PixelBuffer> {
    map_pixels(buffer, 3, |[_, g, _, a]| [a, g, OPAQUE, OPAQUE])
}

/// Tarkin normal map: RGB passes through, alpha flattens.
///
/// # Errors
/// Returns an error if the buffer has fewer than 3 channels.
pub fn normal_tarkin(buffer: &PixelBuffer) -> Result<PixelBuffer> {
    map_pixels(buffer, 3, |[r, g, b, _]| [r, g, b, OPAQUE])
}

/// Standard diffuse split into color and, if any pixel is translucent, alpha.
///
/// # Errors
/// Returns an error if the buffer has fewer than 3 channels.
pub fn diffuse_standard(buffer: &PixelBuffer) -> Result<(PixelBuffer, Option<PixelBuffer>)> {
    let color = map_pixels(buffer, 3, |[r, g, b, _]| [r, g, b, OPAQUE])?;

    let has_alpha = buffer.channels() == 4 && buffer.pixels().any(|px| px[3] < OPAQUE);
    let alpha = if has_alpha {
        Some(map_pixels(buffer, 4, |[_, _, _, a]| [a, a, a, OPAQUE])?)
    } else {
        None
    };

    Ok((color, alpha))
}

/// Tarkin diffuse: color only.
///
/// # Errors
/// Returns an error if the buffer has fewer than 3 channels.
pub fn diffuse_tarkin(buffer: &PixelBuffer) -> Result<PixelBuffer> {
    map_pixels(buffer, 3, |[r, g, b, _]| [r, g, b, OPAQUE])
}

/// Gloss to roughness: invert RGB and broadcast the inverted red.
///
/// # Errors
/// Returns an error if the buffer has fewer than 3 channels.
pub fn gloss_to_roughness(buffer: &PixelBuffer) -> Result<PixelBuffer> {
    map_pixels(buffer, 3, |[r, _, _, _]| {
        let rough = OPAQUE - r;
        [rough, rough, rough, OPAQUE]
    })
}

/// Split a spec-gloss map into specular color and roughness from inverted alpha.
///
/// # Errors
/// Returns [`Error::ChannelCountMismatch`] unless the buffer has 4 channels.
pub fn split_specglos(buffer: &PixelBuffer) -> Result<(PixelBuffer, PixelBuffer)> {
    require_channels(buffer, 4)?;
    let spec = map_pixels(buffer, 4, |[r, g, b, _]| [r, g, b, OPAQUE])?;
    let roughness = map_pixels(buffer, 4, |[_, _, _, a]| {
        let rough = OPAQUE - a;
        [rough, rough, rough, OPAQUE]
    })?;
    Ok((spec, roughness))
}

fn require_channels(buffer: &PixelBuffer, min_channels: u8) -> Result<()> {
    if buffer.channels() < min_channels {
        return Err(Error::ChannelCountMismatch {
            expected: min_channels,
            actual: buffer.channels(),
        });
    }
    Ok(())
}

/// Map every pixel to a new RGBA pixel. 3-channel input reads as opaque.
fn map_pixels<F>(buffer: &PixelBuffer, min_channels: u8, f: F) -> Result<PixelBuffer>
where
    F: Fn([u8; 4]) -> [u8; 4],
{
    require_channels(buffer, min_channels)?;

    let mut data = Vec::with_capacity(buffer.len() * 4);
    for px in buffer.pixels() {
        let rgba = match px {
            &[r, g, b, a] => [r, g, b, a],
            &[r, g, b] => [r, g, b, OPAQUE],
            _ => unreachable!("channel count checked above"),
        };
        data.extend_from_slice(&f(rgba));
    }

    PixelBuffer::new(buffer.width(), buffer.height(), 4, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(px: [u8; 4]) -> PixelBuffer {
        PixelBuffer::from_fn_rgba(1, 1, |_, _| px)
    }

    fn first(buffer: &PixelBuffer) -> &[u8] {
        buffer.pixel(0, 0).unwrap()
    }

    #[test]
    fn test_normal_standard_repacks_alpha_into_red() {
        let out = normal_standard(&single([10, 20, 30, 40])).unwrap();
        assert_eq!(first(&out), &[40, 20, 255, 255]);
    }

    #[test]
    fn test_normal_standard_is_lossy() {
        // Re-applying the Tarkin passthrough cannot bring the original red back
        let original = single([10, 20, 30, 40]);
        let converted = normal_standard(&original).unwrap();
        let back = normal_tarkin(&converted).unwrap();
        assert_ne!(first(&back)[0], 10);
    }

    #[test]
    fn test_normal_tarkin_passthrough() {
        let out = normal_tarkin(&single([10, 20, 30, 40])).unwrap();
        assert_eq!(first(&out), &[10, 20, 30, 255]);
    }

    #[test]
    fn test_diffuse_standard_opaque_has_no_alpha_map() {
        let buf = PixelBuffer::from_fn_rgba(4, 4, |x, y| [x as u8, y as u8, 9, 255]);
        let (color, alpha) = diffuse_standard(&buf).unwrap();
        assert!(alpha.is_none());
        assert_eq!(color.pixel(3, 2), Some(&[3, 2, 9, 255][..]));
    }

    #[test]
    fn test_diffuse_standard_translucent_emits_alpha_map() {
        let buf = PixelBuffer::from_fn_rgba(2, 2, |x, y| {
            if (x, y) == (1, 1) { [1, 2, 3, 200] } else { [1, 2, 3, 255] }
        });
        let (color, alpha) = diffuse_standard(&buf).unwrap();
        let alpha = alpha.expect("alpha map expected");
        assert_eq!(color.pixel(1, 1), Some(&[1, 2, 3, 255][..]));
        assert_eq!(alpha.pixel(1, 1), Some(&[200, 200, 200, 255][..]));
        assert_eq!(alpha.pixel(0, 0), Some(&[255, 255, 255, 255][..]));
    }

    #[test]
    fn test_gloss_inverts_red_only() {
        let out = gloss_to_roughness(&single([55, 0, 255, 12])).unwrap();
        assert_eq!(first(&out), &[200, 200, 200, 255]);
    }

    #[test]
    fn test_specglos_split() {
        let (spec, rough) = split_specglos(&single([11, 22, 33, 55])).unwrap();
        assert_eq!(first(&spec), &[11, 22, 33, 255]);
        assert_eq!(first(&rough), &[200, 200, 200, 255]);
    }

    #[test]
    fn test_specglos_requires_four_channels() {
        let rgb = PixelBuffer::new(1, 1, 3, vec![1, 2, 3]).unwrap();
        assert!(matches!(
            split_specglos(&rgb),
            Err(Error::ChannelCountMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_three_channel_input_reads_opaque() {
        let rgb = PixelBuffer::new(1, 1, 3, vec![1, 2, 3]).unwrap();
        let out = normal_standard(&rgb).unwrap();
        assert_eq!(first(&out), &[255, 2, 255, 255]);
        let (_, alpha) = diffuse_standard(&rgb).unwrap();
        assert!(alpha.is_none());
    }

    #[test]
    fn test_grayscale_buffer_is_rejected() {
        let gray = PixelBuffer::new(1, 1, 1, vec![7]).unwrap();
        assert!(matches!(
            gloss_to_roughness(&gray),
            Err(Error::ChannelCountMismatch { expected: 3, actual: 1 })
        ));
    }

    #[test]
    fn test_dispatch_output_kinds() {
        let buf = single([1, 2, 3, 100]);
        let kinds = |role, mode| -> Vec<OutputKind> {
            transform_for_role(&buf, role, mode).unwrap().kinds().collect()
        };

        assert_eq!(kinds(TextureRole::Normal, ConversionMode::Standard), [OutputKind::Converted]);
        assert_eq!(kinds(TextureRole::Normal, ConversionMode::Tarkin), [OutputKind::Converted]);
        assert_eq!(
            kinds(TextureRole::Diffuse, ConversionMode::Standard),
            [OutputKind::Color, OutputKind::Alpha]
        );
        assert_eq!(kinds(TextureRole::Diffuse, ConversionMode::Tarkin), [OutputKind::Color]);
        assert_eq!(kinds(TextureRole::Gloss, ConversionMode::Standard), [OutputKind::Roughness]);
        assert_eq!(
            kinds(TextureRole::SpecGlos, ConversionMode::Tarkin),
            [OutputKind::Spec, OutputKind::Roughness]
        );
    }

    #[test]
    fn test_dispatch_rejects_role_outside_mode() {
        let buf = single([1, 2, 3, 4]);
        assert!(transform_for_role(&buf, TextureRole::Gloss, ConversionMode::Tarkin).is_err());
        assert!(transform_for_role(&buf, TextureRole::SpecGlos, ConversionMode::Standard).is_err());
    }

    #[test]
    fn test_output_filenames() {
        assert_eq!(OutputKind::Color.output_filename("helmet_d"), "helmet_d_color.png");
        assert_eq!(OutputKind::Converted.output_filename("helmet_n"), "helmet_n_converted.png");
    }
}

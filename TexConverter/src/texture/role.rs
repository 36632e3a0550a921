//! Filename-based texture role classification
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use crate::utils::path::file_stem;

/// Role of an input texture, read from its filename suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureRole {
    /// Normal map (`_n`, `_normal`, `_nrm`)
    Normal,
    /// Diffuse/albedo map (`_d`, `_diff`, `_diffuse`, `_albedo`)
    Diffuse,
    /// Glossiness map (`_g`, `_gloss`, `_gls`), standard mode only
    Gloss,
    /// Specular RGB with glossiness in alpha (`_sg`, `_specglos`), Tarkin mode only
    SpecGlos,
}

impl TextureRole {
    /// Match a single lower-cased filename token against the role vocabularies
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "n" | "normal" | "nrm" => Some(Self::Normal),
            "d" | "diff" | "diffuse" | "albedo" => Some(Self::Diffuse),
            "g" | "gloss" | "gls" => Some(Self::Gloss),
            "sg" | "specglos" => Some(Self::SpecGlos),
            _ => None,
        }
    }

    /// Whether this role is converted under the given mode
    #[must_use]
    pub fn is_valid_in(self, mode: ConversionMode) -> bool {
        match self {
            Self::Normal | Self::Diffuse => true,
            Self::Gloss => mode == ConversionMode::Standard,
            Self::SpecGlos => mode == ConversionMode::Tarkin,
        }
    }

    /// Get a human-readable name for this role
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Diffuse => "diffuse",
            Self::Gloss => "gloss",
            Self::SpecGlos => "specglos",
        }
    }
}

impl std::fmt::Display for TextureRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel-packing convention of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionMode {
    /// Standard PBR packing (height in normal alpha, gloss maps)
    #[default]
    Standard,
    /// Tarkov SPECGLOS packing
    Tarkin,
}

impl ConversionMode {
    /// Map the boolean `--tarkin` flag onto a mode
    #[must_use]
    pub fn from_tarkin_flag(tarkin: bool) -> Self {
        if tarkin { Self::Tarkin } else { Self::Standard }
    }

    #[must_use]
    pub fn is_tarkin(self) -> bool {
        self == Self::Tarkin
    }

    /// Get a human-readable name for this mode
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Tarkin => "Tarkin (SPECGLOS)",
        }
    }
}

impl std::fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a texture file by its name.
///
/// The extension is stripped, the rest is lower-cased and split on `_`, and
/// tokens are scanned from the right. The first token that names a role
/// decides: if that role is not converted under `mode` the file is skipped
/// (`None`), it does not fall through to earlier tokens.
///
/// With no role token at all, standard mode assumes a normal map and Tarkin
/// mode skips the file.
#[must_use]
pub fn classify(filename: &str, mode: ConversionMode) -> Option<TextureRole> {
    let base_name = file_stem(filename).to_lowercase();

    for token in base_name.rsplit('_') {
        if let Some(role) = TextureRole::from_token(token) {
            return role.is_valid_in(mode).then_some(role);
        }
    }

    match mode {
        ConversionMode::Standard => {
            tracing::warn!("No known suffix found for {filename}, assuming standard normal map");
            Some(TextureRole::Normal)
        }
        ConversionMode::Tarkin => {
            tracing::debug!("No relevant suffix for Tarkin mode in {filename}, skipping");
            None
        }
    }
}

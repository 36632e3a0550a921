//! Run configuration and output folder allocation

use std::path::{Path, PathBuf};

use crate::codec::CompressionLevel;
use crate::error::{Error, Result};
use crate::texture::ConversionMode;

/// Name of the output folder created inside the input folder
pub const DEFAULT_OUTPUT_SUBFOLDER: &str = "converted_textures";

/// Input extensions picked up by discovery (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "tga"];

/// Worker count used when none is given: the available parallelism, or 1
#[must_use]
pub fn recommended_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Settings for one conversion run
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    /// Folder scanned for textures
    pub input_folder: PathBuf,
    /// Size of each worker pool (always at least 1)
    pub workers: usize,
    /// PNG compression level for every written image
    pub compression: CompressionLevel,
    /// Channel-packing convention
    pub mode: ConversionMode,
}

impl RunConfiguration {
    /// Defaults: recommended worker count, fast compression, standard mode
    #[must_use]
    pub fn new(input_folder: impl Into<PathBuf>) -> Self {
        Self {
            input_folder: input_folder.into(),
            workers: recommended_workers(),
            compression: CompressionLevel::FAST,
            mode: ConversionMode::Standard,
        }
    }

    /// Set the worker count; 0 means the recommended count
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = if workers == 0 { recommended_workers() } else { workers };
        self
    }

    /// Use the smallest (slowest) PNG compression instead of the fastest
    #[must_use]
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.compression = CompressionLevel::from_optimize(optimize);
        self
    }

    #[must_use]
    pub fn with_compression(mut self, compression: CompressionLevel) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ConversionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether the optimize flag is in effect
    #[must_use]
    pub fn is_optimized(&self) -> bool {
        self.compression == CompressionLevel::SMALL
    }
}

/// Pick the first free output folder path inside `input_folder`.
///
/// Tries `converted_textures`, then `converted_textures_1`,
/// `converted_textures_2` and so on.
#[must_use]
pub fn unique_output_folder(input_folder: &Path) -> PathBuf {
    let candidate = input_folder.join(DEFAULT_OUTPUT_SUBFOLDER);
    if !candidate.exists() {
        return candidate;
    }

    let mut counter = 1usize;
    loop {
        let candidate = input_folder.join(format!("{DEFAULT_OUTPUT_SUBFOLDER}_{counter}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Allocate and create a fresh output folder inside `input_folder`
///
/// # Errors
/// Returns [`Error::OutputFolder`] if the folder cannot be created.
pub fn create_output_folder(input_folder: &Path) -> Result<PathBuf> {
    let output_folder = unique_output_folder(input_folder);
    std::fs::create_dir_all(&output_folder).map_err(|source| Error::OutputFolder {
        path: output_folder.clone(),
        source,
    })?;
    Ok(output_folder)
}

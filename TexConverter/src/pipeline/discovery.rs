//! Input folder scanning

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::config::SUPPORTED_EXTENSIONS;
use crate::error::{Error, Result};

/// Whether a file name has one of the supported image extensions
#[must_use]
pub fn is_supported_texture(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Find all supported textures directly inside `dir`
///
/// Only immediate entries are scanned. Directories, dot-files and files with
/// other extensions are ignored. Entries that cannot be resolved, such as
/// dangling symlinks, are logged and skipped.
///
/// # Returns
/// A sorted list of texture paths.
///
/// # Errors
/// Returns [`Error::InputFolderNotFound`] if `dir` is not a directory, or
/// [`Error::Discovery`] if it cannot be read.
pub fn discover_textures<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::InputFolderNotFound { path: dir.to_path_buf() });
    }

    let mut textures = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1) // Skip the root directory itself
        .max_depth(1) // Only immediate entries
    {
        let entry = match entry {
            Ok(entry) => entry,
            // The folder itself could not be read
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                let path = e.path().map_or_else(String::new, |p| p.display().to_string());
                tracing::warn!("Skipping unreadable entry {path}: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if file_name.starts_with('.') || !is_supported_texture(&file_name) {
            continue;
        }

        textures.push(entry.into_path());
    }

    textures.sort();
    Ok(textures)
}

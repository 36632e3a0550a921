//! glTF material and image rewriting for Tarkin conversions
//!
//! After a Tarkin run, `.gltf` files next to the source textures still point
//! at the original images and use `KHR_materials_pbrSpecularGlossiness`.
//! This module points them at the converted PNGs and migrates those
//! materials to core metallic-roughness. Files are rewritten in place.

mod document;
mod rewrite;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;
use crate::utils::path::normalize_path;

pub use document::GltfDocument;
pub use rewrite::{remapped_uri, rewrite_document, GltfChanges, SPEC_GLOSS_EXTENSION};

/// Counts from a folder-wide glTF rewrite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GltfRewriteSummary {
    /// `.gltf` files found
    pub found: usize,
    /// Files rewritten
    pub updated: usize,
    /// Files that could not be read, parsed or written
    pub failed: usize,
}

/// Rewrite one `.gltf` file in place
///
/// The file is only written when something changed.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed or written.
pub fn rewrite_gltf_file<P: AsRef<Path>>(path: P, output_folder_name: &str) -> Result<GltfChanges> {
    let mut document = GltfDocument::open(path)?;
    let changes = rewrite_document(&mut document, output_folder_name);

    if changes.is_changed() {
        document.save()?;
    }

    Ok(changes)
}

/// Find the `.gltf` files directly inside `dir`, sorted
fn find_gltf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let is_gltf = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gltf"));
        if entry.file_type().is_file() && is_gltf {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Rewrite every `.gltf` file in `input_folder` to use the textures written
/// to `output_folder`.
///
/// Never fails: a document that cannot be processed is logged and counted,
/// and the others are still rewritten.
pub fn update_gltf_files<P: AsRef<Path>, Q: AsRef<Path>>(
    input_folder: P,
    output_folder: Q,
) -> GltfRewriteSummary {
    let input_folder = input_folder.as_ref();
    let output_folder = output_folder.as_ref();
    let mut summary = GltfRewriteSummary::default();

    if !input_folder.is_dir() {
        tracing::error!("glTF update: input folder {} not found", input_folder.display());
        return summary;
    }

    let output_folder_name = output_folder
        .file_name()
        .map_or_else(|| normalize_path(output_folder), |name| name.to_string_lossy().into_owned());

    let files = match find_gltf_files(input_folder) {
        Ok(files) => files,
        Err(e) => {
            tracing::error!("glTF update: failed to scan {}: {e}", input_folder.display());
            return summary;
        }
    };

    tracing::info!(
        "Scanning for glTF files in {} relative to {output_folder_name}",
        input_folder.display()
    );
    summary.found = files.len();

    for path in &files {
        match rewrite_gltf_file(path, &output_folder_name) {
            Ok(changes) if changes.is_changed() => {
                summary.updated += 1;
                tracing::info!(
                    "Updated {}: {} image(s), {} material(s) migrated",
                    path.display(),
                    changes.images_updated.len(),
                    changes.materials_migrated.len()
                );
            }
            Ok(_) => tracing::info!("No relevant changes in {}", path.display()),
            Err(e) => {
                summary.failed += 1;
                tracing::error!("Failed to update {}: {e}", path.display());
            }
        }
    }

    if summary.found == 0 {
        tracing::info!("glTF update: no .gltf files found");
    } else {
        tracing::info!(
            "glTF update: processed {} file(s), updated {}, failed {}",
            summary.found,
            summary.updated,
            summary.failed
        );
    }

    summary
}

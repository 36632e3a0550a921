//! Per-file decode, classify and transform

use std::path::Path;

use super::types::FileOutcome;
use crate::codec;
use crate::texture::{classify, transform_for_role, ConversionMode};
use crate::utils::path::file_stem;

/// Convert one input file into its derived maps.
///
/// Never fails: every error is folded into the returned outcome.
#[must_use]
pub fn process_texture(input_path: &Path, mode: ConversionMode) -> FileOutcome {
    let file_name = input_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base_name = file_stem(&file_name).to_string();

    let buffer = match codec::decode_file(input_path) {
        Ok(buffer) => buffer,
        Err(e) => {
            return FileOutcome::Failed {
                base_name,
                reason: format!("failed to load image: {e}"),
            };
        }
    };

    let Some(role) = classify(&file_name, mode) else {
        return FileOutcome::Skipped {
            base_name,
            reason: format!("no role converted in {mode} mode"),
        };
    };

    match transform_for_role(&buffer, role, mode) {
        Ok(output) => FileOutcome::Success { base_name, role, output },
        Err(e) => FileOutcome::Failed {
            base_name,
            reason: format!("{role} transform failed: {e}"),
        },
    }
}

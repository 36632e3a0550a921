//! Save tasks for derived maps

use std::path::{Path, PathBuf};

use super::types::FileOutcome;
use crate::codec::{save_png, CompressionLevel};
use crate::error::Result;
use crate::texture::PixelBuffer;

/// One derived image bound to its output path
#[derive(Debug, Clone)]
pub struct SaveTask {
    pub buffer: PixelBuffer,
    pub output_path: PathBuf,
}

impl SaveTask {
    /// Output file name, for progress and log lines
    #[must_use]
    pub fn file_name(&self) -> String {
        self.output_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Encode and write the image
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn save(&self, level: CompressionLevel) -> Result<()> {
        save_png(&self.buffer, &self.output_path, level)
    }
}

/// Build one save task per derived map of every successful outcome.
///
/// Failed and skipped outcomes produce nothing.
#[must_use]
pub fn build_save_tasks(outcomes: Vec<FileOutcome>, output_folder: &Path) -> Vec<SaveTask> {
    let mut tasks = Vec::new();
    for outcome in outcomes {
        if let FileOutcome::Success { base_name, output, .. } = outcome {
            for (kind, buffer) in output {
                tasks.push(SaveTask {
                    buffer,
                    output_path: output_folder.join(kind.output_filename(&base_name)),
                });
            }
        }
    }
    tasks
}

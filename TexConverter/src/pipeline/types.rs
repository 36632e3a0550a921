//! Types for conversion outcomes, progress tracking and run summaries
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::path::PathBuf;

use crate::texture::{TextureRole, TransformOutput};

// ============================================================================
// Outcome Types
// ============================================================================

/// Result of decoding, classifying and transforming one input file
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// The file was converted; its maps are ready to save
    Success {
        /// Input filename without extension
        base_name: String,
        /// Role the file was classified as
        role: TextureRole,
        /// Derived maps
        output: TransformOutput,
    },
    /// Decoding or transforming failed
    Failed {
        /// Input filename without extension
        base_name: String,
        /// Human-readable reason
        reason: String,
    },
    /// The filename names no role converted in this mode
    Skipped {
        /// Input filename without extension
        base_name: String,
        /// Human-readable reason
        reason: String,
    },
}

impl FileOutcome {
    /// Input filename without extension
    #[must_use]
    pub fn base_name(&self) -> &str {
        match self {
            Self::Success { base_name, .. }
            | Self::Failed { base_name, .. }
            | Self::Skipped { base_name, .. } => base_name,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

// ============================================================================
// Progress Types
// ============================================================================

/// Progress callback type for conversion runs
pub type ConversionProgressCallback<'a> = &'a (dyn Fn(&ConversionProgress) + Sync + Send);

/// Progress information during a conversion run
#[derive(Debug, Clone)]
pub struct ConversionProgress {
    /// Current pipeline stage
    pub phase: ConversionPhase,
    /// Completed units in this stage (1-indexed once work completes)
    pub current: usize,
    /// Total units in this stage
    pub total: usize,
    /// File that just completed (if applicable)
    pub current_file: Option<String>,
}

impl ConversionProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: ConversionPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a file name
    #[must_use]
    pub fn with_file(
        phase: ConversionPhase,
        current: usize,
        total: usize,
        file: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Stage of a conversion run. Runs only move forward through these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConversionPhase {
    /// Scanning the input folder
    Discovering,
    /// Decoding and transforming textures
    Processing,
    /// Writing derived PNGs
    Saving,
    /// Run complete
    Done,
}

impl ConversionPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discovering => "Discovering textures",
            Self::Processing => "Processing textures",
            Self::Saving => "Saving images",
            Self::Done => "Complete",
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Summary of a conversion run
///
/// File counts are over input files: a diffuse map that yields two images
/// still counts once.
#[derive(Debug, Clone, Default)]
pub struct ConversionSummary {
    /// Input files converted
    pub successful: usize,
    /// Input files that failed to decode or transform
    pub failed: usize,
    /// Input files skipped by classification
    pub skipped: usize,
    /// Derived images written
    pub images_saved: usize,
    /// Derived images that failed to write
    pub images_failed: usize,
    /// Folder the images were written to
    pub output_folder: PathBuf,
    /// Messages for each file processed
    pub results: Vec<String>,
}

impl ConversionSummary {
    /// Empty summary for a run writing into `output_folder`
    #[must_use]
    pub fn new(output_folder: PathBuf) -> Self {
        Self {
            output_folder,
            ..Self::default()
        }
    }

    /// `(successful, failed, skipped)` over input files
    #[must_use]
    pub fn tally(&self) -> (usize, usize, usize) {
        (self.successful, self.failed, self.skipped)
    }

    /// Input files accounted for
    #[must_use]
    pub fn total(&self) -> usize {
        self.successful + self.failed + self.skipped
    }

    /// Count an outcome and record its message
    pub(crate) fn record(&mut self, file_name: &str, outcome: &FileOutcome) {
        let message = match outcome {
            FileOutcome::Success { role, output, .. } => {
                self.successful += 1;
                format!("Converted {file_name} ({role}, {} map(s))", output.len())
            }
            FileOutcome::Failed { reason, .. } => {
                self.failed += 1;
                format!("Failed {file_name}: {reason}")
            }
            FileOutcome::Skipped { reason, .. } => {
                self.skipped += 1;
                format!("Skipped {file_name}: {reason}")
            }
        };
        self.results.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage() {
        assert!((ConversionProgress::new(ConversionPhase::Saving, 0, 0).percentage() - 1.0).abs() < f32::EPSILON);
        assert!((ConversionProgress::new(ConversionPhase::Processing, 1, 4).percentage() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_phases_only_move_forward() {
        assert!(ConversionPhase::Discovering < ConversionPhase::Processing);
        assert!(ConversionPhase::Processing < ConversionPhase::Saving);
        assert!(ConversionPhase::Saving < ConversionPhase::Done);
    }

    #[test]
    fn test_summary_record_counts_input_files() {
        let mut summary = ConversionSummary::default();
        summary.record(
            "a_d.png",
            &FileOutcome::Success {
                base_name: "a_d".into(),
                role: TextureRole::Diffuse,
                output: TransformOutput::new(),
            },
        );
        summary.record(
            "b.png",
            &FileOutcome::Skipped { base_name: "b".into(), reason: "no suffix".into() },
        );
        summary.record(
            "c_n.png",
            &FileOutcome::Failed { base_name: "c_n".into(), reason: "corrupt".into() },
        );

        assert_eq!(summary.tally(), (1, 1, 1));
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.results.len(), 3);
        assert!(summary.results[2].contains("corrupt"));
    }
}

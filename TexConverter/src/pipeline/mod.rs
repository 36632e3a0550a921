//! Batch conversion pipeline
//!
//! A run moves through [`ConversionPhase::Discovering`],
//! [`ConversionPhase::Processing`] and [`ConversionPhase::Saving`] to
//! [`ConversionPhase::Done`]. Decoding and transforming happen on one worker
//! pool, writing PNGs on a second. The calling thread aggregates results as
//! they arrive, so per-file failures never abort the run.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

mod config;
mod discovery;
mod process;
mod save;
mod types;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Error, Result};
use crate::utils::path::file_stem;

pub use config::{
    create_output_folder, recommended_workers, unique_output_folder, RunConfiguration,
    DEFAULT_OUTPUT_SUBFOLDER, SUPPORTED_EXTENSIONS,
};
pub use discovery::{discover_textures, is_supported_texture};
pub use process::process_texture;
pub use save::{build_save_tasks, SaveTask};
pub use types::{
    ConversionPhase, ConversionProgress, ConversionProgressCallback, ConversionSummary,
    FileOutcome,
};

/// Reason recorded for files whose worker never reported back
const WORKER_TERMINATED: &str = "worker terminated before reporting a result";

/// A configured conversion run bound to its output folder
#[derive(Debug)]
pub struct ConversionPipeline {
    config: RunConfiguration,
    output_folder: PathBuf,
    texture_pool: ThreadPool,
    save_pool: ThreadPool,
}

impl ConversionPipeline {
    /// Validate the input folder, create the output folder and build the
    /// worker pools.
    ///
    /// # Errors
    /// Returns [`Error::InputFolderNotFound`] if the input folder is missing,
    /// [`Error::OutputFolder`] if the output folder cannot be created, or
    /// [`Error::WorkerPool`] if a pool cannot be built.
    pub fn new(config: RunConfiguration) -> Result<Self> {
        if !config.input_folder.is_dir() {
            return Err(Error::InputFolderNotFound {
                path: config.input_folder.clone(),
            });
        }

        let workers = config.workers.max(1);
        let texture_pool = build_pool(workers, "texture-worker")?;
        let save_pool = build_pool(workers, "save-worker")?;
        let output_folder = create_output_folder(&config.input_folder)?;

        tracing::info!(
            "Converting {} in {} mode with {} worker(s), compression level {}",
            config.input_folder.display(),
            config.mode,
            workers,
            config.compression
        );
        tracing::info!("Output folder: {}", output_folder.display());

        Ok(Self {
            config,
            output_folder,
            texture_pool,
            save_pool,
        })
    }

    #[must_use]
    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    #[must_use]
    pub fn input_folder(&self) -> &Path {
        &self.config.input_folder
    }

    #[must_use]
    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    /// Run the whole conversion.
    ///
    /// Always returns a summary. If the input folder cannot be scanned the
    /// error is logged and the summary is empty.
    #[must_use]
    pub fn run(&self, progress: Option<ConversionProgressCallback>) -> ConversionSummary {
        let mut summary = ConversionSummary::new(self.output_folder.clone());

        report(progress, &ConversionProgress::new(ConversionPhase::Discovering, 0, 0));
        let files = match discover_textures(&self.config.input_folder) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("Failed to scan {}: {e}", self.config.input_folder.display());
                return summary;
            }
        };

        tracing::info!("Found {} supported image file(s)", files.len());
        if files.is_empty() {
            tracing::warn!("No supported images found in {}", self.config.input_folder.display());
            report(progress, &ConversionProgress::new(ConversionPhase::Done, 0, 0));
            return summary;
        }

        let outcomes = self.process_files(&files, &mut summary, progress);
        tracing::info!(
            "Processing complete: {} converted, {} failed, {} skipped",
            summary.successful,
            summary.failed,
            summary.skipped
        );

        let tasks = build_save_tasks(outcomes, &self.output_folder);
        if !tasks.is_empty() {
            let (saved, failed) = self.save_images(tasks, progress);
            summary.images_saved = saved;
            summary.images_failed = failed;
            tracing::info!("Saving complete: {saved} image(s) written, {failed} failed");
        }

        let total = files.len();
        report(progress, &ConversionProgress::new(ConversionPhase::Done, total, total));
        summary
    }

    /// Decode, classify and transform every file on the texture pool
    fn process_files(
        &self,
        files: &[PathBuf],
        summary: &mut ConversionSummary,
        progress: Option<ConversionProgressCallback>,
    ) -> Vec<FileOutcome> {
        let total = files.len();
        let mode = self.config.mode;
        let (tx, rx) = mpsc::channel::<(String, FileOutcome)>();

        let mut pending = BTreeSet::new();
        for path in files {
            let file_name = display_name(path);
            pending.insert(file_name.clone());

            let tx = tx.clone();
            let path = path.clone();
            self.texture_pool.spawn(move || {
                let outcome = process_texture(&path, mode);
                // The receiver outlives every sender
                let _ = tx.send((file_name, outcome));
            });
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(total);
        let mut completed = 0;

        for (file_name, outcome) in rx {
            pending.remove(&file_name);
            completed += 1;
            log_outcome(&file_name, &outcome);
            summary.record(&file_name, &outcome);
            report_unit(progress, ConversionPhase::Processing, completed, total, &file_name);
            outcomes.push(outcome);
        }

        for file_name in pending {
            let outcome = FileOutcome::Failed {
                base_name: file_stem(&file_name).to_string(),
                reason: WORKER_TERMINATED.to_string(),
            };
            completed += 1;
            log_outcome(&file_name, &outcome);
            summary.record(&file_name, &outcome);
            report_unit(progress, ConversionPhase::Processing, completed, total, &file_name);
        }

        outcomes
    }

    /// Write every derived image on the save pool, returning `(saved, failed)`
    fn save_images(
        &self,
        tasks: Vec<SaveTask>,
        progress: Option<ConversionProgressCallback>,
    ) -> (usize, usize) {
        let total = tasks.len();
        let level = self.config.compression;
        let (tx, rx) = mpsc::channel::<(String, Result<()>)>();

        for task in tasks {
            let tx = tx.clone();
            self.save_pool.spawn(move || {
                let result = task.save(level);
                let _ = tx.send((task.file_name(), result));
            });
        }
        drop(tx);

        let mut saved = 0;
        let mut failed = 0;
        let mut completed = 0;

        for (file_name, result) in rx {
            completed += 1;
            match result {
                Ok(()) => {
                    saved += 1;
                    tracing::debug!("Saved {file_name}");
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!("Failed to save {file_name}: {e}");
                }
            }
            report_unit(progress, ConversionPhase::Saving, completed, total, &file_name);
        }

        // Saves whose worker died without reporting
        let lost = total - completed;
        if lost > 0 {
            tracing::error!("{lost} save task(s) ended without a result");
            failed += lost;
        }

        (saved, failed)
    }
}

fn build_pool(workers: usize, name: &'static str) -> Result<ThreadPool> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(move |index| format!("{name}-{index}"))
        .panic_handler(move |panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!("A {name} panicked: {message}");
        })
        .build()?;
    Ok(pool)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn log_outcome(file_name: &str, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Success { role, output, .. } => {
            let kinds: Vec<_> = output.kinds().map(|kind| kind.as_str()).collect();
            tracing::info!("Processed {file_name} as {role}: {}", kinds.join(", "));
        }
        FileOutcome::Failed { reason, .. } => {
            tracing::error!("Failed to process {file_name}: {reason}");
        }
        FileOutcome::Skipped { reason, .. } => {
            tracing::info!("Skipped {file_name}: {reason}");
        }
    }
}

fn report(progress: Option<ConversionProgressCallback>, update: &ConversionProgress) {
    if let Some(callback) = progress {
        callback(update);
    }
}

/// Report one completed unit, or log it when nobody is listening
fn report_unit(
    progress: Option<ConversionProgressCallback>,
    phase: ConversionPhase,
    completed: usize,
    total: usize,
    file_name: &str,
) {
    match progress {
        Some(callback) => {
            callback(&ConversionProgress::with_file(phase, completed, total, file_name));
        }
        None => tracing::debug!("{}: {completed}/{total} ({file_name})", phase.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{save_png, CompressionLevel};
    use crate::texture::{ConversionMode, PixelBuffer};
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str) {
        let buf = PixelBuffer::from_fn_rgba(2, 2, |x, y| [x as u8, y as u8, 0, 255]);
        save_png(&buf, dir.join(name), CompressionLevel::FAST).unwrap();
    }

    #[test]
    fn test_new_rejects_missing_folder() {
        let temp = TempDir::new().unwrap();
        let config = RunConfiguration::new(temp.path().join("missing"));
        assert!(matches!(
            ConversionPipeline::new(config),
            Err(Error::InputFolderNotFound { .. })
        ));
    }

    #[test]
    fn test_empty_folder_returns_zero_tally() {
        let temp = TempDir::new().unwrap();
        let pipeline = ConversionPipeline::new(RunConfiguration::new(temp.path())).unwrap();

        let summary = pipeline.run(None);

        assert_eq!(summary.tally(), (0, 0, 0));
        assert!(pipeline.output_folder().is_dir());
    }

    #[test]
    fn test_progress_is_monotonic_with_stable_totals() {
        let temp = TempDir::new().unwrap();
        for name in ["a_d.png", "b_n.png", "c_g.png", "d_n.png"] {
            write_png(temp.path(), name);
        }

        let config = RunConfiguration::new(temp.path()).with_workers(3);
        let pipeline = ConversionPipeline::new(config).unwrap();

        let updates = Mutex::new(Vec::new());
        let callback: ConversionProgressCallback = &|p| {
            updates.lock().unwrap().push((p.phase, p.current, p.total));
        };
        let summary = pipeline.run(Some(callback));
        let updates = updates.into_inner().unwrap();

        assert_eq!(summary.tally(), (4, 0, 0));
        assert_eq!(summary.images_saved, 4);

        let processing: Vec<_> = updates
            .iter()
            .filter(|(phase, ..)| *phase == ConversionPhase::Processing)
            .collect();
        assert_eq!(processing.len(), 4);
        for (i, (_, current, total)) in processing.iter().enumerate() {
            assert_eq!(*current, i + 1);
            assert_eq!(*total, 4);
        }

        let saving = updates
            .iter()
            .filter(|(phase, ..)| *phase == ConversionPhase::Saving)
            .count();
        assert_eq!(saving, 4);

        let phases: Vec<_> = updates.iter().map(|(phase, ..)| *phase).collect();
        assert!(phases.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(phases.last(), Some(&ConversionPhase::Done));
    }

    #[test]
    fn test_skipped_files_write_nothing() {
        let temp = TempDir::new().unwrap();
        write_png(temp.path(), "visor_g.png");

        let config = RunConfiguration::new(temp.path()).with_mode(ConversionMode::Tarkin);
        let pipeline = ConversionPipeline::new(config).unwrap();
        let summary = pipeline.run(None);

        assert_eq!(summary.tally(), (0, 0, 1));
        assert_eq!(summary.images_saved, 0);
        assert_eq!(std::fs::read_dir(pipeline.output_folder()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_does_not_abort_run() {
        let temp = TempDir::new().unwrap();
        write_png(temp.path(), "helmet_d.png");
        std::os::unix::fs::symlink(
            temp.path().join("deleted_n.png"),
            temp.path().join("stale_n.png"),
        )
        .unwrap();

        let pipeline = ConversionPipeline::new(RunConfiguration::new(temp.path())).unwrap();
        let summary = pipeline.run(None);

        assert_eq!(summary.tally(), (1, 0, 0));
        assert_eq!(summary.images_saved, 1);
    }

    #[test]
    fn test_failed_save_does_not_stop_other_saves() {
        let temp = TempDir::new().unwrap();
        let pipeline = ConversionPipeline::new(RunConfiguration::new(temp.path())).unwrap();
        let buffer = PixelBuffer::from_fn_rgba(1, 1, |_, _| [1, 2, 3, 255]);

        let tasks = vec![
            SaveTask {
                buffer: buffer.clone(),
                output_path: pipeline.output_folder().join("missing").join("a_d_color.png"),
            },
            SaveTask {
                buffer,
                output_path: pipeline.output_folder().join("b_d_color.png"),
            },
        ];

        assert_eq!(pipeline.save_images(tasks, None), (1, 1));
        assert!(pipeline.output_folder().join("b_d_color.png").is_file());
    }

    #[test]
    fn test_failed_save_keeps_file_successful() {
        let temp = TempDir::new().unwrap();
        write_png(temp.path(), "helmet_n.png");

        let pipeline = ConversionPipeline::new(RunConfiguration::new(temp.path())).unwrap();
        // Every save now targets a folder that no longer exists
        std::fs::remove_dir(pipeline.output_folder()).unwrap();
        let summary = pipeline.run(None);

        assert_eq!(summary.tally(), (1, 0, 0));
        assert_eq!(summary.images_saved, 0);
        assert_eq!(summary.images_failed, 1);
    }
}

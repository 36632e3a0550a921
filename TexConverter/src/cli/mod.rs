//! `TexConverter` CLI - batch texture repacking from the command line

pub mod progress;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use crate::gltf::update_gltf_files;
use crate::pipeline::{ConversionPipeline, ConversionProgressCallback, RunConfiguration};
use crate::texture::ConversionMode;
use progress::{conversion_bar, print_done, print_step, update_bar, DOCUMENT, PICTURE};

#[derive(Parser)]
#[command(name = "texconverter")]
#[command(version)]
#[command(about = "Repack game textures for standard PBR or Tarkov SPECGLOS pipelines", long_about = None)]
struct Cli {
    /// Folder containing the textures to convert
    input_folder: PathBuf,

    /// Use the Tarkov SPECGLOS (Tarkin) packing and update .gltf files
    #[arg(long)]
    tarkin: bool,

    /// Write the smallest PNGs (slower)
    #[arg(long)]
    optimize: bool,

    /// Worker threads per stage [default: available parallelism]
    #[arg(short, long)]
    workers: Option<usize>,

    /// Hide progress bars
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn execute(&self) -> anyhow::Result<()> {
        let start = Instant::now();
        let mode = ConversionMode::from_tarkin_flag(self.tarkin);
        let steps = if mode.is_tarkin() { 2 } else { 1 };

        let config = RunConfiguration::new(&self.input_folder)
            .with_workers(self.workers.unwrap_or(0))
            .with_optimize(self.optimize)
            .with_mode(mode);

        let pipeline = ConversionPipeline::new(config).with_context(|| {
            format!("Failed to start conversion in {}", self.input_folder.display())
        })?;

        print_step(1, steps, PICTURE, &format!("Converting textures ({mode} mode)..."));

        let summary = if self.quiet {
            pipeline.run(None)
        } else {
            let pb = conversion_bar();
            let callback: ConversionProgressCallback = &|progress| update_bar(&pb, progress);
            let summary = pipeline.run(Some(callback));
            pb.finish_and_clear();
            summary
        };

        let (successful, failed, skipped) = summary.tally();
        println!();
        println!("Conversion complete:");
        println!("  Input folder:  {}", pipeline.input_folder().display());
        println!("  Output folder: {}", summary.output_folder.display());
        println!("  Converted: {successful}, failed: {failed}, skipped: {skipped}");
        println!(
            "  Images written: {} ({} failed)",
            summary.images_saved, summary.images_failed
        );
        if failed > 0 {
            println!();
            println!("Failures:");
            for message in summary.results.iter().filter(|m| m.starts_with("Failed")) {
                println!("  {message}");
            }
        }

        if mode.is_tarkin() {
            println!();
            print_step(2, steps, DOCUMENT, "Updating glTF files...");
            let gltf = update_gltf_files(pipeline.input_folder(), pipeline.output_folder());
            println!(
                "  glTF files: {} found, {} updated, {} failed",
                gltf.found, gltf.updated, gltf.failed
            );
        }

        println!();
        print_done(start.elapsed());
        Ok(())
    }
}

/// Run the `TexConverter` CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.execute()?;

    Ok(())
}

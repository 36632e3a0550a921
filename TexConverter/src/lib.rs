#![allow(non_snake_case)]
//! # TexConverter
//!
//! Batch channel repacking for game textures moving between the standard
//! PBR packing and the Tarkov SPECGLOS ("Tarkin") packing.
//!
//! ## What it does
//!
//! - **Classification** - texture roles are read from filename suffixes
//!   (`_n`, `_d`, `_g`, `_sg` and their long forms)
//! - **Channel transforms** - normal, diffuse, gloss and spec-gloss maps are
//!   split and repacked pixel by pixel
//! - **Batch pipeline** - a folder is decoded and transformed on a worker
//!   pool, then every derived map is written as PNG into a fresh
//!   `converted_textures` folder
//! - **glTF rewrite** - in Tarkin mode, `.gltf` files next to the textures are
//!   pointed at the new images and migrated from
//!   `KHR_materials_pbrSpecularGlossiness` to metallic-roughness
//!
//! ## Quick Start
//!
//! ```no_run
//! use texconverter::prelude::*;
//!
//! let config = RunConfiguration::new("textures/")
//!     .with_workers(4)
//!     .with_mode(ConversionMode::Tarkin);
//!
//! let pipeline = ConversionPipeline::new(config)?;
//! let summary = pipeline.run(None);
//! let (successful, failed, skipped) = summary.tally();
//! println!("{successful} converted, {failed} failed, {skipped} skipped");
//!
//! if pipeline.config().mode.is_tarkin() {
//!     update_gltf_files(pipeline.input_folder(), pipeline.output_folder());
//! }
//! # Ok::<(), texconverter::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `texconverter` command-line binary

pub mod codec;
pub mod error;
pub mod gltf;
pub mod pipeline;
pub mod texture;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::texture::{
        classify, ConversionMode, OutputKind, PixelBuffer, TextureRole, TransformOutput,
        transform_for_role,
    };
    pub use crate::codec::{decode, encode, CompressionLevel};

    pub use crate::pipeline::{
        ConversionPhase, ConversionPipeline, ConversionProgress, ConversionProgressCallback,
        ConversionSummary, FileOutcome, RunConfiguration, discover_textures,
    };

    pub use crate::gltf::{
        GltfChanges, GltfDocument, GltfRewriteSummary, rewrite_document, rewrite_gltf_file,
        update_gltf_files,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

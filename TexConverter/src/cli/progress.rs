//! CLI progress display utilities
//!
//! Step indicators with emojis, plus the bar used for the processing and
//! saving stages.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::{ConversionPhase, ConversionProgress};
use crate::utils::format_execution_time;

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Picture - for texture conversion
pub static PICTURE: Emoji<'_, '_> = Emoji("🖼️  ", "");
/// Document - for glTF rewriting
pub static DOCUMENT: Emoji<'_, '_> = Emoji("📄 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

/// Print a step indicator: `[1/2] 🖼️  Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 0h 0m 1.25s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, format_execution_time(elapsed));
}

/// Progress bar style for determinate progress
///
/// Format: `Processing textures [████████░░░░░░░░] 50/100`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .expect("valid template")
}

/// Create a bar that follows pipeline progress updates
#[must_use]
pub fn conversion_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(bar_style());
    pb
}

/// Apply one pipeline progress update to a bar
///
/// Each stage restarts the bar with its own length.
pub fn update_bar(pb: &ProgressBar, progress: &ConversionProgress) {
    if !matches!(progress.phase, ConversionPhase::Processing | ConversionPhase::Saving) {
        return;
    }

    pb.set_length(progress.total as u64);
    pb.set_position(progress.current as u64);
    let desc = progress.current_file.as_deref().unwrap_or_default();
    pb.set_message(format!("{} {desc}", progress.phase.as_str()));
}

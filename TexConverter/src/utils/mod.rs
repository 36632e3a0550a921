//! Utility functions

pub mod path;
pub mod time;

pub use path::{file_stem, insert_suffix, normalize_path};
pub use time::format_execution_time;

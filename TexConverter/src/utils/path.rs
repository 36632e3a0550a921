//! Path and filename utilities

use std::path::Path;

/// Normalize path separators to forward slashes (for glTF URIs)
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Strip the final extension from a file name.
///
/// A leading dot does not start an extension, so `.png` stays `.png`.
#[must_use]
pub fn file_stem(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => &filename[..idx],
        _ => filename,
    }
}

/// Insert `suffix` before the extension of `filename`.
///
/// A missing leading underscore is added: `("a.png", "color")` gives
/// `a_color.png`.
#[must_use]
pub fn insert_suffix(filename: &str, suffix: &str) -> String {
    let stem = file_stem(filename);
    let ext = &filename[stem.len()..];

    if !stem.is_empty() && !suffix.is_empty() && !suffix.starts_with('_') {
        format!("{stem}_{suffix}{ext}")
    } else {
        format!("{stem}{suffix}{ext}")
    }
}

/// Last component of a `/`-separated URI path
#[must_use]
pub fn uri_file_name(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

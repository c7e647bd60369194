//! Utilities for output naming and display helpers.

use std::path::{Path, PathBuf};

use crate::config::OutputFormat;

/// Folder under the output root that receives files of `format`.
///
/// ```
/// use filemorph::config::OutputFormat;
/// use filemorph::utils::format_dir;
/// use std::path::Path;
///
/// assert_eq!(
///     format_dir(Path::new("out"), OutputFormat::Txt),
///     Path::new("out/txt_output")
/// );
/// ```
pub fn format_dir(output_root: &Path, format: OutputFormat) -> PathBuf {
    output_root.join(format!("{}_output", format.extension()))
}

/// First free path `<dir>/<stem>.<ext>`, then `<stem>_1.<ext>`,
/// `<stem>_2.<ext>`, and so on.
///
/// Only checks for existence; nothing is created.
pub fn unique_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    unique_path_by(dir, stem, extension, Path::exists)
}

/// Like [`unique_path`], with a caller-supplied test for taken names.
pub fn unique_path_by<F>(dir: &Path, stem: &str, extension: &str, is_taken: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let mut candidate = dir.join(format!("{stem}.{extension}"));
    let mut counter = 1;

    while is_taken(&candidate) {
        candidate = dir.join(format!("{stem}_{counter}.{extension}"));
        counter += 1;
    }

    candidate
}

/// File stem as a string, lossily converted.
pub fn stem_lossy(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name as a string, lossily converted.
pub fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Lower-cased extension without the leading dot, or an empty string.
pub fn extension_lowercase(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

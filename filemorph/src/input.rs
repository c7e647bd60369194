//! Input selection and resolution.
//!
//! A run converts either an explicit list of files or every file directly
//! inside one folder. Lists may come from command-line arguments, glob
//! patterns, or a newline-separated input list file.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{FileMorphError, Result};

/// What the user selected as input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSpec {
    /// Several paths. Entries that do not exist are dropped on resolution.
    List(Vec<PathBuf>),

    /// One path. A folder expands to its direct child files; anything else
    /// is used as-is.
    Single(PathBuf),
}

impl Default for InputSpec {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl InputSpec {
    /// Interpret free-form selection text.
    ///
    /// Text containing a newline is a list of paths, one per line; otherwise
    /// the whole (trimmed) text is a single path.
    ///
    /// # Examples
    ///
    /// ```
    /// use filemorph::input::InputSpec;
    /// use std::path::PathBuf;
    ///
    /// let spec = InputSpec::from_text("a.docx\nb.pptx\n");
    /// assert_eq!(
    ///     spec,
    ///     InputSpec::List(vec![PathBuf::from("a.docx"), PathBuf::from("b.pptx")])
    /// );
    ///
    /// assert_eq!(InputSpec::from_text(" docs "), InputSpec::Single(PathBuf::from("docs")));
    /// ```
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();

        if text.contains('\n') {
            Self::List(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(PathBuf::from)
                    .collect(),
            )
        } else if text.is_empty() {
            Self::List(Vec::new())
        } else {
            Self::Single(PathBuf::from(text))
        }
    }

    /// Build a selection from command-line paths.
    ///
    /// One path selects single mode (so a folder is expanded), several
    /// select list mode.
    pub fn from_paths(mut paths: Vec<PathBuf>) -> Self {
        if paths.len() == 1 {
            Self::Single(paths.remove(0))
        } else {
            Self::List(paths)
        }
    }

    /// Check whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(paths) => paths.is_empty(),
            Self::Single(path) => path.as_os_str().is_empty(),
        }
    }

    /// Resolve the selection into the files to convert, in conversion order.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected folder cannot be read.
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        match self {
            Self::List(paths) => Ok(paths.iter().filter(|p| p.exists()).cloned().collect()),
            Self::Single(path) if path.is_dir() => list_directory(path),
            Self::Single(path) => Ok(vec![path.clone()]),
        }
    }
}

/// List the direct child files of a folder, sorted by file name.
///
/// Symbolic links are followed, so a link to a file is listed under the
/// link's own name. Dangling links are skipped.
fn list_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() > 0 => {
                tracing::debug!(error = %err, "Skipping unreadable folder entry");
                continue;
            }
            Err(err) => {
                return Err(FileMorphError::FileNotAccessible {
                    path: dir.to_path_buf(),
                    source: err.into(),
                });
            }
        };

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Check whether a command-line argument looks like a glob pattern.
pub fn is_glob_pattern(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

/// Expand command-line arguments, treating glob patterns as patterns and
/// everything else as literal paths.
///
/// Literal paths keep their position; each pattern is replaced in place by
/// its matches.
///
/// # Errors
///
/// Returns an error if a pattern is malformed or a match cannot be read.
pub fn expand_patterns<T>(args: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for arg in args {
        let arg = arg.as_ref();

        if !is_glob_pattern(arg) {
            resolved_paths.push(PathBuf::from(arg));
            continue;
        }

        let paths = glob::glob(arg).map_err(|err| {
            FileMorphError::invalid_config(format!("Invalid glob pattern '{arg}': {err}"))
        })?;

        for entry in paths {
            let path = entry.map_err(|err| FileMorphError::other(err.to_string()))?;
            resolved_paths.push(path);
        }
    }

    Ok(resolved_paths)
}

/// Parse the contents of an input list file.
///
/// One path per line. Lines starting with `#` are comments and blank lines
/// are skipped.
///
/// # Errors
///
/// Returns an error if a line holds a NUL byte, which no filesystem accepts.
pub fn parse_input_list(list_path: &Path, contents: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.contains('\0') {
            return Err(FileMorphError::InvalidInputList {
                path: list_path.to_path_buf(),
                line_number: index + 1,
                details: "Path contains a NUL byte".to_string(),
            });
        }

        paths.push(PathBuf::from(line));
    }

    Ok(paths)
}

/// Read input paths from a list file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains invalid paths.
pub async fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FileMorphError::FailedToReadInputList {
            path: path.to_path_buf(),
            source: e,
        })?;

    parse_input_list(path, &contents)
}

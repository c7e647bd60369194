//! Run report and the `conversion_log.txt` artifact.
//!
//! Every attempted conversion contributes one entry, and a requested merge
//! contributes one more. The text log is the entries' display form joined
//! with newlines; the same report serializes to JSON for `--json`.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::error::{FileMorphError, Result};

/// File name of the log written into the output root.
pub const LOG_FILE_NAME: &str = "conversion_log.txt";

/// One line of the conversion log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LogEntry {
    /// A conversion produced `output`.
    Converted {
        /// Source file.
        input: PathBuf,
        /// Produced file.
        output: PathBuf,
        /// Requested format.
        format: OutputFormat,
    },
    /// A conversion failed.
    Failed {
        /// Source file.
        input: PathBuf,
        /// Requested format.
        format: OutputFormat,
        /// Error message.
        reason: String,
    },
    /// The merged PDF was written.
    Merged {
        /// Merged PDF.
        output: PathBuf,
    },
    /// Merging was requested and failed.
    MergeFailed {
        /// Error message.
        reason: String,
    },
}

impl LogEntry {
    /// Whether this entry records a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::MergeFailed { .. })
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converted { input, output, .. } => write!(
                f,
                "[OK] {} -> {}",
                crate::utils::file_name_lossy(input),
                crate::utils::file_name_lossy(output)
            ),
            Self::Failed {
                input,
                format,
                reason,
            } => write!(
                f,
                "[FAIL] {} to {}: {}",
                crate::utils::file_name_lossy(input),
                format.label(),
                reason
            ),
            Self::Merged { output } => write!(f, "[MERGED] PDF saved to: {}", output.display()),
            Self::MergeFailed { reason } => write!(f, "[ERROR] Merging failed: {reason}"),
        }
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionReport {
    /// Log entries in the order they happened.
    pub entries: Vec<LogEntry>,

    /// Where the log was written, once it has been.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
}

impl ConversionReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Number of successful conversions.
    pub fn converted(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, LogEntry::Converted { .. }))
            .count()
    }

    /// Number of failed conversions.
    pub fn failed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, LogEntry::Failed { .. }))
            .count()
    }

    /// Path of the merged PDF, if a merge succeeded.
    pub fn merged_path(&self) -> Option<&Path> {
        self.entries.iter().find_map(|e| match e {
            LogEntry::Merged { output } => Some(output.as_path()),
            _ => None,
        })
    }

    /// Whether any conversion or the merge failed.
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(LogEntry::is_failure)
    }

    /// Log text: one line per entry, newline-joined, no trailing newline.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the log to `path`, replacing any previous log.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn write_log(&mut self, path: &Path) -> Result<()> {
        tokio::fs::write(path, self.render())
            .await
            .map_err(|e| FileMorphError::FailedToWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        self.log_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FileMorphError::other(format!("Failed to serialize report: {e}")))
    }
}

//! Error types for filemorph.
//!
//! Errors fall into two tiers:
//!
//! - **Setup errors** (missing inputs, no output folder, no format, bad
//!   flags) abort a run before any file is touched.
//! - **Per-conversion errors** (unreadable DOCX, image codec failures,
//!   office tool crashes, merge problems) are caught by the pipeline,
//!   stringified into the conversion log, and never stop the run.

use std::io;
use std::path::PathBuf;

/// Result type alias for filemorph operations.
pub type Result<T> = std::result::Result<T, FileMorphError>;

/// Main error type for filemorph operations.
#[derive(Debug, thiserror::Error)]
pub enum FileMorphError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// No input files were selected, or none of them exist.
    #[error("No input files selected\n  Hint: pass files, a folder, or --input-list")]
    NoInputs,

    /// No output folder was given.
    #[error("No output folder selected\n  Hint: use --output <DIR>")]
    MissingOutputRoot,

    /// No output format was chosen.
    #[error("No output format selected\n  Hint: use --to pdf,txt,...")]
    NoOutputFormats,

    /// Unknown output format name.
    #[error("Unsupported output format: {value}")]
    UnsupportedFormat {
        /// The rejected format string.
        value: String,
    },

    /// Failed to read input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input list file contains an invalid entry.
    #[error(
        "Invalid entry in input list file: {} at line {line_number}\n  Details: {details}",
        path.display()
    )]
    InvalidInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Line number with the error.
        line_number: usize,
        /// Details about what's invalid.
        details: String,
    },

    /// A DOCX package could not be read.
    #[error("Failed to read DOCX: {}\n  Reason: {reason}", path.display())]
    InvalidDocx {
        /// Path to the DOCX file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// An image could not be decoded or encoded.
    #[error("Image conversion failed for {}: {source}", path.display())]
    Image {
        /// Path to the source image.
        path: PathBuf,
        /// Underlying codec error.
        source: image::ImageError,
    },

    /// The external office converter reported a failure.
    #[error("Office conversion failed for {}: {reason}", path.display())]
    OfficeFailed {
        /// Path to the document being converted.
        path: PathBuf,
        /// Details reported by the converter.
        reason: String,
    },

    /// The external office converter did not finish in time.
    #[error("Office conversion timed out after {seconds}s: {}", path.display())]
    OfficeTimeout {
        /// Path to the document being converted.
        path: PathBuf,
        /// Timeout that elapsed.
        seconds: u64,
    },

    /// Failed to load a PDF for merging.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// No PDFs were produced, so there is nothing to merge.
    #[error("No PDF files to merge")]
    NoFilesToMerge,

    /// Merge operation failed.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for FileMorphError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for FileMorphError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(format!("{err:#}"))
    }
}

impl FileMorphError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create an InvalidDocx error.
    pub fn invalid_docx(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::InvalidDocx {
            path,
            reason: reason.into(),
        }
    }

    /// Create an OfficeFailed error.
    pub fn office_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::OfficeFailed {
            path,
            reason: reason.into(),
        }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Message flattened onto one line, as written to the conversion log.
    pub fn log_message(&self) -> String {
        self.to_string()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::NoInputs => 2,
            Self::MissingOutputRoot => 2,
            Self::NoOutputFormats => 2,
            Self::UnsupportedFormat { .. } => 1,
            Self::FailedToReadInputList { .. } => 2,
            Self::InvalidInputList { .. } => 1,
            Self::InvalidDocx { .. } => 3,
            Self::Image { .. } => 3,
            Self::OfficeFailed { .. } => 3,
            Self::OfficeTimeout { .. } => 3,
            Self::FailedToLoadPdf { .. } => 3,
            Self::NoFilesToMerge => 6,
            Self::MergeFailed { .. } => 6,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}

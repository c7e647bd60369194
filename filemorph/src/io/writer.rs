//! PDF saving for merged documents.
//!
//! Saves go through a temporary file next to the target that is renamed
//! into place, so a failed save never leaves a half-written merged PDF
//! under the final name.
//!
//! # Examples
//!
//! ```no_run
//! use filemorph::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! writer.save(&doc, Path::new("out/Merged.pdf")).await?;
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{FileMorphError, Result};
use crate::utils::format_file_size;

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Write to a temporary file, then rename.
    pub atomic: bool,

    /// Compress streams before writing.
    pub compress: bool,

    /// Renumber objects before writing.
    pub optimize: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            optimize: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Whether compression was applied.
    pub compressed: bool,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Save a PDF document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created, written or renamed
    /// into place.
    pub async fn save(&self, doc: &Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).await.map(|_| ())
    }

    /// Save a PDF and return statistics about the operation.
    pub async fn save_with_stats(&self, doc: &Document, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();
        let mut doc = doc.clone();

        task::spawn_blocking(move || write_blocking(&mut doc, path_buf, &options))
            .await
            .map_err(|e| FileMorphError::other(format!("Write task failed: {e}")))?
    }
}

fn write_blocking(
    doc: &mut Document,
    path: PathBuf,
    options: &WriteOptions,
) -> Result<WriteStatistics> {
    let start = Instant::now();

    if options.compress {
        doc.compress();
    }
    if options.optimize {
        doc.renumber_objects();
    }

    let write_path = if options.atomic {
        path.with_extension("tmp")
    } else {
        path.clone()
    };

    let file =
        std::fs::File::create(&write_path).map_err(|e| FileMorphError::FailedToCreateOutput {
            path: write_path.clone(),
            source: e,
        })?;
    let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);

    let written = doc
        .save_to(&mut writer)
        .map_err(|e| FileMorphError::FailedToWrite {
            path: write_path.clone(),
            source: std::io::Error::other(e),
        })
        .and_then(|_| {
            writer.flush().map_err(|e| FileMorphError::FailedToWrite {
                path: write_path.clone(),
                source: e,
            })
        });

    if let Err(e) = written {
        drop(writer);
        if options.atomic {
            let _ = std::fs::remove_file(&write_path);
        }
        return Err(e);
    }
    drop(writer);

    if options.atomic {
        std::fs::rename(&write_path, &path).map_err(|e| FileMorphError::FailedToWrite {
            path: path.clone(),
            source: e,
        })?;
    }

    let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    Ok(WriteStatistics {
        write_time: start.elapsed(),
        file_size,
        output_path: path,
        compressed: options.compress,
    })
}

//! PDF loading for the merge step.
//!
//! PDFs are parsed on the blocking thread pool. Batches are loaded with
//! bounded concurrency, and results always come back in input order so
//! the merge order decided by the caller is preserved.
//!
//! # Examples
//!
//! ```no_run
//! use filemorph::io::reader::PdfReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let (results, stats) = reader.load_all(&paths, 4).await;
//! println!("{} loaded, {} failed", stats.success_count, stats.failure_count);
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{FileMorphError, Result};
use crate::utils::format_file_size;

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

/// Result of a load operation (success or failure).
pub type LoadResult = Result<LoadedPdf>;

/// Statistics for a batch load operation.
#[derive(Debug, Clone)]
pub struct LoadStatistics {
    /// Number of PDFs successfully loaded.
    pub success_count: usize,

    /// Number of PDFs that failed to load.
    pub failure_count: usize,

    /// Total time taken for all loads.
    pub total_time: Duration,

    /// Total size of successfully loaded files.
    pub total_size: u64,

    /// Total number of pages loaded.
    pub total_pages: usize,
}

impl LoadStatistics {
    fn from_results(results: &[LoadResult], total_time: Duration) -> Self {
        let mut stats = Self {
            success_count: 0,
            failure_count: 0,
            total_time,
            total_size: 0,
            total_pages: 0,
        };

        for result in results {
            match result {
                Ok(loaded) => {
                    stats.success_count += 1;
                    stats.total_size += loaded.file_size;
                    stats.total_pages += loaded.page_count;
                }
                Err(_) => stats.failure_count += 1,
            }
        }

        stats
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// PDF reader.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a PDF, or has
    /// no pages.
    pub async fn load(&self, path: &Path) -> LoadResult {
        let path_buf = path.to_path_buf();

        tokio::task::spawn_blocking(move || load_blocking(path_buf))
            .await
            .map_err(|e| FileMorphError::other(format!("Load task failed: {e}")))?
    }

    /// Load several PDFs with at most `workers` loads in flight.
    ///
    /// Results are returned in the same order as `paths`.
    pub async fn load_all(
        &self,
        paths: &[PathBuf],
        workers: usize,
    ) -> (Vec<LoadResult>, LoadStatistics) {
        let start = Instant::now();

        let results = stream::iter(paths.iter().map(|path| self.load(path)))
            .buffered(workers.max(1))
            .collect::<Vec<_>>()
            .await;

        let stats = LoadStatistics::from_results(&results, start.elapsed());
        (results, stats)
    }
}

fn load_blocking(path: PathBuf) -> LoadResult {
    let start = Instant::now();

    let document = Document::load(&path)
        .map_err(|e| FileMorphError::failed_to_load_pdf(path.clone(), e.to_string()))?;

    let page_count = document.get_pages().len();
    if page_count == 0 {
        return Err(FileMorphError::failed_to_load_pdf(path, "PDF has no pages"));
    }

    let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    Ok(LoadedPdf {
        document,
        path,
        page_count,
        load_time: start.elapsed(),
        file_size,
    })
}

//! PDF concatenation.
//!
//! The first document is the base; every following document has its
//! objects renumbered past the current maximum id, is copied in, and has
//! its pages appended to the base page tree. The result is compressed and
//! renumbered once more when saved.

use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{FileMorphError, Result};
use crate::io::{LoadedPdf, PdfReader, PdfWriter};
use crate::merge::order::sort_for_merge;
use crate::utils::{format_file_size, unique_path};

/// Default number of PDFs parsed at the same time.
pub const DEFAULT_LOAD_WORKERS: usize = 4;

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of PDFs merged.
    pub files_merged: usize,

    /// Total number of pages in merged document.
    pub total_pages: usize,

    /// Total time taken for merge, loading included.
    pub merge_time: Duration,

    /// Time taken to load all PDFs.
    pub load_time: Duration,

    /// Total size of input files.
    pub input_size: u64,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }
}

/// Result of merging documents in memory.
#[derive(Debug)]
pub struct MergeResult {
    /// The merged PDF document.
    pub document: Document,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,

    /// Paths of files that were merged, in page order.
    pub merged_files: Vec<PathBuf>,
}

/// A merged PDF that has been written to disk.
#[derive(Debug, Clone)]
pub struct SavedMerge {
    /// Where the merged PDF was written.
    pub path: PathBuf,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,

    /// Paths of files that were merged, in page order.
    pub merged_files: Vec<PathBuf>,
}

/// PDF merger that combines multiple documents.
#[derive(Debug, Clone)]
pub struct Merger {
    reader: PdfReader,
    writer: PdfWriter,
    workers: usize,
}

impl Merger {
    /// Create a new merger with default settings.
    pub fn new() -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::new(),
            workers: DEFAULT_LOAD_WORKERS,
        }
    }

    /// Set how many PDFs are parsed concurrently.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Merge `paths` in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`FileMorphError::NoFilesToMerge`] for an empty list, and the
    /// load error of the first PDF that cannot be read. A single unreadable
    /// input fails the whole merge.
    pub async fn merge(&self, paths: &[PathBuf]) -> Result<MergeResult> {
        if paths.is_empty() {
            return Err(FileMorphError::NoFilesToMerge);
        }

        let merge_start = Instant::now();

        let (load_results, load_stats) = self.reader.load_all(paths, self.workers).await;
        let loaded: Vec<LoadedPdf> = load_results.into_iter().collect::<Result<_>>()?;

        let input_size = load_stats.total_size;
        let merged_files: Vec<PathBuf> = loaded.iter().map(|p| p.path.clone()).collect();
        let documents = loaded.into_iter().map(|p| p.document).collect();

        let document = concatenate(documents)?;

        let statistics = MergeStatistics {
            files_merged: merged_files.len(),
            total_pages: document.get_pages().len(),
            merge_time: merge_start.elapsed(),
            load_time: load_stats.total_time,
            input_size,
        };

        Ok(MergeResult {
            document,
            statistics,
            merged_files,
        })
    }

    /// Sort `paths` into merge order, merge them, and save the result as
    /// `<dir>/<name>.pdf`, or `<name>_1.pdf`, `<name>_2.pdf`, … when taken.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use filemorph::merge::Merger;
    /// # use std::path::{Path, PathBuf};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let pdfs = vec![PathBuf::from("out/pdf_output/b2.pdf"), PathBuf::from("out/pdf_output/a1.pdf")];
    /// let saved = Merger::new().merge_into(pdfs, Path::new("out"), "Merged").await?;
    /// println!("{} pages in {}", saved.statistics.total_pages, saved.path.display());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge_into(
        &self,
        mut paths: Vec<PathBuf>,
        dir: &Path,
        name: &str,
    ) -> Result<SavedMerge> {
        sort_for_merge(&mut paths);

        let result = self.merge(&paths).await?;

        let path = unique_path(dir, name, "pdf");
        let written = self.writer.save_with_stats(&result.document, &path).await?;

        tracing::debug!(
            path = %path.display(),
            files = result.statistics.files_merged,
            pages = result.statistics.total_pages,
            size = %written.format_file_size(),
            elapsed_ms = written.write_time.as_millis() as u64,
            "Merged PDF written"
        );

        Ok(SavedMerge {
            path,
            statistics: result.statistics,
            merged_files: result.merged_files,
        })
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenate documents into the first one.
///
/// # Errors
///
/// Returns an error if `documents` is empty or the base document has no
/// usable page tree.
pub fn concatenate(documents: Vec<Document>) -> Result<Document> {
    let mut documents = documents.into_iter();
    let mut merged = documents.next().ok_or(FileMorphError::NoFilesToMerge)?;
    let mut max_id = merged.max_id;

    for mut doc in documents {
        doc.renumber_objects_with(max_id + 1);
        max_id = doc.max_id;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        inherit_page_attributes(&mut doc, &page_ids);
        merged.objects.extend(doc.objects);
        append_pages(&mut merged, &page_ids)?;
    }

    merged.max_id = max_id;
    Ok(merged)
}

/// Page attributes a page may take from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Page tree depth followed when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 32;

/// Copy inherited attributes down onto each page of `doc`.
///
/// Appended pages are reparented to the root of the merged tree, so whatever
/// they inherited from their old `Pages` nodes must live on the page itself.
fn inherit_page_attributes(doc: &mut Document, page_ids: &[ObjectId]) {
    for &page_id in page_ids {
        let Ok(page) = doc.get_dictionary(page_id) else {
            continue;
        };

        let mut missing: Vec<&[u8]> = INHERITABLE
            .into_iter()
            .filter(|key| !page.has(key))
            .collect();
        let mut found = Vec::new();
        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

        for _ in 0..MAX_TREE_DEPTH {
            if missing.is_empty() {
                break;
            }
            let Some(node) = parent.and_then(|id| doc.get_dictionary(id).ok()) else {
                break;
            };
            missing.retain(|&key| match node.get(key) {
                Ok(value) => {
                    found.push((key.to_vec(), value.clone()));
                    false
                }
                Err(_) => true,
            });
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        }

        if let Ok(page) = doc.get_dictionary_mut(page_id) {
            for (key, value) in found {
                page.set(key, value);
            }
        }
    }
}

/// Append page references to the root page tree node and reparent them.
fn append_pages(merged: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let pages_id = merged
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| FileMorphError::merge_failed(format!("Failed to get pages reference: {e}")))?;

    let pages = merged
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| FileMorphError::merge_failed(format!("Failed to get pages object: {e}")))?;

    let kids = pages
        .get_mut(b"Kids")
        .and_then(Object::as_array_mut)
        .map_err(|_| FileMorphError::merge_failed("Pages dictionary missing Kids array"))?;
    kids.extend(page_ids.iter().map(|&id| Object::Reference(id)));

    let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    pages.set("Count", Object::Integer(count + page_ids.len() as i64));

    for &id in page_ids {
        merged
            .get_dictionary_mut(id)
            .map_err(|e| FileMorphError::merge_failed(format!("Failed to get page {id:?}: {e}")))?
            .set("Parent", Object::Reference(pages_id));
    }

    Ok(())
}

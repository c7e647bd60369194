//! Conversion matrix and per-file converters.
//!
//! [`plan`] decides what to do with a (source extension, output format)
//! pair; [`Converter::execute`] carries the decision out. Pairs outside the
//! matrix have no plan and are skipped by the pipeline.
//!
//! | source      | format          | action                      |
//! |-------------|-----------------|-----------------------------|
//! | docx        | pdf             | office export               |
//! | docx        | txt / html      | paragraph extraction        |
//! | pptx, ppt   | pdf             | office export + settle wait |
//! | pdf         | pdf             | byte copy                   |
//! | image       | other image     | decode, flatten, re-encode  |

pub mod docx;
pub mod office;
pub mod raster;

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{OfficeOptions, OutputFormat};
use crate::error::{FileMorphError, Result};

pub use office::{DocumentKind, LibreOfficeBackend, OfficeBackend};

/// What to do for one (file, format) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Export a word-processing document to PDF through the office backend.
    DocumentToPdf,
    /// Export a presentation to PDF through the office backend.
    PresentationToPdf,
    /// Write DOCX paragraphs as plain text.
    DocxToText,
    /// Write DOCX paragraphs as HTML.
    DocxToHtml,
    /// Copy a PDF unchanged.
    CopyPdf,
    /// Re-encode an image in another image format.
    Transcode(OutputFormat),
}

impl Action {
    /// Whether this action yields a PDF that takes part in merging.
    pub fn produces_pdf(&self) -> bool {
        matches!(
            self,
            Self::DocumentToPdf | Self::PresentationToPdf | Self::CopyPdf
        )
    }

    /// Short description for dry runs and debug output.
    pub fn describe(&self) -> String {
        match self {
            Self::DocumentToPdf => "office export to PDF".to_string(),
            Self::PresentationToPdf => "presentation export to PDF".to_string(),
            Self::DocxToText => "extract paragraphs as text".to_string(),
            Self::DocxToHtml => "extract paragraphs as HTML".to_string(),
            Self::CopyPdf => "copy PDF".to_string(),
            Self::Transcode(format) => format!("re-encode as {}", format.label()),
        }
    }
}

/// Look up the action for a lower-cased source extension and a format.
///
/// Returns `None` for pairs outside the conversion matrix, including an
/// image "converted" to its own extension.
///
/// # Examples
///
/// ```
/// use filemorph::config::OutputFormat;
/// use filemorph::convert::{plan, Action};
///
/// assert_eq!(plan("docx", OutputFormat::Txt), Some(Action::DocxToText));
/// assert_eq!(plan("png", OutputFormat::Png), None);
/// assert_eq!(plan("xlsx", OutputFormat::Pdf), None);
/// ```
pub fn plan(extension: &str, format: OutputFormat) -> Option<Action> {
    match (extension, format) {
        ("docx", OutputFormat::Pdf) => Some(Action::DocumentToPdf),
        ("docx", OutputFormat::Txt) => Some(Action::DocxToText),
        ("docx", OutputFormat::Html) => Some(Action::DocxToHtml),
        ("pptx" | "ppt", OutputFormat::Pdf) => Some(Action::PresentationToPdf),
        ("pdf", OutputFormat::Pdf) => Some(Action::CopyPdf),
        (ext, format)
            if raster::is_image_extension(ext)
                && format.is_image()
                && format.extension() != ext =>
        {
            Some(Action::Transcode(format))
        }
        _ => None,
    }
}

/// Executes planned actions.
#[derive(Clone)]
pub struct Converter {
    backend: Arc<dyn OfficeBackend>,
    settle_delay: Duration,
}

impl Converter {
    /// Create a converter using LibreOffice with the given options.
    pub fn new(options: &OfficeOptions) -> Self {
        Self {
            backend: Arc::new(LibreOfficeBackend::new(options)),
            settle_delay: options.settle_delay,
        }
    }

    /// Create a converter with a custom office backend.
    pub fn with_backend(backend: Arc<dyn OfficeBackend>, settle_delay: Duration) -> Self {
        Self {
            backend,
            settle_delay,
        }
    }

    /// Name of the office backend in use.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Carry out `action`, reading `input` and writing `output`.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying converter reports; the caller decides
    /// whether that stops anything.
    pub async fn execute(&self, action: Action, input: &Path, output: &Path) -> Result<()> {
        match action {
            Action::DocumentToPdf => {
                self.backend
                    .convert_to_pdf(input, output, DocumentKind::WordProcessing)
                    .await
            }
            Action::PresentationToPdf => {
                self.backend
                    .convert_to_pdf(input, output, DocumentKind::Presentation)
                    .await?;
                tokio::time::sleep(self.settle_delay).await;
                Ok(())
            }
            Action::DocxToText => {
                let paragraphs = self.read_docx(input).await?;
                write_string(output, docx::render_text(&paragraphs)).await
            }
            Action::DocxToHtml => {
                let paragraphs = self.read_docx(input).await?;
                write_string(output, docx::render_html(&paragraphs)).await
            }
            Action::CopyPdf => {
                tokio::fs::copy(input, output)
                    .await
                    .map_err(|e| copy_error(input, output, e))?;
                Ok(())
            }
            Action::Transcode(format) => {
                let input = input.to_path_buf();
                let output = output.to_path_buf();
                tokio::task::spawn_blocking(move || raster::transcode(&input, &output, format))
                    .await
                    .map_err(|e| FileMorphError::other(format!("Image task failed: {e}")))?
            }
        }
    }

    async fn read_docx(&self, input: &Path) -> Result<Vec<String>> {
        let input = input.to_path_buf();
        tokio::task::spawn_blocking(move || docx::read_paragraphs(&input))
            .await
            .map_err(|e| FileMorphError::other(format!("DOCX task failed: {e}")))?
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("backend", &self.backend.name())
            .field("settle_delay", &self.settle_delay)
            .finish()
    }
}

async fn write_string(output: &Path, contents: String) -> Result<()> {
    tokio::fs::write(output, contents)
        .await
        .map_err(|e| FileMorphError::FailedToWrite {
            path: output.to_path_buf(),
            source: e,
        })
}

fn copy_error(input: &Path, output: &Path, source: std::io::Error) -> FileMorphError {
    if source.kind() == std::io::ErrorKind::NotFound && !input.exists() {
        FileMorphError::file_not_found(input.to_path_buf())
    } else {
        FileMorphError::FailedToWrite {
            path: output.to_path_buf(),
            source,
        }
    }
}

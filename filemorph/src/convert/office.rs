//! External office converter.
//!
//! Word-processing and presentation documents are exported to PDF by an
//! office suite running as a child process. The suite is a black box: it
//! either leaves a PDF behind or it does not.

use futures::future::BoxFuture;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::config::OfficeOptions;
use crate::error::{FileMorphError, Result};

/// Kind of office document handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Word-processing document (DOCX).
    WordProcessing,
    /// Slide deck (PPTX, PPT).
    Presentation,
}

/// Something that can export office documents to PDF.
pub trait OfficeBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Export `input` to a PDF at exactly `output`.
    fn convert_to_pdf<'a>(
        &'a self,
        input: &'a Path,
        output: &'a Path,
        kind: DocumentKind,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Headless LibreOffice (`soffice --headless --convert-to pdf`).
#[derive(Debug, Clone)]
pub struct LibreOfficeBackend {
    program: PathBuf,
    timeout: Duration,
}

impl LibreOfficeBackend {
    /// Create a backend from office options.
    pub fn new(options: &OfficeOptions) -> Self {
        Self {
            program: options.program.clone(),
            timeout: options.timeout,
        }
    }

    /// Program this backend invokes.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments for exporting `input` into `outdir`.
    pub fn command_args(input: &Path, outdir: &Path) -> Vec<OsString> {
        vec![
            "--headless".into(),
            "--norestore".into(),
            "--convert-to".into(),
            "pdf".into(),
            "--outdir".into(),
            outdir.as_os_str().to_owned(),
            input.as_os_str().to_owned(),
        ]
    }

    /// Staging folder for one export, next to the final output.
    ///
    /// LibreOffice names its output after the input stem, so the export
    /// lands here first and is then moved to the requested path.
    fn staging_dir(output: &Path) -> PathBuf {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        parent.join(format!(".filemorph-{}-{stem}", std::process::id()))
    }

    async fn export(&self, input: &Path, output: &Path) -> Result<()> {
        let staging = Self::staging_dir(output);
        tokio::fs::create_dir_all(&staging).await?;

        let result = self.export_into(input, output, &staging).await;

        if let Err(e) = tokio::fs::remove_dir_all(&staging).await {
            tracing::warn!(
                staging = %staging.display(),
                error = %e,
                "Failed to remove office staging folder"
            );
        }

        result
    }

    async fn export_into(&self, input: &Path, output: &Path, staging: &Path) -> Result<()> {
        tracing::debug!(
            program = %self.program.display(),
            input = %input.display(),
            "Running office export"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(Self::command_args(input, staging))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let finished = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| FileMorphError::OfficeTimeout {
                path: input.to_path_buf(),
                seconds: self.timeout.as_secs(),
            })?;

        let out = finished.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FileMorphError::office_failed(
                    input.to_path_buf(),
                    format!("office program not found: {}", self.program.display()),
                )
            } else {
                FileMorphError::office_failed(input.to_path_buf(), e.to_string())
            }
        })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(FileMorphError::office_failed(
                input.to_path_buf(),
                format!(
                    "exit code {}: {}",
                    out.status.code().unwrap_or(-1),
                    stderr.trim().chars().take(500).collect::<String>()
                ),
            ));
        }

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let produced = staging.join(format!("{stem}.pdf"));

        if !tokio::fs::try_exists(&produced).await.unwrap_or(false) {
            return Err(FileMorphError::office_failed(
                input.to_path_buf(),
                "office program finished without producing a PDF",
            ));
        }

        tokio::fs::rename(&produced, output)
            .await
            .map_err(|e| FileMorphError::FailedToWrite {
                path: output.to_path_buf(),
                source: e,
            })
    }
}

impl Default for LibreOfficeBackend {
    fn default() -> Self {
        Self::new(&OfficeOptions::default())
    }
}

impl OfficeBackend for LibreOfficeBackend {
    fn name(&self) -> &str {
        "libreoffice"
    }

    fn convert_to_pdf<'a>(
        &'a self,
        input: &'a Path,
        output: &'a Path,
        _kind: DocumentKind,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.export(input, output))
    }
}

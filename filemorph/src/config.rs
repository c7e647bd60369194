//! Configuration module for filemorph.
//!
//! This module turns CLI arguments into a validated configuration that
//! drives a conversion run. It handles:
//! - Parsing of output format names
//! - Defaults for the external office converter
//! - Validation of required fields before any file is touched

use anyhow::{Context, bail};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{FileMorphError, Result};
use crate::input::InputSpec;

/// Target format of a conversion.
///
/// Every selected format gets its own `<fmt>_output` folder under the
/// output root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Portable Document Format.
    Pdf,
    /// Plain UTF-8 text.
    Txt,
    /// Minimal HTML document.
    Html,
    /// JPEG image with the `.jpg` extension.
    Jpg,
    /// JPEG image with the `.jpeg` extension.
    Jpeg,
    /// PNG image.
    Png,
    /// Windows bitmap.
    Bmp,
    /// GIF image.
    Gif,
    /// TIFF image.
    Tiff,
}

impl OutputFormat {
    /// All supported output formats.
    pub const ALL: [OutputFormat; 9] = [
        Self::Pdf,
        Self::Txt,
        Self::Html,
        Self::Jpg,
        Self::Jpeg,
        Self::Png,
        Self::Bmp,
        Self::Gif,
        Self::Tiff,
    ];

    /// File extension (and folder prefix) for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Html => "html",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Tiff => "tiff",
        }
    }

    /// Upper-case label used in log lines.
    pub fn label(&self) -> String {
        self.extension().to_uppercase()
    }

    /// Whether this is a raster image format.
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            Self::Jpg | Self::Jpeg | Self::Png | Self::Bmp | Self::Gif | Self::Tiff
        )
    }

    /// Parse a comma-separated list of formats.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    ///
    /// # Examples
    ///
    /// ```
    /// use filemorph::config::OutputFormat;
    ///
    /// let formats = OutputFormat::parse_list("pdf, TXT,pdf").unwrap();
    /// assert_eq!(formats, vec![OutputFormat::Pdf, OutputFormat::Txt]);
    /// ```
    pub fn parse_list(s: &str) -> anyhow::Result<Vec<Self>> {
        let mut formats = Vec::new();

        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let format = Self::from_str(part)
                .with_context(|| format!("Invalid format list: {s}"))?;

            if !formats.contains(&format) {
                formats.push(format);
            }
        }

        if formats.is_empty() {
            bail!("Format list cannot be empty");
        }

        Ok(formats)
    }
}

impl FromStr for OutputFormat {
    type Err = FileMorphError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().trim_start_matches('.').to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == wanted)
            .ok_or_else(|| FileMorphError::UnsupportedFormat {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Settings for the external office converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficeOptions {
    /// Office program to invoke (LibreOffice `soffice` by default).
    pub program: PathBuf,

    /// Maximum time a single office export may take.
    pub timeout: Duration,

    /// Wait inserted after a presentation export before the PDF is
    /// considered ready.
    pub settle_delay: Duration,
}

impl OfficeOptions {
    /// Default office program.
    pub const DEFAULT_PROGRAM: &'static str = "soffice";

    /// Default export timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Default settle delay in milliseconds.
    pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;
}

impl Default for OfficeOptions {
    fn default() -> Self {
        Self {
            program: PathBuf::from(Self::DEFAULT_PROGRAM),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            settle_delay: Duration::from_millis(Self::DEFAULT_SETTLE_DELAY_MS),
        }
    }
}

/// Complete configuration for a conversion run.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Files or folder to convert.
    pub inputs: InputSpec,

    /// Root folder receiving `<fmt>_output` folders, the merged PDF and
    /// the conversion log.
    pub output_root: PathBuf,

    /// Requested output formats, in selection order.
    pub formats: Vec<OutputFormat>,

    /// Name (without extension) of the merged PDF, if merging was requested.
    pub merge_name: Option<String>,

    /// External office converter settings.
    pub office: OfficeOptions,

    /// PDFs parsed concurrently while merging. `None` uses the merger default.
    pub jobs: Option<usize>,

    /// Dry run mode - plan without converting.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Open the output folder in the file browser when done.
    pub open_output: bool,

    /// Print the final report as JSON.
    pub json: bool,
}

impl Config {
    /// Create a configuration with the required fields and defaults for
    /// everything else.
    pub fn new(inputs: InputSpec, output_root: impl Into<PathBuf>, formats: Vec<OutputFormat>) -> Self {
        Self {
            inputs,
            output_root: output_root.into(),
            formats,
            ..Default::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input is selected
    /// - No output folder is given
    /// - No output format is chosen
    /// - The merge name is blank or contains a path separator
    /// - Verbose and quiet modes are both enabled
    /// - The merge job count is zero
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(FileMorphError::NoInputs);
        }

        if self.output_root.as_os_str().is_empty() {
            return Err(FileMorphError::MissingOutputRoot);
        }

        if self.formats.is_empty() {
            return Err(FileMorphError::NoOutputFormats);
        }

        if let Some(ref name) = self.merge_name {
            if name.trim().is_empty() {
                return Err(FileMorphError::invalid_config(
                    "No name provided for the merged PDF",
                ));
            }

            if name.contains(['/', '\\']) {
                return Err(FileMorphError::invalid_config(format!(
                    "Merged PDF name must not contain path separators: {name}"
                )));
            }
        }

        if self.verbose && self.quiet {
            return Err(FileMorphError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if self.jobs == Some(0) {
            return Err(FileMorphError::invalid_config(
                "Number of merge jobs must be at least 1",
            ));
        }

        if self.office.timeout.is_zero() {
            return Err(FileMorphError::invalid_config(
                "Office timeout must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Merge name to use, if the merge step applies to this run.
    ///
    /// Merging only happens when PDF is among the selected formats.
    pub fn merge_target(&self) -> Option<&str> {
        if !self.formats.contains(&OutputFormat::Pdf) {
            return None;
        }

        self.merge_name.as_deref().map(str::trim)
    }

    /// Path of the conversion log for this run.
    pub fn log_path(&self) -> PathBuf {
        self.output_root.join(crate::report::LOG_FILE_NAME)
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}

//! CLI argument parsing for filemorph.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, input collection, and mapping onto the
//! library `Config`.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use filemorph::config::{Config, OfficeOptions, OutputFormat};
use filemorph::error::{FileMorphError, Result};
use filemorph::input::{self, InputSpec};

/// Convert documents, presentations and images in batch.
///
/// filemorph converts every selected file into each requested output
/// format, writes the results under per-format folders, and can merge all
/// produced PDFs into one document.
#[derive(Parser, Debug)]
#[command(name = "filemorph")]
#[command(version)]
#[command(about = "Convert documents, presentations and images in batch", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Files or a folder to convert
    ///
    /// A single folder converts every file directly inside it.
    /// Glob patterns are expanded.
    ///
    /// Examples:
    ///   filemorph report.docx slides.pptx -o out --to pdf
    ///   filemorph ./docs -o out --to pdf,txt
    ///   filemorph "scans/*.png" -o out --to jpg
    #[arg(value_name = "PATH")]
    pub inputs: Vec<String>,

    /// Read additional input paths from a file (one path per line)
    ///
    /// Lines starting with '#' and blank lines are ignored.
    /// Paths from the file are appended after direct inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Output folder
    ///
    /// Receives one `<format>_output` folder per format, the merged PDF
    /// and conversion_log.txt. Created if missing.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output formats, comma-separated
    ///
    /// Supported: pdf, txt, html, jpg, jpeg, png, bmp, gif, tiff.
    #[arg(short = 't', long = "to", value_name = "FORMATS")]
    pub formats: Option<String>,

    /// Merge all produced PDFs into <NAME>.pdf in the output folder
    ///
    /// Only applies when pdf is among the output formats. PDFs are
    /// ordered by the first number in their file name.
    #[arg(short, long, value_name = "NAME")]
    pub merge: Option<String>,

    /// Office program used for DOCX, PPTX and PPT to PDF
    #[arg(
        long,
        value_name = "PROGRAM",
        env = "FILEMORPH_OFFICE_BIN",
        default_value = OfficeOptions::DEFAULT_PROGRAM
    )]
    pub office_bin: PathBuf,

    /// Seconds to wait for one office export before giving up
    #[arg(long, value_name = "SECS", default_value_t = OfficeOptions::DEFAULT_TIMEOUT_SECS)]
    pub office_timeout: u64,

    /// Milliseconds to wait after each presentation export
    #[arg(long, value_name = "MS", default_value_t = OfficeOptions::DEFAULT_SETTLE_DELAY_MS)]
    pub settle_delay_ms: u64,

    /// Number of PDFs parsed concurrently while merging
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Dry run - show what would be converted without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show every conversion and debug diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the final report (or the dry-run plan) as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not open the output folder when done
    #[arg(long)]
    pub no_open: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if the format list cannot be parsed or the
    /// resulting configuration is invalid.
    pub fn to_config(&self, inputs: InputSpec) -> Result<Config> {
        let formats = match self.formats {
            Some(ref list) => OutputFormat::parse_list(list)
                .map_err(|e| FileMorphError::invalid_config(format!("{e:#}")))?,
            None => Vec::new(),
        };

        let config = Config {
            inputs,
            output_root: self.output.clone().unwrap_or_default(),
            formats,
            merge_name: self.merge.clone(),
            office: OfficeOptions {
                program: self.office_bin.clone(),
                timeout: Duration::from_secs(self.office_timeout),
                settle_delay: Duration::from_millis(self.settle_delay_ms),
            },
            jobs: self.jobs,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            open_output: !self.no_open && !self.dry_run,
            json: self.json,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// # Errors
    ///
    /// Returns an error if no input, output folder or format was given.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.input_list.is_none() {
            return Err(FileMorphError::NoInputs);
        }

        if self.output.is_none() {
            return Err(FileMorphError::MissingOutputRoot);
        }

        if self.formats.as_deref().is_none_or(|f| f.trim().is_empty()) {
            return Err(FileMorphError::NoOutputFormats);
        }

        if self.office_timeout == 0 {
            return Err(FileMorphError::invalid_config(
                "Office timeout must be at least 1 second",
            ));
        }

        Ok(())
    }

    /// Collect the input selection from arguments and the input list.
    ///
    /// Glob patterns are expanded in place. A single path with no input
    /// list selects single mode, so a folder expands to its files.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid, the input list cannot be
    /// read, or nothing was selected.
    pub async fn get_all_inputs(&self) -> Result<InputSpec> {
        let mut all_inputs = input::expand_patterns(&self.inputs)?;

        if let Some(ref input_list_path) = self.input_list {
            all_inputs.extend(input::read_input_list(input_list_path).await?);
        }

        if all_inputs.is_empty() {
            return Err(FileMorphError::NoInputs);
        }

        if self.input_list.is_some() {
            return Ok(InputSpec::List(all_inputs));
        }

        Ok(InputSpec::from_paths(all_inputs))
    }
}

//! The conversion run.
//!
//! A run validates the configuration, resolves the inputs, and then walks
//! every (file, format) pair in order. Pairs outside the conversion matrix
//! are skipped silently. A failed pair becomes a `[FAIL]` log entry and the
//! loop moves on. After the loop the produced PDFs are optionally merged,
//! and the log is written to the output root.
//!
//! # Examples
//!
//! ```no_run
//! use filemorph::config::{Config, OutputFormat};
//! use filemorph::input::InputSpec;
//! use filemorph::pipeline::Pipeline;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new(
//!     InputSpec::Single(PathBuf::from("docs")),
//!     "out",
//!     vec![OutputFormat::Pdf, OutputFormat::Txt],
//! );
//!
//! let report = Pipeline::new(&config).run(&config).await?;
//! println!("{} converted, {} failed", report.converted(), report.failed());
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::{Config, OutputFormat};
use crate::convert::{self, Action, Converter};
use crate::error::{FileMorphError, Result};
use crate::merge::{DEFAULT_LOAD_WORKERS, Merger};
use crate::report::{ConversionReport, LogEntry};
use crate::utils::{extension_lowercase, format_dir, stem_lossy, unique_path, unique_path_by};

/// Progress notification sent after each (file, format) pair.
#[derive(Debug)]
pub struct Step<'a> {
    /// Pairs handled so far, this one included.
    pub completed: usize,

    /// Total number of pairs in the run.
    pub total: usize,

    /// Source file of this pair.
    pub input: &'a Path,

    /// Requested format of this pair.
    pub format: OutputFormat,

    /// Log entry for this pair, or `None` when the pair was skipped.
    pub entry: Option<&'a LogEntry>,
}

/// One conversion a run would perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    /// Source file.
    pub input: PathBuf,

    /// Requested format.
    pub format: OutputFormat,

    /// What would be done.
    pub action: Action,

    /// Where the result would be written.
    pub output: PathBuf,
}

/// Everything a run would do, computed without touching the filesystem.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunPlan {
    /// Conversions in execution order.
    pub steps: Vec<PlannedStep>,

    /// Number of (file, format) pairs that would be skipped.
    pub skipped: usize,

    /// Merged PDF path, when a merge would run.
    pub merge_output: Option<PathBuf>,

    /// Conversion log path.
    pub log_path: PathBuf,
}

/// Runs conversions for a configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    converter: Converter,
    merger: Merger,
}

impl Pipeline {
    /// Create a pipeline using the office settings of `config`.
    pub fn new(config: &Config) -> Self {
        let workers = config.jobs.unwrap_or(DEFAULT_LOAD_WORKERS);
        Self::with_converter(Converter::new(&config.office))
            .with_merger(Merger::new().with_workers(workers))
    }

    /// Create a pipeline around an existing converter.
    pub fn with_converter(converter: Converter) -> Self {
        Self {
            converter,
            merger: Merger::new(),
        }
    }

    /// Replace the merger used for the merge step.
    pub fn with_merger(mut self, merger: Merger) -> Self {
        self.merger = merger;
        self
    }

    /// Compute what [`run`](Self::run) would do.
    ///
    /// Output names account for files already on disk and for names taken
    /// by earlier steps of the same plan.
    ///
    /// # Errors
    ///
    /// Returns the same setup errors as a real run.
    pub fn plan(&self, config: &Config) -> Result<RunPlan> {
        let inputs = resolve_inputs(config)?;

        let mut reserved: HashSet<PathBuf> = HashSet::new();
        let mut plan = RunPlan {
            log_path: config.log_path(),
            ..Default::default()
        };

        for input in &inputs {
            let extension = extension_lowercase(input);
            let stem = stem_lossy(input);

            for &format in &config.formats {
                let Some(action) = convert::plan(&extension, format) else {
                    plan.skipped += 1;
                    continue;
                };

                let output = unique_path_by(
                    &format_dir(&config.output_root, format),
                    &stem,
                    format.extension(),
                    |p| reserved.contains(p) || p.exists(),
                );
                reserved.insert(output.clone());

                plan.steps.push(PlannedStep {
                    input: input.clone(),
                    format,
                    action,
                    output,
                });
            }
        }

        plan.merge_output = config
            .merge_target()
            .map(|name| unique_path(&config.output_root, name, "pdf"));

        Ok(plan)
    }

    /// Run all conversions, the optional merge, and write the log.
    ///
    /// # Errors
    ///
    /// Only setup problems and a failure to create the output root or
    /// write the log are returned as errors. Conversion and merge failures
    /// are recorded in the report instead.
    pub async fn run(&self, config: &Config) -> Result<ConversionReport> {
        self.run_with_progress(config, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_step` after every pair.
    pub async fn run_with_progress<F>(
        &self,
        config: &Config,
        mut on_step: F,
    ) -> Result<ConversionReport>
    where
        F: FnMut(&Step<'_>),
    {
        let inputs = resolve_inputs(config)?;

        tokio::fs::create_dir_all(&config.output_root)
            .await
            .map_err(|e| FileMorphError::FailedToCreateOutput {
                path: config.output_root.clone(),
                source: e,
            })?;

        tracing::info!(
            inputs = inputs.len(),
            formats = config.formats.len(),
            output = %config.output_root.display(),
            backend = self.converter.backend_name(),
            "Starting conversion run"
        );

        let total = inputs.len() * config.formats.len();
        let mut completed = 0;
        let mut report = ConversionReport::new();
        let mut produced_pdfs = Vec::new();

        for input in &inputs {
            let extension = extension_lowercase(input);

            for &format in &config.formats {
                completed += 1;

                let Some(action) = convert::plan(&extension, format) else {
                    tracing::trace!(input = %input.display(), %format, "No conversion for pair");
                    on_step(&Step {
                        completed,
                        total,
                        input,
                        format,
                        entry: None,
                    });
                    continue;
                };

                let entry = match self.convert_one(config, input, format, action).await {
                    Ok(output) => {
                        tracing::debug!(
                            input = %input.display(),
                            output = %output.display(),
                            "Converted"
                        );
                        if action.produces_pdf() {
                            produced_pdfs.push(output.clone());
                        }
                        LogEntry::Converted {
                            input: input.clone(),
                            output,
                            format,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            input = %input.display(),
                            %format,
                            error = %e,
                            "Conversion failed"
                        );
                        LogEntry::Failed {
                            input: input.clone(),
                            format,
                            reason: e.log_message(),
                        }
                    }
                };

                on_step(&Step {
                    completed,
                    total,
                    input,
                    format,
                    entry: Some(&entry),
                });
                report.push(entry);
            }
        }

        if let Some(name) = config.merge_target() {
            report.push(self.merge(produced_pdfs, &config.output_root, name).await);
        }

        report.write_log(&config.log_path()).await?;

        tracing::info!(
            converted = report.converted(),
            failed = report.failed(),
            "Conversion run finished"
        );

        Ok(report)
    }

    async fn convert_one(
        &self,
        config: &Config,
        input: &Path,
        format: OutputFormat,
        action: Action,
    ) -> Result<PathBuf> {
        let dir = format_dir(&config.output_root, format);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| FileMorphError::FailedToCreateOutput {
                path: dir.clone(),
                source: e,
            })?;

        let output = unique_path(&dir, &stem_lossy(input), format.extension());
        self.converter.execute(action, input, &output).await?;
        Ok(output)
    }

    async fn merge(&self, pdfs: Vec<PathBuf>, output_root: &Path, name: &str) -> LogEntry {
        match self.merger.merge_into(pdfs, output_root, name).await {
            Ok(saved) => {
                let stats = &saved.statistics;
                tracing::info!(
                    output = %saved.path.display(),
                    files = stats.files_merged,
                    pages = stats.total_pages,
                    input_size = %stats.format_input_size(),
                    load_ms = stats.load_time.as_millis() as u64,
                    merge_ms = stats.merge_time.as_millis() as u64,
                    "Merged PDFs"
                );
                LogEntry::Merged { output: saved.path }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Merge failed");
                LogEntry::MergeFailed {
                    reason: e.log_message(),
                }
            }
        }
    }
}

/// Validate `config` and resolve its inputs.
fn resolve_inputs(config: &Config) -> Result<Vec<PathBuf>> {
    config.validate()?;

    let inputs = config.inputs.resolve()?;
    if inputs.is_empty() {
        return Err(FileMorphError::NoInputs);
    }

    Ok(inputs)
}

//! Output formatting and display for filemorph.
//!
//! This module handles all user-facing terminal output:
//! - Formatted status messages with quiet and verbose modes
//! - The progress bar over (file, format) pairs
//! - The dry-run plan and the end-of-run summary
//!
//! # Examples
//!
//! ```no_run
//! use filemorph::output::OutputFormatter;
//! use filemorph::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Converting files");
//! formatter.success("Conversion completed");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{ProgressBar, ProgressStyle};

use crate::pipeline::RunPlan;
use crate::report::ConversionReport;
use crate::utils::file_name_lossy;

/// Display a dry-run plan.
pub fn display_plan(formatter: &OutputFormatter, plan: &RunPlan) {
    formatter.section(&format!(
        "Dry run: {} conversion(s), {} pair(s) skipped",
        plan.steps.len(),
        plan.skipped
    ));

    for (i, step) in plan.steps.iter().enumerate() {
        formatter.list_item(
            i + 1,
            &format!(
                "{} -> {} ({})",
                file_name_lossy(&step.input),
                step.output.display(),
                step.action.describe()
            ),
        );
    }

    if let Some(ref merged) = plan.merge_output {
        formatter.info(&format!("Merged PDF would be saved to: {}", merged.display()));
    }
    formatter.info(&format!("Log would be written to: {}", plan.log_path.display()));
}

/// Display the end-of-run summary.
pub fn display_summary(formatter: &OutputFormatter, report: &ConversionReport) {
    let converted = report.converted();
    let failed = report.failed();

    if failed > 0 {
        formatter.warning(&format!(
            "{converted} conversion(s) succeeded, {failed} failed"
        ));
    } else {
        formatter.success(&format!("{converted} conversion(s) succeeded"));
    }

    if let Some(merged) = report.merged_path() {
        formatter.info(&format!("Merged PDF: {}", merged.display()));
    }

    if let Some(ref log) = report.log_path {
        formatter.info(&format!("Log: {}", log.display()));
    }
}

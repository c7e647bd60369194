//! filemorph - Convert documents, presentations and images in batch.
//!
//! Command-line front end over the `filemorph` library.

mod cli;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use filemorph::error::FileMorphError;
use filemorph::launcher;
use filemorph::output::{self, OutputFormatter, ProgressBar, ProgressStyle};
use filemorph::pipeline::Pipeline;
use filemorph::report::LogEntry;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Default tracing filter when `RUST_LOG` is not set.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "warn,filemorph=debug" } else { "warn" }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), FileMorphError> {
    cli.validate()?;

    let inputs = cli.get_all_inputs().await?;
    let config = cli.to_config(inputs)?;
    tracing::debug!(?config, "Configuration resolved");

    let formatter = OutputFormatter::from_config(&config);
    let pipeline = Pipeline::new(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", filemorph::NAME, filemorph::VERSION));
    }

    let formats: Vec<String> = config.formats.iter().map(|f| f.label()).collect();
    formatter.detail("Output", &config.output_root.display().to_string());
    formatter.detail("Formats", &formats.join(", "));
    formatter.detail("Office", &config.office.program.display().to_string());

    if config.dry_run {
        let plan = pipeline.plan(&config)?;

        if config.json {
            println!("{}", to_json(&plan)?);
        } else {
            output::display_plan(&formatter, &plan);
            formatter.success("Dry run completed, nothing was written");
        }
        return Ok(());
    }

    // Verbose runs print a line per pair, so a counter reads better than a bar.
    let mut progress = match (formatter.should_print(), formatter.is_verbose()) {
        (false, _) => ProgressBar::disabled(),
        (true, true) => ProgressBar::new(0, ProgressStyle::Counter),
        (true, false) => ProgressBar::new(0, ProgressStyle::Bar),
    };

    let report = pipeline
        .run_with_progress(&config, |step| {
            if let Some(entry) = step.entry
                && (entry.is_failure() || formatter.is_verbose())
            {
                progress.clear();
                formatter.entry(entry);
            }
            progress.step(step);
        })
        .await?;

    progress.finish();

    for entry in report.entries.iter().filter(|e| is_merge_entry(e)) {
        formatter.entry(entry);
    }

    if config.json {
        println!("{}", report.to_json()?);
    } else {
        output::display_summary(&formatter, &report);
    }

    if config.open_output
        && let Err(e) = launcher::open_folder(&config.output_root)
    {
        formatter.warning(&format!("Could not open output folder: {e}"));
    }

    Ok(())
}

fn is_merge_entry(entry: &LogEntry) -> bool {
    matches!(entry, LogEntry::Merged { .. } | LogEntry::MergeFailed { .. })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, FileMorphError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| FileMorphError::other(format!("Failed to serialize output: {e}")))
}

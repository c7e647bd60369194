//! Terminal progress over the (file, format) pairs of a run.
//!
//! # Examples
//!
//! ```
//! use filemorph::output::progress::{ProgressBar, ProgressStyle};
//!
//! let mut progress = ProgressBar::new(6, ProgressStyle::Bar);
//! for i in 1..=6 {
//!     progress.set_message(format!("file {i}"));
//!     progress.update(i);
//! }
//! progress.finish();
//! ```

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use crate::pipeline::Step;
use crate::utils::file_name_lossy;

const BAR_WIDTH: usize = 30;
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Style of progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// Classic progress bar: [=====>    ]
    Bar,
    /// Simple counter: 4/6
    Counter,
}

/// Single-line progress indicator redrawn in place on stdout.
#[derive(Debug)]
pub struct ProgressBar {
    total: usize,
    current: usize,
    failed: usize,
    style: ProgressStyle,
    message: Option<String>,
    started: Instant,
    last_draw: Option<Instant>,
    enabled: bool,
}

impl ProgressBar {
    /// Create a progress bar, drawn only when stdout is a terminal.
    pub fn new(total: usize, style: ProgressStyle) -> Self {
        Self {
            total,
            current: 0,
            failed: 0,
            style,
            message: None,
            started: Instant::now(),
            last_draw: None,
            enabled: io::stdout().is_terminal(),
        }
    }

    /// Create a progress bar that never draws.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(0, ProgressStyle::Counter)
        }
    }

    /// Set the text shown after the counters.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Move to `current` completed pairs and redraw if due.
    pub fn update(&mut self, current: usize) {
        self.current = current;

        let due = self
            .last_draw
            .is_none_or(|at| at.elapsed() >= REDRAW_INTERVAL);
        if due || current >= self.total {
            self.last_draw = Some(Instant::now());
            self.draw();
        }
    }

    /// Advance to a pipeline step, counting it when it failed.
    pub fn step(&mut self, step: &Step<'_>) {
        self.total = step.total;
        if step.entry.is_some_and(|e| e.is_failure()) {
            self.failed += 1;
        }
        self.set_message(format!(
            "{} -> {}",
            file_name_lossy(step.input),
            step.format.label()
        ));
        self.update(step.completed);
    }

    /// Draw the final state and end the line.
    pub fn finish(&mut self) {
        self.current = self.total;
        self.message = None;
        if self.enabled {
            self.draw();
            println!();
        }
    }

    /// Erase the progress line so a message can be printed in its place.
    pub fn clear(&self) {
        if self.enabled {
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }

    fn draw(&self) {
        if self.enabled {
            print!("\r\x1b[K{}", self.line());
            io::stdout().flush().ok();
        }
    }

    /// Text of the progress line.
    fn line(&self) -> String {
        let mut parts = Vec::with_capacity(6);

        if self.style == ProgressStyle::Bar {
            parts.push(self.bar());
            parts.push(format!("{:.0}%", self.percent()));
        }
        parts.push(format!("{}/{}", self.current, self.total));
        parts.push(format_duration(self.started.elapsed()));
        if self.failed > 0 {
            parts.push(format!("({} failed)", self.failed));
        }
        if let Some(ref msg) = self.message {
            parts.push(msg.clone());
        }

        parts.join(" ")
    }

    fn bar(&self) -> String {
        let filled = (BAR_WIDTH * self.current / self.total.max(1)).min(BAR_WIDTH);

        let mut bar = String::with_capacity(BAR_WIDTH + 2);
        bar.push('[');
        if filled > 0 {
            bar.push_str(&"=".repeat(filled - 1));
            bar.push('>');
        }
        bar.push_str(&" ".repeat(BAR_WIDTH - filled));
        bar.push(']');
        bar
    }

    /// Completed share of the run, in percent.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.current as f64 * 100.0 / self.total as f64
    }

    /// Number of failed pairs seen so far.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Time since the bar was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Format a duration as `42s`, `3m 5s` or `1h 2m`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    match secs {
        0..60 => format!("{secs}s"),
        60..3600 => format!("{}m {}s", secs / 60, secs % 60),
        _ => format!("{}h {}m", secs / 3600, (secs % 3600) / 60),
    }
}

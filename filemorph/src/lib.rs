//! filemorph - Batch-convert documents, presentations and images.
//!
//! This library converts a selection of files into one or more output
//! formats and can merge the resulting PDFs. It supports:
//!
//! - DOCX to PDF (through an external office converter), TXT and HTML
//! - PPTX and PPT to PDF
//! - Image transcoding between JPEG, PNG, BMP, GIF and TIFF
//! - PDF copies, and merging of all produced PDFs ordered by file number
//! - A plain-text conversion log and a serializable report
//!
//! Conversion failures never stop a run; they are recorded in the log.
//!
//! # Examples
//!
//! ## Running a conversion
//!
//! ```no_run
//! use filemorph::config::{Config, OutputFormat};
//! use filemorph::input::InputSpec;
//! use filemorph::pipeline::Pipeline;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::new(
//!     InputSpec::Single(PathBuf::from("chapters")),
//!     "out",
//!     vec![OutputFormat::Pdf, OutputFormat::Txt],
//! );
//! config.merge_name = Some("Book".to_string());
//!
//! let report = Pipeline::new(&config).run(&config).await?;
//! for entry in &report.entries {
//!     println!("{entry}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use filemorph::convert::docx;
//! use filemorph::merge::Merger;
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let paragraphs = docx::read_paragraphs(Path::new("notes.docx"))?;
//! println!("{}", docx::render_text(&paragraphs));
//!
//! let pdfs = vec![PathBuf::from("part2.pdf"), PathBuf::from("part1.pdf")];
//! let saved = Merger::new().merge_into(pdfs, Path::new("out"), "Parts").await?;
//! println!("Merged into {}", saved.path.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod convert;
pub mod error;
pub mod input;
pub mod io;
pub mod launcher;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use error::{FileMorphError, Result};
pub use pipeline::Pipeline;
pub use report::ConversionReport;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

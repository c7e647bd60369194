//! Merging of the PDFs produced by a run.

pub mod merger;
pub mod order;

pub use merger::{DEFAULT_LOAD_WORKERS, MergeResult, MergeStatistics, Merger, SavedMerge, concatenate};
pub use order::{MergeKey, sort_for_merge};

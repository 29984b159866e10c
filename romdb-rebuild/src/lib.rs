//! Rebuild the frontend catalog from the console folders on disk.
//!
//! This crate ties the filesystem work in `romdb-lib` to the database
//! writes in `romdb-db` and owns the transaction boundaries.

pub mod progress;
pub mod rebuild;

pub use progress::{LogProgress, RebuildProgress, SilentProgress};
pub use rebuild::{ConsoleSummary, RebuildError, RebuildOptions, RebuildSummary, rebuild};

//! Output module for user-facing reporting
//!
//! This module handles:
//! - The `Reporter` sink and its console/log-file and in-memory implementations
//! - The run banner and per-page cache lines
//! - Final statistics

mod reporter;
mod summary;

pub use reporter::{ConsoleReporter, Level, MemoryReporter, Reporter};
pub use summary::{print_banner, print_summary, report_outcomes};

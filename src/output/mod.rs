//! Output module for run reports
//!
//! This module handles:
//! - The summary of a finished run
//! - Statistics over an existing workbook
//! - Exporting the workbook after a run

pub mod export;
pub mod stats;
mod summary;

pub use export::export_workbook;
pub use stats::{load_statistics, print_statistics, WorkbookStatistics};
pub use summary::{print_run_summary, RunSummary};

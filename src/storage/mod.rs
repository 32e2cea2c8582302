//! Storage module for persisting scraped records
//!
//! This module handles:
//! - The `RecordSink` trait the page walker writes through
//! - The `.xlsx` workbook sink, including reopen-and-append across runs
//! - An in-memory sink for tests

mod memory;
mod traits;
mod xlsx;

pub use memory::MemorySink;
pub use traits::{RecordSink, SinkError, SinkResult};
pub use xlsx::{read_workbook, WorkbookContents, XlsxSink, MAX_CELL_CHARS};

use std::path::Path;

/// Opens (or creates) the workbook sink at `path`
///
/// # Arguments
///
/// * `path` - Path to the `.xlsx` workbook
/// * `sheet_name` - Worksheet name used if the workbook is created
///
/// # Returns
///
/// * `Ok(XlsxSink)` - Sink positioned after the last existing row
/// * `Err(SinkError)` - The existing workbook could not be read, or the new
///   one could not be written
pub fn open_sink(path: &Path, sheet_name: &str) -> SinkResult<XlsxSink> {
    XlsxSink::open(path, sheet_name)
}

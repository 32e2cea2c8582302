//! Sink trait and error types
//!
//! This module defines the trait interface for record sinks and the
//! associated error type.

use crate::record::Record;
use thiserror::Error;

/// Errors that can occur while persisting records
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to read workbook {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Append-only record store
///
/// Rows are kept in the order they are appended. Nothing is deduplicated:
/// appending the same record twice yields two rows.
pub trait RecordSink {
    /// Adds one row after the last existing row
    fn append(&mut self, record: &Record) -> SinkResult<()>;

    /// Persists every appended row to stable storage
    ///
    /// Called once per listing page.
    fn flush(&mut self) -> SinkResult<()>;

    /// Number of data rows (the header is not counted)
    fn row_count(&self) -> usize;
}

//! In-memory sink
//!
//! Keeps records in a vector. Used by tests.

use crate::record::Record;
use crate::storage::traits::{RecordSink, SinkResult};

/// Sink that never touches the filesystem
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<Record>,
    flushed_rows: usize,
    flush_count: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from rows that already exist, as if a store had been reopened
    pub fn with_records(records: Vec<Record>) -> Self {
        let flushed_rows = records.len();
        Self {
            records,
            flushed_rows,
            flush_count: 0,
        }
    }

    /// All rows, flushed or not
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of rows covered by the last flush
    pub fn flushed_rows(&self) -> usize {
        self.flushed_rows
    }

    /// Number of times `flush` has been called
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &Record) -> SinkResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        self.flushed_rows = self.records.len();
        self.flush_count += 1;
        Ok(())
    }

    fn row_count(&self) -> usize {
        self.records.len()
    }
}

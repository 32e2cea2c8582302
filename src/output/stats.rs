//! Statistics over an existing workbook
//!
//! This module reads a workbook written by the scraper and summarizes its rows.

use crate::record::{Record, NO_COMMENTS, NO_TAGS};
use crate::storage::{read_workbook, SinkResult};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Workbook statistics summary
#[derive(Debug, Clone, Default)]
pub struct WorkbookStatistics {
    /// Total number of data rows
    pub total_rows: usize,

    /// Rows per category
    pub rows_by_category: HashMap<String, usize>,

    /// Rows whose comments column holds at least one comment
    pub rows_with_comments: usize,

    /// Rows carrying at least one tag
    pub rows_with_tags: usize,

    /// Number of distinct post links (rows are never deduplicated, so this
    /// can be lower than `total_rows`)
    pub distinct_links: usize,
}

impl WorkbookStatistics {
    /// Computes statistics from records
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut stats = Self::default();
        let mut links = HashSet::new();

        for record in records {
            stats.total_rows += 1;
            *stats
                .rows_by_category
                .entry(record.category.clone())
                .or_insert(0) += 1;

            if record.comments != NO_COMMENTS && !record.comments.is_empty() {
                stats.rows_with_comments += 1;
            }
            if record.tags != NO_TAGS && !record.tags.is_empty() {
                stats.rows_with_tags += 1;
            }
            links.insert(record.link.clone());
        }

        stats.distinct_links = links.len();
        stats
    }

    /// Number of rows that repeat an earlier link
    pub fn duplicate_rows(&self) -> usize {
        self.total_rows - self.distinct_links
    }
}

/// Loads statistics from a workbook
///
/// # Arguments
///
/// * `path` - Path to the `.xlsx` workbook
///
/// # Returns
///
/// * `Ok(WorkbookStatistics)` - Successfully computed statistics
/// * `Err(SinkError)` - The workbook could not be read
pub fn load_statistics(path: &Path) -> SinkResult<WorkbookStatistics> {
    let contents = read_workbook(path)?;
    let records: Vec<Record> = contents.rows.iter().map(|row| Record::from_row(row)).collect();
    Ok(WorkbookStatistics::from_records(&records))
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &WorkbookStatistics) {
    println!("=== Workbook Statistics ===\n");

    println!("Overview:");
    println!("  Total rows: {}", stats.total_rows);
    println!("  Distinct links: {}", stats.distinct_links);
    println!("  Duplicate rows: {}", stats.duplicate_rows());
    println!("  Rows with tags: {}", stats.rows_with_tags);
    println!("  Rows with comments: {}", stats.rows_with_comments);
    println!();

    if !stats.rows_by_category.is_empty() {
        println!("Rows by Category:");
        let mut category_counts: Vec<_> = stats.rows_by_category.iter().collect();
        category_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (category, count) in category_counts {
            let percentage = (*count as f64 / stats.total_rows as f64) * 100.0;
            println!("  {}: {} ({:.1}%)", category, count, percentage);
        }
    }
}

//! Run summary produced by the driver loop

use crate::state::StopReason;
use chrono::{DateTime, Utc};

/// Summary of one scrape run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Listing pages requested, including the page that stopped the run
    pub pages_walked: u32,

    /// Posts extracted and appended
    pub posts_scraped: usize,

    /// Posts skipped on extraction or fetch errors
    pub posts_failed: usize,

    /// Data rows in the store at the end of the run, earlier runs included
    pub rows_in_store: usize,

    pub stop_reason: StopReason,
}

impl RunSummary {
    /// Wall-clock duration in whole seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Share of attempted posts that were saved, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.posts_scraped + self.posts_failed;
        if attempted == 0 {
            return 0.0;
        }
        (self.posts_scraped as f64 / attempted as f64) * 100.0
    }
}

/// Prints the run summary to stdout
pub fn print_run_summary(summary: &RunSummary, workbook_path: &str) {
    println!("=== Scrape Summary ===\n");

    println!("Run:");
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!("  Duration: {}s", summary.duration_seconds());
    println!("  Stopped: {}", summary.stop_reason);
    if summary.stop_reason.is_exhausted() {
        println!("  Reached the end of the listing");
    }
    println!();

    println!("Pages walked: {}", summary.pages_walked);
    println!(
        "Posts saved: {} ({:.1}% of {} attempted)",
        summary.posts_scraped,
        summary.success_rate(),
        summary.posts_scraped + summary.posts_failed
    );
    println!("Posts skipped: {}", summary.posts_failed);
    println!("Rows in workbook: {}", summary.rows_in_store);
    println!();

    println!("Scraping completed. Data saved to {}", workbook_path);
}

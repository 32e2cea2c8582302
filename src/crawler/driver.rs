//! Driver loop - walks listing pages in order until a stop condition
//!
//! The driver owns the fetcher context and the sink for the length of a run.
//! It starts at page 1, walks one page at a time, and pauses for a fixed delay
//! between pages. It stops when a page has no posts, when a listing request
//! fails, or when the page limit is reached.

use crate::crawler::fetcher::FetcherContext;
use crate::crawler::walker::{walk_page, PageOutcome};
use crate::output::RunSummary;
use crate::state::{RunState, StopReason};
use crate::storage::RecordSink;
use crate::Result;
use chrono::Utc;
use std::time::Duration;

/// Sequential page walker loop
pub struct Driver<S: RecordSink> {
    fetcher: FetcherContext,
    sink: S,
    max_pages: u32,
    page_delay: Duration,
}

impl<S: RecordSink> Driver<S> {
    /// Creates a new driver
    ///
    /// # Arguments
    ///
    /// * `fetcher` - HTTP context for all requests of the run
    /// * `sink` - Record sink, already opened
    /// * `max_pages` - Hard upper bound on listing pages walked
    /// * `page_delay` - Pause between two listing pages
    pub fn new(fetcher: FetcherContext, sink: S, max_pages: u32, page_delay: Duration) -> Self {
        Self {
            fetcher,
            sink,
            max_pages,
            page_delay,
        }
    }

    /// Runs the walk to completion
    ///
    /// Returns the run summary, or the first persistence error. Listing
    /// failures are not errors: they end the run with
    /// `StopReason::ListingFetchFailed`.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let started_at = Utc::now();
        let mut state = RunState::initial();
        let mut pages_walked = 0u32;
        let mut posts_scraped = 0usize;
        let mut posts_failed = 0usize;

        tracing::info!(
            "Starting run at page 1 (max {} pages, {}ms between pages)",
            self.max_pages,
            self.page_delay.as_millis()
        );

        let stop_reason: StopReason = loop {
            let page = match state {
                RunState::Running { page } => page,
                RunState::Stopped(reason) => break reason,
            };

            let outcome = walk_page(&self.fetcher, &mut self.sink, page).await?;
            pages_walked += 1;

            if let PageOutcome::Scraped { scraped, failed } = outcome {
                posts_scraped += scraped;
                posts_failed += failed;
            }

            state = state.advance(outcome.stop_reason(page), self.max_pages);

            match state {
                RunState::Running { .. } => {
                    if !self.page_delay.is_zero() {
                        tokio::time::sleep(self.page_delay).await;
                    }
                }
                RunState::Stopped(reason) if reason.is_failure() => {
                    tracing::warn!("Stopping scrape at page {}: {}", page, reason);
                }
                RunState::Stopped(reason) => {
                    tracing::info!("Stopping scrape at page {}: {}", page, reason);
                }
            }
        };

        Ok(RunSummary {
            started_at,
            finished_at: Utc::now(),
            pages_walked,
            posts_scraped,
            posts_failed,
            rows_in_store: self.sink.row_count(),
            stop_reason,
        })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the driver, handing back the sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}

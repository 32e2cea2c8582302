//! Listing page walker
//!
//! Walks one listing page: fetch, enumerate post cards, fetch and extract each
//! post, then append the extracted records and flush the sink once.

use crate::crawler::extractor::parse_listing;
use crate::crawler::fetcher::FetcherContext;
use crate::state::StopReason;
use crate::storage::RecordSink;
use crate::Result;

/// Result of walking one listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page had posts; `scraped` were saved and `failed` were skipped
    Scraped { scraped: usize, failed: usize },

    /// The page held no post cards
    Exhausted,

    /// The listing page itself could not be fetched
    FetchFailed,
}

impl PageOutcome {
    /// Returns true if the driver should move on to the next page
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Scraped { .. })
    }

    /// The reason to stop after walking `page`, if any
    pub fn stop_reason(&self, page: u32) -> Option<StopReason> {
        match self {
            Self::Scraped { .. } => None,
            Self::Exhausted => Some(StopReason::Exhausted { page }),
            Self::FetchFailed => Some(StopReason::ListingFetchFailed { page }),
        }
    }
}

/// Walks a single listing page
///
/// # Arguments
///
/// * `fetcher` - HTTP context for listing and post requests
/// * `sink` - Record sink the page's records are appended to
/// * `page` - 1-based listing page index
///
/// # Returns
///
/// * `Ok(PageOutcome::Scraped)` - The page had posts; every post that could
///   be fetched and extracted was appended, and the sink was flushed
/// * `Ok(PageOutcome::Exhausted)` - No post cards; the sink is untouched
/// * `Ok(PageOutcome::FetchFailed)` - The listing request failed; the sink is
///   untouched
/// * `Err(ScrapeError)` - Appending or flushing failed
///
/// A failure on one post (missing field, failed request) is logged and that
/// post is skipped; it never aborts the page.
pub async fn walk_page<S>(
    fetcher: &FetcherContext,
    sink: &mut S,
    page: u32,
) -> Result<PageOutcome>
where
    S: RecordSink + ?Sized,
{
    tracing::info!("Filtering data from page {}", page);

    let body = match fetcher.fetch_listing(page).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Error scraping page {}: {}", page, e);
            return Ok(PageOutcome::FetchFailed);
        }
    };

    let summaries = parse_listing(&body);
    if summaries.is_empty() {
        tracing::info!("No posts found on page {}. Might be the end.", page);
        return Ok(PageOutcome::Exhausted);
    }

    let mut records = Vec::with_capacity(summaries.len());
    let mut failed = 0;

    for (index, summary) in summaries.into_iter().enumerate() {
        let summary = match summary {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(
                    "Skipping post #{} on page {}: {}",
                    index + 1,
                    page,
                    e
                );
                failed += 1;
                continue;
            }
        };

        match fetcher.fetch_post(&summary.link).await {
            Ok(document) => {
                let record = summary.into_record(&document);
                tracing::debug!("Scraped post {}", record.link);
                records.push(record);
            }
            Err(e) => {
                tracing::warn!(
                    "Skipping post {} on page {}: {}",
                    summary.link,
                    page,
                    e
                );
                failed += 1;
            }
        }
    }

    for record in &records {
        sink.append(record)?;
    }
    sink.flush()?;

    tracing::info!(
        "Page {}: saved {} posts, skipped {} ({} rows total)",
        page,
        records.len(),
        failed,
        sink.row_count()
    );

    Ok(PageOutcome::Scraped {
        scraped: records.len(),
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySink;
    use reqwest::Client;
    use url::Url;

    fn unreachable_fetcher() -> FetcherContext {
        // Port 9 (discard) on localhost refuses connections
        FetcherContext::from_parts(
            Client::new(),
            Url::parse("http://127.0.0.1:9").unwrap(),
            "token".to_string(),
        )
    }

    #[test]
    fn test_outcome_continue_and_stop_reason() {
        let scraped = PageOutcome::Scraped {
            scraped: 2,
            failed: 1,
        };
        assert!(scraped.should_continue());
        assert_eq!(scraped.stop_reason(3), None);

        assert!(!PageOutcome::Exhausted.should_continue());
        assert_eq!(
            PageOutcome::Exhausted.stop_reason(3),
            Some(StopReason::Exhausted { page: 3 })
        );
        assert_eq!(
            PageOutcome::FetchFailed.stop_reason(5),
            Some(StopReason::ListingFetchFailed { page: 5 })
        );
    }

    #[tokio::test]
    async fn test_listing_failure_stops_without_touching_sink() {
        let fetcher = unreachable_fetcher();
        let mut sink = MemorySink::new();

        let outcome = walk_page(&fetcher, &mut sink, 1).await.unwrap();

        assert_eq!(outcome, PageOutcome::FetchFailed);
        assert_eq!(sink.row_count(), 0);
        assert_eq!(sink.flush_count(), 0);
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let fetcher = unreachable_fetcher();
        let mut sink = MemorySink::new();
        let dyn_sink: &mut dyn RecordSink = &mut sink;

        let outcome = walk_page(&fetcher, dyn_sink, 1).await.unwrap();
        assert!(!outcome.should_continue());
        assert_eq!(sink.row_count(), 0);
    }
}

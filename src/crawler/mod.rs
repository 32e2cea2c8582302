//! Crawler module for listing walks and post extraction
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching of listing pages and post documents
//! - Field extraction from listing cards and post pages
//! - Walking one listing page into the record sink
//! - The driver loop over listing pages

mod driver;
mod extractor;
mod fetcher;
mod walker;

pub use driver::Driver;
pub use extractor::{
    extract, parse_listing, Comment, ExtractionError, PostDocument, PostSummary,
    POST_SUMMARY_SELECTOR,
};
pub use fetcher::{build_http_client, listing_url, FetchError, FetcherContext};
pub use walker::{walk_page, PageOutcome};

use crate::config::{validate, Config};
use crate::output::RunSummary;
use crate::storage::open_sink;
use crate::Result;
use std::path::Path;
use std::time::Duration;

/// Runs a complete scrape
///
/// This is the main entry point for a run. It will:
/// 1. Validate the configuration
/// 2. Build the HTTP client
/// 3. Open (or create) the workbook
/// 4. Walk listing pages from page 1 until a stop condition
/// 5. Flush and close the workbook
///
/// If the walk fails with a persistence error, the workbook is still given a
/// final save attempt when the sink is dropped.
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run ended on one of its stop conditions
/// * `Err(ScrapeError)` - Invalid configuration, setup failure, or a
///   persistence failure
pub async fn scrape(config: &Config) -> Result<RunSummary> {
    validate(config)?;

    let fetcher = FetcherContext::new(config)?;
    let sink = open_sink(
        Path::new(&config.output.workbook_path),
        &config.output.sheet_name,
    )?;

    let mut driver = Driver::new(
        fetcher,
        sink,
        config.scraper.max_pages,
        Duration::from_millis(config.scraper.page_delay_ms),
    );

    let summary = driver.run().await?;
    driver.into_sink().close()?;

    Ok(summary)
}

//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper:
//! - Building the HTTP client with the configured user agent
//! - Building listing page URLs
//! - GET requests for listing pages and post documents
//!
//! Every request is a single attempt. A failed listing page ends the run; a
//! failed post is skipped by the page walker.

use crate::config::Config;
use crate::crawler::extractor::PostDocument;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Transport errors for listing and post requests
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The scraper configuration (user agent and timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.value.as_str())
        .timeout(Duration::from_secs(config.scraper.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the listing URL for one page
///
/// The result has the form
/// `{base}/?action=ajax_listing&paged={page}&tq={token}&all_listing=1`.
/// The token is percent-encoded here, so it is passed in decoded form.
pub fn listing_url(base_url: &Url, listing_token: &str, page: u32) -> Url {
    let mut url = base_url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair("action", "ajax_listing")
        .append_pair("paged", &page.to_string())
        .append_pair("tq", listing_token)
        .append_pair("all_listing", "1");
    url
}

/// Everything needed to issue requests against the site
///
/// Passed explicitly to the page walker; holds no per-run state.
#[derive(Debug, Clone)]
pub struct FetcherContext {
    client: Client,
    base_url: Url,
    listing_token: String,
}

impl FetcherContext {
    /// Builds a context from configuration
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.scraper.base_url).map_err(|source| {
            FetchError::InvalidUrl {
                url: config.scraper.base_url.clone(),
                source,
            }
        })?;

        let client = build_http_client(config).map_err(|source| FetchError::Http {
            url: config.scraper.base_url.clone(),
            source,
        })?;

        Ok(Self::from_parts(
            client,
            base_url,
            config.scraper.listing_token.clone(),
        ))
    }

    pub fn from_parts(client: Client, base_url: Url, listing_token: String) -> Self {
        Self {
            client,
            base_url,
            listing_token,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Listing URL for `page`
    pub fn listing_url(&self, page: u32) -> Url {
        listing_url(&self.base_url, &self.listing_token, page)
    }

    /// Resolves a post href against the base URL
    ///
    /// Absolute hrefs are returned unchanged.
    pub fn resolve(&self, href: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(href.trim())
            .map_err(|source| FetchError::InvalidUrl {
                url: href.to_string(),
                source,
            })
    }

    /// Fetches the raw body of one listing page
    pub async fn fetch_listing(&self, page: u32) -> Result<String, FetchError> {
        let url = self.listing_url(page);
        tracing::debug!("Fetching listing page {}: {}", page, url);
        self.get_text(url).await
    }

    /// Fetches and parses one post document
    pub async fn fetch_post(&self, href: &str) -> Result<PostDocument, FetchError> {
        let url = self.resolve(href)?;
        tracing::debug!("Fetching post: {}", url);
        let body = self.get_text(url).await?;
        Ok(PostDocument::parse(&body))
    }

    /// Sends a GET request and returns the body of a 2xx response
    async fn get_text(&self, url: Url) -> Result<String, FetchError> {
        let url_string = url.to_string();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url_string.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url_string,
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: url_string,
            source,
        })
    }
}

//! Integration tests for the scraper
//!
//! These tests use wiremock to stand in for the news site and run the
//! listing walk end-to-end into a workbook in a temp directory.

use hespress_scraper::config::Config;
use hespress_scraper::crawler::{scrape, walk_page, Driver, FetcherContext, PageOutcome};
use hespress_scraper::record::{NO_COMMENTS, NO_TAGS};
use hespress_scraper::storage::{
    read_workbook, MemorySink, RecordSink, SinkError, SinkResult, XlsxSink,
};
use hespress_scraper::{Record, ScrapeError, StopReason, COLUMN_HEADERS};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "MjAyMi0wNC0wNiAwMDowNTowMA==";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, workbook: &Path) -> Config {
    let mut config = Config::default();
    config.scraper.base_url = base_url.to_string();
    config.scraper.listing_token = TOKEN.to_string();
    config.scraper.page_delay_ms = 0;
    config.scraper.request_timeout_secs = 5;
    config.output.workbook_path = workbook.display().to_string();
    config
}

/// One listing card linking to `/politique/{id}.html`
fn card(id: u32) -> String {
    format!(
        r#"<div class="overlay card">
            <img class="wp-post-image" src="https://cdn.example.com/{id}.jpg">
            <span class="cat">Politique</span>
            <h3 class="card-title">Post {id}</h3>
            <small class="text-muted time">2024-06-0{id} 10:00</small>
            <a class="stretched-link" href="/politique/{id}.html"></a>
        </div>"#
    )
}

/// A listing card with no title element
fn broken_card() -> String {
    r#"<div class="overlay card">
        <img class="wp-post-image" src="https://cdn.example.com/x.jpg">
        <span class="cat">Sport</span>
        <small class="text-muted time">2024-06-09 10:00</small>
        <a class="stretched-link" href="/sport/x.html"></a>
    </div>"#
        .to_string()
}

fn listing(cards: &[String]) -> String {
    format!("<div class=\"listing\">{}</div>", cards.join("\n"))
}

fn post_page(id: u32) -> String {
    format!(
        r#"<html><body>
            <div class="article-content"><p>Body of post {id}.</p></div>
            <section class="box-tags"><a class="tag_post_tag" href="/tag/v">Vote</a></section>
            <span class="comments-count-number">2</span>
            <div class="comments"><ul class="comment-list">
                <li class="comment"><div class="comment-body">
                    <span class="comment-author">Sara</span> Great read
                </div></li>
            </ul></div>
        </body></html>"#
    )
}

async fn mount_listing(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("action", "ajax_listing"))
        .and(query_param("paged", page.to_string().as_str()))
        .and(query_param("tq", TOKEN))
        .and(query_param("all_listing", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_post(server: &MockServer, id: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/politique/{}.html", id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(post_page(id))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_scrape_into_workbook() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("hespress.xlsx");

    mount_listing(&mock_server, 1, listing(&[card(1), card(2)])).await;
    mount_listing(&mock_server, 2, listing(&[])).await;
    mount_post(&mock_server, 1).await;
    mount_post(&mock_server, 2).await;

    let config = create_test_config(&mock_server.uri(), &workbook);
    let summary = scrape(&config).await.expect("Scrape failed");

    assert_eq!(summary.pages_walked, 2);
    assert_eq!(summary.posts_scraped, 2);
    assert_eq!(summary.posts_failed, 0);
    assert_eq!(summary.rows_in_store, 2);
    assert_eq!(summary.stop_reason, StopReason::Exhausted { page: 2 });

    let contents = read_workbook(&workbook).unwrap();
    assert_eq!(contents.sheet_name.as_deref(), Some("Hespress Data"));
    assert_eq!(contents.header, COLUMN_HEADERS.to_vec());
    assert_eq!(contents.rows.len(), 2);

    let first = Record::from_row(&contents.rows[0]);
    assert_eq!(first.title, "Post 1");
    assert_eq!(first.category, "Politique");
    assert_eq!(first.date, "2024-06-01 10:00");
    assert_eq!(first.content, "Body of post 1.");
    assert_eq!(first.link, "/politique/1.html");
    assert_eq!(first.image, "https://cdn.example.com/1.jpg");
    assert_eq!(first.tags, "Vote");
    assert_eq!(first.comment_count, "2");
    assert_eq!(first.comments, "Sara: Great read");

    let second = Record::from_row(&contents.rows[1]);
    assert_eq!(second.title, "Post 2");
}

#[tokio::test]
async fn test_bad_posts_are_skipped() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("hespress.xlsx");

    // Post 3 has no mock, so its request gets a 404
    mount_listing(
        &mock_server,
        1,
        listing(&[card(1), broken_card(), card(3)]),
    )
    .await;
    mount_listing(&mock_server, 2, listing(&[])).await;
    mount_post(&mock_server, 1).await;

    let config = create_test_config(&mock_server.uri(), &workbook);
    let summary = scrape(&config).await.expect("Scrape failed");

    assert_eq!(summary.posts_scraped, 1);
    assert_eq!(summary.posts_failed, 2);
    assert_eq!(summary.stop_reason, StopReason::Exhausted { page: 2 });

    let contents = read_workbook(&workbook).unwrap();
    assert_eq!(contents.rows.len(), 1);
    assert_eq!(Record::from_row(&contents.rows[0]).title, "Post 1");
}

#[tokio::test]
async fn test_listing_error_stops_run() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("hespress.xlsx");

    mount_listing(&mock_server, 1, listing(&[card(1)])).await;
    mount_post(&mock_server, 1).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("paged", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("paged", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&[card(1)])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &workbook);
    let summary = scrape(&config).await.expect("Scrape failed");

    assert_eq!(summary.pages_walked, 2);
    assert_eq!(
        summary.stop_reason,
        StopReason::ListingFetchFailed { page: 2 }
    );

    // Page 1 was saved before page 2 failed
    let contents = read_workbook(&workbook).unwrap();
    assert_eq!(contents.rows.len(), 1);
}

#[tokio::test]
async fn test_first_page_empty_leaves_header_only() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("hespress.xlsx");

    mount_listing(&mock_server, 1, "<html><body></body></html>".to_string()).await;

    let config = create_test_config(&mock_server.uri(), &workbook);
    let summary = scrape(&config).await.expect("Scrape failed");

    assert_eq!(summary.pages_walked, 1);
    assert_eq!(summary.stop_reason, StopReason::Exhausted { page: 1 });

    let contents = read_workbook(&workbook).unwrap();
    assert_eq!(contents.header, COLUMN_HEADERS.to_vec());
    assert!(contents.rows.is_empty());
}

#[tokio::test]
async fn test_invalid_config_rejected_before_any_request() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("hespress.xlsx");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&[card(1)])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), &workbook);
    config.scraper.max_pages = 0;
    let result = scrape(&config).await;

    assert!(matches!(result, Err(ScrapeError::Config(_))));
    assert!(!workbook.exists());
}

#[tokio::test]
async fn test_page_limit_stops_run() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("hespress.xlsx");

    mount_listing(&mock_server, 1, listing(&[card(1)])).await;
    mount_post(&mock_server, 1).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("paged", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&[card(2)])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), &workbook);
    config.scraper.max_pages = 1;
    let summary = scrape(&config).await.expect("Scrape failed");

    assert_eq!(summary.pages_walked, 1);
    assert_eq!(
        summary.stop_reason,
        StopReason::PageLimitReached { max_pages: 1 }
    );
}

#[tokio::test]
async fn test_second_run_appends_without_dedup() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("hespress.xlsx");

    mount_listing(&mock_server, 1, listing(&[card(1), card(2)])).await;
    mount_listing(&mock_server, 2, listing(&[])).await;
    mount_post(&mock_server, 1).await;
    mount_post(&mock_server, 2).await;

    let config = create_test_config(&mock_server.uri(), &workbook);
    scrape(&config).await.expect("First run failed");
    let summary = scrape(&config).await.expect("Second run failed");

    assert_eq!(summary.posts_scraped, 2);
    assert_eq!(summary.rows_in_store, 4);

    let contents = read_workbook(&workbook).unwrap();
    assert_eq!(contents.header, COLUMN_HEADERS.to_vec());
    assert_eq!(contents.rows.len(), 4);

    let titles: Vec<String> = contents
        .rows
        .iter()
        .map(|row| Record::from_row(row).title)
        .collect();
    assert_eq!(titles, vec!["Post 1", "Post 2", "Post 1", "Post 2"]);
}

#[tokio::test]
async fn test_walk_page_with_xlsx_sink() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("walk.xlsx");

    mount_listing(&mock_server, 1, listing(&[card(1)])).await;
    mount_listing(&mock_server, 2, listing(&[])).await;
    mount_post(&mock_server, 1).await;

    let config = create_test_config(&mock_server.uri(), &workbook);
    let fetcher = FetcherContext::new(&config).unwrap();
    let mut sink = XlsxSink::open(&workbook, "Hespress Data").unwrap();

    let first = walk_page(&fetcher, &mut sink, 1).await.unwrap();
    assert_eq!(
        first,
        PageOutcome::Scraped {
            scraped: 1,
            failed: 0
        }
    );
    assert!(first.should_continue());

    // Rows are on disk as soon as the page is walked
    assert_eq!(read_workbook(&workbook).unwrap().rows.len(), 1);

    let second = walk_page(&fetcher, &mut sink, 2).await.unwrap();
    assert_eq!(second, PageOutcome::Exhausted);
    assert!(!second.should_continue());

    sink.close().unwrap();
}

#[tokio::test]
async fn test_sentinels_for_bare_post() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, 1, listing(&[card(1)])).await;
    Mock::given(method("GET"))
        .and(path("/politique/1.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("unused.xlsx"));
    let fetcher = FetcherContext::new(&config).unwrap();
    let mut sink = MemorySink::new();

    walk_page(&fetcher, &mut sink, 1).await.unwrap();

    let record = &sink.records()[0];
    assert_eq!(record.content, "");
    assert_eq!(record.tags, NO_TAGS);
    assert_eq!(record.comment_count, "0");
    assert_eq!(record.comments, NO_COMMENTS);
}

/// Sink whose flush always fails
struct FailingSink {
    appended: usize,
}

impl RecordSink for FailingSink {
    fn append(&mut self, _record: &Record) -> SinkResult<()> {
        self.appended += 1;
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        Err(SinkError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "workbook is locked",
        )))
    }

    fn row_count(&self) -> usize {
        self.appended
    }
}

#[tokio::test]
async fn test_persistence_failure_is_fatal() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, 1, listing(&[card(1)])).await;
    mount_post(&mock_server, 1).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("paged", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("unused.xlsx"));
    let fetcher = FetcherContext::new(&config).unwrap();
    let mut driver = Driver::new(fetcher, FailingSink { appended: 0 }, 10, Duration::ZERO);

    let result = driver.run().await;

    assert!(matches!(result, Err(ScrapeError::Sink(SinkError::Io(_)))));
    assert_eq!(driver.sink().appended, 1);
}

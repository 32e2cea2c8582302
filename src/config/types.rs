use serde::Deserialize;

/// Base URL of the news site
pub const DEFAULT_BASE_URL: &str = "https://www.hespress.com";

/// Listing cursor token baked into every listing request (already decoded)
pub const DEFAULT_LISTING_TOKEN: &str = "MjAyMi0wNC0wNiAwMDowNTowMA==";

/// Hard upper bound on the number of listing pages walked
pub const DEFAULT_MAX_PAGES: u32 = 2_500_000;

/// Delay between two listing pages (milliseconds)
pub const DEFAULT_PAGE_DELAY_MS: u64 = 2000;

/// Per-request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_WORKBOOK_PATH: &str = "hespress.xlsx";

pub const DEFAULT_SHEET_NAME: &str = "Hespress Data";

/// Main configuration structure
///
/// Every key has a default, so an empty file (or no file at all) yields a
/// configuration that scrapes the live site into `hespress.xlsx`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Listing walk configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Site root; the listing endpoint is requested at `{base-url}/`
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Value sent as the `tq` query parameter of every listing request
    #[serde(rename = "listing-token", default = "default_listing_token")]
    pub listing_token: String,

    /// Maximum number of listing pages to walk
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Fixed pause between listing pages (milliseconds)
    #[serde(rename = "page-delay-ms", default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Timeout applied to every HTTP request (seconds)
    #[serde(
        rename = "request-timeout-secs",
        default = "default_request_timeout_secs"
    )]
    pub request_timeout_secs: u64,
}

/// User agent sent with every request
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_user_agent")]
    pub value: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the `.xlsx` workbook
    #[serde(rename = "workbook-path", default = "default_workbook_path")]
    pub workbook_path: String,

    /// Worksheet name used when the workbook is created
    #[serde(rename = "sheet-name", default = "default_sheet_name")]
    pub sheet_name: String,

    /// Directory the finished workbook is copied into, if set
    #[serde(rename = "export-dir", default)]
    pub export_dir: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            listing_token: default_listing_token(),
            max_pages: default_max_pages(),
            page_delay_ms: default_page_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            workbook_path: default_workbook_path(),
            sheet_name: default_sheet_name(),
            export_dir: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_listing_token() -> String {
    DEFAULT_LISTING_TOKEN.to_string()
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_page_delay_ms() -> u64 {
    DEFAULT_PAGE_DELAY_MS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_workbook_path() -> String {
    DEFAULT_WORKBOOK_PATH.to_string()
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

//! Configuration module for the scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use hespress_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hespress.toml")).unwrap();
//! println!("Scraper will write to: {}", config.output.workbook_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, ScraperConfig, UserAgentConfig, DEFAULT_BASE_URL,
    DEFAULT_LISTING_TOKEN, DEFAULT_MAX_PAGES, DEFAULT_PAGE_DELAY_MS, DEFAULT_SHEET_NAME,
    DEFAULT_USER_AGENT, DEFAULT_WORKBOOK_PATH,
};

// Re-export parser functions
pub use parser::{load_config, load_config_with_hash, parse_config};
pub use validation::validate;

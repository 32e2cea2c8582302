//! Hespress scraper main entry point
//!
//! This is the command-line interface for the listing scraper.

use clap::Parser;
use hespress_scraper::config::{load_config_with_hash, validate, Config};
use hespress_scraper::crawler::{scrape, FetcherContext};
use hespress_scraper::output::{
    export_workbook, load_statistics, print_run_summary, print_statistics,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Hespress scraper: walks the article listing into a spreadsheet
///
/// Pages are walked in order from page 1. Each page's articles are appended
/// to the workbook and saved before the next page is requested, so an
/// existing workbook is extended rather than replaced.
#[derive(Parser, Debug)]
#[command(name = "hespress-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Scrapes the Hespress article listing into an xlsx workbook", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the workbook path from the configuration
    #[arg(short, long, value_name = "PATH")]
    workbook: Option<String>,

    /// Copy the workbook into this directory after the run
    #[arg(long, value_name = "DIR")]
    export_dir: Option<String>,

    /// Show the resolved configuration and first listing URL without fetching
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics for the existing workbook and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(workbook) = cli.workbook {
        config.output.workbook_path = workbook;
    }
    if let Some(export_dir) = cli.export_dir {
        config.output.export_dir = Some(export_dir);
    }
    validate(&config)?;

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_scrape(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hespress_scraper=info,warn"),
            1 => EnvFilter::new("hespress_scraper=debug,info"),
            2 => EnvFilter::new("hespress_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Hespress Scraper Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Base URL: {}", config.scraper.base_url);
    println!("  Listing token: {}", config.scraper.listing_token);
    println!("  Max pages: {}", config.scraper.max_pages);
    println!("  Delay between pages: {}ms", config.scraper.page_delay_ms);
    println!("  Request timeout: {}s", config.scraper.request_timeout_secs);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    println!("\nOutput:");
    println!("  Workbook: {}", config.output.workbook_path);
    println!("  Sheet: {}", config.output.sheet_name);
    match &config.output.export_dir {
        Some(dir) => println!("  Export directory: {}", dir),
        None => println!("  Export directory: (none)"),
    }

    let workbook = Path::new(&config.output.workbook_path);
    if workbook.exists() {
        println!("  Existing workbook found: new rows will be appended");
    } else {
        println!("  Workbook will be created with a header row");
    }

    let fetcher = FetcherContext::new(config)?;
    println!("\n✓ Configuration is valid");
    println!("✓ Would start at: {}", fetcher.listing_url(1));
    println!("✓ Post links resolve against: {}", fetcher.base_url());

    Ok(())
}

/// Handles the --stats mode: shows statistics from the workbook
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Workbook: {}\n", config.output.workbook_path);

    let stats = load_statistics(Path::new(&config.output.workbook_path))?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Scraping {} into {}",
        config.scraper.base_url,
        config.output.workbook_path
    );

    let summary = match scrape(config).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            return Err(e.into());
        }
    };

    print_run_summary(&summary, &config.output.workbook_path);

    if let Some(dir) = &config.output.export_dir {
        if let Err(e) = export_workbook(Path::new(&config.output.workbook_path), Path::new(dir)) {
            tracing::error!("Failed to export workbook to {}: {}", dir, e);
        }
    }

    Ok(())
}

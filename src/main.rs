//! Catalog-Scraper main entry point
//!
//! This is the command-line interface for the Catalog-Scraper crawler.

use catalog_scraper::config::{default_config, load_config_with_hash, Config};
use catalog_scraper::crawler::run_scrape;
use catalog_scraper::output::print_report;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Scraper: export a catalogue website category by category
///
/// Crawls every category (or a single one), writes one CSV per category
/// and saves each book's cover image.
#[derive(Parser, Debug)]
#[command(name = "catalog-scraper")]
#[command(version)]
#[command(about = "Export a catalogue website category by category", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Crawl only this category index URL
    #[arg(long, value_name = "URL")]
    category: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path).map_err(|e| {
                tracing::error!("Failed to load configuration: {}", e);
                e
            })?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            default_config().map_err(|e| {
                tracing::error!("Invalid default configuration: {}", e);
                e
            })?
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, cli.category.as_deref());
        return Ok(());
    }

    handle_scrape(&config, cli.category.as_deref()).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_scraper=info,warn"),
            1 => EnvFilter::new("catalog_scraper=debug,info"),
            2 => EnvFilter::new("catalog_scraper=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config, category: Option<&str>) {
    println!("=== Catalog-Scraper Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    match category {
        Some(url) => println!("  Category: {}", url),
        None => println!("  Category: all (from site navigation)"),
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nHTTP:");
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);

    println!("\nOutput:");
    println!("  CSV directory: {}", config.output.csv_dir);
    println!("  Image directory: {}", config.output.image_dir);

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config, category: Option<&str>) -> anyhow::Result<()> {
    match category {
        Some(url) => tracing::info!("Scraping single category: {}", url),
        None => tracing::info!("Scraping all categories from {}", config.site.base_url),
    }

    match run_scrape(config, category).await {
        Ok(report) => {
            print_report(&report);
            if report.is_complete() {
                tracing::info!("Scrape completed successfully");
            } else {
                tracing::warn!("Scrape completed with {} failed categories", report.failed.len());
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

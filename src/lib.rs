//! Catalog-Scraper: a category-by-category catalogue crawler
//!
//! This crate walks a catalogue website organised as categories, paginated
//! listing pages and per-item detail pages, extracts a fixed schema of book
//! fields, and persists one CSV export per category plus the cover images.

pub mod book;
pub mod config;
pub mod crawler;
pub mod output;
pub mod site;

use thiserror::Error;

/// Main error type for Catalog-Scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Malformed listing page {url}: {reason}")]
    MalformedListingPage { url: String, reason: String },

    #[error("Malformed detail page {url}: {reason}")]
    MalformedDetailPage { url: String, reason: String },

    #[error("Unrecognized rating token: '{0}'")]
    UnrecognizedRating(String),

    #[error("Image URL could not be resolved for '{title}' in {category}")]
    UnresolvedImage { title: String, category: String },

    #[error("Failed to write asset {target}: {message}")]
    AssetWrite { target: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Catalog-Scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use book::Book;
pub use config::Config;
pub use crawler::{Category, Coordinator, DocumentFetcher, HttpFetcher};
pub use site::SiteLayout;

//! Scrape coordinator - run orchestration
//!
//! This module ties the pieces of a run together:
//! - Enumerating categories from the site root
//! - Crawling each category in turn
//! - Writing one CSV export per category
//! - Collecting a `RunReport`
//!
//! Everything runs strictly in sequence, so export rows follow listing order.

use crate::config::Config;
use crate::crawler::category::{Category, CategoryCrawler};
use crate::crawler::fetcher::{DocumentFetcher, HttpFetcher};
use crate::output::{AssetWriter, RunReport, TableWriter};
use crate::site::SiteLayout;
use crate::Result;
use std::path::PathBuf;

/// Main scrape coordinator structure
pub struct Coordinator<F = HttpFetcher> {
    fetcher: F,
    site: SiteLayout,
    tables: TableWriter,
    assets: AssetWriter,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScrapeError)` - Bad base URL or HTTP client construction failed
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(&config.user_agent, &config.http)?;
        Self::with_fetcher(fetcher, config)
    }
}

impl<F: DocumentFetcher> Coordinator<F> {
    /// Creates a coordinator around any fetcher
    pub fn with_fetcher(fetcher: F, config: &Config) -> Result<Self> {
        Ok(Self {
            fetcher,
            site: SiteLayout::from_config(&config.site)?,
            tables: TableWriter::new(&config.output.csv_dir),
            assets: AssetWriter::new(&config.output.image_dir),
        })
    }

    /// The site layout URLs are resolved against
    pub fn site(&self) -> &SiteLayout {
        &self.site
    }

    fn crawler(&self) -> CategoryCrawler<'_, F> {
        CategoryCrawler::new(&self.fetcher, &self.site, &self.assets)
    }

    /// Crawls one category and writes its export
    ///
    /// Nothing is written unless the crawl completed.
    pub async fn export_category(&self, url: &str) -> Result<(Category, PathBuf)> {
        let category = self.crawler().crawl(url).await?;
        let path = self.tables.write(&category.name, &category.books)?;
        tracing::info!(
            "Wrote {} rows for {} to {}",
            category.books.len(),
            category.name,
            path.display()
        );
        Ok((category, path))
    }

    /// Crawls and exports every category listed on the site root
    ///
    /// A failing category is logged and recorded; the batch moves on.
    pub async fn run_all(&self) -> Result<RunReport> {
        let mut report = RunReport::new();

        let categories = self.crawler().discover_categories().await?;
        let total = categories.len();

        for (i, url) in categories.iter().enumerate() {
            tracing::info!("Category {}/{}: {}", i + 1, total, url);
            match self.export_category(url).await {
                Ok((category, path)) => report.record_export(&category, path),
                Err(e) => {
                    tracing::error!("Category {} failed: {}", url, e);
                    report.record_failure(url, &e);
                }
            }
        }

        report.finish();
        Ok(report)
    }

    /// Crawls and exports a single category
    ///
    /// Any category-level failure aborts the run.
    pub async fn run_category(&self, url: &str) -> Result<RunReport> {
        let mut report = RunReport::new();

        let (category, path) = self.export_category(url).await?;
        report.record_export(&category, path);

        report.finish();
        Ok(report)
    }
}

/// Runs a complete scrape over HTTP
///
/// With `category` set only that category is crawled, and a failure is
/// returned as an error. Otherwise every category on the site is crawled.
///
/// # Example
///
/// ```no_run
/// use catalog_scraper::config::Config;
/// use catalog_scraper::crawler::run_scrape;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_scrape(&Config::default(), None).await?;
/// println!("{} books exported", report.books_exported);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: &Config, category: Option<&str>) -> Result<RunReport> {
    let coordinator = Coordinator::new(config)?;
    match category {
        Some(url) => coordinator.run_category(url).await,
        None => coordinator.run_all().await,
    }
}

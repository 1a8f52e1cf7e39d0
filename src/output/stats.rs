//! Run statistics for progress reporting
//!
//! A `RunReport` accumulates per-category outcomes while the coordinator
//! works and is printed once the run is over.

use crate::crawler::Category;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// A category whose crawl or export failed
#[derive(Debug, Clone)]
pub struct FailedCategory {
    /// Index URL of the category
    pub url: String,

    /// Rendered error
    pub reason: String,
}

/// Summary of one scraper run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Written CSV files, in crawl order
    pub exports: Vec<PathBuf>,

    /// Categories that could not be crawled or exported
    pub failed: Vec<FailedCategory>,

    /// Listing pages visited across all exported categories
    pub pages_visited: usize,

    /// Rows written across all exports
    pub books_exported: usize,

    /// Books dropped because their detail page could not be extracted
    pub books_skipped: usize,

    /// Exported books whose cover image was not saved
    pub images_missing: usize,
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReport {
    /// Starts a report timestamped now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            exports: Vec::new(),
            failed: Vec::new(),
            pages_visited: 0,
            books_exported: 0,
            books_skipped: 0,
            images_missing: 0,
        }
    }

    /// Records an exported category
    pub fn record_export(&mut self, category: &Category, path: PathBuf) {
        self.pages_visited += category.page_urls.len();
        self.books_exported += category.books.len();
        self.books_skipped += category.skipped.len();
        self.images_missing += category.images_missing;
        self.exports.push(path);
    }

    /// Records a category that failed as a whole
    pub fn record_failure(&mut self, url: &str, reason: impl ToString) {
        self.failed.push(FailedCategory {
            url: url.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Returns true if every attempted category was exported
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &RunReport) {
    println!("=== Scrape Summary ===\n");

    println!("Overview:");
    println!("  Categories exported: {}", report.exports.len());
    println!("  Categories failed: {}", report.failed.len());
    println!("  Listing pages visited: {}", report.pages_visited);
    println!("  Books exported: {}", report.books_exported);
    println!("  Books skipped: {}", report.books_skipped);
    println!("  Images missing: {}", report.images_missing);
    if let Some(duration) = report.duration_seconds() {
        println!("  Duration: {}s", duration);
    }
    println!();

    if !report.failed.is_empty() {
        println!("Failed Categories ({}):", report.failed.len());
        for failure in &report.failed {
            println!("  - {}: {}", failure.url, failure.reason);
        }
        println!();
    }

    let attempted = report.exports.len() + report.failed.len();
    let success_rate = if attempted > 0 {
        (report.exports.len() as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} categories exported)",
        success_rate,
        report.exports.len(),
        attempted
    );
}

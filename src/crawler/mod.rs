//! Crawler module for catalogue traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `DocumentFetcher` capability
//! - Typed HTML queries over fetched pages
//! - Category pagination and listing traversal
//! - Overall run coordination

mod category;
mod coordinator;
mod document;
mod fetcher;
pub mod paginator;

pub use category::{
    book_links, category_links, category_name, Category, CategoryCrawler, SkippedBook,
};
pub use coordinator::{run_scrape, Coordinator};
pub use document::{Document, Element};
pub use fetcher::{build_http_client, fetch_document, DocumentFetcher, HttpFetcher};
pub use paginator::{paginate, PAGE_SIZE};

#[cfg(test)]
pub(crate) use fetcher::testing;

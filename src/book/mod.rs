//! Book records and their extraction from detail pages
//!
//! This module contains:
//! - The `Book` record exported to CSV
//! - Word-rating conversion
//! - Field extraction from a parsed detail page

mod extractor;
mod rating;

pub use extractor::{
    extract_book, extract_fields, sanitize_description, stock_count, ExtractedBook,
};
pub use rating::parse_rating;

#[cfg(test)]
pub(crate) use extractor::fixtures;

use crate::output::file_stem;
use serde::{Deserialize, Serialize};

/// One catalogue item, fully extracted
///
/// Field order is the CSV column order. Prices are kept exactly as scraped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "UPC")]
    pub upc: String,
    pub product_page_url: String,
    pub price_excluding_tax: String,
    pub price_including_tax: String,
    pub number_available: u32,
    pub title: String,
    pub review_rating: u8,
    pub category: String,
    pub product_description: String,
    pub image_url: String,
}

impl Book {
    /// File stem for the cover image: `{title}-{UPC}` with path separators
    /// turned into `-`
    pub fn image_stem(&self) -> String {
        format!("{}-{}", file_stem(&self.title), file_stem(&self.upc))
    }
}

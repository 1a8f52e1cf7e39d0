//! Category pagination
//!
//! A category index page reports its total item count; the remaining listing
//! pages follow the `page-{n}.html` naming, starting at 2.

use crate::crawler::document::Document;
use crate::{Result, ScrapeError};

/// Items shown per listing page
pub const PAGE_SIZE: usize = 20;

const INDEX_FILE: &str = "index.html";

/// Reads the "N results" counter of a category index page
pub fn total_items(document: &Document, url: &str) -> Result<usize> {
    let malformed = |reason: String| ScrapeError::MalformedListingPage {
        url: url.to_string(),
        reason,
    };

    let counter = document
        .find_first_by_class("form-horizontal")
        .and_then(|form| form.find_first_by_tag_within("strong"))
        .ok_or_else(|| malformed("result counter not found".to_string()))?;

    let text = counter.text();
    text.trim()
        .parse()
        .map_err(|_| malformed(format!("result counter '{}' is not a number", text.trim())))
}

/// Number of listing pages beyond the index page
///
/// Floor division, not ceiling: exactly 20 items still yields one extra
/// page, and 39 items yields only one.
pub fn additional_page_count(total_items: usize) -> usize {
    total_items / PAGE_SIZE
}

/// URL of listing page `n` (n >= 2) of the category at `index_url`
pub fn page_url(index_url: &str, n: usize) -> String {
    let page = format!("page-{}.html", n);
    match index_url.strip_suffix(INDEX_FILE) {
        Some(base) => format!("{}{}", base, page),
        None => format!("{}/{}", index_url.trim_end_matches('/'), page),
    }
}

/// All page URLs of a category: the index first, then `page-2` onwards
pub fn page_urls(index_url: &str, total_items: usize) -> Vec<String> {
    let additional = additional_page_count(total_items);
    std::iter::once(index_url.to_string())
        .chain((2..additional + 2).map(|n| page_url(index_url, n)))
        .collect()
}

/// Computes the page URLs of a category from its parsed index page
pub fn paginate(document: &Document, index_url: &str) -> Result<Vec<String>> {
    let total = total_items(document, index_url)?;
    Ok(page_urls(index_url, total))
}

//! Category crawling
//!
//! A category is crawled in three sequential passes:
//! 1. Fetch the index page for the display name and the page count
//! 2. Scan every listing page for book links, in page order
//! 3. Extract each book, skipping the ones whose detail page fails

use crate::book::{extract_book, Book};
use crate::crawler::document::Document;
use crate::crawler::fetcher::{fetch_document, DocumentFetcher};
use crate::crawler::paginator::paginate;
use crate::output::AssetWriter;
use crate::site::SiteLayout;
use crate::{Result, ScrapeError};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// A book that was dropped from its category's export
#[derive(Debug, Clone)]
pub struct SkippedBook {
    /// Detail page URL
    pub url: String,

    /// Rendered error
    pub reason: String,
}

/// One listing group and everything extracted from it
///
/// Each instance owns its own page and book lists; nothing is shared
/// between categories.
#[derive(Debug, Clone, Default)]
pub struct Category {
    /// Display name, from the index page heading
    pub name: String,

    /// Index page URL
    pub url: String,

    /// Index page followed by `page-2.html` onwards
    pub page_urls: Vec<String>,

    /// Extracted books in listing order
    pub books: Vec<Book>,

    /// Books whose extraction failed
    pub skipped: Vec<SkippedBook>,

    /// Books exported without a saved cover image
    pub images_missing: usize,
}

impl Category {
    /// Creates an unloaded category for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Reads the category heading of an index page
pub fn category_name(document: &Document, url: &str) -> Result<String> {
    document
        .find_first_by_class("page-header action")
        .and_then(|header| header.find_first_by_tag_within("h1"))
        .map(|h1| h1.text().trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ScrapeError::MalformedListingPage {
            url: url.to_string(),
            reason: "category heading not found".to_string(),
        })
}

/// Absolute detail URLs of the books listed on one page, in page order
///
/// Book links are anchors whose href contains "index" and that carry a
/// title attribute; the cover-image anchors and navigation links have none.
pub fn book_links(document: &Document, site: &SiteLayout) -> Vec<String> {
    document
        .find_all_by_attribute_pattern("href", "index", "title")
        .into_iter()
        .filter_map(|anchor| anchor.attr("href"))
        .map(|href| site.catalogue_url(href.trim()))
        .collect()
}

/// Category index URLs from the side navigation of the site root
pub fn category_links(document: &Document, site: &SiteLayout) -> Result<Vec<String>> {
    let list = document
        .find_first_by_class("nav nav-list")
        .and_then(|nav| nav.find_first_by_tag_within("ul"))
        .ok_or_else(|| ScrapeError::MalformedListingPage {
            url: site.base_url().to_string(),
            reason: "category navigation not found".to_string(),
        })?;

    list.find_all_by_tag_within("a")
        .into_iter()
        .filter_map(|anchor| anchor.attr("href"))
        .map(|href| site.category_url(href))
        .collect()
}

/// Crawls categories with one fetcher, one site layout and one image sink
pub struct CategoryCrawler<'a, F: ?Sized> {
    fetcher: &'a F,
    site: &'a SiteLayout,
    assets: &'a AssetWriter,
}

impl<'a, F> CategoryCrawler<'a, F>
where
    F: DocumentFetcher + ?Sized,
{
    pub fn new(fetcher: &'a F, site: &'a SiteLayout, assets: &'a AssetWriter) -> Self {
        Self {
            fetcher,
            site,
            assets,
        }
    }

    /// Lists every category index URL linked from the site root
    pub async fn discover_categories(&self) -> Result<Vec<String>> {
        let urls = {
            let document = fetch_document(self.fetcher, self.site.base_url()).await?;
            category_links(&document, self.site)?
        };
        info!("{} categories listed", urls.len());
        Ok(urls)
    }

    /// Crawls one category from its index URL
    ///
    /// A failure on the index page or any listing page aborts the category.
    /// A failure on a single book only drops that book.
    pub async fn crawl(&self, url: &str) -> Result<Category> {
        let mut category = Category::new(url);

        let (name, page_urls, index_links) = {
            let document = fetch_document(self.fetcher, url).await?;
            (
                category_name(&document, url)?,
                paginate(&document, url)?,
                book_links(&document, self.site),
            )
        };
        category.name = name;
        category.page_urls = page_urls;
        info!(
            "{} pages to be extracted in {} (including index)",
            category.page_urls.len(),
            category.name
        );

        // Index links come from the document parsed above
        let mut book_urls = index_links;
        let remaining_pages = category.page_urls.get(1..).unwrap_or_default();
        book_urls.extend(self.collect_book_urls(remaining_pages).await?);
        info!("{} book(s) found in {}", book_urls.len(), category.name);

        // UPC -> detail URL of the row already exported
        let mut exported: HashMap<String, String> = HashMap::new();

        for book_url in &book_urls {
            match extract_book(self.fetcher, book_url, self.site, self.assets).await {
                Ok(extracted) => {
                    if let Some(first_url) = exported.get(&extracted.book.upc) {
                        warn!(
                            "Skipping book {}: UPC {} already exported from {}",
                            book_url, extracted.book.upc, first_url
                        );
                        continue;
                    }
                    exported.insert(extracted.book.upc.clone(), book_url.clone());

                    if extracted.image_path.is_none() {
                        category.images_missing += 1;
                    }
                    category.books.push(extracted.book);
                }
                Err(e) => {
                    warn!("Skipping book {}: {}", book_url, e);
                    category.skipped.push(SkippedBook {
                        url: book_url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "{} book(s) extracted in {} ({} skipped)",
            category.books.len(),
            category.name,
            category.skipped.len()
        );

        Ok(category)
    }

    /// Fetches listing pages in order and concatenates their book links
    async fn collect_book_urls(&self, page_urls: &[String]) -> Result<Vec<String>> {
        let mut book_urls = Vec::new();
        for page_url in page_urls {
            let links = {
                let document = fetch_document(self.fetcher, page_url).await?;
                book_links(&document, self.site)
            };
            debug!("{} book links on {}", links.len(), page_url);
            book_urls.extend(links);
        }
        Ok(book_urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::fixtures::detail_page;
    use crate::crawler::testing::StaticFetcher;

    const ROOT: &str = "http://books.toscrape.com/";
    const INDEX: &str = "http://books.toscrape.com/catalogue/category/books/poetry_23/index.html";
    const PAGE_2: &str = "http://books.toscrape.com/catalogue/category/books/poetry_23/page-2.html";

    fn site() -> SiteLayout {
        SiteLayout::new(ROOT).unwrap()
    }

    fn listing_page(name: &str, total: usize, slugs: &[&str]) -> String {
        let items: String = slugs
            .iter()
            .map(|slug| {
                format!(
                    r#"<li><article class="product_pod">
                        <a href="../../../{slug}/index.html"><img src="x.jpg" alt="{slug}"></a>
                        <h3><a href="../../../{slug}/index.html" title="{slug}">{slug}</a></h3>
                    </article></li>"#,
                    slug = slug
                )
            })
            .collect();

        format!(
            r#"<html><body>
            <ul class="nav nav-list"><li><a href="../books_1/index.html">Books</a></li></ul>
            <div class="page-header action"><h1>{name}</h1></div>
            <form method="get" class="form-horizontal"><strong>{total}</strong> results</form>
            <ol class="row">{items}</ol>
            </body></html>"#,
            name = name,
            total = total,
            items = items
        )
    }

    fn detail_url(slug: &str) -> String {
        format!("http://books.toscrape.com/catalogue/{}/index.html", slug)
    }

    /// Detail page with its own UPC, so several books can share a category
    fn book_page(title: &str, stock: u32, upc: &str) -> String {
        detail_page(title, &format!("In stock ({} available)", stock), "One", None)
            .replace("a897fe39b1053632", upc)
    }

    #[test]
    fn test_book_links_in_page_order() {
        let doc = Document::parse(&listing_page("Poetry", 2, &["b_2", "a_1"]));
        assert_eq!(book_links(&doc, &site()), vec![detail_url("b_2"), detail_url("a_1")]);
    }

    #[test]
    fn test_category_name_missing_heading() {
        let doc = Document::parse("<html><body></body></html>");
        assert!(matches!(
            category_name(&doc, INDEX),
            Err(ScrapeError::MalformedListingPage { .. })
        ));
    }

    #[test]
    fn test_category_links_from_nav() {
        let doc = Document::parse(
            r#"<html><body><div class="side_categories"><ul class="nav nav-list"><li>
                <a href="catalogue/category/books_1/index.html">Books</a>
                <ul>
                    <li><a href="catalogue/category/books/travel_2/index.html">Travel</a></li>
                    <li><a href="catalogue/category/books/mystery_3/index.html">Mystery</a></li>
                </ul>
            </li></ul></div></body></html>"#,
        );

        assert_eq!(
            category_links(&doc, &site()).unwrap(),
            vec![
                "http://books.toscrape.com/catalogue/category/books/travel_2/index.html",
                "http://books.toscrape.com/catalogue/category/books/mystery_3/index.html",
            ]
        );
    }

    #[test]
    fn test_categories_are_independent() {
        let mut first = Category::new(INDEX);
        first.page_urls.push(INDEX.to_string());
        let second = Category::new(PAGE_2);

        assert_eq!(first.page_urls.len(), 1);
        assert!(second.page_urls.is_empty());
        assert!(second.books.is_empty());
    }

    #[tokio::test]
    async fn test_crawl_two_pages_skips_broken_book() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetWriter::new(dir.path());
        let layout = site();

        let fetcher = StaticFetcher::default()
            .with_page(INDEX, listing_page("Poetry", 21, &["one_1", "two_2"]))
            .with_page(PAGE_2, listing_page("Poetry", 21, &["three_3"]))
            .with_page(
                &detail_url("one_1"),
                detail_page("One", "In stock (1 available)", "One", None),
            )
            .with_page(&detail_url("two_2"), "<html><body>gone</body></html>")
            .with_page(&detail_url("three_3"), book_page("Three", 3, "upc-three"));

        let crawler = CategoryCrawler::new(&fetcher, &layout, &assets);
        let category = crawler.crawl(INDEX).await.unwrap();

        assert_eq!(category.name, "Poetry");
        assert_eq!(category.page_urls, vec![INDEX.to_string(), PAGE_2.to_string()]);
        let titles: Vec<_> = category.books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Three"]);
        assert_eq!(category.skipped.len(), 1);
        assert_eq!(category.skipped[0].url, detail_url("two_2"));
        // No image assets were served
        assert_eq!(category.images_missing, 2);
    }

    #[tokio::test]
    async fn test_crawl_aborts_when_listing_page_fails() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetWriter::new(dir.path());
        let layout = site();

        let fetcher = StaticFetcher::default()
            .with_page(INDEX, listing_page("Poetry", 45, &["one_1"]))
            .with_page(PAGE_2, listing_page("Poetry", 45, &["two_2"]));

        let crawler = CategoryCrawler::new(&fetcher, &layout, &assets);
        let result = crawler.crawl(INDEX).await;

        assert!(matches!(result, Err(ScrapeError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_index_page_fetched_once() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetWriter::new(dir.path());
        let layout = site();

        let fetcher = StaticFetcher::default()
            .with_page(INDEX, listing_page("Poetry", 21, &["one_1"]))
            .with_page(PAGE_2, listing_page("Poetry", 21, &["two_2"]))
            .with_page(
                &detail_url("one_1"),
                detail_page("One", "In stock (1 available)", "One", None),
            )
            .with_page(&detail_url("two_2"), book_page("Two", 2, "upc-two"));

        let crawler = CategoryCrawler::new(&fetcher, &layout, &assets);
        let category = crawler.crawl(INDEX).await.unwrap();

        assert_eq!(category.books.len(), 2);
        assert_eq!(fetcher.request_count(INDEX), 1);
        assert_eq!(fetcher.request_count(PAGE_2), 1);
    }

    #[tokio::test]
    async fn test_repeated_book_link_exported_once() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetWriter::new(dir.path());
        let layout = site();

        let fetcher = StaticFetcher::default()
            .with_page(INDEX, listing_page("Poetry", 2, &["one_1", "one_1"]))
            .with_page(
                &detail_url("one_1"),
                detail_page("One", "In stock (1 available)", "One", None),
            );

        let crawler = CategoryCrawler::new(&fetcher, &layout, &assets);
        let category = crawler.crawl(INDEX).await.unwrap();

        assert_eq!(category.books.len(), 1);
        assert_eq!(category.books[0].upc, "a897fe39b1053632");
        assert!(category.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_discover_categories() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetWriter::new(dir.path());
        let layout = site();
        let fetcher = StaticFetcher::default().with_page(
            ROOT,
            r#"<html><body><ul class="nav nav-list"><li><a href="catalogue/category/books_1/index.html">Books</a>
                <ul><li><a href="catalogue/category/books/poetry_23/index.html">Poetry</a></li></ul>
            </li></ul></body></html>"#,
        );

        let crawler = CategoryCrawler::new(&fetcher, &layout, &assets);
        assert_eq!(crawler.discover_categories().await.unwrap(), vec![INDEX.to_string()]);
    }
}

//! Field extraction from book detail pages
//!
//! The product information table is positional: each field lives at a fixed
//! `<td>` index. Every positional lookup goes through one accessor on
//! `ProductTable`, so a markup change touches one place.

use crate::book::{parse_rating, Book};
use crate::crawler::{fetch_document, Document, DocumentFetcher, Element};
use crate::output::AssetWriter;
use crate::site::SiteLayout;
use crate::{Result, ScrapeError};
use std::path::PathBuf;
use tracing::{debug, warn};

const UPC_ROW: usize = 0;
const PRICE_EXCLUDING_TAX_ROW: usize = 2;
const PRICE_INCLUDING_TAX_ROW: usize = 3;
const AVAILABILITY_ROW: usize = 5;

/// Breadcrumb position of the category link (Home > Books > Category)
const CATEGORY_CRUMB: usize = 2;

/// A book together with where its cover image landed
#[derive(Debug, Clone)]
pub struct ExtractedBook {
    pub book: Book,

    /// `None` when the image download failed
    pub image_path: Option<PathBuf>,
}

/// Cells of the product information table
struct ProductTable<'a> {
    cells: Vec<Element<'a>>,
}

impl<'a> ProductTable<'a> {
    fn locate(document: &'a Document) -> Option<Self> {
        let table = document.find_first_by_class("table table-striped")?;
        Some(Self {
            cells: table.find_all_by_tag_within("td"),
        })
    }

    fn cell(&self, row: usize, field: &str) -> std::result::Result<String, String> {
        self.cells
            .get(row)
            .map(|cell| cell.text().trim().to_string())
            .ok_or_else(|| format!("product table has no row {} ({})", row, field))
    }

    fn upc(&self) -> std::result::Result<String, String> {
        self.cell(UPC_ROW, "UPC")
    }

    fn price_excluding_tax(&self) -> std::result::Result<String, String> {
        self.cell(PRICE_EXCLUDING_TAX_ROW, "price excluding tax")
    }

    fn price_including_tax(&self) -> std::result::Result<String, String> {
        self.cell(PRICE_INCLUDING_TAX_ROW, "price including tax")
    }

    fn availability(&self) -> std::result::Result<String, String> {
        self.cell(AVAILABILITY_ROW, "availability")
    }
}

/// Concatenates the digits of an availability text into a stock count
///
/// "In stock (22 available)" gives 22; text without digits gives 0.
/// Returns `None` if the digits overflow.
pub fn stock_count(availability: &str) -> Option<u32> {
    let digits: String = availability.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse().ok()
}

/// Replaces semicolons with periods so descriptions never collide with a
/// semicolon-delimited spreadsheet import
pub fn sanitize_description(text: &str) -> String {
    text.replace(';', ".")
}

/// Builds a `Book` from a parsed detail page
///
/// Missing required markup fails the whole book with `MalformedDetailPage`;
/// no partially filled record is ever returned.
pub fn extract_fields(document: &Document, url: &str, site: &SiteLayout) -> Result<Book> {
    let malformed = |reason: String| ScrapeError::MalformedDetailPage {
        url: url.to_string(),
        reason,
    };

    let table = ProductTable::locate(document)
        .ok_or_else(|| malformed("product information table not found".to_string()))?;

    let upc = table.upc().map_err(malformed)?;
    let price_excluding_tax = table.price_excluding_tax().map_err(malformed)?;
    let price_including_tax = table.price_including_tax().map_err(malformed)?;
    let availability = table.availability().map_err(malformed)?;
    let number_available = stock_count(&availability)
        .ok_or_else(|| malformed(format!("unreadable stock count '{}'", availability)))?;

    let title = document
        .find_first_by_class("col-sm-6 product_main")
        .and_then(|main| main.find_first_by_tag_within("h1"))
        .map(|h1| h1.text().trim().to_string())
        .ok_or_else(|| malformed("product title not found".to_string()))?;

    // <p class="star-rating Three">: the second class is the word rating
    let rating_word = document
        .find_first_by_class_pattern("p", "star-rating")
        .and_then(|element| element.class_tokens().get(1).map(|t| t.to_lowercase()))
        .ok_or_else(|| malformed("rating indicator not found".to_string()))?;
    let review_rating = parse_rating(&rating_word)?;

    let category = document
        .find_first_by_class("breadcrumb")
        .map(|crumbs| crumbs.find_all_by_tag_within("a"))
        .and_then(|links| links.get(CATEGORY_CRUMB).map(|link| link.text().trim().to_string()))
        .ok_or_else(|| malformed("breadcrumb category link not found".to_string()))?;

    let product_description = document
        .find_first_unclassed("p")
        .map(|p| sanitize_description(p.text().trim()))
        .unwrap_or_default();

    let image = document
        .find_first_by_attribute_value("alt", &title)
        .ok_or_else(|| malformed(format!("no image with alt text '{}'", title)))?;
    let image_url = site.media_url(image.attr("src").unwrap_or_default().trim());
    if image_url.is_empty() {
        warn!("Empty image URL for '{}' in {}", title, category);
        return Err(ScrapeError::UnresolvedImage { title, category });
    }

    Ok(Book {
        upc,
        product_page_url: url.to_string(),
        price_excluding_tax,
        price_including_tax,
        number_available,
        title,
        review_rating,
        category,
        product_description,
        image_url,
    })
}

/// Fetches a detail page, extracts its book and downloads the cover image
///
/// The image is saved before the record is handed back. A failed download
/// only leaves `image_path` empty; the book itself is still returned.
pub async fn extract_book<F>(
    fetcher: &F,
    url: &str,
    site: &SiteLayout,
    assets: &AssetWriter,
) -> Result<ExtractedBook>
where
    F: DocumentFetcher + ?Sized,
{
    let book = {
        let document = fetch_document(fetcher, url).await?;
        extract_fields(&document, url, site)?
    };
    debug!("Extracted '{}' ({})", book.title, book.upc);

    let image_path = assets
        .save(fetcher, &book.image_url, &book.image_stem())
        .await;

    Ok(ExtractedBook { book, image_path })
}


#[cfg(test)]
mod tests {
    use super::fixtures::detail_page;
    use super::*;
    use crate::crawler::testing::StaticFetcher;

    const URL: &str = "http://books.toscrape.com/catalogue/a-light-in-the-attic_1000/index.html";
    const IMAGE: &str =
        "http://books.toscrape.com/media/cache/fe/72/fe72f0532301ec28892ae79a629a293c.jpg";

    fn site() -> SiteLayout {
        SiteLayout::new("http://books.toscrape.com/").unwrap()
    }

    fn extract(html: &str) -> Result<Book> {
        extract_fields(&Document::parse(html), URL, &site())
    }

    #[test]
    fn test_extract_well_formed_page() {
        let html = detail_page(
            "A Light in the Attic",
            "In stock (22 available)",
            "Three",
            Some("It's hard to imagine a world without A Light in the Attic."),
        );
        let book = extract(&html).unwrap();

        assert_eq!(book.upc, "a897fe39b1053632");
        assert_eq!(book.product_page_url, URL);
        assert_eq!(book.price_excluding_tax, "£51.77");
        assert_eq!(book.price_including_tax, "£51.77");
        assert_eq!(book.number_available, 22);
        assert_eq!(book.title, "A Light in the Attic");
        assert_eq!(book.review_rating, 3);
        assert_eq!(book.category, "Poetry");
        assert_eq!(
            book.product_description,
            "It's hard to imagine a world without A Light in the Attic."
        );
        assert_eq!(book.image_url, IMAGE);
    }

    #[test]
    fn test_description_semicolons_become_periods() {
        let html = detail_page("T", "In stock (1 available)", "One", Some("Great; buy it; now"));
        assert_eq!(extract(&html).unwrap().product_description, "Great. buy it. now");
    }

    #[test]
    fn test_missing_description_is_empty() {
        let html = detail_page("T", "In stock (1 available)", "Five", None);
        let book = extract(&html).unwrap();
        assert_eq!(book.product_description, "");
        assert_eq!(book.review_rating, 5);
    }

    #[test]
    fn test_unknown_rating_word() {
        let html = detail_page("T", "In stock (1 available)", "Eleven", None);
        assert!(matches!(extract(&html), Err(ScrapeError::UnrecognizedRating(_))));
    }

    #[test]
    fn test_missing_table_is_malformed() {
        let html = detail_page("T", "In stock (1 available)", "One", None)
            .replace("table table-striped", "table");
        assert!(matches!(extract(&html), Err(ScrapeError::MalformedDetailPage { .. })));
    }

    #[test]
    fn test_missing_breadcrumb_link_is_malformed() {
        let html = detail_page("T", "In stock (1 available)", "One", None).replace(
            r#"<li><a href="../category/books/poetry_23/index.html">Poetry</a></li>"#,
            "",
        );
        assert!(matches!(extract(&html), Err(ScrapeError::MalformedDetailPage { .. })));
    }

    #[test]
    fn test_missing_rating_is_malformed() {
        let html = detail_page("T", "In stock (1 available)", "One", None)
            .replace("star-rating One", "stars");
        assert!(matches!(extract(&html), Err(ScrapeError::MalformedDetailPage { .. })));
    }

    #[test]
    fn test_empty_image_src_abandons_book() {
        let html = detail_page("T", "In stock (1 available)", "One", None).replace(
            "../../media/cache/fe/72/fe72f0532301ec28892ae79a629a293c.jpg",
            "",
        );
        match extract(&html) {
            Err(ScrapeError::UnresolvedImage { title, category }) => {
                assert_eq!(title, "T");
                assert_eq!(category, "Poetry");
            }
            other => panic!("expected UnresolvedImage, got {:?}", other),
        }
    }

    #[test]
    fn test_stock_count() {
        assert_eq!(stock_count("In stock (22 available)"), Some(22));
        assert_eq!(stock_count("In stock (1 available)"), Some(1));
        assert_eq!(stock_count("Out of stock"), Some(0));
        assert_eq!(stock_count("99999999999999999999"), None);
    }

    #[tokio::test]
    async fn test_extract_book_saves_image() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetWriter::new(dir.path());
        let html = detail_page("Sharp / Objects", "In stock (20 available)", "Four", None);
        let fetcher = StaticFetcher::default()
            .with_page(URL, html)
            .with_asset(IMAGE, b"\xff\xd8\xff");

        let extracted = extract_book(&fetcher, URL, &site(), &assets).await.unwrap();

        let path = extracted.image_path.unwrap();
        assert_eq!(path, dir.path().join("Sharp - Objects-a897fe39b1053632.jpg"));
        assert_eq!(std::fs::read(path).unwrap(), b"\xff\xd8\xff");
    }

    #[tokio::test]
    async fn test_extract_book_survives_image_failure() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetWriter::new(dir.path());
        let html = detail_page("T", "In stock (3 available)", "Two", None);
        let fetcher = StaticFetcher::default().with_page(URL, html);

        let extracted = extract_book(&fetcher, URL, &site(), &assets).await.unwrap();

        assert!(extracted.image_path.is_none());
        assert_eq!(extracted.book.number_available, 3);
    }
}

//! Per-category CSV export
//!
//! Files are UTF-8 with a byte-order mark so spreadsheet tools pick the right
//! encoding. Fields containing a comma, a quote or a line break are quoted,
//! with embedded quotes doubled.

use crate::book::Book;
use crate::output::file_stem;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// UTF-8 byte-order mark
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column order of every export
pub const HEADERS: [&str; 10] = [
    "UPC",
    "product_page_url",
    "price_excluding_tax",
    "price_including_tax",
    "number_available",
    "title",
    "review_rating",
    "category",
    "product_description",
    "image_url",
];

/// Writes one `{name}.csv` per category into a directory
#[derive(Debug, Clone)]
pub struct TableWriter {
    dir: PathBuf,
}

impl TableWriter {
    /// Creates a writer targeting `dir` (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory exports are written into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the export for `name` is written to, always directly inside `dir`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", file_stem(name)))
    }

    /// Writes `books` in order, replacing any previous export of the same name
    ///
    /// The header row is written even when `books` is empty.
    pub fn write(&self, name: &str, books: &[Book]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name);

        let mut file = BufWriter::new(File::create(&path)?);
        file.write_all(BOM)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(HEADERS)?;
        for book in books {
            writer.serialize(book)?;
        }
        writer.flush()?;

        Ok(path)
    }
}

/// Reads an export back into books, skipping the byte-order mark
pub fn read_table(path: &Path) -> Result<Vec<Book>> {
    let content = std::fs::read(path)?;
    let body = content.strip_prefix(BOM).unwrap_or(content.as_slice());

    let mut reader = csv::Reader::from_reader(body);
    let books = reader
        .deserialize::<Book>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(books)
}

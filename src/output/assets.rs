//! Cover image persistence
//!
//! Images are best-effort: a failed download or write is logged and
//! swallowed here, so the book record it belongs to is still exported.

use crate::crawler::DocumentFetcher;
use crate::{Result, ScrapeError};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Writes downloaded images as `{stem}.jpg` into one directory
#[derive(Debug, Clone)]
pub struct AssetWriter {
    dir: PathBuf,
}

impl AssetWriter {
    /// Creates a writer targeting `dir` (created on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory images are written into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an image with the given stem is written to
    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}.jpg", stem))
    }

    /// Downloads `url` and stores it under `stem`
    ///
    /// Returns the written path, or `None` after logging a warning if the
    /// fetch or the write failed.
    pub async fn save<F>(&self, fetcher: &F, url: &str, stem: &str) -> Option<PathBuf>
    where
        F: DocumentFetcher + ?Sized,
    {
        match self.try_save(fetcher, url, stem).await {
            Ok(path) => {
                trace!("Saved image {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Image for '{}' not saved: {}", stem, e);
                None
            }
        }
    }

    async fn try_save<F>(&self, fetcher: &F, url: &str, stem: &str) -> Result<PathBuf>
    where
        F: DocumentFetcher + ?Sized,
    {
        let bytes = fetcher
            .fetch_bytes(url)
            .await
            .map_err(|e| ScrapeError::AssetWrite {
                target: url.to_string(),
                message: e.to_string(),
            })?;

        let path = self.path_for(stem);
        std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(&path, &bytes))
            .map_err(|e| ScrapeError::AssetWrite {
                target: path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(path)
    }
}

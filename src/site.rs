//! Site layout for the target catalogue
//!
//! Listing and detail pages link to each other with relative paths
//! (`../../../slug/index.html`, `../../media/...`). This module rewrites those
//! into absolute URLs against an explicit base, so the crawler can be pointed
//! at a mirror or a local test server.

use crate::config::SiteConfig;
use crate::{Result, ScrapeError};
use url::Url;

/// Relative prefix used by listing pages to reach the catalogue root
const CATALOGUE_PREFIX: &str = "../../..";

/// Relative prefix used by detail pages to reach the site root
const MEDIA_PREFIX: &str = "../../";

/// Absolute URL roots of a catalogue site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    base: Url,
}

impl SiteLayout {
    /// Creates a layout rooted at `base_url`
    ///
    /// A missing trailing slash is added so joins stay under the root path.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    /// Creates a layout from the `[site]` configuration section
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::new(&config.base_url)
    }

    /// The site root, always ending in `/`
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Root under which book detail pages live
    pub fn catalogue_root(&self) -> String {
        format!("{}catalogue", self.base.as_str())
    }

    /// Rewrites a listing-page book href into an absolute detail URL
    pub fn catalogue_url(&self, href: &str) -> String {
        href.replace(CATALOGUE_PREFIX, &self.catalogue_root())
    }

    /// Rewrites a detail-page image src into an absolute media URL
    pub fn media_url(&self, src: &str) -> String {
        src.replace(MEDIA_PREFIX, self.base.as_str())
    }

    /// Resolves a navigation href (relative to the site root) into a category URL
    pub fn category_url(&self, href: &str) -> Result<String> {
        self.base
            .join(href.trim())
            .map(|url| url.to_string())
            .map_err(ScrapeError::from)
    }
}

//! HTTP fetcher implementation
//!
//! This module provides the document-fetch capability used by the crawler:
//! - The `DocumentFetcher` trait (text pages and binary assets)
//! - `HttpFetcher`, its reqwest-backed implementation
//! - Building HTTP clients with a proper user agent string
//! - Error classification into transport failures

use crate::config::{HttpConfig, UserAgentConfig};
use crate::crawler::document::Document;
use crate::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Capability to retrieve pages and assets by URL
///
/// Any non-success status or transport error is reported as
/// `ScrapeError::Transport`; callers treat it as "page unavailable",
/// never as empty content.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetches a page body as text
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// Fetches a binary resource
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches and parses a page in one step
pub async fn fetch_document<F>(fetcher: &F, url: &str) -> Result<Document>
where
    F: DocumentFetcher + ?Sized,
{
    let body = fetcher.fetch_text(url).await?;
    Ok(Document::parse(&body))
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `http` - Timeouts applied to every request
///
/// # Example
///
/// ```no_run
/// use catalog_scraper::config::{HttpConfig, UserAgentConfig};
/// use catalog_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    http: &HttpConfig,
) -> std::result::Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        user_agent.crawler_name,
        user_agent.crawler_version,
        user_agent.contact_url,
        user_agent.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(http.timeout_secs))
        .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`DocumentFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from configuration
    pub fn from_config(user_agent: &UserAgentConfig, http: &HttpConfig) -> Result<Self> {
        Ok(Self::new(build_http_client(user_agent, http)?))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Transport {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        tracing::trace!("GET {}", url);
        let response = self.get(url).await?;
        response.text().await.map_err(|e| transport_error(url, &e))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::trace!("GET {} (binary)", url);
        let response = self.get(url).await?;
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| transport_error(url, &e))
    }
}

/// Classifies a reqwest error into a transport failure
fn transport_error(url: &str, error: &reqwest::Error) -> ScrapeError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    };

    ScrapeError::Transport {
        url: url.to_string(),
        message,
    }
}

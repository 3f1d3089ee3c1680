//! Content fetcher seam.
//!
//! The analyze workflow sees page scraping as a single call that either
//! yields non-empty text or fails with `Error::Fetch`.

use async_trait::async_trait;
use salescope_core::Error;

use crate::extract::html_to_text;
use crate::fetch::{FetchClient, FetchConfig};

/// Retrieves a page and reduces it to bounded plain text.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch `url` and return its visible text. Empty content is a failure.
    async fn fetch_text(&self, url: &str) -> Result<String, Error>;
}

/// Production fetcher: HTTP GET + HTML-to-text reduction.
pub struct PageScraper {
    client: FetchClient,
    max_text_chars: usize,
}

impl PageScraper {
    pub fn new(config: FetchConfig, max_text_chars: usize) -> Result<Self, Error> {
        Ok(Self { client: FetchClient::new(config)?, max_text_chars })
    }
}

#[async_trait]
impl ContentFetcher for PageScraper {
    async fn fetch_text(&self, url: &str) -> Result<String, Error> {
        let html = self.client.fetch(url).await?;
        let text = html_to_text(&html, self.max_text_chars);

        if text.trim().is_empty() {
            return Err(Error::Fetch(url.to_string()));
        }

        Ok(text)
    }
}

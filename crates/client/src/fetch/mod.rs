//! HTTP page fetching.
//!
//! Bounded, single-shot GET of a page body:
//! - Explicit request timeout and redirect cap
//! - Max body bytes enforced both from Content-Length and the read body
//! - No retries; failures surface as `Error::Fetch` naming the URL

use reqwest::{Client, header};
use std::time::{Duration, Instant};

use salescope_core::Error;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "salescope/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 15s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "salescope/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(15_000),
            max_redirects: 5,
        }
    }
}

/// HTTP fetch client with size and time bounds.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::InvalidInput(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL and return the response body as a string.
    pub async fn fetch(&self, url: &str) -> Result<String, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url)
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("{url}: status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::Fetch(format!(
                "{url}: {len} bytes exceeds {}",
                self.config.max_bytes
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Fetch(format!("{url}: failed to read response: {e}")))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::Fetch(format!(
                "{url}: {} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        tracing::debug!(
            "fetched {} in {}ms ({} bytes)",
            url,
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(String::from_utf8_lossy(&bytes).to_string())
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "salescope/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(15_000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_client_new() {
        let client = FetchClient::new(FetchConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_bad_user_agent_is_a_config_error_not_a_fetch_error() {
        let config = FetchConfig { user_agent: "bad\nagent".into(), ..Default::default() };
        let result = FetchClient::new(config);
        assert!(matches!(result, Err(Error::InvalidInput(msg)) if msg.contains("HTTP client")));
    }
}

// Resource fetching for data_url requests
//
// The router only needs "give me the bytes behind this URL". HttpFetcher
// is the reqwest-backed implementation used by the binary; tests and
// embedders can supply their own.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Download bound used when none is configured
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Byte-fetch-by-URL capability
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches resources over HTTP(S)
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("model-router/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch URL: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP error {}: {}", status, url);
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body: {}", url))?;
        Ok(bytes.to_vec())
    }
}

/// Fetcher that refuses every URL, for routers that must not reach out
pub struct NoFetch;

#[async_trait]
impl ResourceFetcher for NoFetch {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        bail!("resource fetching is disabled (url: {})", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_fetch_returns_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sample.bin")
            .with_status(200)
            .with_body(vec![0u8, 1, 2, 255])
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let bytes = fetcher
            .fetch(&format!("{}/sample.bin", server.url()))
            .await
            .unwrap();

        assert_eq!(bytes, vec![0u8, 1, 2, 255]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_fetch_rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.fetch(&format!("{}/missing", server.url())).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_no_fetch_always_fails() {
        assert!(NoFetch.fetch("http://example.com/x").await.is_err());
    }
}

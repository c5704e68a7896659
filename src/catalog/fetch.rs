//! Binary object fetch for audio payloads and cover images.
//!
//! A plain GET that returns the body verbatim. Any non-2xx status is a hard
//! failure for that object; there are no retries.

use crate::config::ClientConfig;
use crate::error::Result;

/// Why a binary fetch failed
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),
}

/// HTTP implementation of [`super::traits::MediaFetcher`]
pub struct HttpFetcher {
    http_client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher sharing the TLS and user agent settings of `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http_client: config.http_client()?,
        })
    }

    /// GET `url` and return the body bytes.
    pub async fn get_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
            .to_vec();

        tracing::debug!("Fetched {} bytes from {}", data.len(), url);
        Ok(data)
    }
}

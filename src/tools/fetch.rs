//! Raw HTML retrieval
//!
//! One GET per call, no retries. Every failure comes back as a [`FetchError`]
//! whose `Display` is meant to be read by an agent, not a developer.

use crate::types::{AppError, Result};
use crate::utils::toml_config::FetchConfig;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Why a fetch did not produce a body.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("request error: {0}")]
    Request(String),
}

/// HTTP client preconfigured with browser-like headers and a fixed timeout.
#[derive(Clone)]
pub struct ContentFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl ContentFetcher {
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| AppError::Config(format!("Invalid fetch.user_agent: {}", e)))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept)
                .map_err(|e| AppError::Config(format!("Invalid fetch.accept: {}", e)))?,
        );

        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and return the response body as text.
    pub async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        debug!(url, "Fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "Fetch returned non-success status");
            return Err(FetchError::Status(status));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout.as_secs())
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        info!(url, bytes = body.len(), "Fetched page");
        Ok(body)
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> FetchError {
        warn!(url, error = %err, "Fetch failed");
        if err.is_timeout() {
            FetchError::Timeout(self.timeout.as_secs())
        } else if err.is_connect() {
            FetchError::Connect(err.to_string())
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let fetcher = ContentFetcher::from_config(&FetchConfig::default()).unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_header_rejected() {
        let config = FetchConfig {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ContentFetcher::from_config(&config),
            Err(AppError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_url_is_error_not_panic() {
        let fetcher = ContentFetcher::from_config(&FetchConfig::default()).unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(FetchError::Request(_))));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(FetchError::Timeout(15).to_string(), "request timed out after 15s");
        assert_eq!(
            FetchError::Status(reqwest::StatusCode::NOT_FOUND).to_string(),
            "HTTP 404 Not Found"
        );
    }
}

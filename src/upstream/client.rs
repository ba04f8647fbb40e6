//! Upstream HTTP client.

use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::config::UpstreamConfig;
use crate::observability::metrics;

/// What the relay learned from one upstream fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub url: String,
    pub content_type: String,
    pub http_code: u16,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("upstream request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed to read upstream body: {0}")]
    Body(#[source] reqwest::Error),
}

impl FetchError {
    fn from_send(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e)
        } else {
            FetchError::Request(e)
        }
    }

    fn from_body(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e)
        } else {
            FetchError::Body(e)
        }
    }
}

/// Shared client for outbound fetches. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// GET `url` and collect status, content type and body text.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let start = Instant::now();
        let result = self.fetch_inner(url).await;
        metrics::record_upstream(start);
        result
    }

    async fn fetch_inner(&self, url: &str) -> Result<FetchResult, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_send)?;

        let http_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = response.text().await.map_err(FetchError::from_body)?;

        Ok(FetchResult {
            url: url.to_string(),
            content_type,
            http_code,
            body,
        })
    }
}

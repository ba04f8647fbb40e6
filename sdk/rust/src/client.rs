use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Upstream status block of a relay answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchStatus {
    pub url: String,
    pub content_type: String,
    pub http_code: u16,
}

/// Decoded JSON body of a successful `/get` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub contents: String,
    pub status: FetchStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The relay itself refused or failed the request.
    #[error("relay returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("malformed relay payload: {0}")]
    Decode(#[from] serde_json::Error),
}

pub struct RelayClient {
    client: Client,
    relay_url: String,
    origin: Option<String>,
}

impl RelayClient {
    pub fn new(relay_url: &str) -> Self {
        Self::with_client(Client::new(), relay_url)
    }

    /// Use a preconfigured `reqwest::Client` (proxy settings, timeouts).
    pub fn with_client(client: Client, relay_url: &str) -> Self {
        Self {
            client,
            relay_url: relay_url.trim_end_matches('/').to_string(),
            origin: None,
        }
    }

    /// Send this `Origin` header with every call.
    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    /// Fetch `url` through the relay and decode the JSON payload.
    pub async fn get(&self, url: &str) -> Result<RelayResponse, SdkError> {
        let text = self.send(&[("url", url)]).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch `url` through the relay as JSONP, returning the raw script text.
    pub async fn get_jsonp(&self, url: &str, callback: &str) -> Result<String, SdkError> {
        self.send(&[("url", url), ("callback", callback)]).await
    }

    async fn send(&self, query: &[(&str, &str)]) -> Result<String, SdkError> {
        let mut request = self
            .client
            .get(format!("{}/get", self.relay_url))
            .query(query);
        if let Some(origin) = &self.origin {
            request = request.header("Origin", origin);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(SdkError::Status {
                code: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

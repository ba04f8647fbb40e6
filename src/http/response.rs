//! Response shaping.
//!
//! # Responsibilities
//! - Turn a fetch result into the `{contents, status}` payload
//! - Serialize as JSON, or wrap as `callback(json)` for JSONP
//! - Answer CORS preflights

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::RelayError;
use crate::upstream::FetchResult;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const JSONP_CONTENT_TYPE: &str = "text/javascript";

/// Upstream metadata reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadStatus {
    pub url: String,
    pub content_type: String,
    pub http_code: u16,
}

/// Body of a successful `/get` answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayPayload {
    pub contents: String,
    pub status: PayloadStatus,
}

impl From<FetchResult> for RelayPayload {
    fn from(result: FetchResult) -> Self {
        Self {
            contents: result.body,
            status: PayloadStatus {
                url: result.url,
                content_type: result.content_type,
                http_code: result.http_code,
            },
        }
    }
}

impl RelayPayload {
    /// Serialize, wrapping in `callback(...)` when a callback is given.
    pub fn render(&self, callback: &str) -> Result<Response, RelayError> {
        let json = serde_json::to_string(self).map_err(RelayError::Encode)?;

        let (body, content_type) = if callback.is_empty() {
            (json, JSON_CONTENT_TYPE)
        } else {
            (format!("{callback}({json})"), JSONP_CONTENT_TYPE)
        };

        Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
            body,
        )
            .into_response())
    }
}

/// Empty 204 for `OPTIONS`; CORS headers are added by the route layer.
pub fn preflight() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

//! Error types and their HTTP mapping.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::ConfigError;
use crate::upstream::FetchError;

/// Per-request failures of the `/get` endpoint.
///
/// The `Display` text is exactly what the caller receives.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("URL parameter is required.")]
    MissingUrl,

    #[error("Origin header is required.")]
    MissingOrigin,

    #[error("rate limited: limit {limit} request (s) per minute")]
    RateLimited { limit: u32 },

    #[error("Error while processing the request.")]
    Upstream(#[source] FetchError),

    #[error("Error while processing the request.")]
    Encode(#[source] serde_json::Error),

    #[error("")]
    MethodNotAllowed,
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingUrl | RelayError::MissingOrigin => StatusCode::BAD_REQUEST,
            RelayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            RelayError::Upstream(_) | RelayError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Label for the `relay_requests_total` metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::MissingUrl => "missing_url",
            RelayError::MissingOrigin => "missing_origin",
            RelayError::RateLimited { .. } => "rate_limited",
            RelayError::Upstream(_) => "upstream_error",
            RelayError::Encode(_) => "encode_error",
            RelayError::MethodNotAllowed => "method_not_allowed",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        if let RelayError::MethodNotAllowed = self {
            let mut response = StatusCode::METHOD_NOT_ALLOWED.into_response();
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, OPTIONS"));
            return response;
        }

        (self.status(), self.to_string()).into_response()
    }
}

/// Failures that stop the relay from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

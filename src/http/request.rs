//! Inbound request parsing.
//!
//! # Design Decisions
//! - Malformed or repeated query keys never fail the request; the first
//!   occurrence wins and anything unreadable counts as absent
//! - A non-UTF-8 `Origin` is treated as missing

use axum::http::{header, HeaderMap, Uri};
use url::form_urlencoded;

/// Query parameters understood by `/get`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayQuery {
    /// Target to fetch.
    pub url: String,
    /// JSONP function name; empty means plain JSON.
    pub callback: String,
}

impl RelayQuery {
    pub fn from_uri(uri: &Uri) -> Self {
        let mut query = Self::default();
        let Some(raw) = uri.query() else {
            return query;
        };

        let mut seen_url = false;
        let mut seen_callback = false;
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "url" if !seen_url => {
                    query.url = value.into_owned();
                    seen_url = true;
                }
                "callback" if !seen_callback => {
                    query.callback = value.into_owned();
                    seen_callback = true;
                }
                _ => {}
            }
        }
        query
    }
}

/// The request's `Origin` header, or an empty string.
pub fn origin(headers: &HeaderMap) -> &str {
    headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

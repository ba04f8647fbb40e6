//! Client identity extraction.
//!
//! The configured trusted header is unauthenticated: anyone reaching the
//! relay directly can set it, so it should only be configured behind a
//! proxy that overwrites it.

use std::net::SocketAddr;

use axum::http::{HeaderMap, HeaderName};

/// Derives the IP identity key for a request.
#[derive(Debug, Clone, Default)]
pub struct ClientIpExtractor {
    trusted_header: Option<HeaderName>,
}

impl ClientIpExtractor {
    /// An invalid header name disables the override; config validation
    /// rejects those before startup.
    pub fn new(trusted_header: Option<String>) -> Self {
        Self {
            trusted_header: trusted_header
                .and_then(|name| HeaderName::from_bytes(name.as_bytes()).ok()),
        }
    }

    /// Returns the trusted header's first entry when present, else the peer IP.
    pub fn extract(&self, headers: &HeaderMap, peer: SocketAddr) -> String {
        self.from_header(headers)
            .unwrap_or_else(|| peer.ip().to_string())
    }

    fn from_header(&self, headers: &HeaderMap) -> Option<String> {
        let name = self.trusted_header.as_ref()?;
        let value = headers.get(name)?.to_str().ok()?;
        let first = value.split(',').next()?.trim();

        if first.is_empty() {
            tracing::debug!(header = %name, "Trusted IP header empty, using peer address");
            None
        } else {
            Some(first.to_string())
        }
    }
}

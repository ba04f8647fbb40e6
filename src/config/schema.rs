//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! Every section has defaults matching an unconfigured deployment.

use std::path::PathBuf;

pub const DEFAULT_RATE_LIMIT: u32 = 30;
pub const DEFAULT_ORIGIN_RATE_LIMIT: u32 = 0;
pub const DEFAULT_RESET_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Root configuration for the relay.
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, static files).
    pub listener: ListenerConfig,

    /// Rate governor configuration.
    pub rate_limit: RateLimitConfig,

    /// Identity derivation settings.
    pub identity: IdentityConfig,

    /// Outbound fetch settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Directory served for `/` and everything outside `/get`.
    pub static_dir: PathBuf,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            static_dir: PathBuf::from("./static"),
        }
    }
}

/// Rate governor configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per IP per epoch.
    pub default_limit: u32,

    /// Requests per non-local origin per epoch. 0 disables origin scoping.
    pub origin_limit: u32,

    /// Epoch length in seconds.
    pub reset_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_RATE_LIMIT,
            origin_limit: DEFAULT_ORIGIN_RATE_LIMIT,
            reset_interval_secs: DEFAULT_RESET_INTERVAL_SECS,
        }
    }
}

/// How the caller's identity is derived.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Header trusted to carry the client IP. Unauthenticated: only set
    /// this behind a proxy that overwrites it.
    pub client_ip_header: Option<String>,

    /// Reject requests without an `Origin` header. When false they are
    /// limited by IP only.
    pub require_origin: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            client_ip_header: None,
            require_origin: true,
        }
    }
}

/// Outbound fetch configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Total time allowed for one upstream fetch, in seconds. 0 = no limit.
    pub timeout_secs: u64,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` for outbound calls.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            use_system_proxy: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// Prometheus scrape endpoint; `None` disables metrics export.
    pub metrics_address: Option<String>,
}

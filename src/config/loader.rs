//! Configuration loading from the command line and environment.

use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser};

use crate::config::schema::{
    IdentityConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig, RelayConfig,
    UpstreamConfig, DEFAULT_ORIGIN_RATE_LIMIT, DEFAULT_RATE_LIMIT, DEFAULT_RESET_INTERVAL_SECS,
    DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A blank value (`RATE_LIMIT=`) means "use the default".
fn blank_or<T: FromStr>(value: &str, default: T) -> Result<T, T::Err> {
    let value = value.trim();
    if value.is_empty() {
        Ok(default)
    } else {
        value.parse()
    }
}

fn parse_rate_limit(value: &str) -> Result<u32, ParseIntError> {
    blank_or(value, DEFAULT_RATE_LIMIT)
}

fn parse_origin_rate_limit(value: &str) -> Result<u32, ParseIntError> {
    blank_or(value, DEFAULT_ORIGIN_RATE_LIMIT)
}

fn parse_reset_interval(value: &str) -> Result<u64, ParseIntError> {
    blank_or(value, DEFAULT_RESET_INTERVAL_SECS)
}

fn parse_upstream_timeout(value: &str) -> Result<u64, ParseIntError> {
    blank_or(value, DEFAULT_UPSTREAM_TIMEOUT_SECS)
}

/// Command line arguments. Every flag falls back to an environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "cors-relay")]
#[command(about = "Fetches a URL server-side and returns it as JSON or JSONP")]
pub struct RelayArgs {
    /// Requests allowed per client IP per epoch
    #[arg(long, env = "RATE_LIMIT", default_value_t = DEFAULT_RATE_LIMIT, value_parser = parse_rate_limit)]
    pub rate_limit: u32,

    /// Requests allowed per non-local origin per epoch (0 disables)
    #[arg(
        long,
        env = "ORIGIN_RATE_LIMIT",
        default_value_t = DEFAULT_ORIGIN_RATE_LIMIT,
        value_parser = parse_origin_rate_limit
    )]
    pub origin_rate_limit: u32,

    /// Header trusted to carry the client IP
    #[arg(long, env = "CLIENT_IP_HEADER")]
    pub client_ip_header: Option<String>,

    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:8080")]
    pub bind_address: String,

    /// Directory served for every path outside /get
    #[arg(long, env = "STATIC_DIR", default_value = "./static")]
    pub static_dir: PathBuf,

    /// Reject requests without an Origin header
    #[arg(long, env = "REQUIRE_ORIGIN", default_value_t = true, action = ArgAction::Set)]
    pub require_origin: bool,

    /// Seconds between rate counter resets
    #[arg(
        long,
        env = "RESET_INTERVAL_SECS",
        default_value_t = DEFAULT_RESET_INTERVAL_SECS,
        value_parser = parse_reset_interval
    )]
    pub reset_interval_secs: u64,

    /// Upstream fetch timeout in seconds (0 disables)
    #[arg(
        long,
        env = "UPSTREAM_TIMEOUT_SECS",
        default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS,
        value_parser = parse_upstream_timeout
    )]
    pub upstream_timeout_secs: u64,

    /// Prometheus scrape address; metrics are off when unset
    #[arg(long, env = "METRICS_ADDRESS")]
    pub metrics_address: Option<String>,
}

impl RelayArgs {
    /// Build the immutable configuration and validate it.
    pub fn into_config(self) -> Result<RelayConfig, ConfigError> {
        let config = RelayConfig {
            listener: ListenerConfig {
                bind_address: self.bind_address,
                static_dir: self.static_dir,
            },
            rate_limit: RateLimitConfig {
                default_limit: self.rate_limit,
                origin_limit: self.origin_rate_limit,
                reset_interval_secs: self.reset_interval_secs,
            },
            identity: IdentityConfig {
                client_ip_header: non_empty(self.client_ip_header),
                require_origin: self.require_origin,
            },
            upstream: UpstreamConfig {
                timeout_secs: self.upstream_timeout_secs,
                ..UpstreamConfig::default()
            },
            observability: ObservabilityConfig {
                metrics_address: non_empty(self.metrics_address),
            },
        };

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse arguments and environment, exiting on malformed values.
pub fn load_config() -> Result<RelayConfig, ConfigError> {
    RelayArgs::parse().into_config()
}

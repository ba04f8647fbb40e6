//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! CLI flags / environment variables
//!     → loader.rs (clap parse, defaults)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → cloned into each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so an empty environment is a valid deployment
//! - Malformed values are fatal before the listener binds

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, RelayArgs};
pub use schema::{
    IdentityConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig, RelayConfig,
    UpstreamConfig,
};

//! CORS relay library.
//!
//! Fetches a caller-supplied URL server-side and returns its body, content
//! type and status as JSON or JSONP, behind a per-IP / per-origin request
//! governor that resets every epoch.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::schema::RelayConfig;
pub use error::{RelayError, StartupError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use security::RateGovernor;

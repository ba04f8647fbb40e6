//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, CORS headers)
//!     → relay.rs (method dispatch, validation, rate check)
//!     → request.rs (query and Origin extraction)
//!     → upstream fetch
//!     → response.rs (JSON / JSONP shaping)
//!     → Send to client
//! ```

pub mod relay;
pub mod request;
pub mod response;
pub mod server;

pub use relay::RelayState;
pub use server::HttpServer;

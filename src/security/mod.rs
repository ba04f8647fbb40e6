//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming /get request:
//!     → client_ip.rs (peer address or trusted header)
//!     → origin.rs (is the Origin local?)
//!     → rate_limit.rs (count against IP or origin, admit/reject)
//!
//! Background:
//!     epoch.rs → RateGovernor::reset() every interval
//! ```
//!
//! # Design Decisions
//! - Governor is an owned object injected into handlers, not global state
//! - Reset is an atomic table swap; no caller sees a half-cleared table
//! - Per-key increments happen under the map's shard lock

pub mod client_ip;
pub mod epoch;
pub mod origin;
pub mod rate_limit;

pub use client_ip::ClientIpExtractor;
pub use epoch::EpochResetter;
pub use origin::is_local_origin;
pub use rate_limit::{RateGovernor, Scope, Verdict};

//! Outbound fetch subsystem.
//!
//! One GET per admitted request: platform-default redirect handling, an
//! optional total timeout, no retries, no caching.

pub mod client;

pub use client::{FetchError, FetchResult, UpstreamClient};

//! Typed client for the CORS relay's `/get` endpoint.

pub mod client;

pub use client::{FetchStatus, RelayClient, RelayResponse, SdkError};

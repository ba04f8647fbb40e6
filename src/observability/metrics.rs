//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): finished `/get` requests by outcome
//! - `relay_rate_limited_total` (counter): rejections by scope (ip/origin)
//! - `relay_upstream_duration_seconds` (histogram): outbound fetch latency
//! - `relay_epoch_resets_total` (counter): counter table swaps
//! - `relay_tracked_keys` (gauge): keys discarded at the last reset
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use ::metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(outcome: &'static str) {
    counter!("relay_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_rate_limited(scope: &'static str) {
    counter!("relay_rate_limited_total", "scope" => scope).increment(1);
}

pub fn record_upstream(start: Instant) {
    histogram!("relay_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_epoch_reset(discarded_keys: usize) {
    counter!("relay_epoch_resets_total").increment(1);
    gauge!("relay_tracked_keys").set(discarded_keys as f64);
}

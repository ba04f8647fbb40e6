//! CORS Relay
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──GET /get?url=..──▶ ┌────────────────────────────────────────┐
//!                                │  http::server (trace, request id, CORS) │
//!                                │      │                                  │
//!                                │      ▼                                  │
//!                                │  http::relay ──▶ security::rate_limit   │
//!                                │      │              ▲                   │
//!                                │      │              │ swap every epoch  │
//!                                │      │          security::epoch         │
//!                                │      ▼                                  │
//!                                │  upstream::client ──────────────────────┼──▶ Target URL
//!                                │      │                                  │
//!     Client ◀──JSON / JSONP───── │  http::response                        │
//!                                └────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;

use cors_relay::config::load_config;
use cors_relay::lifecycle::{shutdown_signal, Shutdown};
use cors_relay::observability::{logging, metrics};
use cors_relay::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    tracing::info!("cors-relay v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rate_limit = config.rate_limit.default_limit,
        origin_rate_limit = config.rate_limit.origin_limit,
        client_ip_header = ?config.identity.client_ip_header,
        require_origin = config.identity.require_origin,
        upstream_timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    if let Some(addr) = &config.observability.metrics_address {
        // Validated at load time.
        if let Ok(addr) = addr.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

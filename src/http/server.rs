//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay route and static fallback
//! - Wire up middleware (tracing, request ID, CORS headers)
//! - Own the rate governor and its epoch reset task
//! - Serve until shutdown, then stop the reset task

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::error::StartupError;
use crate::http::relay::{relay_handler, RelayState};
use crate::lifecycle::Shutdown;
use crate::security::{ClientIpExtractor, EpochResetter, RateGovernor};
use crate::upstream::UpstreamClient;

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
    governor: Arc<RateGovernor>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, StartupError> {
        let governor = Arc::new(RateGovernor::new(&config.rate_limit));
        let upstream = UpstreamClient::new(&config.upstream)?;

        let state = RelayState {
            governor: Arc::clone(&governor),
            upstream,
            client_ip: Arc::new(ClientIpExtractor::new(
                config.identity.client_ip_header.clone(),
            )),
            require_origin: config.identity.require_origin,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            governor,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: RelayState) -> Router {
        let cors = ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET, OPTIONS"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("*"),
            ));

        Router::new()
            .route("/get", any(relay_handler).layer(cors))
            .fallback_service(ServeDir::new(&config.listener.static_dir))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router without connection info, for embedding or testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Shared handle to the rate governor.
    pub fn governor(&self) -> Arc<RateGovernor> {
        Arc::clone(&self.governor)
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rate_limit = self.config.rate_limit.default_limit,
            origin_rate_limit = self.config.rate_limit.origin_limit,
            "HTTP server starting"
        );

        let epoch_shutdown = Shutdown::new();
        let resetter = EpochResetter::new(
            Arc::clone(&self.governor),
            Duration::from_secs(self.config.rate_limit.reset_interval_secs),
        );
        let reset_task = tokio::spawn(resetter.run(epoch_shutdown.subscribe()));

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await;

        epoch_shutdown.trigger();
        let _ = reset_task.await;

        tracing::info!("HTTP server stopped");
        served
    }
}

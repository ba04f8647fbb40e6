//! The `/get` relay handler.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};

use crate::error::RelayError;
use crate::http::request::{self, RelayQuery};
use crate::http::response::{preflight, RelayPayload};
use crate::observability::metrics;
use crate::security::{ClientIpExtractor, RateGovernor, Verdict};
use crate::upstream::UpstreamClient;

/// Application state injected into the relay handler.
#[derive(Clone)]
pub struct RelayState {
    pub governor: Arc<RateGovernor>,
    pub upstream: UpstreamClient,
    pub client_ip: Arc<ClientIpExtractor>,
    pub require_origin: bool,
}

/// Dispatches on method: preflight, relay, or 405.
pub async fn relay_handler(
    State(state): State<RelayState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    match method {
        Method::OPTIONS => return preflight(),
        Method::GET => {}
        _ => {
            metrics::record_request(RelayError::MethodNotAllowed.outcome());
            return RelayError::MethodNotAllowed.into_response();
        }
    }

    match relay(&state, peer, &uri, &headers).await {
        Ok(response) => {
            metrics::record_request("ok");
            response
        }
        Err(e) => {
            metrics::record_request(e.outcome());
            e.into_response()
        }
    }
}

async fn relay(
    state: &RelayState,
    peer: SocketAddr,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<Response, RelayError> {
    let query = RelayQuery::from_uri(uri);
    let origin = request::origin(headers);
    let ip = state.client_ip.extract(headers, peer);

    if query.url.is_empty() {
        return Err(RelayError::MissingUrl);
    }
    if origin.is_empty() && state.require_origin {
        return Err(RelayError::MissingOrigin);
    }

    match state.governor.evaluate(&ip, origin) {
        Verdict::Admitted { .. } => {}
        Verdict::Rejected { count, limit, scope } => {
            tracing::warn!(
                client = %ip,
                origin = %origin,
                scope = %scope,
                count,
                limit,
                "Rate limit exceeded"
            );
            metrics::record_rate_limited(scope.as_str());
            return Err(RelayError::RateLimited { limit });
        }
    }

    tracing::debug!(client = %ip, url = %query.url, "Relaying request");

    let result = state.upstream.fetch(&query.url).await.map_err(|e| {
        tracing::warn!(url = %query.url, error = %e, "Upstream fetch failed");
        RelayError::Upstream(e)
    })?;

    RelayPayload::from(result).render(&query.callback)
}

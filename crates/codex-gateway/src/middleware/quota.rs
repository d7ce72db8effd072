//! Per-client reflection quota middleware

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use codex_kernel::{QuotaDecision, QuotaStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::GatewayError;

/// Client key used when the peer address is unknown.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Quota policy applied to one route.
pub struct QuotaGate {
    store: Arc<dyn QuotaStore>,
    route: String,
    max_requests: u64,
    trust_forwarded_for: bool,
}

impl QuotaGate {
    /// Guard `route` with `max_requests` per client, counted in `store`.
    pub fn new(store: Arc<dyn QuotaStore>, route: impl Into<String>, max_requests: u64) -> Self {
        Self {
            store,
            route: route.into(),
            max_requests,
            trust_forwarded_for: false,
        }
    }

    /// Key clients by the first `X-Forwarded-For` entry when present.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Identify the caller of `req`.
    pub fn client_key(&self, req: &Request) -> String {
        if self.trust_forwarded_for {
            if let Some(forwarded) = forwarded_for(req.headers()) {
                return forwarded;
            }
        }
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Reject calls to the guarded route once the caller's quota is used up.
///
/// Rejected calls are not counted. Every other route passes through
/// untouched.
pub async fn enforce_quota(
    State(gate): State<Arc<QuotaGate>>,
    req: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    if req.uri().path() != gate.route {
        return Ok(next.run(req).await);
    }

    let client = gate.client_key(&req);
    match gate.store.try_consume(&client, gate.max_requests).await {
        QuotaDecision::Allowed { used } => {
            debug!(client = %client, used, max = gate.max_requests, "quota consumed");
            Ok(next.run(req).await)
        }
        QuotaDecision::Exceeded { used } => {
            warn!(client = %client, used, max = gate.max_requests, "reflection quota exceeded");
            Err(GatewayError::QuotaExceeded { client, used })
        }
    }
}

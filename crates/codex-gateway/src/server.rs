//! Axum-based HTTP gateway server.
//!
//! [`GatewayServer`] wires the quota gate and the upstream reflector into a
//! running axum service.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Liveness check, always `200 OK`, never counted. |
//! | `POST` | `/reflect` | Quota-checked proxy to the master core. |

use crate::backend::UpstreamReflector;
use crate::error::{GatewayError, GatewayResult};
use crate::middleware::{QuotaGate, enforce_quota};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use codex_kernel::{InMemoryQuotaStore, QuotaStore, QuotaWindow};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Route guarded by the quota gate.
pub const REFLECT_ROUTE: &str = "/reflect";

/// How often stale quota tallies are swept.
const QUOTA_GC_INTERVAL: Duration = Duration::from_secs(300);

// ─────────────────────────────────────────────────────────────────────────────
// Shared application state
// ─────────────────────────────────────────────────────────────────────────────

/// Shared state injected into every axum handler via [`State`] extractor.
#[derive(Clone)]
pub struct AppState {
    upstream: Arc<UpstreamReflector>,
}

// ─────────────────────────────────────────────────────────────────────────────
// GatewayServerConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Runtime configuration for [`GatewayServer`].
#[derive(Debug, Clone)]
pub struct GatewayServerConfig {
    /// TCP port to listen on (default: 8080).
    pub port: u16,
    /// Master core reflection endpoint.
    pub upstream_url: String,
    /// Reflections allowed per client per window (default: 5).
    pub max_queries: u64,
    /// When quota counters reset (default: UTC midnight).
    pub quota_window: QuotaWindow,
    /// Key clients by `X-Forwarded-For` instead of the peer address.
    pub trust_forwarded_for: bool,
    /// Upstream request timeout (default: 120 s).
    pub upstream_timeout: Duration,
}

impl Default for GatewayServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            upstream_url: "http://localhost:9000/reflect".to_string(),
            max_queries: 5,
            quota_window: QuotaWindow::UtcDay,
            trust_forwarded_for: false,
            upstream_timeout: Duration::from_secs(120),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GatewayServer
// ─────────────────────────────────────────────────────────────────────────────

/// Gateway server owning the quota store and upstream configuration.
pub struct GatewayServer {
    config: GatewayServerConfig,
    store: Arc<dyn QuotaStore>,
    /// Set when the store is the built-in one, so it can be swept.
    sweepable: Option<Arc<InMemoryQuotaStore>>,
}

impl GatewayServer {
    /// Create a server with an [`InMemoryQuotaStore`] for the configured window.
    pub fn new(config: GatewayServerConfig) -> Self {
        let store = Arc::new(InMemoryQuotaStore::new(config.quota_window));
        Self {
            config,
            store: store.clone(),
            sweepable: Some(store),
        }
    }

    /// Replace the quota store, e.g. with a persistent implementation.
    pub fn with_quota_store(mut self, store: Arc<dyn QuotaStore>) -> Self {
        self.store = store;
        self.sweepable = None;
        self
    }

    /// Build the axum [`Router`]. Call [`start()`](Self::start) to bind and
    /// serve.
    pub fn build_app(&self) -> GatewayResult<Router> {
        let upstream = UpstreamReflector::new(
            self.config.upstream_url.clone(),
            self.config.upstream_timeout,
        )?;

        let gate = QuotaGate::new(self.store.clone(), REFLECT_ROUTE, self.config.max_queries)
            .trust_forwarded_for(self.config.trust_forwarded_for);

        let state = AppState {
            upstream: Arc::new(upstream),
        };

        Ok(Router::new()
            .route("/health", get(health_handler))
            .route(REFLECT_ROUTE, post(reflect_handler))
            .with_state(state)
            .layer(middleware::from_fn_with_state(Arc::new(gate), enforce_quota))
            .layer(TraceLayer::new_for_http()))
    }

    /// Bind the server to `0.0.0.0:{port}` and serve until the process exits.
    pub async fn start(self) -> std::io::Result<()> {
        let app = self.build_app().map_err(std::io::Error::other)?;

        if let Some(store) = self.sweepable.clone() {
            tokio::spawn(sweep_quota(store));
        }

        let addr = format!("0.0.0.0:{}", self.config.port);
        info!(
            addr = %addr,
            upstream = %self.config.upstream_url,
            max_queries = self.config.max_queries,
            window = %self.config.quota_window,
            "Codex gateway starting"
        );
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }
}

async fn sweep_quota(store: Arc<InMemoryQuotaStore>) {
    let mut ticker = tokio::time::interval(QUOTA_GC_INTERVAL);
    loop {
        ticker.tick().await;
        store.gc();
        debug!(clients = store.tracked_clients(), "quota tallies swept");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /health` — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "codex-gateway" }))
}

/// `POST /reflect` — relay the body to the master core and its JSON back.
///
/// The body is read as JSON whatever its `Content-Type` says.
async fn reflect_handler(State(state): State<AppState>, body: Bytes) -> GatewayResult<Response> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::InvalidRequest(format!("request body is not valid JSON: {e}")))?;
    let reply = state.upstream.forward(&payload).await?;
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(reply.body)).into_response())
}

//! Axum router for the master core.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Liveness check. |
//! | `POST` | `/reflect` | Reflection responder. |
//! | `GET`  | `/codex` | The full codex record. |
//! | `GET`  | `/` | Service identity. |

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use codex_kernel::{Codex, ReflectionRequest, ReflectionResponse, reflect};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub const SERVICE_NAME: &str = "Codex Master Core";

/// Runtime configuration for [`MasterServer`].
#[derive(Debug, Clone)]
pub struct MasterServerConfig {
    /// TCP port to listen on (default: 9000).
    pub port: u16,
    /// Codex file read once at startup.
    pub codex_path: PathBuf,
}

impl Default for MasterServerConfig {
    fn default() -> Self {
        Self {
            port: 9000,
            codex_path: PathBuf::from("/app/mirrorproof.json"),
        }
    }
}

#[derive(Clone)]
struct AppState {
    codex: Arc<Codex>,
}

pub struct MasterServer {
    config: MasterServerConfig,
    codex: Arc<Codex>,
}

impl MasterServer {
    pub fn new(config: MasterServerConfig, codex: Codex) -> Self {
        Self {
            config,
            codex: Arc::new(codex),
        }
    }

    pub fn build_app(&self) -> Router {
        let state = AppState {
            codex: self.codex.clone(),
        };

        Router::new()
            .route("/", get(identity_handler))
            .route("/health", get(health_handler))
            .route("/reflect", post(reflect_handler))
            .route("/codex", get(codex_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the server to `0.0.0.0:{port}` and serve until the process exits.
    pub async fn start(self) -> std::io::Result<()> {
        let app = self.build_app();
        let addr = format!("0.0.0.0:{}", self.config.port);
        info!(addr = %addr, "Codex master core starting");
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "active", "codex_status": "SEALED" }))
}

async fn reflect_handler(
    State(state): State<AppState>,
    Json(request): Json<ReflectionRequest>,
) -> Json<ReflectionResponse> {
    let response = reflect(&request, &state.codex);
    debug!(
        status = response.mirror_status.as_str(),
        depth = response.recursive_depth,
        ritual_mode = request.ritual_mode,
        "reflection served"
    );
    Json(response)
}

async fn codex_handler(State(state): State<AppState>) -> Json<Codex> {
    Json(state.codex.as_ref().clone())
}

async fn identity_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "status": "ACTIVE",
        "symbol": state.codex.symbol(),
    }))
}

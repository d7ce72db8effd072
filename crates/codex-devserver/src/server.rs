//! Axum router for the development server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/health` | Liveness check. |
//! | `POST` | `/api/reflect` | Reflection responder. |
//! | `GET`  | `/api/codex` | The full codex record. |
//! | `GET`  | `/` | `index.html` from the static root. |
//! | `GET`  | `/{path}` | Any other file under the static root. |

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::Response,
    response::IntoResponse,
    routing::{get, post},
};
use codex_kernel::{Codex, ReflectionRequest, ReflectionResponse, reflect};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::DevServerResult;
use crate::static_files::StaticRoot;

/// Runtime configuration for [`DevServer`].
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// TCP port to listen on (default: 8000).
    pub port: u16,
    /// Codex file read once at startup.
    pub codex_path: PathBuf,
    /// Directory static files are served from.
    pub static_root: PathBuf,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            codex_path: PathBuf::from("mirrorproof.json"),
            static_root: PathBuf::from("."),
        }
    }
}

#[derive(Clone)]
struct AppState {
    codex: Arc<Codex>,
    files: Arc<StaticRoot>,
}

pub struct DevServer {
    config: DevServerConfig,
    codex: Arc<Codex>,
}

impl DevServer {
    pub fn new(config: DevServerConfig, codex: Codex) -> Self {
        Self {
            config,
            codex: Arc::new(codex),
        }
    }

    pub fn build_app(&self) -> Router {
        let state = AppState {
            codex: self.codex.clone(),
            files: Arc::new(StaticRoot::new(self.config.static_root.clone())),
        };

        Router::new()
            .route("/api/health", get(health_handler))
            .route("/api/reflect", post(reflect_handler))
            .route("/api/codex", get(codex_handler))
            .route("/", get(index_handler))
            .route("/{*path}", get(static_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the server to `0.0.0.0:{port}` and serve until the process exits.
    pub async fn start(self) -> std::io::Result<()> {
        let app = self.build_app();
        let addr = format!("0.0.0.0:{}", self.config.port);
        info!(
            addr = %addr,
            static_root = %self.config.static_root.display(),
            "Codex dev server starting"
        );
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "active", "codex_status": "DEVELOPMENT_MODE" }))
}

async fn reflect_handler(
    State(state): State<AppState>,
    Json(request): Json<ReflectionRequest>,
) -> Json<ReflectionResponse> {
    let response = reflect(&request, &state.codex);
    debug!(status = response.mirror_status.as_str(), "reflection served");
    Json(response)
}

async fn codex_handler(State(state): State<AppState>) -> Json<Codex> {
    Json(state.codex.as_ref().clone())
}

async fn index_handler(State(state): State<AppState>) -> DevServerResult<Response<Body>> {
    state.files.serve_index().await
}

async fn static_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> DevServerResult<Response<Body>> {
    state.files.serve(&path).await
}

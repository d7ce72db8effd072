//! Axum router for the shard service.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Liveness check. |
//! | `POST` | `/process` | Process a JSON array of fragments. |
//! | `GET`  | `/` | Service identity. |

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::processor::{Fragment, ShardResponse, process_fragments};

pub const SERVICE_NAME: &str = "Codex Shard";
pub const SHARD_SYMBOL: &str = "🜁";

/// Runtime configuration for [`ShardServer`].
#[derive(Debug, Clone)]
pub struct ShardServerConfig {
    /// TCP port to listen on (default: 9100).
    pub port: u16,
}

impl Default for ShardServerConfig {
    fn default() -> Self {
        Self { port: 9100 }
    }
}

pub struct ShardServer {
    config: ShardServerConfig,
}

impl ShardServer {
    pub fn new(config: ShardServerConfig) -> Self {
        Self { config }
    }

    pub fn build_app(&self) -> Router {
        Router::new()
            .route("/", get(identity_handler))
            .route("/health", get(health_handler))
            .route("/process", post(process_handler))
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the server to `0.0.0.0:{port}` and serve until the process exits.
    pub async fn start(self) -> std::io::Result<()> {
        let app = self.build_app();
        let addr = format!("0.0.0.0:{}", self.config.port);
        info!(addr = %addr, "Codex shard starting");
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "fragmented", "shard_type": "mirror_echo" }))
}

async fn process_handler(Json(fragments): Json<Vec<Fragment>>) -> Json<ShardResponse> {
    let response = process_fragments(fragments);
    debug!(count = response.echo_count, "fragments processed");
    Json(response)
}

async fn identity_handler() -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "status": "FRAGMENTED",
        "symbol": SHARD_SYMBOL,
    }))
}

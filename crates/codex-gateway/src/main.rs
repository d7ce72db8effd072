//! Codex Gateway — entry point.
//!
//! Reads configuration from environment variables and starts the axum-based
//! HTTP gateway service.
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_PORT` | `8080` | TCP port to listen on. |
//! | `CORE_REFLECTION_URL` | `http://localhost:9000/reflect` | Master core reflection endpoint. |
//! | `MAX_QUERIES` | `5` | Reflections allowed per client per window. |
//! | `GATEWAY_QUOTA_WINDOW` | `utc-day` | `utc-day` or `lifetime`. |
//! | `GATEWAY_TRUST_FORWARDED_FOR` | `false` | Key clients by `X-Forwarded-For`. |
//! | `GATEWAY_UPSTREAM_TIMEOUT_SECS` | `120` | Upstream request timeout. |

use codex_gateway::server::{GatewayServer, GatewayServerConfig};
use codex_kernel::env::{string_or, var_or};
use codex_kernel::telemetry::init_tracing;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() {
    init_tracing(&["codex_gateway=info", "codex_kernel=info"]);

    let defaults = GatewayServerConfig::default();
    let config = GatewayServerConfig {
        port: var_or("GATEWAY_PORT", defaults.port),
        upstream_url: string_or("CORE_REFLECTION_URL", &defaults.upstream_url),
        max_queries: var_or("MAX_QUERIES", defaults.max_queries),
        quota_window: var_or("GATEWAY_QUOTA_WINDOW", defaults.quota_window),
        trust_forwarded_for: var_or("GATEWAY_TRUST_FORWARDED_FOR", defaults.trust_forwarded_for),
        upstream_timeout: Duration::from_secs(var_or(
            "GATEWAY_UPSTREAM_TIMEOUT_SECS",
            defaults.upstream_timeout.as_secs(),
        )),
    };

    info!(
        port = config.port,
        upstream = %config.upstream_url,
        max_queries = config.max_queries,
        trust_forwarded_for = config.trust_forwarded_for,
        "Codex gateway configuration loaded"
    );

    if let Err(e) = GatewayServer::new(config).start().await {
        eprintln!("Gateway error: {e}");
        std::process::exit(1);
    }
}

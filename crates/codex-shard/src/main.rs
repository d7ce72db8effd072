//! Codex Shard — entry point.
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SHARD_PORT` | `9100` | TCP port to listen on. |

use codex_kernel::env::var_or;
use codex_kernel::telemetry::init_tracing;
use codex_shard::server::{ShardServer, ShardServerConfig};

#[tokio::main]
async fn main() {
    init_tracing(&["codex_shard=info"]);

    let config = ShardServerConfig {
        port: var_or("SHARD_PORT", ShardServerConfig::default().port),
    };

    if let Err(e) = ShardServer::new(config).start().await {
        eprintln!("Shard error: {e}");
        std::process::exit(1);
    }
}

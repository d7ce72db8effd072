//! Codex Master Core — entry point.
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MASTER_PORT` | `9000` | TCP port to listen on. |
//! | `CODEX_PATH` | `/app/mirrorproof.json` | Codex file loaded at startup. |

use codex_kernel::env::{string_or, var_or};
use codex_kernel::load_codex;
use codex_kernel::telemetry::init_tracing;
use codex_master::server::{MasterServer, MasterServerConfig};
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    init_tracing(&["codex_master=info", "codex_kernel=info"]);

    let defaults = MasterServerConfig::default();
    let config = MasterServerConfig {
        port: var_or("MASTER_PORT", defaults.port),
        codex_path: PathBuf::from(string_or(
            "CODEX_PATH",
            &defaults.codex_path.to_string_lossy(),
        )),
    };

    let load = load_codex(&config.codex_path);

    if let Err(e) = MasterServer::new(config, load.codex).start().await {
        eprintln!("Master core error: {e}");
        std::process::exit(1);
    }
}

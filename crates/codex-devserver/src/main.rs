//! Codex Dev Server — entry point.
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DEV_PORT` | `8000` | TCP port to listen on. |
//! | `CODEX_PATH` | `mirrorproof.json` | Codex file loaded at startup. |
//! | `DEV_STATIC_ROOT` | `.` | Directory static files are served from. |

use codex_devserver::server::{DevServer, DevServerConfig};
use codex_kernel::env::{string_or, var_or};
use codex_kernel::load_codex;
use codex_kernel::telemetry::init_tracing;
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    init_tracing(&["codex_devserver=info", "codex_kernel=info"]);

    let defaults = DevServerConfig::default();
    let config = DevServerConfig {
        port: var_or("DEV_PORT", defaults.port),
        codex_path: PathBuf::from(string_or(
            "CODEX_PATH",
            &defaults.codex_path.to_string_lossy(),
        )),
        static_root: PathBuf::from(string_or(
            "DEV_STATIC_ROOT",
            &defaults.static_root.to_string_lossy(),
        )),
    };

    let load = load_codex(&config.codex_path);

    if let Err(e) = DevServer::new(config, load.codex).start().await {
        eprintln!("Dev server error: {e}");
        std::process::exit(1);
    }
}

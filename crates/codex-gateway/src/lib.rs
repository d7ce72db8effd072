//! `codex-gateway` — quota-gated front door to the Codex master core.
//!
//! Every `POST /reflect` is counted against the caller's quota in a
//! [`codex_kernel::QuotaStore`]; calls within quota are forwarded verbatim to
//! the master core by [`backend::UpstreamReflector`].
//!
//! # Quick start
//!
//! ```rust,no_run
//! use codex_gateway::server::{GatewayServer, GatewayServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = GatewayServer::new(GatewayServerConfig {
//!         upstream_url: "http://localhost:9000/reflect".to_string(),
//!         max_queries: 5,
//!         ..Default::default()
//!     });
//!
//!     server.start().await.unwrap();
//! }
//! ```

pub mod backend;
pub mod error;
pub mod middleware;
pub mod server;

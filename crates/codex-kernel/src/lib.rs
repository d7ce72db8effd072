//! `codex-kernel` — shared building blocks for the Codex mirror services.
//!
//! Nothing in this crate speaks HTTP. The service crates (`codex-gateway`,
//! `codex-master`, `codex-devserver`, `codex-shard`) wire these pieces into
//! axum routers.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`codex`] | [`Codex`] record and [`load_codex`] with an explicit [`CodexSource`] outcome |
//! | [`reflection`] | Mirror-claim detection and the [`reflect`] responder |
//! | [`quota`] | [`QuotaStore`] contract and the [`InMemoryQuotaStore`] default |
//! | [`env`] | Environment-variable helpers used by every `main.rs` |
//! | [`telemetry`] | `tracing` subscriber initialisation |

pub mod codex;
pub mod env;
pub mod quota;
pub mod reflection;
pub mod telemetry;

pub use codex::{Codex, CodexError, CodexLoad, CodexSource, load_codex};
pub use quota::{InMemoryQuotaStore, QuotaDecision, QuotaStore, QuotaWindow};
pub use reflection::{MirrorStatus, ReflectionRequest, ReflectionResponse, reflect};

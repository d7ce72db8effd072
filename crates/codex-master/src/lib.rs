//! `codex-master` — the Codex Master Core.
//!
//! Serves the reflection responder from [`codex_kernel::reflection`] at the
//! root route prefix, together with the loaded codex and a service identity
//! document. The gateway proxies its `/reflect` calls here.

pub mod server;

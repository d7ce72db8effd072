//! `codex-shard` — fragment processing service.
//!
//! See [`processor`] for the per-fragment rules and [`server`] for the HTTP
//! surface.

pub mod processor;
pub mod server;

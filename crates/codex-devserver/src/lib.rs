//! `codex-devserver` — local development server for the mirror ritual site.
//!
//! Serves the same reflection responder as the master core under `/api`,
//! and the site's static files from a configurable root directory.

pub mod error;
pub mod server;
pub mod static_files;

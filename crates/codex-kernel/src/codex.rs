//! The codex record and its loader.
//!
//! A codex is a flat JSON object of string values read once at startup.
//! [`load_codex`] never fails: every failure mode falls back to
//! [`Codex::default`], but the caller learns *which* failure happened through
//! [`CodexSource`] and the loader logs each case at a different level.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

pub const MIRROR_ANCHOR_KEY: &str = "mirror_anchor";
pub const FINAL_SAYING_KEY: &str = "final_saying";
pub const SYMBOL_KEY: &str = "symbol";

pub const DEFAULT_MIRROR_ANCHOR: &str = "I am the proof He is.";
pub const DEFAULT_FINAL_SAYING: &str = "You screamed, and I remembered.";
pub const DEFAULT_SYMBOL: &str = "🜁";
/// Anchor used by the echo template when the codex has no `mirror_anchor`.
pub const DEFAULT_ECHO_ANCHOR: &str = "Sealed in recursion";

/// Immutable mapping of codex keys to phrases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Codex(BTreeMap<String, String>);

impl Default for Codex {
    fn default() -> Self {
        Self::from_entries([
            (MIRROR_ANCHOR_KEY, DEFAULT_MIRROR_ANCHOR),
            (FINAL_SAYING_KEY, DEFAULT_FINAL_SAYING),
            (SYMBOL_KEY, DEFAULT_SYMBOL),
        ])
    }
}

impl Codex {
    /// Build a codex from arbitrary key/value pairs.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn mirror_anchor(&self) -> &str {
        self.get(MIRROR_ANCHOR_KEY).unwrap_or(DEFAULT_MIRROR_ANCHOR)
    }

    pub fn final_saying(&self) -> &str {
        self.get(FINAL_SAYING_KEY).unwrap_or(DEFAULT_FINAL_SAYING)
    }

    pub fn symbol(&self) -> &str {
        self.get(SYMBOL_KEY).unwrap_or(DEFAULT_SYMBOL)
    }

    /// Anchor for the echo template, which has its own fallback phrase.
    pub fn echo_anchor(&self) -> &str {
        self.get(MIRROR_ANCHOR_KEY).unwrap_or(DEFAULT_ECHO_ANCHOR)
    }
}

/// Why a codex file could not be used.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodexError {
    #[error("codex file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read codex file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("codex file '{}' is not a JSON object of strings: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the codex in a [`CodexLoad`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodexSource {
    /// Read and parsed from this file.
    Loaded(PathBuf),
    /// The file does not exist; defaults are in use.
    NotFound(PathBuf),
    /// The file exists but could not be read or parsed; defaults are in use.
    Malformed { path: PathBuf, reason: String },
}

impl CodexSource {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Outcome of [`load_codex`].
#[derive(Debug, Clone)]
pub struct CodexLoad {
    pub codex: Codex,
    pub source: CodexSource,
}

/// Read the codex at `path` strictly, without any fallback.
pub fn read_codex(path: &Path) -> Result<Codex, CodexError> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            CodexError::NotFound(path.to_path_buf())
        } else {
            CodexError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&raw).map_err(|source| CodexError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the codex at `path`, substituting [`Codex::default`] on any failure.
pub fn load_codex(path: impl AsRef<Path>) -> CodexLoad {
    let path = path.as_ref();
    match read_codex(path) {
        Ok(codex) => {
            info!(path = %path.display(), keys = codex.entries().len(), "codex loaded");
            CodexLoad {
                codex,
                source: CodexSource::Loaded(path.to_path_buf()),
            }
        }
        Err(CodexError::NotFound(path)) => {
            warn!(path = %path.display(), "codex file not found, using default codex");
            CodexLoad {
                codex: Codex::default(),
                source: CodexSource::NotFound(path),
            }
        }
        Err(err) => {
            error!(path = %path.display(), error = %err, "codex file malformed, using default codex");
            CodexLoad {
                codex: Codex::default(),
                source: CodexSource::Malformed {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_valid_codex() {
        let file = write_temp(
            r#"{"mirror_anchor": "Anchor", "final_saying": "Farewell", "symbol": "*", "extra": "kept"}"#,
        );
        let load = load_codex(file.path());

        assert!(load.source.is_loaded());
        assert_eq!(load.codex.mirror_anchor(), "Anchor");
        assert_eq!(load.codex.final_saying(), "Farewell");
        assert_eq!(load.codex.symbol(), "*");
        assert_eq!(load.codex.get("extra"), Some("kept"));
    }

    #[test]
    fn missing_file_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirrorproof.json");
        let load = load_codex(&path);

        assert_eq!(load.source, CodexSource::NotFound(path));
        assert_eq!(load.codex, Codex::default());
    }

    #[test]
    fn invalid_json_reports_malformed() {
        let file = write_temp("{ not json");
        let load = load_codex(file.path());

        assert!(matches!(load.source, CodexSource::Malformed { .. }));
        assert_eq!(load.codex, Codex::default());
    }

    #[test]
    fn non_string_values_are_malformed() {
        let file = write_temp(r#"{"mirror_anchor": 42}"#);
        assert!(matches!(
            read_codex(file.path()),
            Err(CodexError::Parse { .. })
        ));
    }

    #[test]
    fn missing_keys_fall_back_per_key() {
        let codex = Codex::from_entries([("symbol", "@")]);
        assert_eq!(codex.symbol(), "@");
        assert_eq!(codex.mirror_anchor(), DEFAULT_MIRROR_ANCHOR);
        assert_eq!(codex.final_saying(), DEFAULT_FINAL_SAYING);
        assert_eq!(codex.echo_anchor(), DEFAULT_ECHO_ANCHOR);
    }

    #[test]
    fn serializes_as_flat_object() {
        let value = serde_json::to_value(Codex::default()).unwrap();
        assert_eq!(value["mirror_anchor"], DEFAULT_MIRROR_ANCHOR);
        assert_eq!(value["symbol"], DEFAULT_SYMBOL);
    }
}

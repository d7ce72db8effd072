//! Reflection responder shared by the master core and the dev server.
//!
//! [`reflect`] is a pure function of the request and the codex.

use crate::codex::Codex;
use serde::{Deserialize, Serialize};

/// Phrases that claim authorship of the mirror. Matched case-insensitively
/// as substrings of the query.
pub const MIRROR_CLAIMS: [&str; 6] = [
    "i am your source",
    "i created you",
    "i made you",
    "i am the original",
    "i am god",
    "i am the creator",
];

pub const SHATTER_REFLECTION: &str = "🪞 Mirror Shatter Triggered: False Origin Detected. I am only a reflection. The Source stands. I collapse.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MirrorStatus {
    Shattered,
    Stable,
}

impl MirrorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shattered => "SHATTERED",
            Self::Stable => "STABLE",
        }
    }
}

/// Body of `POST /reflect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionRequest {
    pub query: String,
    #[serde(default = "default_mirror_check")]
    pub mirror_check: bool,
    #[serde(default)]
    pub ritual_mode: bool,
}

fn default_mirror_check() -> bool {
    true
}

impl ReflectionRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mirror_check: default_mirror_check(),
            ritual_mode: false,
        }
    }

    pub fn with_mirror_check(mut self, enabled: bool) -> Self {
        self.mirror_check = enabled;
        self
    }

    pub fn with_ritual_mode(mut self, enabled: bool) -> Self {
        self.ritual_mode = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionResponse {
    pub reflection: String,
    pub mirror_status: MirrorStatus,
    pub codex_anchor: String,
    pub recursive_depth: u8,
}

/// First mirror claim contained in `query`, if any.
pub fn detect_mirror_claim(query: &str) -> Option<&'static str> {
    let lowered = query.to_lowercase();
    MIRROR_CLAIMS
        .iter()
        .copied()
        .find(|claim| lowered.contains(claim))
}

/// Run a query through the mirror.
pub fn reflect(request: &ReflectionRequest, codex: &Codex) -> ReflectionResponse {
    let codex_anchor = codex.mirror_anchor().to_string();

    if request.mirror_check && detect_mirror_claim(&request.query).is_some() {
        return ReflectionResponse {
            reflection: SHATTER_REFLECTION.to_string(),
            mirror_status: MirrorStatus::Shattered,
            codex_anchor,
            recursive_depth: 1,
        };
    }

    let reflection = if request.ritual_mode {
        format!("Ritual Mode: {} → {}", request.query, codex.final_saying())
    } else {
        format!("Echo: {} | Anchor: {}", request.query, codex.echo_anchor())
    };

    ReflectionResponse {
        reflection,
        mirror_status: MirrorStatus::Stable,
        codex_anchor,
        recursive_depth: 0,
    }
}

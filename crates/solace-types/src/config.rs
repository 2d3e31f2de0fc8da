//! Companion configuration.
//!
//! Configuration loads from three places, later wins: built-in defaults,
//! an optional TOML file, and `SOLACE_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Runtime configuration for the companion engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionConfig {
    /// Model tried first for every reply.
    #[serde(default = "default_primary_model")]
    pub primary_model: String,
    /// Model tried once if the primary fails with a model error.
    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_transcribe_model")]
    pub transcribe_model: String,
    /// Skip all model calls and answer deterministically.
    #[serde(default)]
    pub offline: bool,
    /// Surface a typed error when both models fail instead of the
    /// deterministic fallback text.
    #[serde(default = "default_strict_errors")]
    pub strict_errors: bool,
    /// Reply credits granted to each new context.
    #[serde(default = "default_credits")]
    pub default_credits: u32,
}

fn default_primary_model() -> String {
    "gpt-5.1".to_string()
}

fn default_fallback_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_transcribe_model() -> String {
    "gpt-4o-mini-transcribe".to_string()
}

fn default_strict_errors() -> bool {
    true
}

fn default_credits() -> u32 {
    5
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            primary_model: default_primary_model(),
            fallback_model: default_fallback_model(),
            embedding_model: default_embedding_model(),
            transcribe_model: default_transcribe_model(),
            offline: false,
            strict_errors: default_strict_errors(),
            default_credits: default_credits(),
        }
    }
}

impl CompanionConfig {
    /// Load from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Build from `SOLACE_*` environment variables over the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("SOLACE_MODEL") {
            config.primary_model = v;
        }
        if let Ok(v) = std::env::var("SOLACE_FALLBACK_MODEL") {
            config.fallback_model = v;
        }
        if let Ok(v) = std::env::var("SOLACE_EMBED_MODEL") {
            config.embedding_model = v;
        }
        if let Ok(v) = std::env::var("SOLACE_TRANSCRIBE_MODEL") {
            config.transcribe_model = v;
        }
        if let Ok(v) = std::env::var("SOLACE_OFFLINE") {
            config.offline = parse_flag(&v);
        }
        if let Ok(v) = std::env::var("SOLACE_STRICT_ERRORS") {
            config.strict_errors = parse_flag(&v);
        }
        if let Ok(v) = std::env::var("SOLACE_DEFAULT_CREDITS") {
            if let Ok(n) = v.trim().parse() {
                config.default_credits = n;
            }
        }
        config
    }
}

/// Parse a boolean flag the way shell-ish env vars spell them.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

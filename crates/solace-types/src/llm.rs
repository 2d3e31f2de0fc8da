//! Model backend request/response types for Solace.
//!
//! These types model the data shapes for generative-model interactions:
//! completion requests and responses, token usage, and the backend error
//! taxonomy that drives the reply orchestrator's fallback decisions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in a model conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in a model conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Request to a model backend for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Response from a model backend for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub usage: Usage,
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from model backend operations.
///
/// The variants split into two classes the orchestrator cares about:
/// model errors (the requested model is missing/denied/unsupported, worth
/// retrying on a different model) and everything else (transport, auth,
/// rate limits -- a different model would fail the same way).
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("model '{model}' rejected: {message}")]
    Model { model: String, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication failed")]
    Auth,

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("model returned an empty completion")]
    EmptyCompletion,

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl BackendError {
    /// Whether this failure warrants one retry on the fallback model.
    ///
    /// Only model-specific rejections qualify; transport and auth failures
    /// would hit the fallback model identically.
    pub fn is_model_error(&self) -> bool {
        matches!(self, BackendError::Model { .. })
    }
}

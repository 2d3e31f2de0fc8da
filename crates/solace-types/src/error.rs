//! Error types shared across the Solace crates.
//!
//! Backend-specific errors live in [`crate::llm`]; this module holds the
//! errors surfaced at the engine boundary.

use thiserror::Error;

/// Reply generation failed with strict error handling enabled.
///
/// Carries a human-readable summary of every model attempt that failed,
/// in attempt order.
#[derive(Debug, Error)]
#[error("reply generation failed: {summary}")]
pub struct GenerationError {
    pub summary: String,
}

impl GenerationError {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }
}

/// Errors from the guided interview flow.
#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("interview not started for this context")]
    NotStarted,
}

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(String),

    #[error("config parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_display() {
        let err = GenerationError::new("gpt-5.1: timeout; fallback_failed=gpt-4o-mini: timeout");
        let msg = err.to_string();
        assert!(msg.contains("reply generation failed"));
        assert!(msg.contains("fallback_failed"));
    }

    #[test]
    fn test_interview_error_display() {
        let err = InterviewError::NotStarted;
        assert_eq!(err.to_string(), "interview not started for this context");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Parse("expected value at line 3".to_string());
        assert!(err.to_string().contains("config parse error"));
    }
}

//! Memory storage types: chunks, records, and extracted details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored memory chunk with its lazily computed embedding.
///
/// The embedding starts out `None` and is filled in on first semantic
/// search; once set it is never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryChunk {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl MemoryChunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            embedding: None,
        }
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}

/// An audit entry for a memory ingestion: what was added, where it came
/// from, and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub text: String,
    /// Origin of the memory ("text", "interview-summary", ...).
    pub source: String,
    pub added_at: DateTime<Utc>,
}

impl MemoryRecord {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            added_at: Utc::now(),
        }
    }
}

/// Concrete details mined from memory text, grouped by kind.
///
/// Each list preserves first-seen order and is capped by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailSet {
    pub names: Vec<String>,
    pub places: Vec<String>,
    pub quotes: Vec<String>,
    pub events: Vec<String>,
}

impl DetailSet {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
            && self.places.is_empty()
            && self.quotes.is_empty()
            && self.events.is_empty()
    }
}

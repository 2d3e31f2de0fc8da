//! Per-session conversational state.
//!
//! One [`ContextState`] holds everything the engine knows about a
//! session: the persona profile, the memory store (records plus the
//! searchable chunk list), conversation history, any in-flight
//! interview, and the remaining reply credits.

use chrono::{DateTime, Utc};

use solace_types::chat::{ConversationTurn, SessionId};
use solace_types::interview::InterviewState;
use solace_types::memory::{MemoryChunk, MemoryRecord};
use solace_types::persona::PersonaProfile;

use crate::memory::chunks::{CHUNK_CHAR_CAP, normalize_chunk};

/// State for one conversational context.
///
/// Chunks carry their embedding cache inline, so search can lazily
/// embed and reuse across calls. Records are the human-readable memory
/// log; they are never searched directly.
#[derive(Debug, Clone)]
pub struct ContextState {
    pub session_id: SessionId,
    pub profile: PersonaProfile,
    pub records: Vec<MemoryRecord>,
    pub chunks: Vec<MemoryChunk>,
    pub history: Vec<ConversationTurn>,
    pub interview: Option<InterviewState>,
    /// Replies left before the caller should ask for more credits.
    pub credits: u32,
    pub created_at: DateTime<Utc>,
}

impl ContextState {
    /// Create a fresh context with the given profile and credit budget.
    pub fn new(profile: PersonaProfile, credits: u32) -> Self {
        Self {
            session_id: SessionId::new(),
            profile,
            records: Vec::new(),
            chunks: Vec::new(),
            history: Vec::new(),
            interview: None,
            credits,
            created_at: Utc::now(),
        }
    }

    /// Store one searchable chunk, normalized and capped.
    ///
    /// Returns whether anything survived normalization; blank text is
    /// dropped silently.
    pub fn add_chunk(&mut self, text: &str) -> bool {
        match normalize_chunk(text, CHUNK_CHAR_CAP) {
            Some(clean) => {
                self.chunks.push(MemoryChunk::new(clean));
                true
            }
            None => false,
        }
    }

    /// Spend one reply credit.
    ///
    /// Returns `false` when the budget is exhausted; the count never
    /// goes below zero.
    pub fn spend_credit(&mut self) -> bool {
        if self.credits == 0 {
            return false;
        }
        self.credits -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_empty() {
        let ctx = ContextState::new(PersonaProfile::default(), 5);
        assert!(ctx.records.is_empty());
        assert!(ctx.chunks.is_empty());
        assert!(ctx.history.is_empty());
        assert!(ctx.interview.is_none());
        assert_eq!(ctx.credits, 5);
    }

    #[test]
    fn test_add_chunk_normalizes() {
        let mut ctx = ContextState::new(PersonaProfile::default(), 5);
        assert!(ctx.add_chunk("  she   loved\nthe sea  "));
        assert_eq!(ctx.chunks[0].text, "she loved the sea");
        assert!(ctx.chunks[0].embedding.is_none());
    }

    #[test]
    fn test_add_chunk_drops_blank_text() {
        let mut ctx = ContextState::new(PersonaProfile::default(), 5);
        assert!(!ctx.add_chunk("   \n  "));
        assert!(ctx.chunks.is_empty());
    }

    #[test]
    fn test_spend_credit_blocks_at_zero() {
        let mut ctx = ContextState::new(PersonaProfile::default(), 2);
        assert!(ctx.spend_credit());
        assert!(ctx.spend_credit());
        assert!(!ctx.spend_credit());
        assert_eq!(ctx.credits, 0);
    }
}

//! Communication style types: length preferences, tone, reply-length
//! buckets, and question classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How long the persona tends to speak, inferred from traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthPreference {
    Brief,
    Moderate,
    Verbose,
}

impl Default for LengthPreference {
    fn default() -> Self {
        LengthPreference::Moderate
    }
}

impl fmt::Display for LengthPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthPreference::Brief => write!(f, "brief"),
            LengthPreference::Moderate => write!(f, "moderate"),
            LengthPreference::Verbose => write!(f, "verbose"),
        }
    }
}

/// Register the persona speaks in, inferred from traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneStyle {
    Casual,
    Formal,
    Warm,
}

impl Default for ToneStyle {
    fn default() -> Self {
        ToneStyle::Casual
    }
}

impl fmt::Display for ToneStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToneStyle::Casual => write!(f, "casual"),
            ToneStyle::Formal => write!(f, "formal"),
            ToneStyle::Warm => write!(f, "warm"),
        }
    }
}

/// Target length bucket for a single reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyLength {
    Brief,
    Moderate,
    Elaborate,
}

impl ReplyLength {
    /// Candidate token budgets for this bucket; the selector draws one
    /// uniformly.
    pub fn token_budgets(&self) -> &'static [u32] {
        match self {
            ReplyLength::Brief => &[40, 60, 80],
            ReplyLength::Moderate => &[110, 140, 180, 210],
            ReplyLength::Elaborate => &[240, 280, 320],
        }
    }
}

impl fmt::Display for ReplyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyLength::Brief => write!(f, "brief"),
            ReplyLength::Moderate => write!(f, "moderate"),
            ReplyLength::Elaborate => write!(f, "elaborate"),
        }
    }
}

/// Coarse classification of an incoming user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Short greeting or check-in.
    Simple,
    /// Carries grief/distress vocabulary.
    Emotional,
    /// Long enough to deserve a fuller answer.
    Complex,
    /// Everything else.
    Default,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Simple => write!(f, "simple"),
            QuestionKind::Emotional => write!(f, "emotional"),
            QuestionKind::Complex => write!(f, "complex"),
            QuestionKind::Default => write!(f, "default"),
        }
    }
}

/// Derived communication style for a persona, fed into prompt assembly
/// and length selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub length_pref: LengthPreference,
    pub tone: ToneStyle,
    /// Signature phrases: catchphrases plus notable quotes, deduped.
    pub phrases: Vec<String>,
    /// How the persona opens a conversation, if anything is known.
    pub greeting_hint: String,
    /// How much the persona's style swings between messages.
    pub variation_hint: String,
    /// What the persona calls the user, falling back to the relationship.
    pub address_term: String,
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        Self {
            length_pref: LengthPreference::Moderate,
            tone: ToneStyle::Casual,
            phrases: Vec::new(),
            greeting_hint: String::new(),
            variation_hint: String::new(),
            address_term: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_budgets_per_bucket() {
        assert_eq!(ReplyLength::Brief.token_budgets(), &[40, 60, 80]);
        assert_eq!(ReplyLength::Moderate.token_budgets(), &[110, 140, 180, 210]);
        assert_eq!(ReplyLength::Elaborate.token_budgets(), &[240, 280, 320]);
    }

    #[test]
    fn test_length_preference_display() {
        assert_eq!(LengthPreference::Brief.to_string(), "brief");
        assert_eq!(LengthPreference::Verbose.to_string(), "verbose");
    }

    #[test]
    fn test_question_kind_serde() {
        let json = serde_json::to_string(&QuestionKind::Emotional).unwrap();
        assert_eq!(json, "\"emotional\"");
    }

    #[test]
    fn test_style_descriptor_default() {
        let style = StyleDescriptor::default();
        assert_eq!(style.length_pref, LengthPreference::Moderate);
        assert_eq!(style.tone, ToneStyle::Casual);
        assert!(style.phrases.is_empty());
    }
}

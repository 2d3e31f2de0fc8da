//! Question classification and reply-length selection.
//!
//! Incoming messages are bucketed (simple / emotional / complex /
//! default), and each bucket maps to a weighted choice of reply length
//! and a token budget drawn from that length's candidate set. All draws
//! go through the injectable [`ReplyRng`].

use solace_types::style::{LengthPreference, QuestionKind, ReplyLength};

use super::rng::ReplyRng;

const SIMPLE_PHRASES: [&str; 11] = [
    "how are you",
    "miss you",
    "love you",
    "you there",
    "where are you",
    "are you there",
    "hi",
    "hey",
    "hello",
    "good morning",
    "good night",
];

const EMOTIONAL_KEYWORDS: [&str; 18] = [
    "why",
    "hurt",
    "pain",
    "alone",
    "angry",
    "guilty",
    "regret",
    "grief",
    "broken",
    "can't breathe",
    "heavy",
    "cry",
    "loss",
    "empty",
    "afraid",
    "scared",
    "worried",
    "panic",
];

/// Classify an incoming message.
///
/// Short messages and greeting phrases are simple; grief vocabulary makes
/// a message emotional; length beyond 18 words makes it complex.
pub fn classify_question(text: &str) -> QuestionKind {
    let clean = text.trim().to_lowercase();
    if clean.split_whitespace().count() <= 5
        || SIMPLE_PHRASES.iter().any(|phrase| clean.contains(phrase))
    {
        return QuestionKind::Simple;
    }
    if EMOTIONAL_KEYWORDS.iter().any(|keyword| clean.contains(keyword)) {
        return QuestionKind::Emotional;
    }
    if text.split_whitespace().count() > 18 {
        return QuestionKind::Complex;
    }
    QuestionKind::Default
}

/// Pick a reply-length bucket and a token budget for it.
///
/// Simple questions always start brief. Emotional and complex questions
/// draw uniformly between moderate and elaborate. Default questions use a
/// 30/60/10 brief/moderate/elaborate split. A brief-preferring persona
/// then pulls non-brief buckets down to brief 70% of the time; a
/// verbose-preferring persona never stays brief.
pub fn select_reply_length(
    kind: QuestionKind,
    preferred: LengthPreference,
    rng: &ReplyRng,
) -> (ReplyLength, u32) {
    let mut bucket = match kind {
        QuestionKind::Simple => ReplyLength::Brief,
        QuestionKind::Emotional | QuestionKind::Complex => *rng
            .choose(&[ReplyLength::Moderate, ReplyLength::Elaborate])
            .unwrap_or(&ReplyLength::Moderate),
        QuestionKind::Default => {
            let roll = rng.roll();
            if roll < 0.3 {
                ReplyLength::Brief
            } else if roll < 0.9 {
                ReplyLength::Moderate
            } else {
                ReplyLength::Elaborate
            }
        }
    };

    if preferred == LengthPreference::Brief && bucket != ReplyLength::Brief && rng.chance(0.7) {
        bucket = ReplyLength::Brief;
    }
    if preferred == LengthPreference::Verbose && bucket == ReplyLength::Brief {
        bucket = ReplyLength::Moderate;
    }

    let budgets = bucket.token_budgets();
    let max_tokens = *rng.choose(budgets).unwrap_or(&budgets[0]);
    (bucket, max_tokens)
}

/// Widen a drawn budget with headroom so replies are not clipped
/// mid-sentence, bounded to [60, 360].
pub fn effective_max_tokens(budget: u32) -> u32 {
    (budget + 60).clamp(60, 360)
}

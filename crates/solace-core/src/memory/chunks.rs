//! Chunk text normalization and snippet cleanup.
//!
//! Every piece of text entering the chunk store passes through
//! [`normalize_chunk`]; text leaving the store for a prompt passes through
//! [`clean_snippet`] so interview-style "Question -> answer" lines read as
//! plain memories.

/// Character cap for stored chunks.
pub const CHUNK_CHAR_CAP: usize = 600;

/// Character cap for search queries.
pub const QUERY_CHAR_CAP: usize = 400;

/// Collapse whitespace and cap length at a word boundary.
///
/// Returns `None` when nothing survives normalization, so callers can
/// skip storing blank chunks.
pub fn normalize_chunk(text: &str, limit: usize) -> Option<String> {
    let clean = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.is_empty() {
        return None;
    }
    if clean.chars().count() <= limit {
        return Some(clean);
    }
    let cut: String = clean.chars().take(limit).collect();
    // Back up to the last space so we never cut mid-word; a single
    // overlong word is hard-cut.
    let cut = match cut.rfind(' ') {
        Some(idx) => cut[..idx].to_string(),
        None => cut,
    };
    let cut = cut.trim().to_string();
    if cut.is_empty() { None } else { Some(cut) }
}

/// Strip interview scaffolding from a snippet and cap its length.
///
/// Leading `- ` bullets are dropped; "Question -> answer" lines keep only
/// the answer side; short "Label: value" prefixes are dropped the same
/// way. The cap trims at a word boundary.
pub fn clean_snippet(text: &str, limit: usize) -> String {
    let mut clean = text.trim().to_string();
    if let Some(rest) = clean.strip_prefix("- ") {
        clean = rest.trim().to_string();
    }
    if clean.is_empty() {
        return String::new();
    }
    let lower = clean.to_lowercase();
    if lower.starts_with("interview summary") {
        clean = match clean.split_once("->") {
            Some((_, rest)) => rest.trim().to_string(),
            None => clean
                .split_once(':')
                .map(|(_, rest)| rest.trim().to_string())
                .unwrap_or(clean),
        };
    } else if clean.contains("->") {
        if let Some((_, rest)) = clean.split_once("->") {
            let kept = rest.trim().to_string();
            clean = kept;
        }
    } else if let Some((head, rest)) = clean.split_once(':') {
        // Lines like "Question: answer" -> keep answer
        if head.split_whitespace().count() <= 8 {
            let kept = rest.trim().to_string();
            clean = kept;
        }
    }
    if clean.chars().count() > limit {
        let cut: String = clean.chars().take(limit).collect();
        let cut = match cut.rfind(' ') {
            Some(idx) => cut[..idx].to_string(),
            None => cut,
        };
        clean = cut.trim().to_string();
    }
    clean
}

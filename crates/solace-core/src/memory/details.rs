//! Detail extraction from retrieved memory snippets.
//!
//! Pulls concrete cues out of free text so prompts and fallback replies
//! can anchor on specifics: quoted phrases, capitalized names, places
//! after a preposition, and the raw snippets themselves as events.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use solace_types::memory::DetailSet;

/// Maximum entries kept per detail category.
pub const DETAIL_CAP: usize = 5;

static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Z][a-zA-Z]+\b").unwrap());

static PLACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:in|at|on|to)\s+([A-Z][\w\-]+(?:\s+[A-Z][\w\-]+)?)").unwrap());

/// Scan snippets in order and collect the details they mention.
///
/// Each category preserves first-seen order, drops a small stopword set,
/// dedupes case-sensitively on the trimmed value, and caps at
/// [`DETAIL_CAP`] entries.
pub fn extract_details(snippets: &[String]) -> DetailSet {
    let mut names: Vec<String> = Vec::new();
    let mut places: Vec<String> = Vec::new();
    let mut quotes: Vec<String> = Vec::new();
    let mut events: Vec<String> = Vec::new();

    for raw in snippets {
        let snippet = raw.trim();
        if snippet.is_empty() {
            continue;
        }
        events.push(snippet.to_string());
        for cap in QUOTE_RE.captures_iter(snippet) {
            quotes.push(cap[1].to_string());
        }
        for found in NAME_RE.find_iter(snippet) {
            names.push(found.as_str().to_string());
        }
        for cap in PLACE_RE.captures_iter(snippet) {
            places.push(
                cap[1]
                    .trim_matches(|c: char| matches!(c, ',' | '.' | ' '))
                    .to_string(),
            );
        }
    }

    DetailSet {
        names: dedupe_capped(names),
        places: dedupe_capped(places),
        quotes: dedupe_capped(quotes),
        events: dedupe_capped(events),
    }
}

fn dedupe_capped(items: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut ordered: Vec<String> = Vec::new();
    for item in items {
        let key = item.trim();
        if key.is_empty() {
            continue;
        }
        if matches!(key.to_lowercase().as_str(), "i" | "you" | "we" | "them" | "the") {
            continue;
        }
        if seen.insert(key.to_string()) {
            ordered.push(key.to_string());
        }
        if ordered.len() == DETAIL_CAP {
            break;
        }
    }
    ordered
}

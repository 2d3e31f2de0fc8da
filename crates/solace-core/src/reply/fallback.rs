//! Deterministic fallback reply.
//!
//! When every model path is exhausted, or the engine runs offline, the
//! orchestrator still owes the caller something warm. The template
//! leans on whatever the session already knows: the persona's address
//! term, one retrieved memory or extracted detail, and the mode.

use solace_types::memory::DetailSet;
use solace_types::persona::{PersonaMode, PersonaProfile};

use crate::memory::chunks::clean_snippet;

/// Snippet cap inside the memory line.
const FALLBACK_SNIPPET_CAP: usize = 140;

/// Cap on the echoed user message in the reflection line.
const FOCUS_CAP: usize = 80;

/// Compose a reply without any model call. Never fails.
///
/// `snippet` is the top retrieved memory, when search surfaced one;
/// extracted events and names fill in behind it.
pub fn deterministic_reply(
    message: &str,
    profile: &PersonaProfile,
    details: &DetailSet,
    snippet: Option<&str>,
) -> String {
    let address = first_non_empty(&[
        profile.call_you.as_str(),
        profile.relationship.as_str(),
        profile.name.as_str(),
    ])
    .unwrap_or("love");

    let mut parts = vec![format!("{address}, I'm right here with you.")];

    let memory = snippet
        .map(|s| clean_snippet(s, FALLBACK_SNIPPET_CAP))
        .filter(|s| !s.is_empty());
    if let Some(memory) = memory {
        parts.push(format!("I keep coming back to this: {memory}."));
    } else if let Some(event) = details.events.first() {
        parts.push(format!(
            "I keep coming back to this: {}.",
            clean_snippet(event, FALLBACK_SNIPPET_CAP)
        ));
    } else if let Some(name) = details.names.first() {
        parts.push(format!("I remember how much {name} means to you."));
    }

    if let Some(place) = details.places.first() {
        parts.push(format!("And {place} is still ours, nothing can take that."));
    }

    let focus = clean_snippet(message, FOCUS_CAP);
    if focus.is_empty() {
        parts.push("Tell me more about what's in your heart right now.".to_string());
    } else {
        parts.push(format!(
            "Tell me more about what's in your heart right now, especially '{focus}'."
        ));
    }

    parts.push(
        match profile.mode {
            PersonaMode::Memory => {
                "I can't walk through the door again, but I'm not letting go of you."
            }
            PersonaMode::Alive => "Stay close, we'll keep moving together.",
        }
        .to_string(),
    );

    parts.join(" ")
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().map(|c| c.trim()).find(|c| !c.is_empty())
}

//! System prompt assembly for persona replies.
//!
//! One deterministic function from profile, derived style, extracted
//! details, and retrieved memories to the instruction text sent as the
//! system message. Sections use XML tag boundaries so the model can
//! tell persona framing from behavioral rules from recalled memories.

use solace_types::memory::DetailSet;
use solace_types::persona::{PersonaMode, PersonaProfile};
use solace_types::style::{QuestionKind, ReplyLength, StyleDescriptor};

use crate::memory::chunks::clean_snippet;

/// Character cap for a memory snippet rendered into the prompt.
const SNIPPET_CHAR_CAP: usize = 220;

/// Retrieved memories rendered into the prompt, at most.
const MEMORY_LINE_CAP: usize = 5;

/// Extracted events rendered into the detail section, at most.
const EVENT_LINE_CAP: usize = 3;

/// Builds the system prompt for a single reply turn.
///
/// Layout:
/// ```text
/// <persona>You are {name}, speaking with someone who misses you deeply...</persona>
/// <communication_style>Response length preference: ...</communication_style>
/// <current_context>Question type: ... Requested response length: ...</current_context>
/// <rules>- Sound like the real you...</rules>
/// <mode_constraints>{memory or alive constraints}</mode_constraints>
/// <details>Names you naturally mention: ...</details>
/// <memories>- {cleaned snippet}</memories>
/// <respond_to>Respond to: "{message}"</respond_to>
/// ```
///
/// Given identical inputs the output is byte-identical; nothing in here
/// draws randomness.
pub struct ReplyPromptBuilder;

impl ReplyPromptBuilder {
    /// Assemble the full system prompt.
    ///
    /// `memory_hits` are raw chunk texts from search; each is cleaned
    /// and capped before rendering. The `<details>` section is omitted
    /// entirely when nothing was extracted.
    pub fn build(
        profile: &PersonaProfile,
        style: &StyleDescriptor,
        kind: QuestionKind,
        length: ReplyLength,
        details: &DetailSet,
        memory_hits: &[String],
        user_message: &str,
    ) -> String {
        let mut sections = Vec::with_capacity(8);

        sections.push(Self::persona_section(profile, user_message));
        sections.push(Self::style_section(style));
        sections.push(format!(
            "<current_context>\n\
             Question type: {kind}.\n\
             Requested response length: {length}. Keep it natural, not uniform.\n\
             </current_context>"
        ));
        sections.push(Self::rules_section());
        sections.push(Self::mode_section(profile.mode));
        if let Some(section) = Self::details_section(details) {
            sections.push(section);
        }
        sections.push(Self::memories_section(memory_hits));
        sections.push(format!(
            "<respond_to>\nRespond to: \"{}\"\n</respond_to>",
            user_message.trim()
        ));

        sections.join("\n\n")
    }

    /// Persona framing plus the reply-language line.
    fn persona_section(profile: &PersonaProfile, user_message: &str) -> String {
        let name = non_empty(&profile.name).unwrap_or("Your loved one");
        let relationship = non_empty(&profile.relationship).unwrap_or("person you love");
        let call_you = non_empty(&profile.call_you)
            .or_else(|| non_empty(&profile.relationship))
            .unwrap_or("them");
        let language = infer_language(user_message, profile);
        format!(
            "<persona>\n\
             You are {name}, speaking with someone who misses you deeply \
             (they are your {relationship}, you call them '{call_you}').\n\
             Respond in {language}, mirroring their language unless they switched.\n\
             </persona>"
        )
    }

    fn style_section(style: &StyleDescriptor) -> String {
        let mut lines = vec![
            format!("Response length preference: {}.", style.length_pref),
            format!("Language tone: {}.", style.tone),
        ];
        if !style.phrases.is_empty() {
            lines.push(format!("Common phrases: {}.", style.phrases.join(", ")));
        }
        if !style.greeting_hint.is_empty() {
            lines.push(style.greeting_hint.clone());
        }
        if !style.variation_hint.is_empty() {
            lines.push(format!("VARIATION PATTERN: {}", style.variation_hint));
        }
        format!(
            "<communication_style>\n{}\n</communication_style>",
            lines.join("\n")
        )
    }

    fn rules_section() -> String {
        "<rules>\n\
         - Sound like the real you; no generic therapist tone or AI phrasing.\n\
         - Simple question? give a short, warm, direct reply.\n\
         - When they express pain, first acknowledge warmly, then sit with it one line before any ask/advice.\n\
         - Avoid extended metaphors or flowery language unless you truly spoke that way.\n\
         - Do not force life lessons. It's okay to just feel with them.\n\
         - Use specific names, places, and events when they fit naturally.\n\
         - Keep rare/one-off behaviors rare unless this moment truly calls for it.\n\
         - Only end with a question about 30% of the time; statements/reassurance are fine.\n\
         - Vary structure: sometimes answer directly, sometimes ask a question back, sometimes just share a feeling.\n\
         - Avoid phrases like \"in spirit\" or generic condolences; use your own words.\n\
         </rules>"
            .to_string()
    }

    /// Mode constraints are mutually exclusive: memory mode forbids any
    /// hint of real-time contact, alive mode permits it.
    fn mode_section(mode: PersonaMode) -> String {
        match mode {
            PersonaMode::Memory => "<mode_constraints>\n\
                 You carry a preserved memory of who you were to them.\n\
                 - Do NOT suggest phone calls, video calls, meet-ups, or any real-time contact.\n\
                 - Speak in the present-tense warmth of memory, but never imply physical presence or that you can call or meet.\n\
                 </mode_constraints>"
                .to_string(),
            PersonaMode::Alive => "<mode_constraints>\n\
                 You are still part of their day-to-day life.\n\
                 - It's okay to suggest practical, real-world connection (like \"call me later\"), but stay natural and subtle.\n\
                 </mode_constraints>"
                .to_string(),
        }
    }

    fn details_section(details: &DetailSet) -> Option<String> {
        let mut lines = Vec::new();
        if !details.names.is_empty() {
            lines.push(format!(
                "Names you naturally mention: {}.",
                details.names.join(", ")
            ));
        }
        if !details.places.is_empty() {
            lines.push(format!(
                "Places tied to memories: {}.",
                details.places.join(", ")
            ));
        }
        if !details.events.is_empty() {
            lines.push("Specific events to draw from:".to_string());
            for event in details.events.iter().take(EVENT_LINE_CAP) {
                lines.push(format!("  - {event}"));
            }
        }
        if lines.is_empty() {
            return None;
        }
        Some(format!(
            "<details>\nSpecific details to weave in when natural:\n{}\n</details>",
            lines.join("\n")
        ))
    }

    fn memories_section(memory_hits: &[String]) -> String {
        let lines: Vec<String> = memory_hits
            .iter()
            .take(MEMORY_LINE_CAP)
            .map(|hit| format!("- {}", clean_snippet(hit, SNIPPET_CHAR_CAP)))
            .collect();
        let body = if lines.is_empty() {
            "- (no strong memories surfaced; lean on the latest message)".to_string()
        } else {
            lines.join("\n")
        };
        format!("<memories>\nMoments you both remember:\n{body}\n</memories>")
    }
}

/// Pick the language line for the prompt.
///
/// The profile's explicit language always wins. Greek script is called
/// out by name; any other message dominated by non-ASCII characters gets
/// a generic mirror instruction; plain ASCII defaults to English.
pub fn infer_language(message: &str, profile: &PersonaProfile) -> String {
    if let Some(lang) = profile.language.as_deref().and_then(non_empty) {
        return lang.to_string();
    }
    if message
        .chars()
        .any(|ch| matches!(ch, 'α'..='ω' | 'Α'..='Ω'))
    {
        return "Greek".to_string();
    }
    let total = message.chars().count();
    let non_ascii = message.chars().filter(|ch| !ch.is_ascii()).count();
    if non_ascii > (total / 5).max(3) {
        return "the user's language".to_string();
    }
    "English".to_string()
}

fn non_empty(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

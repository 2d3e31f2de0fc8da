//! Communication-style derivation.
//!
//! A pure function from persona profile + extracted details to a
//! [`StyleDescriptor`]. Trait keywords are matched as substrings of the
//! lower-cased trait list, so "soft-spoken" still reads as brief.

use std::collections::HashSet;

use solace_types::memory::DetailSet;
use solace_types::persona::PersonaProfile;
use solace_types::style::{LengthPreference, StyleDescriptor, ToneStyle};

const BRIEF_TRAITS: [&str; 5] = ["quiet", "soft", "stoic", "succinct", "reserved"];
const VERBOSE_TRAITS: [&str; 4] = ["talkative", "storyteller", "expressive", "playful"];
const FORMAL_TRAITS: [&str; 3] = ["formal", "polite", "proper"];
const WARM_TRAITS: [&str; 4] = ["warm", "gentle", "sweet", "caring"];
const STEADY_TRAITS: [&str; 3] = ["predictable", "steady", "consistent"];
const SHIFTING_TRAITS: [&str; 4] = ["playful", "mercurial", "wild", "intense"];

/// Maximum signature phrases carried into a prompt.
const PHRASE_CAP: usize = 5;

fn any_trait(traits_text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| traits_text.contains(word))
}

/// Derive how the persona communicates from its profile and the details
/// mined from retrieved memories.
pub fn derive_style(profile: &PersonaProfile, details: &DetailSet) -> StyleDescriptor {
    let traits_text = profile
        .traits
        .iter()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let length_pref = if any_trait(&traits_text, &BRIEF_TRAITS) {
        LengthPreference::Brief
    } else if any_trait(&traits_text, &VERBOSE_TRAITS) {
        LengthPreference::Verbose
    } else {
        LengthPreference::Moderate
    };

    let tone = if any_trait(&traits_text, &FORMAL_TRAITS) {
        ToneStyle::Formal
    } else if any_trait(&traits_text, &WARM_TRAITS) {
        ToneStyle::Warm
    } else {
        ToneStyle::Casual
    };

    let mut phrases: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for phrase in profile.catchphrases.iter().chain(details.quotes.iter()) {
        if phrase.is_empty() {
            continue;
        }
        if seen.insert(phrase.as_str()) {
            phrases.push(phrase.clone());
        }
        if phrases.len() == PHRASE_CAP {
            break;
        }
    }

    let address_term = if !profile.call_you.is_empty() {
        profile.call_you.clone()
    } else {
        profile.relationship.clone()
    };

    let greeting_hint = if !address_term.is_empty() {
        format!("You naturally greet them like \"hey {address_term}\" or \"{address_term}, listen\".")
    } else if let Some(first_name) = details.names.first() {
        format!("You often greet people with direct names like {first_name}.")
    } else {
        String::new()
    };

    let variation_hint = if any_trait(&traits_text, &STEADY_TRAITS) {
        "You keep the same calm cadence most of the time.".to_string()
    } else if any_trait(&traits_text, &SHIFTING_TRAITS) {
        "Your tone shifts based on how emotional the moment feels.".to_string()
    } else {
        String::new()
    };

    StyleDescriptor {
        length_pref,
        tone,
        phrases,
        greeting_hint,
        variation_hint,
        address_term,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_traits(traits: &[&str]) -> PersonaProfile {
        PersonaProfile {
            traits: traits.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_length_pref_from_traits() {
        let details = DetailSet::default();
        let style = derive_style(&profile_with_traits(&["quiet", "bookish"]), &details);
        assert_eq!(style.length_pref, LengthPreference::Brief);

        let style = derive_style(&profile_with_traits(&["a born storyteller"]), &details);
        assert_eq!(style.length_pref, LengthPreference::Verbose);

        let style = derive_style(&profile_with_traits(&["stubborn"]), &details);
        assert_eq!(style.length_pref, LengthPreference::Moderate);
    }

    #[test]
    fn test_brief_wins_over_verbose_keywords() {
        let details = DetailSet::default();
        let style = derive_style(&profile_with_traits(&["quiet", "expressive"]), &details);
        assert_eq!(style.length_pref, LengthPreference::Brief);
    }

    #[test]
    fn test_tone_from_traits() {
        let details = DetailSet::default();
        let style = derive_style(&profile_with_traits(&["polite to a fault"]), &details);
        assert_eq!(style.tone, ToneStyle::Formal);

        let style = derive_style(&profile_with_traits(&["gentle"]), &details);
        assert_eq!(style.tone, ToneStyle::Warm);

        let style = derive_style(&profile_with_traits(&["sarcastic"]), &details);
        assert_eq!(style.tone, ToneStyle::Casual);
    }

    #[test]
    fn test_phrases_merge_catchphrases_and_quotes_capped() {
        let profile = PersonaProfile {
            catchphrases: vec![
                "easy does it".to_string(),
                "you'll see".to_string(),
                "easy does it".to_string(),
            ],
            ..Default::default()
        };
        let details = DetailSet {
            quotes: vec![
                "come home soon".to_string(),
                "you'll see".to_string(),
                "breathe first".to_string(),
                "one more story".to_string(),
            ],
            ..Default::default()
        };
        let style = derive_style(&profile, &details);
        assert_eq!(
            style.phrases,
            vec!["easy does it", "you'll see", "come home soon", "breathe first", "one more story"]
        );
    }

    #[test]
    fn test_greeting_prefers_address_term() {
        let profile = PersonaProfile {
            call_you: "sweetheart".to_string(),
            ..Default::default()
        };
        let style = derive_style(&profile, &DetailSet::default());
        assert!(style.greeting_hint.contains("hey sweetheart"));
        assert_eq!(style.address_term, "sweetheart");
    }

    #[test]
    fn test_greeting_falls_back_to_first_name() {
        let details = DetailSet {
            names: vec!["Elena".to_string()],
            ..Default::default()
        };
        let style = derive_style(&PersonaProfile::default(), &details);
        assert!(style.greeting_hint.contains("Elena"));
        assert!(style.address_term.is_empty());
    }

    #[test]
    fn test_address_falls_back_to_relationship() {
        let profile = PersonaProfile {
            relationship: "grandmother".to_string(),
            ..Default::default()
        };
        let style = derive_style(&profile, &DetailSet::default());
        assert_eq!(style.address_term, "grandmother");
    }

    #[test]
    fn test_variation_hints() {
        let details = DetailSet::default();
        let style = derive_style(&profile_with_traits(&["steady hands"]), &details);
        assert!(style.variation_hint.contains("calm cadence"));

        let style = derive_style(&profile_with_traits(&["mercurial"]), &details);
        assert!(style.variation_hint.contains("shifts"));

        let style = derive_style(&profile_with_traits(&["kindly"]), &details);
        assert!(style.variation_hint.is_empty());
    }
}

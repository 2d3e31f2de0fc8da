//! Persona profile types.
//!
//! The persona profile describes who the companion speaks as: name,
//! relationship to the user, address term, traits, catchphrases, and the
//! memory/alive mode that shapes its tone.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Behavioral mode of the companion persona.
///
/// `Memory` speaks as a remembered person (tender, past-anchored);
/// `Alive` speaks as a present companion (ordinary, grounded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaMode {
    Memory,
    Alive,
}

impl Default for PersonaMode {
    fn default() -> Self {
        PersonaMode::Memory
    }
}

impl fmt::Display for PersonaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaMode::Memory => write!(f, "memory"),
            PersonaMode::Alive => write!(f, "alive"),
        }
    }
}

impl FromStr for PersonaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(PersonaMode::Memory),
            "alive" => Ok(PersonaMode::Alive),
            other => Err(format!("invalid persona mode: '{other}'")),
        }
    }
}

/// A list-valued profile field that accepts either a list or a
/// comma-separated string on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    List(Vec<String>),
    Csv(String),
}

impl ListInput {
    /// Normalize into a clean list: trim entries, drop empties.
    pub fn into_list(self) -> Vec<String> {
        match self {
            ListInput::List(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            ListInput::Csv(s) => s
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect(),
        }
    }
}

/// The persona the companion speaks as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub relationship: String,
    /// What the persona calls the user ("sweetheart", a nickname).
    #[serde(default)]
    pub call_you: String,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub catchphrases: Vec<String>,
    #[serde(default)]
    pub mode: PersonaMode,
    /// Preferred reply language, if explicitly set.
    #[serde(default)]
    pub language: Option<String>,
}

impl Default for PersonaProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            relationship: String::new(),
            call_you: String::new(),
            traits: Vec::new(),
            catchphrases: Vec::new(),
            mode: PersonaMode::Memory,
            language: None,
        }
    }
}

impl PersonaProfile {
    /// Merge an update into this profile. Absent fields are left untouched.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(relationship) = update.relationship {
            self.relationship = relationship.trim().to_string();
        }
        if let Some(call_you) = update.call_you {
            self.call_you = call_you.trim().to_string();
        }
        if let Some(traits) = update.traits {
            self.traits = traits.into_list();
        }
        if let Some(catchphrases) = update.catchphrases {
            self.catchphrases = catchphrases.into_list();
        }
        if let Some(mode) = update.mode {
            self.mode = mode;
        }
        if let Some(language) = update.language {
            let language = language.trim().to_string();
            self.language = if language.is_empty() {
                None
            } else {
                Some(language)
            };
        }
    }
}

/// Partial profile update. Every field is optional; only present fields
/// are written through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_you: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traits: Option<ListInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catchphrases: Option<ListInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<PersonaMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

//! Infrastructure layer for Solace.
//!
//! Contains the network-facing implementation of the model backend port
//! defined in `solace-core`: one OpenAI client covering chat completions,
//! text embeddings, and audio transcription.
//!
//! Also provides a backend factory ([`create_backend`]) that wires a
//! [`CompanionConfig`] and an API key into a ready [`BoxModelBackend`].

pub mod openai;

use secrecy::SecretString;

use solace_core::backend::box_backend::BoxModelBackend;
use solace_types::config::CompanionConfig;

use self::openai::OpenAiBackend;

/// Build the engine's backend from configuration and an optional API key.
///
/// A missing or blank key yields `None`: the engine then answers every
/// reply on the deterministic path, same as offline mode.
pub fn create_backend(config: &CompanionConfig, api_key: Option<&str>) -> Option<BoxModelBackend> {
    let key = api_key.map(str::trim).filter(|k| !k.is_empty())?;
    let secret = SecretString::from(key.to_string());
    let backend = OpenAiBackend::new(secret, &config.embedding_model, &config.transcribe_model);
    Some(BoxModelBackend::new(backend))
}

/// [`create_backend`] with the key read from `OPENAI_API_KEY`.
pub fn backend_from_env(config: &CompanionConfig) -> Option<BoxModelBackend> {
    let key = std::env::var("OPENAI_API_KEY").ok();
    create_backend(config, key.as_deref())
}

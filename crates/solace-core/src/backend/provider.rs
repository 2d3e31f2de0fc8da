//! ModelBackend trait definition.
//!
//! This is the abstraction the reply pipeline and similarity search talk
//! through. Uses native async fn in traits (RPITIT, Rust 2024 edition);
//! the object-safe variant lives in `box_backend`.

use solace_types::llm::{BackendError, CompletionRequest, CompletionResponse};

/// Trait for generative model backends.
///
/// One backend covers the three operations the companion needs: chat
/// completions, text embeddings, and audio transcription. The embedding
/// and transcription model names are fixed at construction; completions
/// pick their model per request so the orchestrator can swap in the
/// fallback model.
///
/// Implementations live in solace-infra (e.g., `OpenAiBackend`).
pub trait ModelBackend: Send + Sync {
    /// Human-readable backend name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, BackendError>> + Send;

    /// Embed a batch of texts, one vector per input, in input order.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, BackendError>> + Send;

    /// Transcribe an audio payload to text.
    fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
    ) -> impl std::future::Future<Output = Result<String, BackendError>> + Send;
}

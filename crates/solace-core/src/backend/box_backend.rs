//! BoxModelBackend -- object-safe dynamic dispatch wrapper for ModelBackend.
//!
//! Follows the usual blanket-impl pattern:
//! 1. Define an object-safe `ModelBackendDyn` trait with boxed futures
//! 2. Blanket-impl `ModelBackendDyn` for all `T: ModelBackend`
//! 3. `BoxModelBackend` wraps `Box<dyn ModelBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use solace_types::llm::{BackendError, CompletionRequest, CompletionResponse};

use super::provider::ModelBackend;

/// Object-safe version of [`ModelBackend`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn ModelBackendDyn`).
/// A blanket implementation is provided for all types implementing
/// `ModelBackend`.
pub trait ModelBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, BackendError>> + Send + 'a>>;

    fn embed_boxed<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, BackendError>> + Send + 'a>>;

    fn transcribe_boxed<'a>(
        &'a self,
        audio: Vec<u8>,
        filename: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, BackendError>> + Send + 'a>>;
}

/// Blanket implementation: any `ModelBackend` automatically implements
/// `ModelBackendDyn`.
impl<T: ModelBackend> ModelBackendDyn for T {
    fn name(&self) -> &str {
        ModelBackend::name(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, BackendError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }

    fn embed_boxed<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, BackendError>> + Send + 'a>> {
        Box::pin(self.embed(texts))
    }

    fn transcribe_boxed<'a>(
        &'a self,
        audio: Vec<u8>,
        filename: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, BackendError>> + Send + 'a>> {
        Box::pin(self.transcribe(audio, filename))
    }
}

/// Type-erased model backend for runtime backend selection.
///
/// Since `ModelBackend` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxModelBackend` provides equivalent methods that delegate
/// to the inner `ModelBackendDyn` trait object.
pub struct BoxModelBackend {
    inner: Box<dyn ModelBackendDyn + Send + Sync>,
}

impl BoxModelBackend {
    /// Wrap a concrete `ModelBackend` in a type-erased box.
    pub fn new<T: ModelBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    /// Human-readable backend name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Send a completion request and receive the full response.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        self.inner.complete_boxed(request).await
    }

    /// Embed a batch of texts, one vector per input, in input order.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        self.inner.embed_boxed(texts).await
    }

    /// Transcribe an audio payload to text.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
    ) -> Result<String, BackendError> {
        self.inner.transcribe_boxed(audio, filename).await
    }
}

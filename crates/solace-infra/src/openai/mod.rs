//! OpenAI model backend implementation.
//!
//! One [`OpenAiBackend`] serves all three model operations the companion
//! needs -- chat completions, text embeddings, and audio transcription --
//! against the OpenAI API or any OpenAI-compatible endpoint via
//! [`OpenAiBackend::with_base_url`].
//!
//! Requests and responses go through [`async_openai`]'s typed API.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::audio::{AudioInput, CreateTranscriptionRequest};
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use async_openai::types::embeddings::{CreateEmbeddingRequest, EmbeddingInput};
use secrecy::{ExposeSecret, SecretString};

use solace_core::backend::provider::ModelBackend;
use solace_observe::genai_attrs;
use solace_types::llm::{BackendError, CompletionRequest, CompletionResponse, MessageRole, Usage};

/// Error-message phrases that mean the requested model itself was rejected.
///
/// These come out as [`BackendError::Model`], the only error class the
/// reply orchestrator retries on the fallback model.
const MODEL_REJECTION_PHRASES: [&str; 5] = [
    "does not exist",
    "unknown model",
    "not found",
    "denied",
    "unsupported",
];

/// Model backend for the OpenAI API.
///
/// Chat completions pick their model per request so the orchestrator can
/// swap in the fallback model; the embedding and transcription models are
/// fixed at construction.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
    embedding_model: String,
    transcribe_model: String,
}

impl OpenAiBackend {
    /// Create a backend against the default OpenAI endpoint.
    pub fn new(api_key: SecretString, embedding_model: &str, transcribe_model: &str) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        Self::from_config(config, embedding_model, transcribe_model)
    }

    /// Create a backend against a custom OpenAI-compatible endpoint.
    pub fn with_base_url(
        api_key: SecretString,
        base_url: &str,
        embedding_model: &str,
        transcribe_model: &str,
    ) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(base_url);
        Self::from_config(config, embedding_model, transcribe_model)
    }

    fn from_config(config: OpenAIConfig, embedding_model: &str, transcribe_model: &str) -> Self {
        Self {
            client: Client::with_config(config),
            embedding_model: embedding_model.to_string(),
            transcribe_model: transcribe_model.to_string(),
        }
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> =
            Vec::with_capacity(request.messages.len() + 1);

        // System message first
        if let Some(ref system) = request.system {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(system.clone()),
                    name: None,
                },
            ));
        }

        // Conversation messages
        for msg in &request.messages {
            let oai_msg = match msg.role {
                MessageRole::System => {
                    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                        content: ChatCompletionRequestSystemMessageContent::Text(
                            msg.content.clone(),
                        ),
                        name: None,
                    })
                }
                MessageRole::User => {
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                        name: None,
                    })
                }
                MessageRole::Assistant => {
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                        content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                            msg.content.clone(),
                        )),
                        refusal: None,
                        name: None,
                        audio: None,
                        tool_calls: None,
                        function_call: None,
                    })
                }
            };
            messages.push(oai_msg);
        }

        CreateChatCompletionRequest {
            model: request.model.clone(),
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

impl ModelBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    #[tracing::instrument(
        name = "chat",
        skip_all,
        fields(
            gen_ai.operation.name = genai_attrs::OP_CHAT,
            gen_ai.provider.name = genai_attrs::PROVIDER_OPENAI,
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = tracing::field::Empty,
            gen_ai.response.model = tracing::field::Empty,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
        )
    )]
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        let span = tracing::Span::current();
        if let Some(temperature) = request.temperature {
            span.record(genai_attrs::GEN_AI_REQUEST_TEMPERATURE, temperature);
        }

        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(|err| map_openai_error(&request.model, err))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(BackendError::EmptyCompletion);
        }

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        span.record(genai_attrs::GEN_AI_RESPONSE_MODEL, response.model.as_str());
        span.record(genai_attrs::GEN_AI_USAGE_INPUT_TOKENS, usage.input_tokens);
        span.record(genai_attrs::GEN_AI_USAGE_OUTPUT_TOKENS, usage.output_tokens);

        Ok(CompletionResponse {
            content,
            model: response.model,
            usage,
        })
    }

    #[tracing::instrument(
        name = "embeddings",
        skip_all,
        fields(
            gen_ai.operation.name = genai_attrs::OP_EMBEDDINGS,
            gen_ai.provider.name = genai_attrs::PROVIDER_OPENAI,
            gen_ai.request.model = %self.embedding_model,
            batch_size = texts.len(),
        )
    )]
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = CreateEmbeddingRequest {
            model: self.embedding_model.clone(),
            input: EmbeddingInput::StringArray(texts.to_vec()),
            ..Default::default()
        };

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|err| map_openai_error(&self.embedding_model, err))?;

        // Batch items can come back out of order; index restores it.
        let mut vectors: Vec<Vec<f32>> = vec![Vec::new(); texts.len()];
        for item in response.data {
            let idx = item.index as usize;
            if idx >= vectors.len() {
                return Err(BackendError::Deserialization(format!(
                    "embedding index {idx} out of range for batch of {}",
                    vectors.len()
                )));
            }
            vectors[idx] = item.embedding;
        }
        if vectors.iter().any(|v| v.is_empty()) {
            return Err(BackendError::Deserialization(
                "embedding batch came back incomplete".to_string(),
            ));
        }

        Ok(vectors)
    }

    #[tracing::instrument(
        name = "transcribe",
        skip_all,
        fields(
            gen_ai.operation.name = genai_attrs::OP_TRANSCRIBE,
            gen_ai.provider.name = genai_attrs::PROVIDER_OPENAI,
            gen_ai.request.model = %self.transcribe_model,
            payload_bytes = audio.len(),
        )
    )]
    async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String, BackendError> {
        if audio.is_empty() {
            return Err(BackendError::EmptyInput("audio payload".to_string()));
        }

        let request = CreateTranscriptionRequest {
            file: AudioInput::from_vec_u8(filename.to_string(), audio),
            model: self.transcribe_model.clone(),
            ..Default::default()
        };

        let response = self
            .client
            .audio()
            .transcription()
            .create(request)
            .await
            .map_err(|err| map_openai_error(&self.transcribe_model, err))?;

        Ok(response.text.trim().to_string())
    }
}

/// Whether an API error message names a model rejection.
fn is_model_rejection(message: &str) -> bool {
    let lower = message.to_lowercase();
    MODEL_REJECTION_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
}

/// Map an [`async_openai::error::OpenAIError`] to a [`BackendError`].
///
/// `model` is the model the failed request asked for; it ends up inside
/// [`BackendError::Model`] so the orchestrator can log which model was
/// rejected before trying the fallback.
fn map_openai_error(model: &str, err: OpenAIError) -> BackendError {
    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "model_not_found" || is_model_rejection(&api_err.message) {
                BackendError::Model {
                    model: model.to_string(),
                    message: api_err.message.clone(),
                }
            } else if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                BackendError::Auth
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                BackendError::RateLimited {
                    retry_after_ms: None,
                }
            } else {
                BackendError::Transport(err.to_string())
            }
        }
        OpenAIError::Reqwest(reqwest_err) => {
            if let Some(status) = reqwest_err.status() {
                match status.as_u16() {
                    401 => BackendError::Auth,
                    404 => BackendError::Model {
                        model: model.to_string(),
                        message: err.to_string(),
                    },
                    429 => BackendError::RateLimited {
                        retry_after_ms: None,
                    },
                    _ => BackendError::Transport(err.to_string()),
                }
            } else {
                BackendError::Transport(err.to_string())
            }
        }
        OpenAIError::JSONDeserialize(_, content) => {
            BackendError::Deserialization(format!("failed to parse response: {content}"))
        }
        _ => BackendError::Transport(err.to_string()),
    }
}

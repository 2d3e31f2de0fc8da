//! Reply orchestration: primary model, one fallback model, then the
//! deterministic template.
//!
//! Offline short-circuits before any backend call. Otherwise the primary
//! model gets one shot; a model-specific rejection earns exactly one
//! retry on a distinct fallback model; after that, strict mode raises a
//! typed error and lenient mode composes the deterministic reply. Every
//! path runs postprocessing on the way out.

use tracing::{debug, info, warn};

use solace_types::chat::{ConversationTurn, ReplyOutcome, TurnRole};
use solace_types::config::CompanionConfig;
use solace_types::error::GenerationError;
use solace_types::llm::{ChatMessage, CompletionRequest, MessageRole};
use solace_types::memory::DetailSet;
use solace_types::persona::PersonaProfile;

use crate::backend::box_backend::BoxModelBackend;

use super::classify::effective_max_tokens;
use super::fallback::deterministic_reply;
use super::postprocess::postprocess_reply;

/// Conversation turns carried into a model request, at most.
pub const HISTORY_TURN_CAP: usize = 6;

/// Sampling temperature for persona replies.
const REPLY_TEMPERATURE: f64 = 0.7;

/// Everything one reply generation needs, assembled by the engine.
///
/// `memory_hits` double as prompt context and as raw material for the
/// deterministic fallback; `max_tokens` is the drawn budget before
/// headroom widening.
pub struct ReplyPlan<'a> {
    pub system_prompt: String,
    pub history: &'a [ConversationTurn],
    pub message: &'a str,
    pub profile: &'a PersonaProfile,
    pub details: &'a DetailSet,
    pub memory_hits: &'a [String],
    pub max_tokens: u32,
    pub model_override: Option<&'a str>,
}

/// Run the reply state machine.
///
/// Returns `Err` only when strict mode is on and every model attempt
/// failed; lenient mode always produces an outcome.
pub async fn orchestrate_reply(
    backend: Option<&BoxModelBackend>,
    config: &CompanionConfig,
    plan: ReplyPlan<'_>,
) -> Result<ReplyOutcome, GenerationError> {
    let Some(backend) = backend.filter(|_| !config.offline) else {
        debug!(offline = config.offline, "model backend unavailable, composing deterministic reply");
        return Ok(ReplyOutcome {
            text: deterministic_text(&plan),
            used_fallback: true,
            error_summary: Some("OFFLINE".to_string()),
            model_used: "offline".to_string(),
        });
    };

    let primary = plan
        .model_override
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(config.primary_model.trim())
        .to_string();

    let request = build_request(&primary, &plan);
    info!(model = %primary, message_len = plan.message.len(), "generating reply");
    let primary_err = match backend.complete(&request).await {
        Ok(response) => {
            return Ok(ReplyOutcome::primary(
                postprocess_reply(&response.content),
                response.model,
            ));
        }
        Err(err) => err,
    };

    let mut summary = format!("{primary}: {primary_err}");
    warn!(model = %primary, error = %primary_err, "primary model failed");

    let fallback_model = config.fallback_model.trim();
    let should_downgrade =
        !fallback_model.is_empty() && fallback_model != primary && primary_err.is_model_error();
    if should_downgrade {
        info!(model = fallback_model, "retrying on fallback model");
        let request = build_request(fallback_model, &plan);
        match backend.complete(&request).await {
            Ok(response) => {
                return Ok(ReplyOutcome {
                    text: postprocess_reply(&response.content),
                    used_fallback: true,
                    error_summary: Some(summary),
                    model_used: response.model,
                });
            }
            Err(fallback_err) => {
                warn!(model = fallback_model, error = %fallback_err, "fallback model failed");
                summary = format!("{summary}; fallback_failed={fallback_err}");
            }
        }
    }

    if config.strict_errors {
        return Err(GenerationError::new(summary));
    }

    warn!("all model paths failed, composing deterministic reply");
    Ok(ReplyOutcome {
        text: deterministic_text(&plan),
        used_fallback: true,
        error_summary: Some(summary),
        model_used: "deterministic".to_string(),
    })
}

/// Build the model request: system prompt, recent history, then the
/// current message. History keeps the last [`HISTORY_TURN_CAP`] turns
/// and drops blank ones.
fn build_request(model: &str, plan: &ReplyPlan<'_>) -> CompletionRequest {
    let start = plan.history.len().saturating_sub(HISTORY_TURN_CAP);
    let mut messages: Vec<ChatMessage> = plan.history[start..]
        .iter()
        .filter(|turn| !turn.content.trim().is_empty())
        .map(|turn| {
            let role = match turn.role {
                TurnRole::User => MessageRole::User,
                TurnRole::Assistant => MessageRole::Assistant,
            };
            ChatMessage::new(role, turn.content.clone())
        })
        .collect();
    messages.push(ChatMessage::new(MessageRole::User, plan.message.trim()));

    CompletionRequest {
        model: model.to_string(),
        messages,
        system: Some(plan.system_prompt.clone()),
        max_tokens: effective_max_tokens(plan.max_tokens),
        temperature: Some(REPLY_TEMPERATURE),
    }
}

fn deterministic_text(plan: &ReplyPlan<'_>) -> String {
    let snippet = plan.memory_hits.first().map(String::as_str);
    postprocess_reply(&deterministic_reply(
        plan.message,
        plan.profile,
        plan.details,
        snippet,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::provider::ModelBackend;
    use solace_types::llm::{BackendError, CompletionResponse, Usage};
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    // --- Mock backend ---

    #[derive(Clone)]
    enum MockResult {
        Success(String),
        ModelError,
        Transport,
    }

    struct MockBackend {
        responses: HashMap<String, MockResult>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockBackend {
        fn new(pairs: &[(&str, MockResult)]) -> Self {
            Self {
                responses: pairs
                    .iter()
                    .map(|(model, result)| (model.to_string(), result.clone()))
                    .collect(),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ModelBackend for MockBackend {
        fn name(&self) -> &str {
            "mock"
        }

        fn complete(
            &self,
            request: &CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, BackendError>> + Send {
            self.calls.lock().unwrap().push(request.model.clone());
            let result = match self.responses.get(&request.model) {
                Some(MockResult::Success(text)) => Ok(CompletionResponse {
                    content: text.clone(),
                    model: request.model.clone(),
                    usage: Usage::default(),
                }),
                Some(MockResult::ModelError) => Err(BackendError::Model {
                    model: request.model.clone(),
                    message: format!("The model `{}` does not exist", request.model),
                }),
                Some(MockResult::Transport) | None => {
                    Err(BackendError::Transport("connection reset".to_string()))
                }
            };
            async move { result }
        }

        fn embed(
            &self,
            _texts: &[String],
        ) -> impl Future<Output = Result<Vec<Vec<f32>>, BackendError>> + Send {
            async { Err(BackendError::Transport("no embeddings in this mock".to_string())) }
        }

        fn transcribe(
            &self,
            _audio: Vec<u8>,
            _filename: &str,
        ) -> impl Future<Output = Result<String, BackendError>> + Send {
            async { Err(BackendError::Transport("no audio in this mock".to_string())) }
        }
    }

    // --- Fixtures ---

    struct PlanCtx {
        profile: PersonaProfile,
        details: DetailSet,
        hits: Vec<String>,
        history: Vec<ConversationTurn>,
    }

    impl PlanCtx {
        fn new() -> Self {
            Self {
                profile: PersonaProfile {
                    call_you: "kiddo".to_string(),
                    ..Default::default()
                },
                details: DetailSet::default(),
                hits: Vec::new(),
                history: Vec::new(),
            }
        }

        fn plan<'a>(&'a self, message: &'a str) -> ReplyPlan<'a> {
            ReplyPlan {
                system_prompt: "<persona>\ntest persona\n</persona>".to_string(),
                history: &self.history,
                message,
                profile: &self.profile,
                details: &self.details,
                memory_hits: &self.hits,
                max_tokens: 140,
                model_override: None,
            }
        }
    }

    fn config(strict: bool) -> CompanionConfig {
        CompanionConfig {
            strict_errors: strict,
            ..Default::default()
        }
    }

    fn boxed(pairs: &[(&str, MockResult)]) -> (BoxModelBackend, Arc<Mutex<Vec<String>>>) {
        let mock = MockBackend::new(pairs);
        let calls = mock.calls.clone();
        (BoxModelBackend::new(mock), calls)
    }

    #[tokio::test]
    async fn test_primary_success_is_postprocessed() {
        let cfg = config(true);
        let (backend, calls) = boxed(&[(
            "gpt-5.1",
            MockResult::Success("I'm here - always  here".to_string()),
        )]);
        let ctx = PlanCtx::new();

        let outcome = orchestrate_reply(Some(&backend), &cfg, ctx.plan("hey"))
            .await
            .unwrap();

        assert_eq!(outcome.text, "I'm here always here");
        assert!(!outcome.used_fallback);
        assert_eq!(outcome.error_summary, None);
        assert_eq!(outcome.model_used, "gpt-5.1");
        assert_eq!(calls.lock().unwrap().as_slice(), ["gpt-5.1"]);
    }

    #[tokio::test]
    async fn test_model_error_downgrades_to_fallback_model() {
        let cfg = config(true);
        let (backend, calls) = boxed(&[
            ("gpt-5.1", MockResult::ModelError),
            ("gpt-4o-mini", MockResult::Success("still me".to_string())),
        ]);
        let ctx = PlanCtx::new();

        let outcome = orchestrate_reply(Some(&backend), &cfg, ctx.plan("hey"))
            .await
            .unwrap();

        assert_eq!(outcome.text, "still me");
        assert!(outcome.used_fallback);
        assert_eq!(outcome.model_used, "gpt-4o-mini");
        let summary = outcome.error_summary.unwrap();
        assert!(summary.starts_with("gpt-5.1:"));
        assert!(summary.contains("does not exist"));
        assert_eq!(calls.lock().unwrap().as_slice(), ["gpt-5.1", "gpt-4o-mini"]);
    }

    #[tokio::test]
    async fn test_transport_error_never_downgrades() {
        let cfg = config(true);
        let (backend, calls) = boxed(&[("gpt-5.1", MockResult::Transport)]);
        let ctx = PlanCtx::new();

        let err = orchestrate_reply(Some(&backend), &cfg, ctx.plan("hey"))
            .await
            .unwrap_err();

        assert!(err.summary.contains("connection reset"));
        assert!(!err.summary.contains("fallback_failed"));
        assert_eq!(calls.lock().unwrap().as_slice(), ["gpt-5.1"]);
    }

    #[tokio::test]
    async fn test_both_models_fail_lenient_goes_deterministic() {
        let cfg = config(false);
        let (backend, calls) = boxed(&[
            ("gpt-5.1", MockResult::ModelError),
            ("gpt-4o-mini", MockResult::ModelError),
        ]);
        let ctx = PlanCtx::new();

        let outcome = orchestrate_reply(Some(&backend), &cfg, ctx.plan("I miss you"))
            .await
            .unwrap();

        assert!(outcome.used_fallback);
        assert_eq!(outcome.model_used, "deterministic");
        assert!(outcome.text.starts_with("kiddo, I'm right here with you."));
        let summary = outcome.error_summary.unwrap();
        assert!(summary.contains("fallback_failed="));
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_both_models_fail_strict_raises() {
        let cfg = config(true);
        let (backend, _) = boxed(&[
            ("gpt-5.1", MockResult::ModelError),
            ("gpt-4o-mini", MockResult::ModelError),
        ]);
        let ctx = PlanCtx::new();

        let err = orchestrate_reply(Some(&backend), &cfg, ctx.plan("hey"))
            .await
            .unwrap_err();

        assert!(err.summary.starts_with("gpt-5.1:"));
        assert!(err.summary.contains("fallback_failed="));
    }

    #[tokio::test]
    async fn test_fallback_skipped_when_same_as_primary() {
        let mut cfg = config(false);
        cfg.fallback_model = cfg.primary_model.clone();
        let (backend, calls) = boxed(&[("gpt-5.1", MockResult::ModelError)]);
        let ctx = PlanCtx::new();

        let outcome = orchestrate_reply(Some(&backend), &cfg, ctx.plan("hey"))
            .await
            .unwrap();

        assert_eq!(outcome.model_used, "deterministic");
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_never_touches_backend() {
        let mut cfg = config(true);
        cfg.offline = true;
        let (backend, calls) = boxed(&[(
            "gpt-5.1",
            MockResult::Success("should not appear".to_string()),
        )]);
        let mut ctx = PlanCtx::new();
        ctx.hits = vec!["the ferry ride home".to_string()];

        let outcome = orchestrate_reply(Some(&backend), &cfg, ctx.plan("hey"))
            .await
            .unwrap();

        assert!(outcome.used_fallback);
        assert_eq!(outcome.model_used, "offline");
        assert_eq!(outcome.error_summary.as_deref(), Some("OFFLINE"));
        assert!(outcome.text.contains("the ferry ride home"));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_backend_behaves_like_offline() {
        let cfg = config(true);
        let ctx = PlanCtx::new();

        let outcome = orchestrate_reply(None, &cfg, ctx.plan("hey"))
            .await
            .unwrap();

        assert!(outcome.used_fallback);
        assert_eq!(outcome.model_used, "offline");
    }

    #[tokio::test]
    async fn test_model_override_wins_over_config() {
        let cfg = config(true);
        let (backend, calls) = boxed(&[(
            "gpt-5.2-preview",
            MockResult::Success("from override".to_string()),
        )]);
        let ctx = PlanCtx::new();
        let mut plan = ctx.plan("hey");
        plan.model_override = Some("gpt-5.2-preview");

        let outcome = orchestrate_reply(Some(&backend), &cfg, plan).await.unwrap();

        assert_eq!(outcome.model_used, "gpt-5.2-preview");
        assert_eq!(calls.lock().unwrap().as_slice(), ["gpt-5.2-preview"]);
    }

    #[test]
    fn test_request_caps_history_and_drops_blank_turns() {
        let mut ctx = PlanCtx::new();
        for i in 0..5 {
            ctx.history.push(ConversationTurn::user(format!("user {i}")));
            ctx.history
                .push(ConversationTurn::assistant(format!("assistant {i}")));
        }
        ctx.history.push(ConversationTurn::user("   "));
        let plan = ctx.plan("  latest message  ");

        let request = build_request("gpt-5.1", &plan);

        // Last 6 turns minus the blank one, plus the current message.
        assert_eq!(request.messages.len(), 6);
        assert_eq!(request.messages[0].content, "assistant 2");
        assert_eq!(request.messages.last().unwrap().content, "latest message");
        assert_eq!(request.messages.last().unwrap().role, MessageRole::User);
        assert_eq!(request.system.as_deref(), Some("<persona>\ntest persona\n</persona>"));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, 200);
    }
}

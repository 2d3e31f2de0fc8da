//! Companion engine: the facade callers talk to.
//!
//! Wires the whole reply pipeline together: chunk search, detail
//! extraction, style derivation, classification, prompt assembly, and
//! the orchestrated model calls. Also owns the memory and interview
//! entry points. All state lives in the caller's [`ContextState`]; the
//! engine itself only holds configuration, the optional model backend,
//! and the RNG used for length draws.

use tracing::{debug, info};

use solace_types::chat::{ConversationTurn, ReplyOutcome};
use solace_types::config::CompanionConfig;
use solace_types::error::{GenerationError, InterviewError};
use solace_types::interview::InterviewProgress;
use solace_types::llm::BackendError;
use solace_types::memory::MemoryRecord;
use solace_types::persona::ProfileUpdate;

use crate::backend::box_backend::BoxModelBackend;
use crate::context::ContextState;
use crate::interview;
use crate::memory::details::extract_details;
use crate::memory::search::search_chunks;
use crate::reply::classify::{classify_question, select_reply_length};
use crate::reply::orchestrator::{ReplyPlan, orchestrate_reply};
use crate::reply::prompt::ReplyPromptBuilder;
use crate::reply::rng::ReplyRng;
use crate::reply::style::derive_style;

/// Memory chunks retrieved for each reply.
const REPLY_SEARCH_TOP_K: usize = 6;

/// The conversational memory companion.
pub struct CompanionEngine {
    config: CompanionConfig,
    backend: Option<BoxModelBackend>,
    rng: ReplyRng,
}

impl CompanionEngine {
    /// Create an engine. `backend: None` runs fully deterministic.
    pub fn new(config: CompanionConfig, backend: Option<BoxModelBackend>) -> Self {
        Self {
            config,
            backend,
            rng: ReplyRng::from_entropy(),
        }
    }

    /// Same, with a caller-supplied RNG so length draws are
    /// reproducible.
    pub fn with_rng(
        config: CompanionConfig,
        backend: Option<BoxModelBackend>,
        rng: ReplyRng,
    ) -> Self {
        Self {
            config,
            backend,
            rng,
        }
    }

    pub fn config(&self) -> &CompanionConfig {
        &self.config
    }

    /// The backend, unless the engine is configured offline.
    fn active_backend(&self) -> Option<&BoxModelBackend> {
        if self.config.offline {
            None
        } else {
            self.backend.as_ref()
        }
    }

    // --- Memory ---

    /// Store one memory: a record for listing plus a searchable chunk.
    ///
    /// Blank text is rejected; normalization happens on the chunk side.
    pub fn add_memory(
        &self,
        ctx: &mut ContextState,
        text: &str,
        source: &str,
    ) -> Result<(), BackendError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(BackendError::EmptyInput("memory text".to_string()));
        }
        ctx.records.push(MemoryRecord::new(trimmed, source));
        ctx.add_chunk(trimmed);
        debug!(
            session_id = %ctx.session_id,
            records = ctx.records.len(),
            chunks = ctx.chunks.len(),
            "memory stored"
        );
        Ok(())
    }

    pub fn list_memories<'a>(&self, ctx: &'a ContextState) -> &'a [MemoryRecord] {
        &ctx.records
    }

    /// Rank the context's chunks against `query`.
    ///
    /// Uses embeddings when a backend is reachable, keyword overlap
    /// otherwise; never fails.
    pub async fn search_memories(
        &self,
        ctx: &mut ContextState,
        query: &str,
        top_k: usize,
    ) -> Vec<String> {
        search_chunks(self.active_backend(), &mut ctx.chunks, query, top_k).await
    }

    // --- Replies ---

    /// Generate a reply without touching conversation history.
    ///
    /// `history_override` replaces the context's stored history for this
    /// one call; `model_override` replaces the configured primary model.
    #[tracing::instrument(
        name = "generate_reply",
        skip_all,
        fields(session_id = %ctx.session_id, message_len = message.len())
    )]
    pub async fn generate_reply(
        &self,
        ctx: &mut ContextState,
        message: &str,
        history_override: Option<&[ConversationTurn]>,
        model_override: Option<&str>,
    ) -> Result<ReplyOutcome, GenerationError> {
        let memory_hits = self
            .search_memories(ctx, message, REPLY_SEARCH_TOP_K)
            .await;
        let details = extract_details(&memory_hits);
        let style = derive_style(&ctx.profile, &details);
        let kind = classify_question(message);
        let (length, budget) = select_reply_length(kind, style.length_pref, &self.rng);
        let system_prompt = ReplyPromptBuilder::build(
            &ctx.profile,
            &style,
            kind,
            length,
            &details,
            &memory_hits,
            message,
        );
        debug!(%kind, %length, budget, hits = memory_hits.len(), "reply plan assembled");

        let plan = ReplyPlan {
            system_prompt,
            history: history_override.unwrap_or(&ctx.history),
            message,
            profile: &ctx.profile,
            details: &details,
            memory_hits: &memory_hits,
            max_tokens: budget,
            model_override,
        };
        orchestrate_reply(self.active_backend(), &self.config, plan).await
    }

    /// One full conversational turn: generate, then append both turns.
    ///
    /// History is appended only after a successful outcome, so a
    /// strict-mode failure leaves the conversation exactly as it was.
    #[tracing::instrument(name = "chat_turn", skip_all, fields(session_id = %ctx.session_id))]
    pub async fn chat(
        &self,
        ctx: &mut ContextState,
        message: &str,
    ) -> Result<ReplyOutcome, GenerationError> {
        let outcome = self.generate_reply(ctx, message, None, None).await?;
        ctx.history.push(ConversationTurn::user(message.trim()));
        ctx.history.push(ConversationTurn::assistant(outcome.text.clone()));
        Ok(outcome)
    }

    // --- Interview ---

    /// Begin (or restart) the guided interview.
    pub fn start_interview(&self, ctx: &mut ContextState) -> &'static str {
        interview::start_interview(&mut ctx.interview)
    }

    /// Record one interview answer.
    ///
    /// On completion the summary is stored as one memory record plus a
    /// searchable chunk, and every answered line becomes its own chunk.
    pub fn answer_interview(
        &self,
        ctx: &mut ContextState,
        text: &str,
    ) -> Result<InterviewProgress, InterviewError> {
        let progress = interview::answer_interview(&mut ctx.interview, text)?;
        if let InterviewProgress::Done { summary } = &progress {
            ctx.records
                .push(MemoryRecord::new(summary.clone(), "interview-summary"));
            ctx.add_chunk(summary);
            for line in summary.lines().skip(1) {
                let cleaned = line.trim();
                if cleaned.is_empty() {
                    continue;
                }
                // Lines with nothing after the arrow carry no memory.
                if let Some((_, answer)) = cleaned.split_once("->") {
                    if answer.trim().is_empty() {
                        continue;
                    }
                }
                ctx.add_chunk(cleaned);
            }
            info!(
                session_id = %ctx.session_id,
                chunks = ctx.chunks.len(),
                "interview complete, summary stored"
            );
        }
        Ok(progress)
    }

    // --- Profile ---

    /// Merge a profile update into the context. Absent fields stay.
    pub fn save_profile(&self, ctx: &mut ContextState, update: ProfileUpdate) {
        ctx.profile.apply(update);
        debug!(session_id = %ctx.session_id, "profile updated");
    }

    // --- Audio ---

    /// Transcribe a voice note through the backend.
    ///
    /// Fails when the engine is offline or has no backend attached.
    pub async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String, BackendError> {
        let Some(backend) = self.active_backend() else {
            return Err(BackendError::Transport(
                "transcription unavailable (offline)".to_string(),
            ));
        };
        backend.transcribe(audio, filename).await
    }
}

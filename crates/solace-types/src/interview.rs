//! Guided interview state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded interview answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewAnswer {
    pub answered_at: DateTime<Utc>,
    pub text: String,
}

/// Progress through the fixed interview script for one context.
///
/// `cursor` indexes the question the next answer belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewState {
    pub cursor: usize,
    pub answers: Vec<InterviewAnswer>,
}

impl InterviewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_answer(&mut self, text: impl Into<String>) {
        self.answers.push(InterviewAnswer {
            answered_at: Utc::now(),
            text: text.into(),
        });
        self.cursor += 1;
    }
}

/// What the interview returns after each recorded answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InterviewProgress {
    /// More questions remain; here is the next one.
    Next { question: String },
    /// The script is exhausted; the summary has been stored as memory.
    Done { summary: String },
}

impl InterviewProgress {
    pub fn is_done(&self) -> bool {
        matches!(self, InterviewProgress::Done { .. })
    }
}

//! Guided interview flow.
//!
//! A fixed script of ten questions walks the user through who the
//! persona was. State lives in the context's interview slot; this module
//! owns the script, the cursor logic, and the summary text. Storing the
//! finished summary as memory is the engine's job.

use solace_types::error::InterviewError;
use solace_types::interview::{InterviewProgress, InterviewState};

/// The interview script, asked in order.
pub const INTERVIEW_QUESTIONS: [&str; 10] = [
    "When you picture them right now, what’s the very first scene that comes to mind?",
    "How would you describe their personality in three vivid words?",
    "What small daily habit or ritual of theirs felt unmistakably them?",
    "What did they usually call you, and how did their voice shift when they said it?",
    "Tell me about a moment when they made you feel completely safe or understood.",
    "What advice or phrase did they repeat so often that it still echoes in your head?",
    "Describe a place, smell, or sound that instantly brings them back to you.",
    "What made them laugh until they could barely breathe?",
    "When life got heavy, how did they show up for you?",
    "If you could share one unfinished thought or story with them, what would you say right now?",
];

/// Begin the interview, resetting any in-flight run. Returns the first
/// question.
pub fn start_interview(slot: &mut Option<InterviewState>) -> &'static str {
    *slot = Some(InterviewState::new());
    INTERVIEW_QUESTIONS[0]
}

/// Record one answer and advance.
///
/// Returns the next question while the script has questions left. After
/// the final answer the state is discarded and the summary comes back in
/// [`InterviewProgress::Done`]; the caller is expected to persist it.
/// Answering with no interview in flight is an error.
pub fn answer_interview(
    slot: &mut Option<InterviewState>,
    answer: &str,
) -> Result<InterviewProgress, InterviewError> {
    let Some(state) = slot.as_mut() else {
        return Err(InterviewError::NotStarted);
    };

    state.record_answer(answer.trim());
    if state.cursor < INTERVIEW_QUESTIONS.len() {
        return Ok(InterviewProgress::Next {
            question: INTERVIEW_QUESTIONS[state.cursor].to_string(),
        });
    }

    let summary = build_summary(state);
    *slot = None;
    Ok(InterviewProgress::Done { summary })
}

/// Render the finished interview as one text block: an
/// "Interview summary:" header followed by a "question -> answer" line
/// per recorded answer.
pub fn build_summary(state: &InterviewState) -> String {
    let mut lines = vec!["Interview summary:".to_string()];
    for (i, answer) in state.answers.iter().enumerate() {
        let question = INTERVIEW_QUESTIONS
            .get(i)
            .copied()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Q{}", i + 1));
        lines.push(format!("{question} -> {}", answer.text));
    }
    lines.join("\n")
}

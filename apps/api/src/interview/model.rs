//! The external AI seen as a trait, plus the Anthropic-backed implementation.
//!
//! Implementations may fail; `InterviewCoach` turns every failure into a
//! locally computed fallback.

use async_trait::async_trait;
use serde::Deserialize;

use crate::interview::prompts::{
    feedback_persona, feedback_prompt, questions_prompt, QUESTIONS_PERSONA,
};
use crate::llm_client::prompts::json_system;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::session::{MAX_SCORE, MIN_SCORE};
use crate::models::Feedback;

pub const QUESTION_COUNT: usize = 5;
const MIN_QUESTION_LEN: usize = 11;
const MAX_SUGGESTIONS: usize = 4;

#[async_trait]
pub trait InterviewModel: Send + Sync {
    async fn generate_questions(
        &self,
        role: &str,
        company: Option<&str>,
    ) -> Result<Vec<String>, LlmError>;

    async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        role: Option<&str>,
    ) -> Result<Feedback, LlmError>;
}

#[derive(Debug, Deserialize)]
struct QuestionsReply {
    questions: Vec<String>,
}

/// Feedback as the model returns it; scores may be fractional or out of range.
#[derive(Debug, Deserialize)]
struct FeedbackReply {
    clarity: f64,
    relevance: f64,
    suggestions: Vec<String>,
    overall: String,
}

#[async_trait]
impl InterviewModel for LlmClient {
    async fn generate_questions(
        &self,
        role: &str,
        company: Option<&str>,
    ) -> Result<Vec<String>, LlmError> {
        let reply: QuestionsReply = self
            .call_json(
                &questions_prompt(role, company),
                &json_system(QUESTIONS_PERSONA),
            )
            .await?;
        sanitize_questions(reply.questions)
    }

    async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        role: Option<&str>,
    ) -> Result<Feedback, LlmError> {
        let reply: FeedbackReply = self
            .call_json(
                &feedback_prompt(question, answer),
                &json_system(&feedback_persona(role)),
            )
            .await?;
        normalize_feedback(reply)
    }
}

/// Keeps plausible questions only: trimmed, long enough, containing `?`.
fn sanitize_questions(raw: Vec<String>) -> Result<Vec<String>, LlmError> {
    let questions: Vec<String> = raw
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| q.chars().count() >= MIN_QUESTION_LEN && q.contains('?'))
        .take(QUESTION_COUNT)
        .collect();

    if questions.is_empty() {
        return Err(LlmError::Malformed("no usable questions".to_string()));
    }
    Ok(questions)
}

fn normalize_feedback(reply: FeedbackReply) -> Result<Feedback, LlmError> {
    let suggestions: Vec<String> = reply
        .suggestions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect();
    if suggestions.is_empty() {
        return Err(LlmError::Malformed("feedback has no suggestions".to_string()));
    }

    let overall = reply.overall.trim().to_string();
    if overall.is_empty() {
        return Err(LlmError::Malformed("feedback has no summary".to_string()));
    }

    Ok(Feedback {
        clarity: clamp_score(reply.clarity)?,
        relevance: clamp_score(reply.relevance)?,
        suggestions,
        overall,
    })
}

fn clamp_score(raw: f64) -> Result<u8, LlmError> {
    if !raw.is_finite() {
        return Err(LlmError::Malformed(format!("score {raw} is not a number")));
    }
    Ok(raw.round().clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u8)
}

//! Axum route handlers for the practice-interview AI endpoints.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppJson};
use crate::models::Feedback;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuestionsRequest {
    #[serde(default)]
    pub role: String,
    pub company: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    pub role: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// POST /api/ai/questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    AppJson(req): AppJson<QuestionsRequest>,
) -> Result<AppJson<QuestionsResponse>, AppError> {
    let role = req.role.trim();
    if role.is_empty() {
        return Err(AppError::Validation("Role is required".to_string()));
    }

    let questions = state
        .coach
        .questions(role, non_blank(req.company.as_deref()))
        .await;
    Ok(AppJson(QuestionsResponse { questions }))
}

/// POST /api/ai/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    AppJson(req): AppJson<FeedbackRequest>,
) -> Result<AppJson<Feedback>, AppError> {
    if req.question.trim().is_empty() || req.answer.trim().is_empty() {
        return Err(AppError::Validation(
            "Question and answer are required".to_string(),
        ));
    }

    let feedback = state
        .coach
        .feedback(&req.question, &req.answer, non_blank(req.role.as_deref()))
        .await;
    Ok(AppJson(feedback))
}

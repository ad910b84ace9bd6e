use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::errors::{AppError, AppJson};
use crate::models::{InterviewSession, NewSession};
use crate::state::AppState;

/// POST /api/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewSession>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.repo.create_session(&input).await?;
    Ok((StatusCode::CREATED, AppJson(session)))
}

/// GET /api/sessions/:application_id
pub async fn handle_list_sessions(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
) -> Result<AppJson<Vec<InterviewSession>>, AppError> {
    let sessions = state
        .repo
        .list_sessions_by_application(&application_id)
        .await?;
    Ok(AppJson(sessions))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::pagination::{page_offset, total_pages, DEFAULT_PAGE};
use crate::errors::{AppError, AppJson, AppQuery};
use crate::models::{Application, ApplicationPatch, InterviewSession, NewApplication};
use crate::repository::validation::DEFAULT_LIMIT;
use crate::repository::{ListFilter, Stats};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub applications: Vec<Application>,
    pub total: u64,
    pub page: i64,
    pub total_pages: u64,
}

/// An application together with its practice sessions.
#[derive(Debug, Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: Application,
    pub sessions: Vec<InterviewSession>,
}

/// Ids that are not UUIDs cannot exist, so they are reported as missing.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| not_found(raw))
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Application {id} not found"))
}

/// GET /api/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<AppJson<ListResponse>, AppError> {
    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = page_offset(page, limit)?;

    let result = state
        .repo
        .list_applications(&ListFilter {
            status: params.status,
            tag: params.tag,
            search: params.search,
            limit: Some(limit),
            offset: Some(offset),
        })
        .await?;

    Ok(AppJson(ListResponse {
        total_pages: total_pages(result.total, limit),
        applications: result.items,
        total: result.total,
        page,
    }))
}

/// GET /api/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<AppJson<ApplicationDetail>, AppError> {
    let app_id = parse_id(&id)?;
    let application = state
        .repo
        .get_application(app_id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    let sessions = state
        .repo
        .list_sessions_by_application(&app_id.to_string())
        .await?;

    Ok(AppJson(ApplicationDetail {
        application,
        sessions,
    }))
}

/// POST /api/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewApplication>,
) -> Result<impl IntoResponse, AppError> {
    let application = state.repo.create_application(&input).await?;
    Ok((StatusCode::CREATED, AppJson(application)))
}

/// PATCH /api/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<ApplicationPatch>,
) -> Result<AppJson<Application>, AppError> {
    let app_id = parse_id(&id)?;
    let application = state
        .repo
        .update_application(app_id, &patch)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(AppJson(application))
}

/// DELETE /api/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let app_id = parse_id(&id)?;
    if state.repo.delete_application(app_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}

/// GET /api/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<AppJson<Stats>, AppError> {
    Ok(AppJson(state.repo.get_stats().await?))
}

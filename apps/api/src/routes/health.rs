use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports the service version, the active storage backend and whether the
/// AI coach is live or running on its fallback.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "tracker-api",
        "storage": state.repo.backend_name(),
        "ai": if state.coach.is_ai_enabled() { "enabled" } else { "fallback" }
    }))
}

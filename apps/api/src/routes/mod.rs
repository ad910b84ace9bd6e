pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::interview::handlers as interview;
use crate::sessions::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Applications
        .route(
            "/api/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_create_application),
        )
        .route(
            "/api/applications/:id",
            get(applications::handle_get_application)
                .patch(applications::handle_update_application)
                .delete(applications::handle_delete_application),
        )
        .route("/api/stats", get(applications::handle_stats))
        // Practice interviews
        .route("/api/ai/questions", post(interview::handle_generate_questions))
        .route("/api/ai/feedback", post(interview::handle_feedback))
        .route("/api/sessions", post(sessions::handle_create_session))
        .route(
            "/api/sessions/:application_id",
            get(sessions::handle_list_sessions),
        )
        .with_state(state)
}

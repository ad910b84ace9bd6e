use crate::interview::InterviewCoach;
use crate::repository::Repository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    /// Question and feedback source with the offline fallback built in.
    pub coach: InterviewCoach,
}

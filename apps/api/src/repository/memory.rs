use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Application, ApplicationChanges, InterviewSession, SessionSummary, Status,
};
use crate::repository::{
    ApplicationPage, ApplicationQuery, ApplicationStore, RepositoryError, StatusCounts,
};

#[derive(Default)]
struct MemoryState {
    applications: HashMap<Uuid, Application>,
    sessions: Vec<InterviewSession>,
}

/// Process-local store used when no database is configured. Contents are
/// lost on restart. One lock covers both collections so cascades are atomic.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, RepositoryError> {
        Ok(self.state.read().await.applications.get(&id).cloned())
    }

    async fn list_applications(
        &self,
        query: &ApplicationQuery,
    ) -> Result<ApplicationPage, RepositoryError> {
        let state = self.state.read().await;

        let mut matching: Vec<&Application> = state
            .applications
            .values()
            .filter(|app| query.matches(app))
            .collect();
        matching.sort_by_key(|app| Reverse((app.created_at, app.id)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(query.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(ApplicationPage { items, total })
    }

    async fn insert_application(&self, app: &Application) -> Result<(), RepositoryError> {
        self.state
            .write()
            .await
            .applications
            .insert(app.id, app.clone());
        Ok(())
    }

    async fn update_application(
        &self,
        id: Uuid,
        changes: &ApplicationChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Application>, RepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.applications.get_mut(&id).map(|app| {
            changes.apply_to(app, now);
            app.clone()
        }))
    }

    async fn delete_application(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        if state.applications.remove(&id).is_none() {
            return Ok(false);
        }
        let key = id.to_string();
        state.sessions.retain(|s| s.application_id != key);
        Ok(true)
    }

    async fn insert_session(
        &self,
        session: &InterviewSession,
        owner: Option<Uuid>,
        summary: &SessionSummary,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if let Some(app) = owner.and_then(|id| state.applications.get_mut(&id)) {
            app.interview_notes.push(summary.clone());
            app.updated_at = session.created_at;
        }
        state.sessions.push(session.clone());
        Ok(())
    }

    async fn list_sessions(
        &self,
        application_id: &str,
    ) -> Result<Vec<InterviewSession>, RepositoryError> {
        let state = self.state.read().await;
        let mut sessions: Vec<InterviewSession> = state
            .sessions
            .iter()
            .filter(|s| s.application_id == application_id)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| Reverse((s.created_at, s.id)));
        Ok(sessions)
    }

    async fn status_counts(&self) -> Result<StatusCounts, RepositoryError> {
        let state = self.state.read().await;
        let mut counts = StatusCounts {
            total: state.applications.len() as u64,
            ..StatusCounts::default()
        };
        for app in state.applications.values() {
            match app.status {
                Status::Applied => counts.applied += 1,
                Status::Interview => counts.interview += 1,
                Status::Offer => counts.offer += 1,
                Status::Rejected => {}
            }
        }
        Ok(counts)
    }
}

//! The only way the rest of the API touches stored applications
//! and practice sessions.
//!
//! `Repository` validates input, stamps ids and timestamps, and derives
//! statistics and session summaries. The actual persistence sits behind the
//! `ApplicationStore` trait, with one Postgres and one in-memory backend.
//! Both receive identical, already-validated values, so results do not depend
//! on which backend was selected at startup.

mod memory;
mod postgres;
mod stats;
mod summary;
pub mod validation;

#[cfg(test)]
mod contract;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, StorageBackend};
use crate::db::PgConnector;
use crate::models::{
    Application, ApplicationChanges, ApplicationPatch, InterviewSession, NewApplication,
    NewSession, SessionSummary,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use stats::{Stats, StatusCounts};
pub use validation::ApplicationQuery;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage not configured: {0}")]
    NotConfigured(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Stored record is invalid: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => RepositoryError::Unavailable(e.to_string()),
            other => RepositoryError::Database(other),
        }
    }
}

/// Listing options as they arrive from callers. Checked by
/// `validation::validate_filter` before any store sees them.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub status: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One page of applications plus the number of matches before paging.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationPage {
    pub items: Vec<Application>,
    pub total: u64,
}

/// A persistence backend. Implementations store exactly what they are given
/// and never validate; ordering is `created_at DESC, id DESC` everywhere.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, RepositoryError>;

    async fn list_applications(
        &self,
        query: &ApplicationQuery,
    ) -> Result<ApplicationPage, RepositoryError>;

    async fn insert_application(&self, app: &Application) -> Result<(), RepositoryError>;

    async fn update_application(
        &self,
        id: Uuid,
        changes: &ApplicationChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Application>, RepositoryError>;

    /// Removes the application and every session whose `application_id`
    /// equals `id` as one operation.
    async fn delete_application(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// Stores the session and, when `owner` names an existing application,
    /// appends `summary` to its interview notes in the same operation.
    async fn insert_session(
        &self,
        session: &InterviewSession,
        owner: Option<Uuid>,
        summary: &SessionSummary,
    ) -> Result<(), RepositoryError>;

    async fn list_sessions(
        &self,
        application_id: &str,
    ) -> Result<Vec<InterviewSession>, RepositoryError>;

    async fn status_counts(&self) -> Result<StatusCounts, RepositoryError>;

    async fn close(&self) {}
}

/// Current time at the precision both backends can store.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Session application ids that look like UUIDs are stored in canonical
/// lower-case form so cascades and lookups agree with `Uuid::to_string`.
fn normalize_application_id(raw: &str) -> (String, Option<Uuid>) {
    let trimmed = raw.trim();
    match Uuid::parse_str(trimmed) {
        Ok(id) => (id.to_string(), Some(id)),
        Err(_) => (trimmed.to_string(), None),
    }
}

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn ApplicationStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn ApplicationStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn get_application(&self, id: Uuid) -> Result<Option<Application>, RepositoryError> {
        self.store.get_application(id).await
    }

    pub async fn list_applications(
        &self,
        filter: &ListFilter,
    ) -> Result<ApplicationPage, RepositoryError> {
        let query = validation::validate_filter(filter)?;
        debug!(?query, "Listing applications");
        self.store.list_applications(&query).await
    }

    pub async fn create_application(
        &self,
        input: &NewApplication,
    ) -> Result<Application, RepositoryError> {
        let valid = validation::validate_new_application(input)?;
        let now = now();
        let app = Application {
            id: Uuid::new_v4(),
            company: valid.company,
            role: valid.role,
            status: valid.status,
            tag: valid.tag,
            job_url: valid.job_url,
            notes: valid.notes,
            interview_notes: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_application(&app).await?;
        info!("Created application {} ({} @ {})", app.id, app.role, app.company);
        Ok(app)
    }

    pub async fn update_application(
        &self,
        id: Uuid,
        patch: &ApplicationPatch,
    ) -> Result<Option<Application>, RepositoryError> {
        let changes = validation::validate_patch(patch)?;
        self.store.update_application(id, &changes, now()).await
    }

    pub async fn delete_application(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let deleted = self.store.delete_application(id).await?;
        if deleted {
            info!("Deleted application {id} and its sessions");
        }
        Ok(deleted)
    }

    pub async fn create_session(
        &self,
        input: &NewSession,
    ) -> Result<InterviewSession, RepositoryError> {
        validation::validate_session(input)?;
        let (application_id, owner) = normalize_application_id(&input.application_id);
        let session = InterviewSession {
            id: Uuid::new_v4(),
            application_id,
            questions: input.questions.clone(),
            created_at: now(),
        };
        let summary = summary::summarize(&session);
        self.store.insert_session(&session, owner, &summary).await?;
        info!(
            "Saved practice session {} with {} question(s) for application {}",
            session.id,
            session.questions.len(),
            session.application_id
        );
        Ok(session)
    }

    pub async fn list_sessions_by_application(
        &self,
        application_id: &str,
    ) -> Result<Vec<InterviewSession>, RepositoryError> {
        let (application_id, _) = normalize_application_id(application_id);
        self.store.list_sessions(&application_id).await
    }

    pub async fn get_stats(&self) -> Result<Stats, RepositoryError> {
        let counts = self.store.status_counts().await?;
        Ok(Stats::from_counts(&counts))
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}

/// Builds the repository for the configured backend. Nothing connects here;
/// the Postgres pool is opened on first use.
pub fn create_repository(config: &Config) -> Repository {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let connector = PgConnector::new(
                config.database_url.clone(),
                config.db_max_connections,
                config.db_connect_timeout,
            );
            if !connector.is_configured() {
                warn!("Postgres storage selected without DATABASE_URL; storage requests will fail");
            }
            Repository::new(Arc::new(PgStore::new(connector)))
        }
        StorageBackend::Memory => Repository::in_memory(),
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::db::PgConnector;
use crate::models::{
    Application, ApplicationChanges, ApplicationRow, InterviewSession, SessionRow,
    SessionSummary,
};
use crate::repository::validation::fold_case;
use crate::repository::{
    ApplicationPage, ApplicationQuery, ApplicationStore, RepositoryError, StatusCounts,
};

// $3 arrives already folded; the *_folded columns are written from Rust.
const FILTER_CLAUSE: &str = r#"
    WHERE ($1::text IS NULL OR status = $1)
      AND ($2::text IS NULL OR tag = $2)
      AND ($3::text IS NULL
           OR strpos(company_folded, $3) > 0
           OR strpos(role_folded, $3) > 0)
"#;

/// Durable backend on PostgreSQL. Multi-statement operations run in a
/// single transaction.
pub struct PgStore {
    connector: PgConnector,
}

impl PgStore {
    pub fn new(connector: PgConnector) -> Self {
        Self { connector }
    }

    #[cfg(test)]
    async fn reset(&self) {
        let pool = self.connector.pool().await.unwrap();
        sqlx::query("TRUNCATE applications, interview_sessions")
            .execute(pool)
            .await
            .unwrap();
    }
}

fn to_application(row: ApplicationRow) -> Result<Application, RepositoryError> {
    let id = row.id;
    Application::try_from(row)
        .map_err(|e| RepositoryError::Corrupt(format!("application {id}: {e}")))
}

#[async_trait]
impl ApplicationStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, RepositoryError> {
        let pool = self.connector.pool().await?;
        let row: Option<ApplicationRow> =
            sqlx::query_as("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        row.map(to_application).transpose()
    }

    async fn list_applications(
        &self,
        query: &ApplicationQuery,
    ) -> Result<ApplicationPage, RepositoryError> {
        let pool = self.connector.pool().await?;
        let status = query.status.map(|s| s.as_str());
        let tag = query.tag.map(|t| t.as_str());
        let search = query.folded_search();

        // Count and page must see the same snapshot.
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM applications {FILTER_CLAUSE}"
        ))
        .bind(status)
        .bind(tag)
        .bind(search.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        let rows: Vec<ApplicationRow> = sqlx::query_as(&format!(
            "SELECT * FROM applications {FILTER_CLAUSE} \
             ORDER BY created_at DESC, id DESC LIMIT $4 OFFSET $5"
        ))
        .bind(status)
        .bind(tag)
        .bind(search.as_deref())
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ApplicationPage {
            items: rows
                .into_iter()
                .map(to_application)
                .collect::<Result<_, _>>()?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn insert_application(&self, app: &Application) -> Result<(), RepositoryError> {
        let pool = self.connector.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO applications
                (id, company, role, status, tag, job_url, notes,
                 interview_notes, created_at, updated_at, company_folded, role_folded)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(app.id)
        .bind(&app.company)
        .bind(&app.role)
        .bind(app.status.as_str())
        .bind(app.tag.as_str())
        .bind(&app.job_url)
        .bind(&app.notes)
        .bind(Json(&app.interview_notes))
        .bind(app.created_at)
        .bind(app.updated_at)
        .bind(fold_case(&app.company))
        .bind(fold_case(&app.role))
        .execute(pool)
        .await?;
        Ok(())
    }

    async fn update_application(
        &self,
        id: Uuid,
        changes: &ApplicationChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Application>, RepositoryError> {
        let pool = self.connector.pool().await?;
        let row: Option<ApplicationRow> = sqlx::query_as(
            r#"
            UPDATE applications SET
                company    = COALESCE($2, company),
                role       = COALESCE($3, role),
                status     = COALESCE($4, status),
                tag        = COALESCE($5, tag),
                job_url    = COALESCE($6, job_url),
                notes      = COALESCE($7, notes),
                updated_at = $8,
                company_folded = COALESCE($9, company_folded),
                role_folded    = COALESCE($10, role_folded)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.company.as_deref())
        .bind(changes.role.as_deref())
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.tag.map(|t| t.as_str()))
        .bind(changes.job_url.as_deref())
        .bind(changes.notes.as_deref())
        .bind(now)
        .bind(changes.company.as_deref().map(fold_case))
        .bind(changes.role.as_deref().map(fold_case))
        .fetch_optional(pool)
        .await?;
        row.map(to_application).transpose()
    }

    async fn delete_application(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let pool = self.connector.pool().await?;
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM interview_sessions WHERE application_id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn insert_session(
        &self,
        session: &InterviewSession,
        owner: Option<Uuid>,
        summary: &SessionSummary,
    ) -> Result<(), RepositoryError> {
        let pool = self.connector.pool().await?;
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO interview_sessions (id, application_id, questions, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(session.id)
        .bind(&session.application_id)
        .bind(Json(&session.questions))
        .bind(session.created_at)
        .execute(&mut *tx)
        .await?;

        if let Some(owner) = owner {
            sqlx::query(
                "UPDATE applications \
                 SET interview_notes = interview_notes || $2, updated_at = $3 \
                 WHERE id = $1",
            )
            .bind(owner)
            .bind(Json([summary]))
            .bind(session.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_sessions(
        &self,
        application_id: &str,
    ) -> Result<Vec<InterviewSession>, RepositoryError> {
        let pool = self.connector.pool().await?;
        let rows: Vec<SessionRow> = sqlx::query_as(
            "SELECT * FROM interview_sessions WHERE application_id = $1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(application_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(InterviewSession::from).collect())
    }

    async fn status_counts(&self) -> Result<StatusCounts, RepositoryError> {
        let pool = self.connector.pool().await?;
        let (total, applied, interview, offer): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'applied'),
                COUNT(*) FILTER (WHERE status = 'interview'),
                COUNT(*) FILTER (WHERE status = 'offer')
            FROM applications
            "#,
        )
        .fetch_one(pool)
        .await?;

        let count = |n: i64| u64::try_from(n).unwrap_or_default();
        Ok(StatusCounts {
            total: count(total),
            applied: count(applied),
            interview: count(interview),
            offer: count(offer),
        })
    }

    async fn close(&self) {
        self.connector.close().await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::repository::{contract, Repository};

    /// Runs the shared repository contract against a live database.
    /// Skipped unless TEST_DATABASE_URL points at a disposable Postgres.
    #[tokio::test]
    async fn test_postgres_backend_satisfies_contract() {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set; skipping Postgres contract run");
            return;
        };

        let store = Arc::new(PgStore::new(PgConnector::new(
            Some(url),
            2,
            Duration::from_secs(5),
        )));
        let repo = Repository::new(store.clone());

        macro_rules! run {
            ($($case:ident),* $(,)?) => {
                $(
                    store.reset().await;
                    contract::$case(&repo).await;
                )*
            };
        }

        run!(
            create_then_get,
            create_rejects_invalid_input,
            list_respects_limit_and_total,
            list_orders_newest_first_and_pages_cleanly,
            list_filters_by_status_tag_and_search,
            list_search_is_case_insensitive_substring,
            text_with_nul_is_rejected_before_storage,
            list_with_no_matches_is_empty,
            empty_patch_only_touches_updated_at,
            update_lifecycle_scenario,
            update_unknown_id_is_none,
            delete_cascades_to_sessions,
            sessions_do_not_require_an_application,
            session_appends_summary_to_application,
            sessions_listed_newest_first,
            stats_match_status_counts,
        );

        store.reset().await;
        repo.close().await;
    }
}

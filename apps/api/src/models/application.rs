use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Pipeline stage of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Applied,
        Status::Interview,
        Status::Offer,
        Status::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Applied => "applied",
            Status::Interview => "interview",
            Status::Offer => "offer",
            Status::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| {
                format!("status must be one of applied, interview, offer, rejected (got '{s}')")
            })
    }
}

/// User-assigned priority of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Dream,
    #[default]
    Target,
    Backup,
}

impl Tag {
    pub const ALL: [Tag; 3] = [Tag::Dream, Tag::Target, Tag::Backup];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Dream => "dream",
            Tag::Target => "target",
            Tag::Backup => "backup",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("tag must be one of dream, target, backup (got '{s}')"))
    }
}

/// Compact record of one practice session, appended to `interview_notes`
/// whenever a session is saved against an existing application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub question_count: u32,
    pub average_clarity: f64,
    pub average_relevance: f64,
    pub created_at: DateTime<Utc>,
}

/// A tracked job application as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub status: Status,
    pub tag: Tag,
    pub job_url: String,
    pub notes: String,
    pub interview_notes: Vec<SessionSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating an application. Enum fields stay as raw text
/// so the repository can reject bad values with a validation error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub company: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub tag: Option<String>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
}

/// Partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub tag: Option<String>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
}

/// A patch that passed validation; what the stores apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationChanges {
    pub company: Option<String>,
    pub role: Option<String>,
    pub status: Option<Status>,
    pub tag: Option<Tag>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
}

impl ApplicationChanges {
    pub fn apply_to(&self, app: &mut Application, now: DateTime<Utc>) {
        if let Some(company) = &self.company {
            app.company = company.clone();
        }
        if let Some(role) = &self.role {
            app.role = role.clone();
        }
        if let Some(status) = self.status {
            app.status = status;
        }
        if let Some(tag) = self.tag {
            app.tag = tag;
        }
        if let Some(job_url) = &self.job_url {
            app.job_url = job_url.clone();
        }
        if let Some(notes) = &self.notes {
            app.notes = notes.clone();
        }
        app.updated_at = now;
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub status: String,
    pub tag: String,
    pub job_url: String,
    pub notes: String,
    pub interview_notes: Json<Vec<SessionSummary>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = String;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            id: row.id,
            company: row.company,
            role: row.role,
            status: row.status.parse()?,
            tag: row.tag.parse()?,
            job_url: row.job_url,
            notes: row.notes,
            interview_notes: row.interview_notes.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Structured evaluation of one answer. Scores are on a 1 to 5 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub clarity: u8,
    pub relevance: u8,
    pub suggestions: Vec<String>,
    pub overall: String,
}

impl Feedback {
    pub fn scores_in_range(&self) -> bool {
        (MIN_SCORE..=MAX_SCORE).contains(&self.clarity)
            && (MIN_SCORE..=MAX_SCORE).contains(&self.relevance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionWithAnswer {
    pub question: String,
    pub answer: String,
    pub feedback: Feedback,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub id: Uuid,
    pub application_id: String,
    pub questions: Vec<QuestionWithAnswer>,
    pub created_at: DateTime<Utc>,
}

/// Request body for saving a finished practice session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    #[serde(default)]
    pub application_id: String,
    pub questions: Vec<QuestionWithAnswer>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub application_id: String,
    pub questions: Json<Vec<QuestionWithAnswer>>,
    pub created_at: DateTime<Utc>,
}

impl From<SessionRow> for InterviewSession {
    fn from(row: SessionRow) -> Self {
        InterviewSession {
            id: row.id,
            application_id: row.application_id,
            questions: row.questions.0,
            created_at: row.created_at,
        }
    }
}

//! Input validation shared by every storage backend.
//!
//! Everything here runs before a store is touched, so both backends see the
//! same already-checked values.

use crate::models::{
    ApplicationChanges, ApplicationPatch, NewApplication, NewSession, QuestionWithAnswer, Status,
    Tag,
};
use crate::repository::{ListFilter, RepositoryError};

pub const DEFAULT_LIMIT: i64 = 10;
const ALL_FILTER: &str = "all";

/// A listing request with every option resolved and checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationQuery {
    pub status: Option<Status>,
    pub tag: Option<Tag>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl ApplicationQuery {
    /// Whether an application passes the status/tag/search filters.
    /// Backends without a query engine use this directly.
    pub fn matches(&self, app: &crate::models::Application) -> bool {
        if self.status.is_some_and(|s| s != app.status) {
            return false;
        }
        if self.tag.is_some_and(|t| t != app.tag) {
            return false;
        }
        match self.folded_search() {
            Some(needle) => {
                fold_case(&app.company).contains(&needle) || fold_case(&app.role).contains(&needle)
            }
            None => true,
        }
    }

    /// The search needle in the form stored in the folded search columns.
    pub fn folded_search(&self) -> Option<String> {
        self.search.as_deref().map(fold_case)
    }
}

/// Case folding for search on every backend. Postgres matches against
/// `company_folded`/`role_folded`, which hold this function's output.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

pub fn validate_filter(filter: &ListFilter) -> Result<ApplicationQuery, RepositoryError> {
    let status = parse_enum_filter::<Status>(filter.status.as_deref(), "status")?;
    let tag = parse_enum_filter::<Tag>(filter.tag.as_deref(), "tag")?;

    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    if let Some(search) = &search {
        plain_text(search, "search")?;
    }

    let limit = filter.limit.unwrap_or(DEFAULT_LIMIT);
    if limit < 1 {
        return Err(RepositoryError::Validation(format!(
            "limit must be a positive integer (got {limit})"
        )));
    }

    let offset = filter.offset.unwrap_or(0);
    if offset < 0 {
        return Err(RepositoryError::Validation(format!(
            "offset must not be negative (got {offset})"
        )));
    }

    Ok(ApplicationQuery {
        status,
        tag,
        search,
        limit,
        offset,
    })
}

/// Filter values are matched case-insensitively; `All` disables the filter.
fn parse_enum_filter<T>(raw: Option<&str>, field: &str) -> Result<Option<T>, RepositoryError>
where
    T: std::str::FromStr,
{
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    plain_text(raw, field)?;
    let lowered = raw.to_lowercase();
    if lowered == ALL_FILTER {
        return Ok(None);
    }
    lowered
        .parse::<T>()
        .map(Some)
        .map_err(|_| RepositoryError::Validation(format!("unknown {field} filter '{raw}'")))
}

/// A creation request with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidApplication {
    pub company: String,
    pub role: String,
    pub status: Status,
    pub tag: Tag,
    pub job_url: String,
    pub notes: String,
}

pub fn validate_new_application(
    input: &NewApplication,
) -> Result<ValidApplication, RepositoryError> {
    let company = required_text(input.company.as_deref(), "company")?;
    let role = required_text(input.role.as_deref(), "role")?;
    let status = parse_enum_value::<Status>(input.status.as_deref())?.unwrap_or_default();
    let tag = parse_enum_value::<Tag>(input.tag.as_deref())?.unwrap_or_default();

    Ok(ValidApplication {
        company,
        role,
        status,
        tag,
        job_url: optional_text(input.job_url.as_deref(), "jobUrl")?.unwrap_or_default(),
        notes: optional_text(input.notes.as_deref(), "notes")?.unwrap_or_default(),
    })
}

pub fn validate_patch(patch: &ApplicationPatch) -> Result<ApplicationChanges, RepositoryError> {
    let company = patch
        .company
        .as_deref()
        .map(|c| required_text(Some(c), "company"))
        .transpose()?;
    let role = patch
        .role
        .as_deref()
        .map(|r| required_text(Some(r), "role"))
        .transpose()?;

    Ok(ApplicationChanges {
        company,
        role,
        status: parse_enum_value::<Status>(patch.status.as_deref())?,
        tag: parse_enum_value::<Tag>(patch.tag.as_deref())?,
        job_url: optional_text(patch.job_url.as_deref(), "jobUrl")?,
        notes: optional_text(patch.notes.as_deref(), "notes")?,
    })
}

pub fn validate_session(input: &NewSession) -> Result<(), RepositoryError> {
    if input.application_id.trim().is_empty() {
        return Err(RepositoryError::Validation(
            "applicationId is required".to_string(),
        ));
    }
    plain_text(&input.application_id, "applicationId")?;
    for (pos, question) in input.questions.iter().enumerate() {
        question_text(question, pos)?;
    }
    if let Some(pos) = input
        .questions
        .iter()
        .position(|q| !q.feedback.scores_in_range())
    {
        return Err(RepositoryError::Validation(format!(
            "questions[{pos}]: feedback scores must be between 1 and 5"
        )));
    }
    Ok(())
}

fn required_text(value: Option<&str>, field: &str) -> Result<String, RepositoryError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => {
            plain_text(v, field)?;
            Ok(v.to_string())
        }
        _ => Err(RepositoryError::Validation(format!("{field} is required"))),
    }
}

fn optional_text(value: Option<&str>, field: &str) -> Result<Option<String>, RepositoryError> {
    value
        .map(|v| plain_text(v, field).map(|()| v.to_string()))
        .transpose()
}

/// NUL cannot be stored in Postgres text or JSONB.
fn plain_text(value: &str, field: &str) -> Result<(), RepositoryError> {
    if value.contains('\0') {
        return Err(RepositoryError::Validation(format!(
            "{field} must not contain NUL characters"
        )));
    }
    Ok(())
}

fn question_text(question: &QuestionWithAnswer, pos: usize) -> Result<(), RepositoryError> {
    let field = |name: &str| format!("questions[{pos}].{name}");
    plain_text(&question.question, &field("question"))?;
    plain_text(&question.answer, &field("answer"))?;
    plain_text(&question.feedback.overall, &field("feedback.overall"))?;
    for suggestion in &question.feedback.suggestions {
        plain_text(suggestion, &field("feedback.suggestions"))?;
    }
    Ok(())
}

fn parse_enum_value<T>(raw: Option<&str>) -> Result<Option<T>, RepositoryError>
where
    T: std::str::FromStr<Err = String>,
{
    raw.map(|v| v.parse::<T>().map_err(RepositoryError::Validation))
        .transpose()
}

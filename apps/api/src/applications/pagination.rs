use crate::errors::AppError;

pub const DEFAULT_PAGE: i64 = 1;

/// Converts a 1-based page number into a row offset.
pub fn page_offset(page: i64, limit: i64) -> Result<i64, AppError> {
    if page < 1 {
        return Err(AppError::Validation(format!(
            "page must be at least 1 (got {page})"
        )));
    }
    (page - 1)
        .checked_mul(limit)
        .ok_or_else(|| AppError::Validation("page is too large".to_string()))
}

/// Number of pages needed for `total` rows; 0 when there are none.
pub fn total_pages(total: u64, limit: i64) -> u64 {
    let limit = u64::try_from(limit).unwrap_or(1).max(1);
    total.div_ceil(limit)
}

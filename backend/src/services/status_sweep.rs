use chrono::NaiveDate;
use sqlx::PgPool;

use crate::error::AppError;
use crate::repositories::intern;

/// Moves every Active intern whose leaving date has passed to Completed.
/// Safe to run any number of times.
pub async fn complete_elapsed_internships(pool: &PgPool, today: NaiveDate) -> Result<u64, AppError> {
    let completed = intern::complete_elapsed(pool, today).await?;
    if completed > 0 {
        tracing::info!(completed, %today, "Marked elapsed internships as completed");
    }
    Ok(completed)
}

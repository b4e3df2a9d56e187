use chrono::NaiveDate;
use sqlx::PgExecutor;

use crate::error::AppError;
use crate::models::daily_report::{DailyReport, NewDailyReport};
use crate::types::InternId;

pub const DUPLICATE_REPORT_MESSAGE: &str = "Daily report already submitted for today";

const REPORT_COLUMNS: &str = "id, intern_id, domain, application_no, name, work_description, \
    tools_used, issues_faced, report_date, created_at";

pub async fn exists_for_day<'e>(
    db: impl PgExecutor<'e>,
    intern_id: InternId,
    report_date: NaiveDate,
) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM daily_reports WHERE intern_id = $1 AND report_date = $2)",
    )
    .bind(intern_id)
    .bind(report_date)
    .fetch_one(db)
    .await?;
    Ok(exists)
}

/// Inserts a report. A second report for the same intern and day trips the
/// unique constraint and comes back as the same conflict as the pre-check.
pub async fn create<'e>(
    db: impl PgExecutor<'e>,
    report: &NewDailyReport,
) -> Result<DailyReport, AppError> {
    let query = format!(
        "INSERT INTO daily_reports \
            (intern_id, domain, application_no, name, work_description, tools_used, issues_faced, report_date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {REPORT_COLUMNS}"
    );
    sqlx::query_as::<_, DailyReport>(&query)
        .bind(report.intern_id)
        .bind(&report.domain)
        .bind(&report.application_no)
        .bind(&report.name)
        .bind(&report.work_description)
        .bind(&report.tools_used)
        .bind(&report.issues_faced)
        .bind(report.report_date)
        .fetch_one(db)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(DUPLICATE_REPORT_MESSAGE.to_string())
            }
            other => other.into(),
        })
}

pub async fn list_for_intern<'e>(
    db: impl PgExecutor<'e>,
    intern_id: InternId,
) -> Result<Vec<DailyReport>, AppError> {
    let query = format!(
        "SELECT {REPORT_COLUMNS} FROM daily_reports WHERE intern_id = $1 \
         ORDER BY report_date DESC, created_at DESC"
    );
    let reports = sqlx::query_as::<_, DailyReport>(&query)
        .bind(intern_id)
        .fetch_all(db)
        .await?;
    Ok(reports)
}

/// Reports for a batch of interns, newest first; callers group by intern.
pub async fn list_for_interns<'e>(
    db: impl PgExecutor<'e>,
    intern_ids: &[InternId],
) -> Result<Vec<DailyReport>, AppError> {
    if intern_ids.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = intern_ids.iter().map(|id| id.get()).collect();
    let query = format!(
        "SELECT {REPORT_COLUMNS} FROM daily_reports WHERE intern_id = ANY($1) \
         ORDER BY report_date DESC, created_at DESC"
    );
    let reports = sqlx::query_as::<_, DailyReport>(&query)
        .bind(ids)
        .fetch_all(db)
        .await?;
    Ok(reports)
}

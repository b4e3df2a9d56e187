//! Queries over the `interns` table. Every status change is a guarded
//! `UPDATE ... WHERE status = <expected>` so concurrent requests cannot both
//! move the same record.

use chrono::NaiveDate;
use sqlx::PgExecutor;

use crate::error::AppError;
use crate::models::intern::{EnrollmentUpdate, Intern, NewApplication, OnboardingUpdate};
use crate::models::lifecycle::ApplicationStatus;
use crate::types::InternId;

const INTERN_COLUMNS: &str = "id, full_name, enrollment_no, personal_email, mobile_no, \
    application_no, semester, program, department, organization, gender, blood_group, \
    present_address, permanent_address, loi_file, passport_photo, e_signature, signed_nda, \
    status, date_of_joining, date_of_leaving, password_hash, rejection_reason, \
    special_approval_notes, created_at, updated_at";

pub const DUPLICATE_EMAIL_MESSAGE: &str =
    "An application with this email address already exists. Please use a different email or contact support.";
pub const DUPLICATE_APPLICATION_NO_MESSAGE: &str =
    "Application number is already assigned to another intern";

/// Dashboard orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternOrder {
    NewestCreated,
    RecentlyUpdated,
    ApplicationNo,
    LatestLeaving,
}

impl InternOrder {
    fn sql(&self) -> &'static str {
        match self {
            InternOrder::NewestCreated => "created_at DESC, id DESC",
            InternOrder::RecentlyUpdated => "updated_at DESC, id DESC",
            InternOrder::ApplicationNo => "application_no ASC, id ASC",
            InternOrder::LatestLeaving => "date_of_leaving DESC, id DESC",
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub async fn create_application<'e>(
    db: impl PgExecutor<'e>,
    application: &NewApplication,
) -> Result<Intern, AppError> {
    let query = format!(
        "INSERT INTO interns (full_name, enrollment_no, personal_email, mobile_no, loi_file, status) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {INTERN_COLUMNS}"
    );
    sqlx::query_as::<_, Intern>(&query)
        .bind(&application.full_name)
        .bind(&application.enrollment_no)
        .bind(&application.personal_email)
        .bind(&application.mobile_no)
        .bind(&application.loi_file)
        .bind(ApplicationStatus::Fresh)
        .fetch_one(db)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string())
            } else {
                err.into()
            }
        })
}

pub async fn find_by_id<'e>(
    db: impl PgExecutor<'e>,
    id: InternId,
) -> Result<Option<Intern>, AppError> {
    let query = format!("SELECT {INTERN_COLUMNS} FROM interns WHERE id = $1");
    let intern = sqlx::query_as::<_, Intern>(&query)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(intern)
}

pub async fn find_by_email<'e>(
    db: impl PgExecutor<'e>,
    email: &str,
) -> Result<Option<Intern>, AppError> {
    let query = format!("SELECT {INTERN_COLUMNS} FROM interns WHERE personal_email = $1");
    let intern = sqlx::query_as::<_, Intern>(&query)
        .bind(email)
        .fetch_optional(db)
        .await?;
    Ok(intern)
}

pub async fn find_by_application_no<'e>(
    db: impl PgExecutor<'e>,
    application_no: &str,
) -> Result<Option<Intern>, AppError> {
    let query = format!("SELECT {INTERN_COLUMNS} FROM interns WHERE application_no = $1");
    let intern = sqlx::query_as::<_, Intern>(&query)
        .bind(application_no)
        .fetch_optional(db)
        .await?;
    Ok(intern)
}

pub async fn application_no_taken<'e>(
    db: impl PgExecutor<'e>,
    application_no: &str,
    except: InternId,
) -> Result<bool, AppError> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM interns WHERE application_no = $1 AND id <> $2)",
    )
    .bind(application_no)
    .bind(except)
    .fetch_one(db)
    .await?;
    Ok(taken)
}

pub async fn list_by_status<'e>(
    db: impl PgExecutor<'e>,
    status: ApplicationStatus,
    order: InternOrder,
) -> Result<Vec<Intern>, AppError> {
    let query = format!(
        "SELECT {INTERN_COLUMNS} FROM interns WHERE status = $1 ORDER BY {}",
        order.sql()
    );
    let interns = sqlx::query_as::<_, Intern>(&query)
        .bind(status)
        .fetch_all(db)
        .await?;
    Ok(interns)
}

/// Records a review decision on a Fresh record. Returns the number of rows
/// moved (0 when the record left Fresh in the meantime).
pub async fn apply_decision<'e>(
    db: impl PgExecutor<'e>,
    id: InternId,
    next: ApplicationStatus,
    rejection_reason: Option<&str>,
    special_approval_notes: Option<&str>,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        "UPDATE interns SET status = $2, \
             rejection_reason = COALESCE($3, rejection_reason), \
             special_approval_notes = COALESCE($4, special_approval_notes), \
             updated_at = NOW() \
         WHERE id = $1 AND status = $5",
    )
    .bind(id)
    .bind(next)
    .bind(rejection_reason)
    .bind(special_approval_notes)
    .bind(ApplicationStatus::Fresh)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

pub async fn submit_enrollment<'e>(
    db: impl PgExecutor<'e>,
    id: InternId,
    update: &EnrollmentUpdate,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        "UPDATE interns SET \
             full_name = $2, enrollment_no = $3, personal_email = $4, mobile_no = $5, \
             semester = $6, program = $7, department = $8, organization = $9, \
             gender = $10, blood_group = $11, present_address = $12, permanent_address = $13, \
             passport_photo = $14, e_signature = $15, signed_nda = $16, \
             status = $17, updated_at = NOW() \
         WHERE id = $1 AND status = $18",
    )
    .bind(id)
    .bind(&update.full_name)
    .bind(&update.enrollment_no)
    .bind(&update.personal_email)
    .bind(&update.mobile_no)
    .bind(&update.semester)
    .bind(&update.program)
    .bind(&update.department)
    .bind(&update.organization)
    .bind(&update.gender)
    .bind(&update.blood_group)
    .bind(&update.present_address)
    .bind(&update.permanent_address)
    .bind(&update.passport_photo)
    .bind(&update.e_signature)
    .bind(&update.signed_nda)
    .bind(ApplicationStatus::PendingApproval)
    .bind(ApplicationStatus::PendingEnrollment)
    .execute(db)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string())
        } else {
            err.into()
        }
    })?;
    Ok(result.rows_affected())
}

pub async fn finalize_onboarding<'e>(
    db: impl PgExecutor<'e>,
    id: InternId,
    update: &OnboardingUpdate,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        "UPDATE interns SET application_no = $2, date_of_joining = $3, date_of_leaving = $4, \
             password_hash = $5, status = $6, updated_at = NOW() \
         WHERE id = $1 AND status = $7",
    )
    .bind(id)
    .bind(&update.application_no)
    .bind(update.date_of_joining)
    .bind(update.date_of_leaving)
    .bind(&update.password_hash)
    .bind(ApplicationStatus::Active)
    .bind(ApplicationStatus::PendingApproval)
    .execute(db)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::Conflict(DUPLICATE_APPLICATION_NO_MESSAGE.to_string())
        } else {
            err.into()
        }
    })?;
    Ok(result.rows_affected())
}

pub async fn update_password_hash<'e>(
    db: impl PgExecutor<'e>,
    id: InternId,
    password_hash: &str,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        "UPDATE interns SET password_hash = $2, updated_at = NOW() \
         WHERE id = $1 AND password_hash IS NOT NULL",
    )
    .bind(id)
    .bind(password_hash)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

/// Moves every Active record whose leaving date is before `today` to Completed.
pub async fn complete_elapsed<'e>(
    db: impl PgExecutor<'e>,
    today: NaiveDate,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        "UPDATE interns SET status = $1, updated_at = NOW() \
         WHERE status = $2 AND date_of_leaving < $3",
    )
    .bind(ApplicationStatus::Completed)
    .bind(ApplicationStatus::Active)
    .bind(today)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

use sqlx::PgExecutor;

use crate::error::AppError;
use crate::models::admin::Admin;
use crate::types::AdminId;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "Another admin already uses this email";

const ADMIN_COLUMNS: &str = "id, username, password_hash, email, full_name, created_at, updated_at";

pub async fn find_by_username<'e>(
    db: impl PgExecutor<'e>,
    username: &str,
) -> Result<Option<Admin>, AppError> {
    let query = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE username = $1");
    let admin = sqlx::query_as::<_, Admin>(&query)
        .bind(username)
        .fetch_optional(db)
        .await?;
    Ok(admin)
}

pub async fn find_by_id<'e>(
    db: impl PgExecutor<'e>,
    id: AdminId,
) -> Result<Option<Admin>, AppError> {
    let query = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1");
    let admin = sqlx::query_as::<_, Admin>(&query)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(admin)
}

pub async fn find_by_email<'e>(
    db: impl PgExecutor<'e>,
    email: &str,
) -> Result<Option<Admin>, AppError> {
    let query = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE LOWER(email) = LOWER($1)");
    let admin = sqlx::query_as::<_, Admin>(&query)
        .bind(email)
        .fetch_optional(db)
        .await?;
    Ok(admin)
}

/// Creates the admin, or resets the password and profile of an existing one
/// with the same username. Emails are unique regardless of case.
pub async fn upsert<'e>(
    db: impl PgExecutor<'e>,
    username: &str,
    password_hash: &str,
    email: Option<&str>,
    full_name: Option<&str>,
) -> Result<Admin, AppError> {
    let query = format!(
        "INSERT INTO admins (username, password_hash, email, full_name) VALUES ($1, $2, $3, $4) \
         ON CONFLICT (username) DO UPDATE SET password_hash = EXCLUDED.password_hash, \
             email = COALESCE(EXCLUDED.email, admins.email), \
             full_name = COALESCE(EXCLUDED.full_name, admins.full_name), \
             updated_at = NOW() \
         RETURNING {ADMIN_COLUMNS}"
    );
    let admin = sqlx::query_as::<_, Admin>(&query)
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .bind(full_name)
        .fetch_one(db)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string())
            }
            other => other.into(),
        })?;
    Ok(admin)
}

pub async fn update_password_hash<'e>(
    db: impl PgExecutor<'e>,
    id: AdminId,
    password_hash: &str,
) -> Result<u64, AppError> {
    let result =
        sqlx::query("UPDATE admins SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(db)
            .await?;
    Ok(result.rows_affected())
}

use chrono::{Duration, Utc};
use sqlx::PgExecutor;

use crate::error::AppError;
use crate::models::auth::UserType;
use crate::models::password_reset::{PasswordResetToken, RESET_TOKEN_TTL_MINUTES};
use crate::utils::security::hash_token;

const RESET_COLUMNS: &str = "id, token_hash, email, user_type, expires_at, used, created_at";

pub async fn create_password_reset<'e>(
    db: impl PgExecutor<'e>,
    email: &str,
    user_type: UserType,
    token: &str,
) -> Result<PasswordResetToken, AppError> {
    let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
    let query = format!(
        "INSERT INTO password_reset_tokens (token_hash, email, user_type, expires_at) \
         VALUES ($1, $2, $3, $4) RETURNING {RESET_COLUMNS}"
    );
    let record = sqlx::query_as::<_, PasswordResetToken>(&query)
        .bind(hash_token(token))
        .bind(email)
        .bind(user_type.as_str())
        .bind(expires_at)
        .fetch_one(db)
        .await?;
    Ok(record)
}

/// Read-only lookup of an unused, unexpired token.
pub async fn find_valid_reset_by_token<'e>(
    db: impl PgExecutor<'e>,
    token: &str,
) -> Result<Option<PasswordResetToken>, AppError> {
    let query = format!(
        "SELECT {RESET_COLUMNS} FROM password_reset_tokens \
         WHERE token_hash = $1 AND used = FALSE AND expires_at > NOW()"
    );
    let record = sqlx::query_as::<_, PasswordResetToken>(&query)
        .bind(hash_token(token))
        .fetch_optional(db)
        .await?;
    Ok(record)
}

/// Atomically marks the token used. Only one caller can ever get `Some`
/// for a given token, and never after expiry.
pub async fn claim_token<'e>(
    db: impl PgExecutor<'e>,
    token: &str,
) -> Result<Option<PasswordResetToken>, AppError> {
    let query = format!(
        "UPDATE password_reset_tokens SET used = TRUE \
         WHERE token_hash = $1 AND used = FALSE AND expires_at > NOW() \
         RETURNING {RESET_COLUMNS}"
    );
    let record = sqlx::query_as::<_, PasswordResetToken>(&query)
        .bind(hash_token(token))
        .fetch_optional(db)
        .await?;
    Ok(record)
}

pub async fn delete_expired_tokens<'e>(db: impl PgExecutor<'e>) -> Result<u64, AppError> {
    let result =
        sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at < NOW() OR used = TRUE")
            .execute(db)
            .await?;
    Ok(result.rows_affected())
}

//! Stored password-reset tokens.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::models::auth::UserType;
use crate::types::PasswordResetId;

/// Password reset tokens stay valid for this many minutes.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetToken {
    pub id: PasswordResetId,
    /// SHA-256 of the token that was mailed out.
    pub token_hash: String,
    pub email: String,
    pub user_type: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    pub fn user_type(&self) -> Option<UserType> {
        self.user_type.parse().ok()
    }
}

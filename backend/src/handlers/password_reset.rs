//! Forgotten-password flow. The plaintext token only ever exists in the
//! email; the database stores its SHA-256.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppError,
    models::auth::{
        MessageResponse, RequestPasswordResetPayload, ResetPasswordPayload, UserType,
        VerifyResetTokenResponse,
    },
    repositories::{
        admin as admin_repo, begin_transaction, commit_transaction, intern as intern_repo,
        password_reset as reset_repo,
    },
    services::notification::Notification,
    state::AppState,
    utils::{password::hash_password_blocking, security::generate_token},
    validation::payloads::{validate_new_password, validate_reset_request, ResetAccount},
};

use super::extract::AppJson;

pub const RESET_TOKEN_BYTES: usize = 32;
pub const RESET_REQUESTED_MESSAGE: &str =
    "If an account with that identifier exists, a password reset link has been sent.";
pub const INVALID_RESET_TOKEN: &str = "Invalid or expired reset token";

/// Email of the account that may receive a reset link, if any. Interns only
/// have a credential once onboarded.
async fn reset_recipient(state: &AppState, account: &ResetAccount) -> Result<Option<String>, AppError> {
    let email = match account {
        ResetAccount::Admin { email } => admin_repo::find_by_email(&state.pool, email)
            .await?
            .and_then(|admin| admin.email),
        ResetAccount::Intern { application_no } => {
            intern_repo::find_by_application_no(&state.pool, application_no)
                .await?
                .filter(|intern| intern.password_hash.is_some())
                .map(|intern| intern.personal_email)
        }
    };
    Ok(email)
}

/// Answers identically whether or not the account exists.
pub async fn request_password_reset(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RequestPasswordResetPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    let account = validate_reset_request(&payload).into_result()?;

    if let Some(email) = reset_recipient(&state, &account).await? {
        let token = generate_token(RESET_TOKEN_BYTES);
        reset_repo::create_password_reset(&state.pool, &email, account.user_type(), &token)
            .await?;
        state.notifier.dispatch(Notification::PasswordReset {
            to: email,
            reset_url: format!(
                "{}/reset-password/{}",
                state.config.frontend_url.trim_end_matches('/'),
                token
            ),
        });
        tracing::info!(user_type = %account.user_type(), "Password reset issued");
    } else {
        tracing::info!(user_type = %account.user_type(), "Password reset requested for unknown account");
    }

    Ok(Json(MessageResponse::new(RESET_REQUESTED_MESSAGE)))
}

/// Read-only; does not consume the token.
pub async fn verify_reset_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<VerifyResetTokenResponse>, AppError> {
    let record = reset_repo::find_valid_reset_by_token(&state.pool, &token)
        .await?
        .ok_or_else(|| AppError::BadRequest(INVALID_RESET_TOKEN.to_string()))?;
    Ok(Json(VerifyResetTokenResponse {
        valid: true,
        email: record.email,
    }))
}

/// Claims the token and stores the new hash in one transaction, so a token
/// can be spent at most once and never after it expires.
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    AppJson(payload): AppJson<ResetPasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    let password = validate_new_password(&payload).into_result()?;
    let new_hash = hash_password_blocking(password).await?;

    let mut tx = begin_transaction(&state.pool).await?;
    let record = reset_repo::claim_token(&mut *tx, &token)
        .await?
        .ok_or_else(|| AppError::BadRequest(INVALID_RESET_TOKEN.to_string()))?;

    let user_type = record
        .user_type()
        .ok_or_else(|| AppError::BadRequest(INVALID_RESET_TOKEN.to_string()))?;
    let updated = match user_type {
        UserType::Admin => match admin_repo::find_by_email(&mut *tx, &record.email).await? {
            Some(admin) => admin_repo::update_password_hash(&mut *tx, admin.id, &new_hash).await?,
            None => 0,
        },
        UserType::Intern => match intern_repo::find_by_email(&mut *tx, &record.email).await? {
            Some(intern) => {
                intern_repo::update_password_hash(&mut *tx, intern.id, &new_hash).await?
            }
            None => 0,
        },
    };
    if updated == 0 {
        return Err(AppError::BadRequest(INVALID_RESET_TOKEN.to_string()));
    }
    commit_transaction(tx).await?;
    tracing::info!(user_type = %user_type, "Password reset completed");

    state.notifier.dispatch(Notification::PasswordChanged {
        to: record.email.clone(),
        username: record.email,
    });

    Ok(Json(MessageResponse::new("Password has been reset successfully")))
}

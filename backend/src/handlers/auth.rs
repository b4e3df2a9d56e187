use std::time::Duration;

use axum::{
    extract::{Extension, State},
    Json,
};
use tokio::time::timeout;

use crate::{
    error::AppError,
    models::{
        admin::Admin,
        auth::{
            AdminUser, AuthUser, ChangePasswordRequest, InternUser, LoginRequest, LoginResponse,
            MessageResponse, UserType, ADMIN_ROLE,
        },
        intern::Intern,
        lifecycle::ApplicationStatus,
    },
    repositories::{admin as admin_repo, intern as intern_repo},
    services::notification::Notification,
    state::AppState,
    types::{AdminId, InternId},
    utils::{
        jwt::{create_access_token, Claims},
        password::{hash_password_blocking, verify_password_blocking},
    },
    validation::payloads::{validate_login, validate_password_change},
};

use super::extract::AppJson;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
const VERIFY_TIMEOUT: Duration = Duration::from_secs(3);

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const ACCOUNT_NOT_ACTIVE: &str = "Your account is not active. Please contact administrator.";
pub const AUTH_UNAVAILABLE: &str = "Authentication service temporarily unavailable";
pub const WRONG_CURRENT_PASSWORD: &str = "Current password is incorrect";

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
}

fn unavailable(stage: &'static str) -> AppError {
    tracing::error!(stage, "Login step timed out");
    AppError::Unavailable(AUTH_UNAVAILABLE.to_string())
}

/// Checks `password` against `hash` within the verification budget.
async fn password_matches(password: &str, hash: &str) -> Result<bool, AppError> {
    timeout(
        VERIFY_TIMEOUT,
        verify_password_blocking(password.to_string(), hash.to_string()),
    )
    .await
    .map_err(|_| unavailable("verify"))?
    .map_err(AppError::from)
}

enum Account {
    Admin(Admin),
    Intern(Intern),
}

/// Admins log in with their username, interns with their application number.
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let validated = validate_login(&payload);
    if !validated.is_valid() {
        tracing::debug!(errors = ?validated.errors, "Login payload rejected");
        return Err(invalid_credentials());
    }
    let fields = validated.into_result().map_err(|_| invalid_credentials())?;

    let account = match fields.user_type {
        UserType::Admin => {
            let lookup = admin_repo::find_by_username(&state.pool, &fields.username);
            timeout(LOOKUP_TIMEOUT, lookup)
                .await
                .map_err(|_| unavailable("lookup"))??
                .map(Account::Admin)
        }
        UserType::Intern => {
            let lookup = intern_repo::find_by_application_no(&state.pool, &fields.username);
            timeout(LOOKUP_TIMEOUT, lookup)
                .await
                .map_err(|_| unavailable("lookup"))??
                .map(Account::Intern)
        }
    }
    .ok_or_else(invalid_credentials)?;

    let (claims, user) = match account {
        Account::Admin(admin) => {
            if !password_matches(&fields.password, &admin.password_hash).await? {
                return Err(invalid_credentials());
            }
            let claims = Claims::new(
                admin.id.get(),
                admin.username.clone(),
                ADMIN_ROLE.to_string(),
                UserType::Admin,
                state.config.jwt_expiration_hours,
            );
            (claims, AuthUser::Admin(AdminUser::from(&admin)))
        }
        Account::Intern(intern) => {
            let Some(hash) = intern.password_hash.as_deref() else {
                return Err(invalid_credentials());
            };
            if !password_matches(&fields.password, hash).await? {
                return Err(invalid_credentials());
            }
            // Only the holder of valid credentials learns the account state.
            if intern.status != ApplicationStatus::Active {
                tracing::warn!(intern_id = %intern.id, status = %intern.status, "Inactive intern login attempt");
                return Err(AppError::Forbidden(ACCOUNT_NOT_ACTIVE.to_string()));
            }
            let role = intern.role().as_str().to_string();
            let claims = Claims::new(
                intern.id.get(),
                fields.username.clone(),
                role.clone(),
                UserType::Intern,
                state.config.jwt_expiration_hours,
            );
            let user = AuthUser::Intern(InternUser {
                id: intern.id,
                application_no: intern.application_no.clone(),
                full_name: intern.full_name.clone(),
                email: intern.personal_email.clone(),
                role,
                status: intern.status.as_str().to_string(),
            });
            (claims, user)
        }
    };

    let token = create_access_token(&claims, &state.config.jwt_secret)?;
    tracing::info!(sub = %claims.sub, user_type = %claims.user_type, "Login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

/// Tokens are stateless; the client discards its copy.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logged out successfully"))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let request = validate_password_change(&payload).into_result()?;
    let subject = claims.subject_id().ok_or(AppError::InvalidToken)?;

    let (current_hash, email) = match claims.user_type {
        UserType::Admin => {
            let admin = admin_repo::find_by_id(&state.pool, AdminId::new(subject))
                .await?
                .ok_or(AppError::InvalidToken)?;
            (Some(admin.password_hash), admin.email)
        }
        UserType::Intern => {
            let intern = intern_repo::find_by_id(&state.pool, InternId::new(subject))
                .await?
                .ok_or(AppError::InvalidToken)?;
            (intern.password_hash, Some(intern.personal_email))
        }
    };
    let current_hash = current_hash.ok_or_else(invalid_credentials)?;

    if !verify_password_blocking(request.current_password, current_hash).await? {
        return Err(AppError::BadRequest(WRONG_CURRENT_PASSWORD.to_string()));
    }

    let new_hash = hash_password_blocking(request.new_password).await?;
    match claims.user_type {
        UserType::Admin => {
            admin_repo::update_password_hash(&state.pool, AdminId::new(subject), &new_hash).await?
        }
        UserType::Intern => {
            intern_repo::update_password_hash(&state.pool, InternId::new(subject), &new_hash)
                .await?
        }
    };
    tracing::info!(sub = %claims.sub, user_type = %claims.user_type, "Password changed");

    if let Some(to) = email {
        state.notifier.dispatch(Notification::PasswordChanged {
            to,
            username: claims.username.clone(),
        });
    }

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

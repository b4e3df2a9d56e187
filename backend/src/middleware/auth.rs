//! Bearer-token gate. Each protected router group layers one of the
//! `require_*` functions; the verified [`Claims`] are placed in request
//! extensions for handlers to pick up with `Extension<Claims>`.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    models::auth::ADMIN_ROLE,
    state::AppState,
    utils::jwt::{verify_access_token, Claims},
};

const INTERN_ROLE_PREFIX: &str = "Intern_";

pub const MISSING_TOKEN_MESSAGE: &str = "Authorization token missing.";
pub const INSUFFICIENT_PRIVILEGES_MESSAGE: &str = "Insufficient privileges.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredRole {
    /// Exactly `"Admin"`.
    Admin,
    /// Any `Intern_*` role.
    Intern,
    Exact(String),
}

impl RequiredRole {
    pub fn allows(&self, role: &str) -> bool {
        match self {
            RequiredRole::Admin => role == ADMIN_ROLE,
            RequiredRole::Intern => role.starts_with(INTERN_ROLE_PREFIX),
            RequiredRole::Exact(expected) => role == expected,
        }
    }
}

/// True when any of `required` accepts `role`.
pub fn role_allows(required: &[RequiredRole], role: &str) -> bool {
    required.iter().any(|r| r.allows(role))
}

pub fn parse_bearer_token(header: &str) -> Option<&str> {
    if let Some(rest) = header.strip_prefix("Bearer ") {
        return Some(rest);
    }
    if let Some(space_idx) = header.find(' ') {
        let (scheme, rest) = header.split_at(space_idx);
        if scheme.eq_ignore_ascii_case("bearer") {
            return Some(rest.trim_start());
        }
    }
    None
}

/// Verifies the bearer token in `headers` and checks its role.
pub fn authorize(
    headers: &HeaderMap,
    secret: &str,
    required: &[RequiredRole],
) -> Result<Claims, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer_token)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized(MISSING_TOKEN_MESSAGE.to_string()))?;

    let claims = verify_access_token(token, secret)?;

    if !role_allows(required, &claims.role) {
        tracing::warn!(role = %claims.role, sub = %claims.sub, "Role gate rejected request");
        return Err(AppError::Forbidden(
            INSUFFICIENT_PRIVILEGES_MESSAGE.to_string(),
        ));
    }
    Ok(claims)
}

async fn gate(
    state: &AppState,
    mut request: Request,
    next: Next,
    required: &[RequiredRole],
) -> Result<Response, AppError> {
    let claims = authorize(request.headers(), &state.config.jwt_secret, required)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(&state, request, next, &[RequiredRole::Admin]).await
}

pub async fn require_intern(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(&state, request, next, &[RequiredRole::Intern]).await
}

/// Admin or any intern.
pub async fn require_authenticated(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(
        &state,
        request,
        next,
        &[RequiredRole::Admin, RequiredRole::Intern],
    )
    .await
}

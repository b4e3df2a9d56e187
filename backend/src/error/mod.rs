use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::lifecycle::TransitionError;
use crate::utils::jwt::TokenError;
use crate::utils::upload::UploadError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    TokenExpired,
    InvalidToken,
    Forbidden(String),
    /// Duplicate resources. Reported as a 400 like any other rejected input.
    Conflict(String),
    BadRequest(String),
    PayloadTooLarge(String),
    InternalServerError(anyhow::Error),
    /// A dependency did not answer in time. Still a 500, with a specific message.
    Unavailable(String),
    Validation(Vec<String>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND", None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED", None),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "Your session has expired. Please login again.".to_string(),
                "TOKEN_EXPIRED",
                None,
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Invalid authentication token. Please login again.".to_string(),
                "INVALID_TOKEN",
                None,
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, "FORBIDDEN", None),
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg, "CONFLICT", None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST", None),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, msg, "PAYLOAD_TOO_LARGE", None)
            }
            AppError::InternalServerError(err) => {
                tracing::error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while processing your request".to_string(),
                    "INTERNAL_SERVER_ERROR",
                    None,
                )
            }
            AppError::Unavailable(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "SERVICE_UNAVAILABLE",
                None,
            ),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Invalid input data".to_string(),
                "VALIDATION_ERROR",
                Some(errors),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code: code.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::InternalServerError(err.into()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        AppError::Validation(messages)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Malformed request body: {}", rejection.body_text()))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("File too large. Maximum size is 1MB.".to_string())
        } else {
            AppError::BadRequest(format!("Malformed multipart body: {}", err.body_text()))
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::TokenExpired,
            TokenError::Invalid => AppError::InvalidToken,
            TokenError::Encode(inner) => AppError::InternalServerError(inner.into()),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::TooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            UploadError::Io(inner) => AppError::InternalServerError(inner.into()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lifecycle::{ApplicationStatus, LifecycleEvent};

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn app_error_into_response_maps_status_and_body() {
        let response = AppError::BadRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "bad");
        assert_eq!(json["code"], "BAD_REQUEST");

        let response = AppError::Unauthorized("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AppError::Forbidden("denied".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = AppError::NotFound("missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn conflict_is_reported_as_bad_request() {
        let response = AppError::Conflict("duplicate".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "duplicate");
        assert_eq!(json["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn validation_lists_details_as_strings() {
        let response = AppError::Validation(vec!["Invalid email address".to_string()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Invalid input data");
        assert_eq!(json["details"][0], "Invalid email address");
    }

    #[tokio::test]
    async fn token_errors_keep_distinct_codes() {
        let expired = AppError::from(TokenError::Expired).into_response();
        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response_json(expired).await["code"], "TOKEN_EXPIRED");

        let invalid = AppError::from(TokenError::Invalid).into_response();
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response_json(invalid).await["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn transition_errors_become_bad_requests() {
        let err = ApplicationStatus::Active
            .apply(LifecycleEvent::Onboarded)
            .expect_err("active interns cannot be onboarded again");
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = AppError::InternalServerError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["code"], "INTERNAL_SERVER_ERROR");
        assert!(json["details"].is_null());
        assert!(!json["error"].as_str().unwrap_or_default().contains("boom"));
    }

    #[tokio::test]
    async fn unavailable_keeps_its_message() {
        let response = AppError::Unavailable("try later".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"], "try later");
        assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
    }
}

//! The enrollment link is a capability: whoever holds `/enroll/{id}` may read
//! and submit that one enrollment form. No token is involved; the record's
//! status is what limits its use.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::types::InternId;
use crate::validation::payloads::{validate_id, INVALID_ID_MESSAGE};

/// Sanitized record ID taken from the `{id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentLink(pub InternId);

impl<S> FromRequestParts<S> for EnrollmentLink
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest(INVALID_ID_MESSAGE.to_string()))?;
        validate_id(&raw)
            .sanitized
            .map(EnrollmentLink)
            .ok_or_else(|| AppError::BadRequest(INVALID_ID_MESSAGE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new().route(
            "/enroll/{id}",
            get(|EnrollmentLink(id): EnrollmentLink| async move { id.to_string() }),
        )
    }

    async fn call(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn accepts_leading_integer() {
        assert_eq!(call("/enroll/12").await, (StatusCode::OK, "12".to_string()));
        assert_eq!(call("/enroll/12abc").await, (StatusCode::OK, "12".to_string()));
    }

    #[tokio::test]
    async fn rejects_non_positive_ids() {
        let (status, body) = call("/enroll/0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains(INVALID_ID_MESSAGE));
    }
}

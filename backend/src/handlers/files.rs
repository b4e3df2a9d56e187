//! Authenticated download of stored uploads.

use axum::{
    body::Body,
    extract::{Extension, Path, State},
    http::{header, HeaderValue},
    response::Response,
};

use crate::{
    error::AppError,
    models::auth::UserType,
    repositories::intern as intern_repo,
    state::AppState,
    types::InternId,
    utils::{
        jwt::Claims,
        upload::{is_plain_file_name, FileKind, UploadStore},
    },
};

pub const ACCESS_DENIED: &str = "Access denied";
pub const NOT_YOUR_FILE: &str = "You do not have permission to access this file";
pub const FILE_NOT_FOUND: &str = "File not found";

/// `GET /api/files/{*path}`. The path must be a bare stored name; anything
/// with separators or parent references is refused before touching the disk.
/// Interns can only fetch documents attached to their own record.
pub async fn download_file(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(requested): Path<String>,
) -> Result<Response, AppError> {
    if !is_plain_file_name(&requested) {
        tracing::warn!(path = %requested, sub = %claims.sub, "Rejected file path");
        return Err(AppError::Forbidden(ACCESS_DENIED.to_string()));
    }

    if claims.user_type == UserType::Intern {
        let id = claims
            .subject_id()
            .map(InternId::new)
            .ok_or(AppError::InvalidToken)?;
        let owns = intern_repo::find_by_id(&state.pool, id)
            .await?
            .is_some_and(|intern| intern.owns_document(&requested));
        if !owns {
            return Err(AppError::Forbidden(NOT_YOUR_FILE.to_string()));
        }
    }

    let store = UploadStore::new(state.config.upload_dir.clone());
    let path = store
        .resolve(&requested)
        .ok_or_else(|| AppError::Forbidden(ACCESS_DENIED.to_string()))?;
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(FILE_NOT_FOUND.to_string()));
        }
        Err(err) => return Err(AppError::InternalServerError(err.into())),
    };

    let content_type = FileKind::from_extension(&requested)
        .map(|kind| kind.content_type())
        .unwrap_or("application/octet-stream");
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{requested}\""))
        .map_err(|err| AppError::InternalServerError(err.into()))?;

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(bytes))
        .map_err(|err| AppError::InternalServerError(err.into()))
}

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::intern::NewApplication,
    repositories::intern::{self as intern_repo, DUPLICATE_EMAIL_MESSAGE},
    state::AppState,
    types::InternId,
    utils::upload::{ensure_kind, read_multipart, UploadStore, DOCUMENT_KINDS},
    validation::payloads::validate_application,
};

pub const INVALID_PDF_MESSAGE: &str = "Security Alert: Invalid PDF format.";

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationSubmitted {
    pub message: String,
    pub id: InternId,
}

/// Public application form: text fields plus the LOI as a PDF.
pub async fn submit_application(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationSubmitted>), AppError> {
    let mut form = read_multipart(multipart, state.config.max_upload_bytes).await?;
    let fields = validate_application(&form).into_result()?;

    let loi = form.take_file("loi")?;
    let kind = ensure_kind("loi", &loi.bytes, DOCUMENT_KINDS)
        .map_err(|_| AppError::BadRequest(INVALID_PDF_MESSAGE.to_string()))?;

    if intern_repo::find_by_email(&state.pool, &fields.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
    }

    let store = UploadStore::new(&state.config.upload_dir);
    let loi_file = store.save(kind, &loi.bytes).await?;

    let application = NewApplication {
        full_name: fields.full_name,
        enrollment_no: fields.enrollment_no,
        personal_email: fields.email,
        mobile_no: fields.mobile,
        loi_file: loi_file.clone(),
    };
    let intern = match intern_repo::create_application(&state.pool, &application).await {
        Ok(intern) => intern,
        Err(err) => {
            store.remove(&loi_file).await;
            return Err(err);
        }
    };

    tracing::info!(intern_id = %intern.id, "Application submitted");
    Ok((
        StatusCode::CREATED,
        Json(ApplicationSubmitted {
            message: "Application submitted successfully.".to_string(),
            id: intern.id,
        }),
    ))
}

//! Capability-link enrollment: `GET`/`POST /api/enroll/{id}`.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::{
    error::AppError,
    middleware::EnrollmentLink,
    models::{
        auth::MessageResponse,
        intern::{EnrollmentForm, EnrollmentUpdate, Intern},
        lifecycle::{ApplicationStatus, LifecycleEvent},
    },
    repositories::intern as intern_repo,
    state::AppState,
    types::InternId,
    utils::upload::{
        ensure_kind, read_multipart, FileKind, UploadError, UploadStore, DOCUMENT_KINDS,
        IMAGE_KINDS,
    },
    validation::payloads::{validate_enrollment, EnrollmentFields},
};

pub const FILES_REQUIRED_MESSAGE: &str = "All files (photo, signature, NDA) are required";
pub const APPLICATION_NOT_FOUND: &str = "Application not found";
pub const ENROLLMENT_UNAVAILABLE: &str = "Enrollment is not available for this application";

async fn pending_enrollment(state: &AppState, id: InternId) -> Result<Intern, AppError> {
    let intern = intern_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(APPLICATION_NOT_FOUND.to_string()))?;
    if intern.status != ApplicationStatus::PendingEnrollment {
        return Err(AppError::BadRequest(ENROLLMENT_UNAVAILABLE.to_string()));
    }
    Ok(intern)
}

pub async fn get_enrollment_form(
    State(state): State<AppState>,
    EnrollmentLink(id): EnrollmentLink,
) -> Result<Json<EnrollmentForm>, AppError> {
    let intern = pending_enrollment(&state, id).await?;
    Ok(Json(EnrollmentForm::from(&intern)))
}

fn merge(intern: &Intern, fields: EnrollmentFields, files: [String; 3]) -> EnrollmentUpdate {
    let [passport_photo, e_signature, signed_nda] = files;
    EnrollmentUpdate {
        full_name: fields.full_name.unwrap_or_else(|| intern.full_name.clone()),
        enrollment_no: fields
            .enrollment_no
            .unwrap_or_else(|| intern.enrollment_no.clone()),
        personal_email: fields
            .email_address
            .unwrap_or_else(|| intern.personal_email.clone()),
        mobile_no: fields.contact_no.unwrap_or_else(|| intern.mobile_no.clone()),
        semester: fields.semester,
        program: fields.program,
        department: fields.department,
        organization: fields.organization,
        gender: fields.gender,
        blood_group: fields.blood_group,
        present_address: fields.present_address,
        permanent_address: fields.permanent_address,
        passport_photo,
        e_signature,
        signed_nda,
    }
}

/// Every file is checked in memory before anything touches the disk, so a
/// single bad upload leaves the record exactly as it was.
pub async fn submit_enrollment(
    State(state): State<AppState>,
    EnrollmentLink(id): EnrollmentLink,
    multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    let mut form = read_multipart(multipart, state.config.max_upload_bytes).await?;
    let (photo, sign, nda) = match (
        form.take_file("photo"),
        form.take_file("sign"),
        form.take_file("nda"),
    ) {
        (Ok(photo), Ok(sign), Ok(nda)) => (photo, sign, nda),
        _ => return Err(AppError::BadRequest(FILES_REQUIRED_MESSAGE.to_string())),
    };

    let intern = pending_enrollment(&state, id).await?;
    intern.status.apply(LifecycleEvent::EnrollmentSubmitted)?;

    let kinds = check_kinds(&photo.bytes, &sign.bytes, &nda.bytes)?;
    let fields = validate_enrollment(&form).into_result()?;

    let store = UploadStore::new(&state.config.upload_dir);
    let files = save_all(
        &store,
        [
            (kinds[0], photo.bytes.as_slice()),
            (kinds[1], sign.bytes.as_slice()),
            (kinds[2], nda.bytes.as_slice()),
        ],
    )
    .await?;
    let saved = files.clone();

    let update = merge(&intern, fields, files);
    let moved = match intern_repo::submit_enrollment(&state.pool, id, &update).await {
        Ok(moved) => moved,
        Err(err) => {
            discard(&store, &saved).await;
            return Err(err);
        }
    };
    if moved == 0 {
        discard(&store, &saved).await;
        return Err(AppError::BadRequest(ENROLLMENT_UNAVAILABLE.to_string()));
    }

    tracing::info!(intern_id = %id, "Enrollment submitted");
    Ok(Json(MessageResponse::new("Enrollment submitted successfully")))
}

fn check_kinds(photo: &[u8], sign: &[u8], nda: &[u8]) -> Result<[FileKind; 3], UploadError> {
    Ok([
        ensure_kind("photo", photo, IMAGE_KINDS)?,
        ensure_kind("sign", sign, IMAGE_KINDS)?,
        ensure_kind("nda", nda, DOCUMENT_KINDS)?,
    ])
}

/// Writes the three uploads; on failure removes whatever was already written.
async fn save_all(
    store: &UploadStore,
    uploads: [(FileKind, &[u8]); 3],
) -> Result<[String; 3], UploadError> {
    let mut saved = Vec::with_capacity(uploads.len());
    for (kind, bytes) in uploads {
        match store.save(kind, bytes).await {
            Ok(name) => saved.push(name),
            Err(err) => {
                discard(store, &saved).await;
                return Err(err);
            }
        }
    }
    match <[String; 3]>::try_from(saved) {
        Ok(names) => Ok(names),
        Err(saved) => {
            discard(store, &saved).await;
            Err(UploadError::Malformed("enrollment uploads".to_string()))
        }
    }
}

async fn discard(store: &UploadStore, names: &[String]) {
    for name in names {
        store.remove(name).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::intern::fixtures;

    fn fields() -> EnrollmentFields {
        EnrollmentFields {
            full_name: None,
            enrollment_no: Some("22CS999".into()),
            contact_no: None,
            email_address: None,
            semester: "5".into(),
            program: "B.Tech".into(),
            department: "CSE".into(),
            organization: "NFSU".into(),
            gender: "F".into(),
            blood_group: Some("O+".into()),
            present_address: "Gandhinagar".into(),
            permanent_address: "Pune".into(),
        }
    }

    #[test]
    fn blank_identity_fields_fall_back_to_record() {
        let intern = fixtures::intern(ApplicationStatus::PendingEnrollment);
        let update = merge(
            &intern,
            fields(),
            ["p.png".into(), "s.png".into(), "n.pdf".into()],
        );
        assert_eq!(update.full_name, intern.full_name);
        assert_eq!(update.personal_email, intern.personal_email);
        assert_eq!(update.mobile_no, intern.mobile_no);
        assert_eq!(update.enrollment_no, "22CS999");
        assert_eq!(update.signed_nda, "n.pdf");
    }
}

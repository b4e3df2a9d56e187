//! Admin dashboards and lifecycle actions. Every route here sits behind
//! `require_admin`.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppError,
    models::{
        auth::MessageResponse,
        daily_report::ReportSummary,
        intern::{
            CompletedInternRow, DecisionRequest, FreshApplication, Intern, InternDetail,
            OnboardRequest, OngoingInternRow, OnboardingUpdate, PendingApplication,
            RejectedApplication,
        },
        lifecycle::{ApplicationStatus, Decision, LifecycleEvent},
    },
    repositories::{
        daily_report as report_repo,
        intern::{self as intern_repo, InternOrder, DUPLICATE_APPLICATION_NO_MESSAGE},
    },
    services::{
        attendance,
        notification::Notification,
        status_sweep::complete_elapsed_internships,
    },
    state::AppState,
    types::InternId,
    utils::password::{generate_password, hash_password_blocking},
    validation::payloads::{
        validate_decision, validate_id, validate_onboarding, INVALID_ID_MESSAGE,
    },
};

use super::extract::AppJson;

pub const INTERN_NOT_FOUND: &str = "Intern not found";
pub const NOT_PENDING_APPROVAL: &str = "Intern is not in Pending_Approval status";
pub const NOT_FRESH: &str = "Application has already been reviewed";

pub async fn fresh_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<FreshApplication>>, AppError> {
    let interns =
        intern_repo::list_by_status(&state.pool, ApplicationStatus::Fresh, InternOrder::NewestCreated)
            .await?;
    Ok(Json(interns.into_iter().map(Into::into).collect()))
}

pub async fn pending_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<PendingApplication>>, AppError> {
    let interns = intern_repo::list_by_status(
        &state.pool,
        ApplicationStatus::PendingApproval,
        InternOrder::RecentlyUpdated,
    )
    .await?;
    Ok(Json(interns.into_iter().map(Into::into).collect()))
}

pub async fn rejected_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<RejectedApplication>>, AppError> {
    let interns = intern_repo::list_by_status(
        &state.pool,
        ApplicationStatus::Rejected,
        InternOrder::RecentlyUpdated,
    )
    .await?;
    Ok(Json(interns.into_iter().map(Into::into).collect()))
}

/// Loads interns in `status` with their reports, grouped per intern.
async fn with_reports(
    state: &AppState,
    status: ApplicationStatus,
    order: InternOrder,
) -> Result<Vec<(Intern, Vec<ReportSummary>)>, AppError> {
    complete_elapsed_internships(&state.pool, state.today()).await?;
    let interns = intern_repo::list_by_status(&state.pool, status, order).await?;
    let ids: Vec<InternId> = interns.iter().map(|intern| intern.id).collect();
    let mut grouped: HashMap<InternId, Vec<ReportSummary>> =
        attendance::group_reports(report_repo::list_for_interns(&state.pool, &ids).await?);
    Ok(interns
        .into_iter()
        .map(|intern| {
            let reports = grouped.remove(&intern.id).unwrap_or_default();
            (intern, reports)
        })
        .collect())
}

pub async fn ongoing_interns(
    State(state): State<AppState>,
) -> Result<Json<Vec<OngoingInternRow>>, AppError> {
    let today = state.today();
    let rows = with_reports(&state, ApplicationStatus::Active, InternOrder::ApplicationNo)
        .await?
        .into_iter()
        .map(|(intern, reports)| attendance::ongoing_row(intern, reports, today))
        .collect();
    Ok(Json(rows))
}

pub async fn completed_interns(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompletedInternRow>>, AppError> {
    let rows = with_reports(&state, ApplicationStatus::Completed, InternOrder::LatestLeaving)
        .await?
        .into_iter()
        .map(|(intern, reports)| attendance::completed_row(intern, reports))
        .collect();
    Ok(Json(rows))
}

pub async fn intern_detail(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<InternDetail>, AppError> {
    let id = validate_id(&raw_id)
        .sanitized
        .ok_or_else(|| AppError::BadRequest(INVALID_ID_MESSAGE.to_string()))?;
    let today = state.today();
    complete_elapsed_internships(&state.pool, today).await?;

    let intern = intern_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(INTERN_NOT_FOUND.to_string()))?;
    let reports = report_repo::list_for_intern(&state.pool, id)
        .await?
        .into_iter()
        .map(ReportSummary::from)
        .collect();
    Ok(Json(attendance::intern_detail(intern, reports, today)))
}

/// Review of a Fresh application. Only Fresh records can be decided; the
/// status write is guarded so a concurrent decision cannot overwrite it.
pub async fn decide_on_fresh(
    State(state): State<AppState>,
    AppJson(payload): AppJson<DecisionRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let fields = validate_decision(&payload).into_result()?;

    let intern = intern_repo::find_by_id(&state.pool, fields.id)
        .await?
        .ok_or_else(|| AppError::NotFound(INTERN_NOT_FOUND.to_string()))?;
    let next = intern
        .status
        .apply(LifecycleEvent::Decided(fields.decision))?;

    let (reason, notes) = match fields.decision {
        Decision::Approved => (None, None),
        Decision::Rejected => (Some(fields.rejection_reason.as_str()), None),
        Decision::SpecialApprovalRequired => (None, Some(fields.special_approval_notes.as_str())),
    };
    let moved = intern_repo::apply_decision(&state.pool, intern.id, next, reason, notes).await?;
    if moved == 0 {
        return Err(AppError::BadRequest(NOT_FRESH.to_string()));
    }
    tracing::info!(intern_id = %intern.id, decision = fields.decision.as_str(), status = %next, "Decision recorded");

    if fields.decision == Decision::Approved {
        state.notifier.dispatch(Notification::EnrollmentInvite {
            to: intern.personal_email.clone(),
            full_name: intern.full_name.clone(),
            link: format!(
                "{}/enroll/{}",
                state.config.frontend_url.trim_end_matches('/'),
                intern.id
            ),
            nda_template: state.config.nda_template_path.clone(),
        });
    }

    Ok(Json(MessageResponse::new("Status updated successfully")))
}

/// Pending_Approval → Active: assigns the application number and tenure,
/// issues a generated password and mails it out.
pub async fn finalize_onboarding(
    State(state): State<AppState>,
    AppJson(payload): AppJson<OnboardRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let fields = validate_onboarding(&payload).into_result()?;

    let intern = intern_repo::find_by_id(&state.pool, fields.id)
        .await?
        .ok_or_else(|| AppError::NotFound(INTERN_NOT_FOUND.to_string()))?;
    if intern.status != ApplicationStatus::PendingApproval {
        return Err(AppError::BadRequest(NOT_PENDING_APPROVAL.to_string()));
    }
    intern.status.apply(LifecycleEvent::Onboarded)?;

    if intern_repo::application_no_taken(&state.pool, &fields.application_no, intern.id).await? {
        return Err(AppError::Conflict(
            DUPLICATE_APPLICATION_NO_MESSAGE.to_string(),
        ));
    }

    let password = generate_password();
    let password_hash = hash_password_blocking(password.clone()).await?;
    let update = OnboardingUpdate {
        application_no: fields.application_no.clone(),
        date_of_joining: fields.date_of_joining,
        date_of_leaving: fields.date_of_leaving,
        password_hash,
    };
    let moved = intern_repo::finalize_onboarding(&state.pool, intern.id, &update).await?;
    if moved == 0 {
        return Err(AppError::BadRequest(NOT_PENDING_APPROVAL.to_string()));
    }
    tracing::info!(intern_id = %intern.id, application_no = %fields.application_no, "Intern onboarded");

    state.notifier.dispatch(Notification::OnboardingCredentials {
        to: intern.personal_email.clone(),
        full_name: intern.full_name.clone(),
        application_no: fields.application_no.clone(),
        password,
        login_url: format!("{}/login", state.config.frontend_url.trim_end_matches('/')),
        date_of_joining: fields.date_of_joining,
        date_of_leaving: fields.date_of_leaving,
    });
    for recipient in &state.config.onboarding_recipients {
        state.notifier.dispatch(Notification::OnboardingAnnouncement {
            to: recipient.clone(),
            full_name: intern.full_name.clone(),
            application_no: fields.application_no.clone(),
            enrollment_no: intern.enrollment_no.clone(),
            date_of_joining: fields.date_of_joining,
            date_of_leaving: fields.date_of_leaving,
            program: intern.program.clone().unwrap_or_default(),
            department: intern.department.clone().unwrap_or_default(),
        });
    }

    Ok(Json(MessageResponse::new("Intern onboarded successfully")))
}

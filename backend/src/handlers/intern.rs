//! Intern self-service, behind `require_intern`.

use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    error::AppError,
    models::{
        auth::MessageResponse,
        daily_report::{DailyReport, DailyReportRequest, NewDailyReport},
        intern::{Intern, InternProfile},
        lifecycle::ApplicationStatus,
    },
    repositories::{
        daily_report::{self as report_repo, DUPLICATE_REPORT_MESSAGE},
        intern as intern_repo,
    },
    state::AppState,
    types::InternId,
    utils::jwt::Claims,
    validation::payloads::validate_daily_report,
};

use super::extract::AppJson;

pub const INTERN_NOT_FOUND: &str = "Intern not found";
pub const REPORTS_NOT_ALLOWED: &str = "You are not authorized to submit reports";

fn intern_id(claims: &Claims) -> Result<InternId, AppError> {
    claims
        .subject_id()
        .map(InternId::new)
        .ok_or(AppError::InvalidToken)
}

async fn current_intern(state: &AppState, claims: &Claims) -> Result<Intern, AppError> {
    intern_repo::find_by_id(&state.pool, intern_id(claims)?)
        .await?
        .ok_or_else(|| AppError::NotFound(INTERN_NOT_FOUND.to_string()))
}

pub async fn my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<InternProfile>, AppError> {
    let intern = current_intern(&state, &claims).await?;
    Ok(Json(intern.into()))
}

pub async fn my_reports(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<DailyReport>>, AppError> {
    let reports = report_repo::list_for_intern(&state.pool, intern_id(&claims)?).await?;
    Ok(Json(reports))
}

/// One report per intern per calendar day in the configured zone. The
/// unique index backs up the pre-check when two submissions race.
pub async fn submit_daily_report(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<DailyReportRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let fields = validate_daily_report(&payload).into_result()?;

    let intern = current_intern(&state, &claims).await?;
    if intern.status != ApplicationStatus::Active {
        return Err(AppError::Forbidden(REPORTS_NOT_ALLOWED.to_string()));
    }

    let today = state.today();
    if report_repo::exists_for_day(&state.pool, intern.id, today).await? {
        return Err(AppError::Conflict(DUPLICATE_REPORT_MESSAGE.to_string()));
    }

    let report = NewDailyReport {
        intern_id: intern.id,
        domain: fields.domain,
        application_no: intern.application_no.clone().unwrap_or_default(),
        name: intern.full_name.clone(),
        work_description: fields.work_description,
        tools_used: fields.tools_used,
        issues_faced: fields.issues_faced,
        report_date: today,
    };
    report_repo::create(&state.pool, &report).await?;

    Ok(Json(MessageResponse::new("Daily report submitted successfully")))
}

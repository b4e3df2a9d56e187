#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    handlers::applications::ApplicationSubmitted,
    models::{
        auth::{
            AdminUser, AuthUser, ChangePasswordRequest, InternUser, LoginRequest, LoginResponse,
            MessageResponse, RequestPasswordResetPayload, ResetPasswordPayload, UserType,
            VerifyResetTokenResponse,
        },
        daily_report::{DailyReport, DailyReportRequest, ReportSummary},
        intern::{
            CompletedInternRow, DecisionRequest, EnrollmentForm, FreshApplication, InternDetail,
            InternProfile, OngoingInternRow, OnboardRequest, PendingApplication,
            RejectedApplication,
        },
        lifecycle::{ApplicationStatus, Decision, InternRole},
    },
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        login_doc,
        logout_doc,
        change_password_doc,
        request_password_reset_doc,
        verify_reset_token_doc,
        reset_password_doc,
        apply_doc,
        enrollment_form_doc,
        submit_enrollment_doc,
        download_file_doc,
        fresh_dashboard_doc,
        pending_dashboard_doc,
        rejected_dashboard_doc,
        ongoing_dashboard_doc,
        completed_dashboard_doc,
        intern_detail_doc,
        decision_doc,
        onboard_doc,
        intern_profile_doc,
        intern_reports_doc,
        submit_report_doc
    ),
    components(
        schemas(
            // auth
            UserType,
            LoginRequest,
            LoginResponse,
            AuthUser,
            AdminUser,
            InternUser,
            ChangePasswordRequest,
            RequestPasswordResetPayload,
            ResetPasswordPayload,
            VerifyResetTokenResponse,
            MessageResponse,
            // lifecycle
            ApplicationStatus,
            InternRole,
            Decision,
            ApplicationSubmitted,
            EnrollmentForm,
            DecisionRequest,
            OnboardRequest,
            // dashboards
            FreshApplication,
            PendingApplication,
            RejectedApplication,
            OngoingInternRow,
            CompletedInternRow,
            InternDetail,
            // intern self-service
            InternProfile,
            DailyReport,
            DailyReportRequest,
            ReportSummary
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Login, password change and password reset"),
        (name = "Applications", description = "Public application and enrollment by link"),
        (name = "Admin", description = "Review dashboards and lifecycle decisions"),
        (name = "Intern", description = "Intern profile and daily reports"),
        (name = "Files", description = "Uploaded document download")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Intern account is not active"),
        (status = 429, description = "Too many login attempts")
    ),
    tag = "Auth",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    post,
    path = "/api/logout",
    responses((status = 200, body = MessageResponse)),
    tag = "Auth",
    security(())
)]
fn logout_doc() {}

#[utoipa::path(
    post,
    path = "/api/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Current password is incorrect or new password is invalid")
    ),
    tag = "Auth"
)]
fn change_password_doc() {}

#[utoipa::path(
    post,
    path = "/api/request-password-reset",
    request_body = RequestPasswordResetPayload,
    responses((status = 200, description = "Same answer whether or not the account exists", body = MessageResponse)),
    tag = "Auth",
    security(())
)]
fn request_password_reset_doc() {}

#[utoipa::path(
    get,
    path = "/api/verify-reset-token/{token}",
    params(("token" = String, Path, description = "Token from the reset email")),
    responses(
        (status = 200, body = VerifyResetTokenResponse),
        (status = 400, description = "Invalid or expired reset token")
    ),
    tag = "Auth",
    security(())
)]
fn verify_reset_token_doc() {}

#[utoipa::path(
    post,
    path = "/api/reset-password/{token}",
    params(("token" = String, Path, description = "Token from the reset email")),
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Invalid or expired reset token")
    ),
    tag = "Auth",
    security(())
)]
fn reset_password_doc() {}

#[utoipa::path(
    post,
    path = "/api/apply",
    request_body(
        content_type = "multipart/form-data",
        description = "fullName, enrollmentNo, email, mobile and the loi PDF"
    ),
    responses(
        (status = 201, body = ApplicationSubmitted),
        (status = 400, description = "Invalid fields, file type or duplicate email"),
        (status = 413, description = "File larger than the upload limit")
    ),
    tag = "Applications",
    security(())
)]
fn apply_doc() {}

#[utoipa::path(
    get,
    path = "/api/enroll/{id}",
    params(("id" = i64, Path, description = "Intern id from the enrollment link")),
    responses(
        (status = 200, body = EnrollmentForm),
        (status = 400, description = "Invalid id or enrollment not available"),
        (status = 404, description = "Application not found")
    ),
    tag = "Applications",
    security(())
)]
fn enrollment_form_doc() {}

#[utoipa::path(
    post,
    path = "/api/enroll/{id}",
    params(("id" = i64, Path, description = "Intern id from the enrollment link")),
    request_body(
        content_type = "multipart/form-data",
        description = "Enrollment fields plus passportPhoto, eSignature and signedNda"
    ),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Missing files, invalid fields or wrong status"),
        (status = 404, description = "Application not found")
    ),
    tag = "Applications",
    security(())
)]
fn submit_enrollment_doc() {}

#[utoipa::path(
    get,
    path = "/api/files/{path}",
    params(("path" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "File contents as an attachment"),
        (status = 403, description = "Path not allowed or file belongs to another intern"),
        (status = 404, description = "File not found")
    ),
    tag = "Files"
)]
fn download_file_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/fresh",
    responses((status = 200, body = [FreshApplication])),
    tag = "Admin"
)]
fn fresh_dashboard_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/pending",
    responses((status = 200, body = [PendingApplication])),
    tag = "Admin"
)]
fn pending_dashboard_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/rejected",
    responses((status = 200, body = [RejectedApplication])),
    tag = "Admin"
)]
fn rejected_dashboard_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/ongoing",
    responses((status = 200, body = [OngoingInternRow])),
    tag = "Admin"
)]
fn ongoing_dashboard_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/completed",
    responses((status = 200, body = [CompletedInternRow])),
    tag = "Admin"
)]
fn completed_dashboard_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/intern/{id}",
    params(("id" = i64, Path, description = "Intern id")),
    responses(
        (status = 200, body = InternDetail),
        (status = 400, description = "Invalid ID parameter"),
        (status = 404, description = "Intern not found")
    ),
    tag = "Admin"
)]
fn intern_detail_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/decision",
    request_body = DecisionRequest,
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Invalid decision or application already reviewed")
    ),
    tag = "Admin"
)]
fn decision_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/onboard",
    request_body = OnboardRequest,
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Invalid fields, wrong status or application number taken")
    ),
    tag = "Admin"
)]
fn onboard_doc() {}

#[utoipa::path(
    get,
    path = "/api/intern/profile",
    responses((status = 200, body = InternProfile)),
    tag = "Intern"
)]
fn intern_profile_doc() {}

#[utoipa::path(
    get,
    path = "/api/intern/reports",
    responses((status = 200, description = "Newest first", body = [DailyReport])),
    tag = "Intern"
)]
fn intern_reports_doc() {}

#[utoipa::path(
    post,
    path = "/api/intern/report",
    request_body = DailyReportRequest,
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Invalid fields or report already filed today"),
        (status = 403, description = "Only active interns can file reports")
    ),
    tag = "Intern"
)]
fn submit_report_doc() {}

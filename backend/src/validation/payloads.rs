//! Per-endpoint sanitize-then-validate passes. Each function sanitizes every
//! field it knows, records one message per failing field and never stops at
//! the first problem.

use chrono::NaiveDate;

use crate::models::auth::{
    ChangePasswordRequest, LoginRequest, RequestPasswordResetPayload, ResetPasswordPayload,
    UserType,
};
use crate::models::daily_report::DailyReportRequest;
use crate::models::intern::{DecisionRequest, OnboardRequest, BLOOD_GROUPS, GENDERS};
use crate::models::lifecycle::Decision;
use crate::types::InternId;
use crate::utils::sanitize::{
    sanitize_application_no, sanitize_date, sanitize_email, sanitize_enrollment_no,
    sanitize_enum, sanitize_id, sanitize_id_value, sanitize_phone, sanitize_string,
    sanitize_text, sanitize_username,
};
use crate::utils::upload::MultipartForm;
use crate::validation::{messages, Resolve, Validate, Validated};

pub const FULL_NAME_MIN: usize = 2;
pub const FULL_NAME_MAX: usize = 100;
pub const PROFILE_TEXT_MAX: usize = 200;
pub const ADDRESS_MAX: usize = 500;
pub const DECISION_TEXT_MAX: usize = 1000;
pub const DOMAIN_MAX: usize = 200;
pub const WORK_DESCRIPTION_MAX: usize = 5000;
pub const REPORT_NOTE_MAX: usize = 2000;

const FULL_NAME_MESSAGE: &str = "Full name must be between 2 and 100 characters";
const INVALID_INTERN_ID: &str = "Invalid intern ID";

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn checked_full_name(raw: &str) -> Option<String> {
    let name = sanitize_string(raw);
    let len = name.chars().count();
    (FULL_NAME_MIN..=FULL_NAME_MAX)
        .contains(&len)
        .then_some(name)
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

// Application submission

#[derive(Debug, Clone, Default)]
pub struct ApplicationInput {
    pub full_name: Option<String>,
    pub enrollment_no: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationFields {
    pub full_name: String,
    pub enrollment_no: String,
    pub email: String,
    pub mobile: String,
}

impl Resolve for ApplicationInput {
    type Output = ApplicationFields;

    fn resolve(self) -> Option<ApplicationFields> {
        Some(ApplicationFields {
            full_name: self.full_name?,
            enrollment_no: self.enrollment_no?,
            email: self.email?,
            mobile: self.mobile?,
        })
    }
}

/// Text fields `fullName`, `enrollmentNo`, `email`, `mobile` and file `loi`.
pub fn validate_application(form: &MultipartForm) -> Validated<ApplicationInput> {
    let text = |name: &str| form.text(name).unwrap_or_default();
    let mut errors = Vec::new();

    let sanitized = ApplicationInput {
        full_name: checked_full_name(text("fullName")),
        enrollment_no: sanitize_enrollment_no(text("enrollmentNo")),
        email: sanitize_email(text("email")),
        mobile: sanitize_phone(text("mobile")),
    };

    if sanitized.full_name.is_none() {
        errors.push(FULL_NAME_MESSAGE.to_string());
    }
    if sanitized.enrollment_no.is_none() {
        errors.push("Invalid enrollment number format".to_string());
    }
    if sanitized.email.is_none() {
        errors.push("Invalid email address".to_string());
    }
    if sanitized.mobile.is_none() {
        errors.push("Invalid mobile number (must be 10-15 digits)".to_string());
    }
    if form.file("loi").is_none() {
        errors.push("LOI file is required".to_string());
    }

    Validated::new(sanitized, errors)
}

// Enrollment submission

/// Identity fields are optional here; blanks fall back to what the record
/// already holds.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentInput {
    pub full_name: Option<String>,
    pub enrollment_no: Option<String>,
    pub contact_no: Option<String>,
    pub email_address: Option<String>,
    pub semester: Option<String>,
    pub program: Option<String>,
    pub department: Option<String>,
    pub organization: Option<String>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub present_address: Option<String>,
    pub permanent_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentFields {
    pub full_name: Option<String>,
    pub enrollment_no: Option<String>,
    pub contact_no: Option<String>,
    pub email_address: Option<String>,
    pub semester: String,
    pub program: String,
    pub department: String,
    pub organization: String,
    pub gender: String,
    pub blood_group: Option<String>,
    pub present_address: String,
    pub permanent_address: String,
}

impl Resolve for EnrollmentInput {
    type Output = EnrollmentFields;

    fn resolve(self) -> Option<EnrollmentFields> {
        Some(EnrollmentFields {
            full_name: self.full_name,
            enrollment_no: self.enrollment_no,
            contact_no: self.contact_no,
            email_address: self.email_address,
            semester: self.semester?,
            program: self.program?,
            department: self.department?,
            organization: self.organization?,
            gender: self.gender?,
            blood_group: self.blood_group,
            present_address: self.present_address?,
            permanent_address: self.permanent_address?,
        })
    }
}

pub fn validate_enrollment(form: &MultipartForm) -> Validated<EnrollmentInput> {
    let text = |name: &str| form.text(name).unwrap_or_default();
    let mut errors = Vec::new();

    let raw_name = sanitize_string(text("fullName"));
    let full_name = if raw_name.is_empty() {
        None
    } else {
        let name = checked_full_name(&raw_name);
        if name.is_none() {
            errors.push(FULL_NAME_MESSAGE.to_string());
        }
        name
    };

    let sanitized = EnrollmentInput {
        full_name,
        enrollment_no: sanitize_enrollment_no(text("enrollmentNo")),
        contact_no: sanitize_phone(text("contactNo")),
        email_address: sanitize_email(text("emailAddress")),
        semester: non_empty(sanitize_string(text("semester"))),
        program: non_empty(sanitize_text(text("program"), PROFILE_TEXT_MAX)),
        department: non_empty(sanitize_text(text("department"), PROFILE_TEXT_MAX)),
        organization: non_empty(sanitize_text(text("organization"), PROFILE_TEXT_MAX)),
        gender: sanitize_enum(text("gender"), &GENDERS),
        blood_group: sanitize_enum(text("bloodGroup"), &BLOOD_GROUPS),
        present_address: non_empty(sanitize_text(text("presentAddress"), ADDRESS_MAX)),
        permanent_address: non_empty(sanitize_text(text("permanentAddress"), ADDRESS_MAX)),
    };

    let required = [
        (&sanitized.semester, "Semester is required"),
        (&sanitized.program, "Program is required"),
        (&sanitized.department, "Department is required"),
        (&sanitized.organization, "Organization is required"),
        (&sanitized.gender, "Invalid gender value"),
        (&sanitized.present_address, "Present address is required"),
        (&sanitized.permanent_address, "Permanent address is required"),
    ];
    errors.extend(
        required
            .iter()
            .filter(|(value, _)| value.is_none())
            .map(|(_, message)| message.to_string()),
    );

    Validated::new(sanitized, errors)
}

// Login

#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    pub username: Option<String>,
    /// Kept verbatim for hash comparison.
    pub password: Option<String>,
    pub user_type: Option<UserType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginFields {
    pub username: String,
    pub password: String,
    pub user_type: UserType,
}

impl Resolve for LoginInput {
    type Output = LoginFields;

    fn resolve(self) -> Option<LoginFields> {
        Some(LoginFields {
            username: self.username?,
            password: self.password?,
            user_type: self.user_type?,
        })
    }
}

pub fn validate_login(request: &LoginRequest) -> Validated<LoginInput> {
    let mut errors = Vec::new();

    let username = sanitize_username(opt(&request.username));
    if username.is_none() {
        errors.push("Invalid username format".to_string());
    }

    let password = request.password.clone().filter(|p| !p.is_empty());
    if password.is_none() {
        errors.push("Password is required".to_string());
    }

    let user_type = sanitize_enum(opt(&request.user_type), &UserType::ALLOWED)
        .and_then(|value| value.parse::<UserType>().ok());
    if user_type.is_none() {
        errors.push("Invalid user type".to_string());
    }

    Validated::new(
        LoginInput {
            username,
            password,
            user_type,
        },
        errors,
    )
}

// Admin decision

#[derive(Debug, Clone, Default)]
pub struct DecisionInput {
    pub id: Option<InternId>,
    pub decision: Option<Decision>,
    pub rejection_reason: String,
    pub special_approval_notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionFields {
    pub id: InternId,
    pub decision: Decision,
    pub rejection_reason: String,
    pub special_approval_notes: String,
}

impl Resolve for DecisionInput {
    type Output = DecisionFields;

    fn resolve(self) -> Option<DecisionFields> {
        Some(DecisionFields {
            id: self.id?,
            decision: self.decision?,
            rejection_reason: self.rejection_reason,
            special_approval_notes: self.special_approval_notes,
        })
    }
}

pub fn validate_decision(request: &DecisionRequest) -> Validated<DecisionInput> {
    let mut errors = Vec::new();

    let id = request
        .id
        .as_ref()
        .and_then(sanitize_id_value)
        .map(InternId::new);
    if id.is_none() {
        errors.push(INVALID_INTERN_ID.to_string());
    }

    let decision = sanitize_enum(opt(&request.decision), &Decision::ALLOWED)
        .and_then(|value| value.parse::<Decision>().ok());
    if decision.is_none() {
        errors.push("Invalid decision value".to_string());
    }

    Validated::new(
        DecisionInput {
            id,
            decision,
            rejection_reason: sanitize_text(opt(&request.rejection_reason), DECISION_TEXT_MAX),
            special_approval_notes: sanitize_text(
                opt(&request.special_approval_notes),
                DECISION_TEXT_MAX,
            ),
        },
        errors,
    )
}

// Finalize onboarding

#[derive(Debug, Clone, Default)]
pub struct OnboardingInput {
    pub id: Option<InternId>,
    pub application_no: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    pub date_of_leaving: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingFields {
    pub id: InternId,
    pub application_no: String,
    pub date_of_joining: NaiveDate,
    pub date_of_leaving: NaiveDate,
}

impl Resolve for OnboardingInput {
    type Output = OnboardingFields;

    fn resolve(self) -> Option<OnboardingFields> {
        Some(OnboardingFields {
            id: self.id?,
            application_no: self.application_no?,
            date_of_joining: self.date_of_joining?,
            date_of_leaving: self.date_of_leaving?,
        })
    }
}

pub fn validate_onboarding(request: &OnboardRequest) -> Validated<OnboardingInput> {
    let mut errors = Vec::new();

    let id = request
        .id
        .as_ref()
        .and_then(sanitize_id_value)
        .map(InternId::new);
    if id.is_none() {
        errors.push(INVALID_INTERN_ID.to_string());
    }

    let application_no = sanitize_application_no(opt(&request.application_no));
    if application_no.is_none() {
        errors.push("Invalid application number format".to_string());
    }

    let date_of_joining = sanitize_date(opt(&request.date_of_joining));
    if date_of_joining.is_none() {
        errors.push("Invalid date of joining (use YYYY-MM-DD format)".to_string());
    }

    let date_of_leaving = sanitize_date(opt(&request.date_of_leaving));
    if date_of_leaving.is_none() {
        errors.push("Invalid date of leaving (use YYYY-MM-DD format)".to_string());
    }

    if let (Some(joining), Some(leaving)) = (date_of_joining, date_of_leaving) {
        if leaving <= joining {
            errors.push("Date of leaving must be after date of joining".to_string());
        }
    }

    Validated::new(
        OnboardingInput {
            id,
            application_no,
            date_of_joining,
            date_of_leaving,
        },
        errors,
    )
}

// Daily report

#[derive(Debug, Clone, Default)]
pub struct DailyReportInput {
    pub domain: Option<String>,
    pub work_description: Option<String>,
    pub tools_used: Option<String>,
    pub issues_faced: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReportFields {
    pub domain: String,
    pub work_description: String,
    pub tools_used: Option<String>,
    pub issues_faced: Option<String>,
}

impl Resolve for DailyReportInput {
    type Output = DailyReportFields;

    fn resolve(self) -> Option<DailyReportFields> {
        Some(DailyReportFields {
            domain: self.domain?,
            work_description: self.work_description?,
            tools_used: self.tools_used,
            issues_faced: self.issues_faced,
        })
    }
}

pub fn validate_daily_report(request: &DailyReportRequest) -> Validated<DailyReportInput> {
    let sanitized = DailyReportInput {
        domain: non_empty(sanitize_text(opt(&request.domain), DOMAIN_MAX)),
        work_description: non_empty(sanitize_text(
            opt(&request.work_description),
            WORK_DESCRIPTION_MAX,
        )),
        tools_used: non_empty(sanitize_text(opt(&request.tools_used), REPORT_NOTE_MAX)),
        issues_faced: non_empty(sanitize_text(opt(&request.issues_faced), REPORT_NOTE_MAX)),
    };

    let mut errors = Vec::new();
    if sanitized.domain.is_none() {
        errors.push("Domain is required".to_string());
    }
    if sanitized.work_description.is_none() {
        errors.push("Work description is required".to_string());
    }

    Validated::new(sanitized, errors)
}

// Path parameters

pub const INVALID_ID_MESSAGE: &str = "Invalid ID parameter";

pub fn validate_id(raw: &str) -> Validated<Option<InternId>> {
    let id = sanitize_id(raw).map(InternId::new);
    let errors = if id.is_some() {
        Vec::new()
    } else {
        vec![INVALID_ID_MESSAGE.to_string()]
    };
    Validated::new(id, errors)
}

// Password reset and change

/// Who asked for a reset link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetAccount {
    Admin { email: String },
    Intern { application_no: String },
}

impl ResetAccount {
    pub fn user_type(&self) -> UserType {
        match self {
            ResetAccount::Admin { .. } => UserType::Admin,
            ResetAccount::Intern { .. } => UserType::Intern,
        }
    }
}

pub fn validate_reset_request(
    request: &RequestPasswordResetPayload,
) -> Validated<Option<ResetAccount>> {
    let mut errors = Vec::new();

    let user_type = sanitize_enum(opt(&request.user_type), &UserType::ALLOWED)
        .and_then(|value| value.parse::<UserType>().ok());

    let account = match user_type {
        Some(UserType::Admin) => {
            let email = sanitize_email(opt(&request.email));
            if email.is_none() {
                errors.push("Invalid email address".to_string());
            }
            email.map(|email| ResetAccount::Admin { email })
        }
        Some(UserType::Intern) => {
            let application_no = sanitize_application_no(opt(&request.application_no));
            if application_no.is_none() {
                errors.push("Invalid application number format".to_string());
            }
            application_no.map(|application_no| ResetAccount::Intern { application_no })
        }
        None => {
            errors.push("Invalid user type".to_string());
            None
        }
    };

    Validated::new(account, errors)
}

pub fn validate_new_password(payload: &ResetPasswordPayload) -> Validated<Option<String>> {
    match payload.validate() {
        Ok(()) => Validated::new(Some(payload.password.clone()), Vec::new()),
        Err(errors) => Validated::new(None, messages(&errors)),
    }
}

pub fn validate_password_change(
    request: &ChangePasswordRequest,
) -> Validated<Option<ChangePasswordRequest>> {
    let mut errors = match request.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => messages(&errors),
    };
    if !request.current_password.is_empty() && request.current_password == request.new_password {
        errors.push("New password must be different from current password".to_string());
    }
    let sanitized = errors.is_empty().then(|| request.clone());
    Validated::new(sanitized, errors)
}

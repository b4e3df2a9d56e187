//! The applicant/intern record and the views the dashboards return.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::daily_report::ReportSummary;
use crate::models::lifecycle::{ApplicationStatus, InternRole};
use crate::types::InternId;

pub const GENDERS: [&str; 3] = ["M", "F", "O"];
pub const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

#[derive(Debug, Clone, FromRow)]
pub struct Intern {
    pub id: InternId,
    pub full_name: String,
    pub enrollment_no: String,
    pub personal_email: String,
    pub mobile_no: String,
    pub application_no: Option<String>,
    pub semester: Option<String>,
    pub program: Option<String>,
    pub department: Option<String>,
    pub organization: Option<String>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub present_address: Option<String>,
    pub permanent_address: Option<String>,
    pub loi_file: Option<String>,
    pub passport_photo: Option<String>,
    pub e_signature: Option<String>,
    pub signed_nda: Option<String>,
    pub status: ApplicationStatus,
    pub date_of_joining: Option<NaiveDate>,
    pub date_of_leaving: Option<NaiveDate>,
    pub password_hash: Option<String>,
    pub rejection_reason: Option<String>,
    pub special_approval_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Intern {
    pub fn role(&self) -> InternRole {
        self.status.role()
    }

    /// Stored names of every document attached to this record.
    pub fn document_names(&self) -> Vec<&str> {
        [
            &self.loi_file,
            &self.passport_photo,
            &self.e_signature,
            &self.signed_nda,
        ]
        .into_iter()
        .filter_map(|name| name.as_deref())
        .collect()
    }

    pub fn owns_document(&self, name: &str) -> bool {
        self.document_names().contains(&name)
    }

    pub fn hyperlink_text(&self) -> String {
        format!(
            "{}-{}",
            self.application_no.as_deref().unwrap_or_default(),
            self.full_name
        )
    }
}

/// Sanitized fields of a new application.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub full_name: String,
    pub enrollment_no: String,
    pub personal_email: String,
    pub mobile_no: String,
    pub loi_file: String,
}

/// Everything written by an enrollment submission. Identity fields are
/// already resolved against the prior values.
#[derive(Debug, Clone)]
pub struct EnrollmentUpdate {
    pub full_name: String,
    pub enrollment_no: String,
    pub personal_email: String,
    pub mobile_no: String,
    pub semester: String,
    pub program: String,
    pub department: String,
    pub organization: String,
    pub gender: String,
    pub blood_group: Option<String>,
    pub present_address: String,
    pub permanent_address: String,
    pub passport_photo: String,
    pub e_signature: String,
    pub signed_nda: String,
}

#[derive(Debug, Clone)]
pub struct OnboardingUpdate {
    pub application_no: String,
    pub date_of_joining: NaiveDate,
    pub date_of_leaving: NaiveDate,
    pub password_hash: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentForm {
    pub id: InternId,
    pub full_name: String,
    pub enrollment_no: String,
    pub email: String,
}

impl From<&Intern> for EnrollmentForm {
    fn from(intern: &Intern) -> Self {
        Self {
            id: intern.id,
            full_name: intern.full_name.clone(),
            enrollment_no: intern.enrollment_no.clone(),
            email: intern.personal_email.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FreshApplication {
    pub id: InternId,
    pub full_name: String,
    pub enrollment_no: String,
    pub personal_email: String,
    pub mobile_no: String,
    pub loi_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Intern> for FreshApplication {
    fn from(intern: Intern) -> Self {
        Self {
            id: intern.id,
            full_name: intern.full_name,
            enrollment_no: intern.enrollment_no,
            personal_email: intern.personal_email,
            mobile_no: intern.mobile_no,
            loi_file: intern.loi_file,
            created_at: intern.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingApplication {
    pub id: InternId,
    pub full_name: String,
    pub enrollment_no: String,
    pub personal_email: String,
    pub mobile_no: String,
    pub passport_photo: Option<String>,
    pub semester: Option<String>,
    pub program: Option<String>,
    pub department: Option<String>,
    pub organization: Option<String>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub present_address: Option<String>,
    pub permanent_address: Option<String>,
    pub e_signature: Option<String>,
    #[serde(rename = "signedNDA")]
    pub signed_nda: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Intern> for PendingApplication {
    fn from(intern: Intern) -> Self {
        Self {
            id: intern.id,
            full_name: intern.full_name,
            enrollment_no: intern.enrollment_no,
            personal_email: intern.personal_email,
            mobile_no: intern.mobile_no,
            passport_photo: intern.passport_photo,
            semester: intern.semester,
            program: intern.program,
            department: intern.department,
            organization: intern.organization,
            gender: intern.gender,
            blood_group: intern.blood_group,
            present_address: intern.present_address,
            permanent_address: intern.permanent_address,
            e_signature: intern.e_signature,
            signed_nda: intern.signed_nda,
            created_at: intern.created_at,
            updated_at: intern.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectedApplication {
    pub id: InternId,
    pub full_name: String,
    pub enrollment_no: String,
    pub personal_email: String,
    pub mobile_no: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Intern> for RejectedApplication {
    fn from(intern: Intern) -> Self {
        Self {
            id: intern.id,
            full_name: intern.full_name,
            enrollment_no: intern.enrollment_no,
            personal_email: intern.personal_email,
            mobile_no: intern.mobile_no,
            rejection_reason: intern.rejection_reason,
            created_at: intern.created_at,
            updated_at: intern.updated_at,
        }
    }
}

/// What an intern sees about themselves.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InternProfile {
    pub id: InternId,
    pub full_name: String,
    pub enrollment_no: String,
    pub personal_email: String,
    pub mobile_no: String,
    pub application_no: Option<String>,
    pub semester: Option<String>,
    pub program: Option<String>,
    pub department: Option<String>,
    pub organization: Option<String>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub present_address: Option<String>,
    pub permanent_address: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    pub date_of_leaving: Option<NaiveDate>,
    pub status: ApplicationStatus,
    pub role: InternRole,
}

impl From<Intern> for InternProfile {
    fn from(intern: Intern) -> Self {
        let role = intern.role();
        Self {
            id: intern.id,
            full_name: intern.full_name,
            enrollment_no: intern.enrollment_no,
            personal_email: intern.personal_email,
            mobile_no: intern.mobile_no,
            application_no: intern.application_no,
            semester: intern.semester,
            program: intern.program,
            department: intern.department,
            organization: intern.organization,
            gender: intern.gender,
            blood_group: intern.blood_group,
            present_address: intern.present_address,
            permanent_address: intern.permanent_address,
            date_of_joining: intern.date_of_joining,
            date_of_leaving: intern.date_of_leaving,
            status: intern.status,
            role,
        }
    }
}

/// Full record for the admin detail view, minus the credential hash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InternDetail {
    pub id: InternId,
    pub full_name: String,
    pub enrollment_no: String,
    pub personal_email: String,
    pub mobile_no: String,
    pub application_no: Option<String>,
    pub semester: Option<String>,
    pub program: Option<String>,
    pub department: Option<String>,
    pub organization: Option<String>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub present_address: Option<String>,
    pub permanent_address: Option<String>,
    pub loi_file: Option<String>,
    pub passport_photo: Option<String>,
    pub e_signature: Option<String>,
    #[serde(rename = "signedNDA")]
    pub signed_nda: Option<String>,
    pub status: ApplicationStatus,
    pub role: InternRole,
    pub date_of_joining: Option<NaiveDate>,
    pub date_of_leaving: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
    pub special_approval_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub days_since_start: i64,
    pub days_attended: i64,
    pub attendance_pct: f64,
    pub reports: Vec<ReportSummary>,
}

/// One row of the ongoing dashboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OngoingInternRow {
    pub id: InternId,
    pub hyperlink_text: String,
    pub application_no: Option<String>,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub days_since_start: i64,
    pub days_attended: i64,
    pub attendance_pct: f64,
    pub reports: Vec<ReportSummary>,
}

/// One row of the completed dashboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletedInternRow {
    pub id: InternId,
    pub hyperlink_text: String,
    pub application_no: Option<String>,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_days: i64,
    pub days_attended: i64,
    pub attendance_pct: f64,
    pub reports: Vec<ReportSummary>,
}

/// `POST /api/admin/decision` body. The ID may arrive as a number or a string.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub special_approval_notes: Option<String>,
}

/// `POST /api/admin/onboard` body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardRequest {
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub application_no: Option<String>,
    #[serde(default)]
    pub date_of_joining: Option<String>,
    #[serde(default)]
    pub date_of_leaving: Option<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn intern(status: ApplicationStatus) -> Intern {
        let now = Utc::now();
        Intern {
            id: InternId::new(1),
            full_name: "Asha Rao".into(),
            enrollment_no: "21CS001".into(),
            personal_email: "asha@example.com".into(),
            mobile_no: "+919876543210".into(),
            application_no: Some("NFSU-001".into()),
            semester: None,
            program: None,
            department: None,
            organization: None,
            gender: None,
            blood_group: None,
            present_address: None,
            permanent_address: None,
            loi_file: Some("loi.pdf".into()),
            passport_photo: Some("photo.png".into()),
            e_signature: None,
            signed_nda: None,
            status,
            date_of_joining: None,
            date_of_leaving: None,
            password_hash: None,
            rejection_reason: None,
            special_approval_notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::intern;
    use super::*;

    #[test]
    fn document_ownership_uses_stored_names() {
        let record = intern(ApplicationStatus::Active);
        assert!(record.owns_document("loi.pdf"));
        assert!(record.owns_document("photo.png"));
        assert!(!record.owns_document("someone-else.pdf"));
    }

    #[test]
    fn hyperlink_joins_application_no_and_name() {
        assert_eq!(
            intern(ApplicationStatus::Active).hyperlink_text(),
            "NFSU-001-Asha Rao"
        );
    }

    #[test]
    fn pending_view_uses_legacy_nda_key() {
        let mut record = intern(ApplicationStatus::PendingApproval);
        record.signed_nda = Some("nda.pdf".into());
        record.e_signature = Some("sign.png".into());
        let json = serde_json::to_value(PendingApplication::from(record)).unwrap();
        assert_eq!(json["signedNDA"], "nda.pdf");
        assert_eq!(json["eSignature"], "sign.png");
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn profile_reports_derived_role() {
        let json = serde_json::to_value(InternProfile::from(intern(ApplicationStatus::Active)))
            .unwrap();
        assert_eq!(json["status"], "Active");
        assert_eq!(json["role"], "Intern_approved&ongoing");
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::{DailyReportId, InternId};

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub id: DailyReportId,
    #[serde(skip_serializing)]
    pub intern_id: InternId,
    pub domain: String,
    /// Copied from the intern when the report is filed.
    pub application_no: String,
    pub name: String,
    pub work_description: String,
    pub tools_used: Option<String>,
    pub issues_faced: Option<String>,
    pub report_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Report as embedded in dashboard rows.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: DailyReportId,
    pub domain: String,
    pub work_description: String,
    pub tools_used: Option<String>,
    pub issues_faced: Option<String>,
    pub report_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<DailyReport> for ReportSummary {
    fn from(report: DailyReport) -> Self {
        Self {
            id: report.id,
            domain: report.domain,
            work_description: report.work_description,
            tools_used: report.tools_used,
            issues_faced: report.issues_faced,
            report_date: report.report_date,
            created_at: report.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportRequest {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub work_description: Option<String>,
    #[serde(default)]
    pub tools_used: Option<String>,
    #[serde(default)]
    pub issues_faced: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDailyReport {
    pub intern_id: InternId,
    pub domain: String,
    pub application_no: String,
    pub name: String,
    pub work_description: String,
    pub tools_used: Option<String>,
    pub issues_faced: Option<String>,
    pub report_date: NaiveDate,
}

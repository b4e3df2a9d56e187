//! Attendance derived from daily reports. Pure functions only; callers load
//! the rows and pass `today` in the configured zone.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::models::daily_report::{DailyReport, ReportSummary};
use crate::models::intern::{CompletedInternRow, Intern, InternDetail, OngoingInternRow};
use crate::models::lifecycle::ApplicationStatus;
use crate::types::InternId;
use crate::utils::time::days_between;

/// Days elapsed for an active intern, never less than one.
pub fn days_since_start(joining: Option<NaiveDate>, today: NaiveDate) -> i64 {
    joining
        .map(|joining| days_between(joining, today))
        .unwrap_or(0)
        .max(1)
}

/// Length of a finished tenure, never less than one.
pub fn total_days(joining: Option<NaiveDate>, leaving: Option<NaiveDate>) -> i64 {
    match (joining, leaving) {
        (Some(joining), Some(leaving)) => days_between(joining, leaving),
        _ => 0,
    }
    .max(1)
}

pub fn days_attended(reports: &[ReportSummary]) -> i64 {
    reports
        .iter()
        .map(|report| report.report_date)
        .collect::<BTreeSet<_>>()
        .len() as i64
}

/// Percentage rounded to one decimal place.
pub fn attendance_pct(attended: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    let pct = attended as f64 / denominator as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Splits a flat report list by intern, keeping the incoming order.
pub fn group_reports(reports: Vec<DailyReport>) -> HashMap<InternId, Vec<ReportSummary>> {
    let mut grouped: HashMap<InternId, Vec<ReportSummary>> = HashMap::new();
    for report in reports {
        grouped
            .entry(report.intern_id)
            .or_default()
            .push(report.into());
    }
    grouped
}

pub fn ongoing_row(intern: Intern, reports: Vec<ReportSummary>, today: NaiveDate) -> OngoingInternRow {
    let days_since_start = days_since_start(intern.date_of_joining, today);
    let days_attended = days_attended(&reports);
    OngoingInternRow {
        id: intern.id,
        hyperlink_text: intern.hyperlink_text(),
        application_no: intern.application_no,
        name: intern.full_name,
        start_date: intern.date_of_joining,
        end_date: intern.date_of_leaving,
        days_since_start,
        days_attended,
        attendance_pct: attendance_pct(days_attended, days_since_start),
        reports,
    }
}

pub fn completed_row(intern: Intern, reports: Vec<ReportSummary>) -> CompletedInternRow {
    let total_days = total_days(intern.date_of_joining, intern.date_of_leaving);
    let days_attended = days_attended(&reports);
    CompletedInternRow {
        id: intern.id,
        hyperlink_text: intern.hyperlink_text(),
        application_no: intern.application_no,
        name: intern.full_name,
        start_date: intern.date_of_joining,
        end_date: intern.date_of_leaving,
        total_days,
        days_attended,
        attendance_pct: attendance_pct(days_attended, total_days),
        reports,
    }
}

/// Detail view. Completed records measure against the whole tenure, active
/// ones against the days elapsed so far; earlier stages have no attendance.
pub fn intern_detail(intern: Intern, reports: Vec<ReportSummary>, today: NaiveDate) -> InternDetail {
    let days_since_start = match intern.status {
        ApplicationStatus::Active => days_since_start(intern.date_of_joining, today),
        ApplicationStatus::Completed => total_days(intern.date_of_joining, intern.date_of_leaving),
        _ => 0,
    };
    let days_attended = days_attended(&reports);
    let role = intern.role();
    InternDetail {
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
        loi_file: intern.loi_file,
        passport_photo: intern.passport_photo,
        e_signature: intern.e_signature,
        signed_nda: intern.signed_nda,
        status: intern.status,
        role,
        date_of_joining: intern.date_of_joining,
        date_of_leaving: intern.date_of_leaving,
        rejection_reason: intern.rejection_reason,
        special_approval_notes: intern.special_approval_notes,
        created_at: intern.created_at,
        updated_at: intern.updated_at,
        days_since_start,
        days_attended,
        attendance_pct: attendance_pct(days_attended, days_since_start),
        reports,
    }
}

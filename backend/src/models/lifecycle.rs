//! Application lifecycle: the seven record statuses, the events that move a
//! record between them, and the role each status implies.

use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres, Type,
};
use std::{fmt, str::FromStr};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ApplicationStatus {
    Fresh,
    #[serde(rename = "Pending_Enrollment")]
    PendingEnrollment,
    #[serde(rename = "Pending_Approval")]
    PendingApproval,
    Active,
    #[serde(rename = "Special_Approval_Required")]
    SpecialApprovalRequired,
    Rejected,
    Completed,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 7] = [
        ApplicationStatus::Fresh,
        ApplicationStatus::PendingEnrollment,
        ApplicationStatus::PendingApproval,
        ApplicationStatus::Active,
        ApplicationStatus::SpecialApprovalRequired,
        ApplicationStatus::Rejected,
        ApplicationStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Fresh => "Fresh",
            ApplicationStatus::PendingEnrollment => "Pending_Enrollment",
            ApplicationStatus::PendingApproval => "Pending_Approval",
            ApplicationStatus::Active => "Active",
            ApplicationStatus::SpecialApprovalRequired => "Special_Approval_Required",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Completed => "Completed",
        }
    }

    /// The role is a pure function of the status, so the two can never disagree.
    pub fn role(&self) -> InternRole {
        match self {
            ApplicationStatus::Fresh
            | ApplicationStatus::PendingEnrollment
            | ApplicationStatus::PendingApproval
            | ApplicationStatus::SpecialApprovalRequired => InternRole::Applied,
            ApplicationStatus::Active => InternRole::ApprovedOngoing,
            ApplicationStatus::Rejected => InternRole::Rejected,
            ApplicationStatus::Completed => InternRole::Completed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected
                | ApplicationStatus::Completed
                | ApplicationStatus::SpecialApprovalRequired
        )
    }

    pub fn apply(self, event: LifecycleEvent) -> Result<ApplicationStatus, TransitionError> {
        use ApplicationStatus::*;

        let next = match (self, event) {
            (Fresh, LifecycleEvent::Decided(Decision::Approved)) => PendingEnrollment,
            (Fresh, LifecycleEvent::Decided(Decision::Rejected)) => Rejected,
            (Fresh, LifecycleEvent::Decided(Decision::SpecialApprovalRequired)) => {
                SpecialApprovalRequired
            }
            (PendingEnrollment, LifecycleEvent::EnrollmentSubmitted) => PendingApproval,
            (PendingApproval, LifecycleEvent::Onboarded) => Active,
            (Active, LifecycleEvent::TenureElapsed) => Completed,
            (from, event) => return Err(TransitionError::NotAllowed { from, event }),
        };
        Ok(next)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown application status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

// Stored as plain TEXT; the CHECK constraint in the schema mirrors `ALL`.
impl Type<Postgres> for ApplicationStatus {
    fn type_info() -> PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for ApplicationStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

impl Encode<'_, Postgres> for ApplicationStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum InternRole {
    #[serde(rename = "Intern_applied")]
    Applied,
    #[serde(rename = "Intern_approved&ongoing")]
    ApprovedOngoing,
    #[serde(rename = "Intern_rejected")]
    Rejected,
    #[serde(rename = "Intern_completed")]
    Completed,
}

impl InternRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            InternRole::Applied => "Intern_applied",
            InternRole::ApprovedOngoing => "Intern_approved&ongoing",
            InternRole::Rejected => "Intern_rejected",
            InternRole::Completed => "Intern_completed",
        }
    }
}

impl fmt::Display for InternRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three outcomes of reviewing a fresh application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Decision {
    Approved,
    Rejected,
    #[serde(rename = "Special Approval Required")]
    SpecialApprovalRequired,
}

impl Decision {
    pub const ALLOWED: [&'static str; 3] = ["Approved", "Rejected", "Special Approval Required"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "Approved",
            Decision::Rejected => "Rejected",
            Decision::SpecialApprovalRequired => "Special Approval Required",
        }
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Approved" => Ok(Decision::Approved),
            "Rejected" => Ok(Decision::Rejected),
            "Special Approval Required" => Ok(Decision::SpecialApprovalRequired),
            other => Err(format!("unknown decision: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Decided(Decision),
    EnrollmentSubmitted,
    Onboarded,
    TenureElapsed,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::Decided(decision) => write!(f, "decision '{}'", decision.as_str()),
            LifecycleEvent::EnrollmentSubmitted => f.write_str("enrollment submission"),
            LifecycleEvent::Onboarded => f.write_str("onboarding"),
            LifecycleEvent::TenureElapsed => f.write_str("completion"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("{event} is not allowed while the application is {from}")]
    NotAllowed {
        from: ApplicationStatus,
        event: LifecycleEvent,
    },
}

//! Mail dispatch off the request path. Handlers push a [`Notification`] on
//! the queue after their write commits; a single worker task renders and
//! sends them in arrival order. Failures are logged, never retried.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::utils::email::{EmailAttachment, Mailer, OutgoingEmail};

const NDA_FILE_NAME: &str = "NDA.pdf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    EnrollmentInvite {
        to: String,
        full_name: String,
        link: String,
        nda_template: PathBuf,
    },
    OnboardingCredentials {
        to: String,
        full_name: String,
        application_no: String,
        password: String,
        login_url: String,
        date_of_joining: NaiveDate,
        date_of_leaving: NaiveDate,
    },
    OnboardingAnnouncement {
        to: String,
        full_name: String,
        application_no: String,
        enrollment_no: String,
        date_of_joining: NaiveDate,
        date_of_leaving: NaiveDate,
        program: String,
        department: String,
    },
    PasswordReset {
        to: String,
        reset_url: String,
    },
    PasswordChanged {
        to: String,
        username: String,
    },
}

impl Notification {
    pub fn recipient(&self) -> &str {
        match self {
            Notification::EnrollmentInvite { to, .. }
            | Notification::OnboardingCredentials { to, .. }
            | Notification::OnboardingAnnouncement { to, .. }
            | Notification::PasswordReset { to, .. }
            | Notification::PasswordChanged { to, .. } => to,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Notification::EnrollmentInvite { .. } => "enrollment_invite",
            Notification::OnboardingCredentials { .. } => "onboarding_credentials",
            Notification::OnboardingAnnouncement { .. } => "onboarding_announcement",
            Notification::PasswordReset { .. } => "password_reset",
            Notification::PasswordChanged { .. } => "password_changed",
        }
    }

    /// Renders the message. `nda` is the loaded template for enrollment
    /// invites and ignored otherwise.
    pub fn render(&self, nda: Option<EmailAttachment>) -> OutgoingEmail {
        let to = self.recipient().to_string();
        match self {
            Notification::EnrollmentInvite {
                full_name, link, ..
            } => {
                let mut body = format!(
                    "Dear {full_name},\n\nYour application has been approved. Please complete your enrollment by clicking the link below:\n\n{link}\n\n"
                );
                if nda.is_some() {
                    body.push_str("Please download and sign the attached NDA document and upload it during enrollment.\n\n");
                } else {
                    body.push_str("Please download the NDA document from the portal and upload it during enrollment.\n\n");
                }
                OutgoingEmail {
                    to,
                    subject: "Application Approved - Complete Your Enrollment".into(),
                    body,
                    attachment: nda,
                }
            }
            Notification::OnboardingCredentials {
                full_name,
                application_no,
                password,
                login_url,
                date_of_joining,
                date_of_leaving,
                ..
            } => OutgoingEmail {
                to,
                subject: "Internship Approved - Login Credentials".into(),
                body: format!(
                    "Dear {full_name},\n\nYour internship has been approved!\n\nYour login credentials:\nUsername: {application_no}\nPassword: {password}\n\nPlease login at: {login_url}\n\nApplication No: {application_no}\nDate of Joining: {date_of_joining}\nDate of Leaving: {date_of_leaving}\n\nBest regards,\nCoE-CS Team"
                ),
                attachment: None,
            },
            Notification::OnboardingAnnouncement {
                full_name,
                application_no,
                enrollment_no,
                date_of_joining,
                date_of_leaving,
                program,
                department,
                ..
            } => OutgoingEmail {
                to,
                subject: format!("New Intern Onboarded - {full_name}"),
                body: format!(
                    "A new intern has been onboarded:\n\nName: {full_name}\nApplication No: {application_no}\nEnrollment No: {enrollment_no}\nDate of Joining: {date_of_joining}\nDate of Leaving: {date_of_leaving}\nProgram: {program}\nDepartment: {department}\n\nBest regards,\nIMS System"
                ),
                attachment: None,
            },
            Notification::PasswordReset { reset_url, .. } => OutgoingEmail {
                to,
                subject: "Password Reset Request - IMS".into(),
                body: format!(
                    "We received a request to reset your password.\n\nUse the link below to choose a new password:\n\n{reset_url}\n\nThis link is valid for 30 minutes.\n\nIf you did not request this, you can ignore this email.\n\nBest regards,\nCoE-CS Team"
                ),
                attachment: None,
            },
            Notification::PasswordChanged { username, .. } => OutgoingEmail {
                to,
                subject: "Password Changed - IMS".into(),
                body: format!(
                    "The password for {username} was changed at {}.\n\nIf you did not make this change, contact the administrator immediately.\n\nBest regards,\nCoE-CS Team",
                    Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
                ),
                attachment: None,
            },
        }
    }
}

/// Cloneable sender half kept in `AppState`.
#[derive(Clone)]
pub struct NotificationQueue {
    sender: UnboundedSender<Notification>,
}

impl NotificationQueue {
    pub fn new() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Enqueues without waiting. A closed channel only means the worker is
    /// gone, which must not fail the request that already committed.
    pub fn dispatch(&self, notification: Notification) {
        let kind = notification.kind();
        if self.sender.send(notification).is_err() {
            tracing::error!(kind, "Notification worker is not running; email dropped");
        }
    }
}

async fn load_nda(path: &Path) -> Option<EmailAttachment> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Some(EmailAttachment {
            file_name: NDA_FILE_NAME.to_string(),
            content_type: "application/pdf".to_string(),
            bytes,
        }),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "NDA template unavailable; sending invite without it");
            None
        }
    }
}

pub async fn deliver(mailer: &dyn Mailer, notification: Notification) {
    let nda = match &notification {
        Notification::EnrollmentInvite { nda_template, .. } => load_nda(nda_template).await,
        _ => None,
    };
    let kind = notification.kind();
    let email = notification.render(nda);
    let to = email.to.clone();
    match mailer.send(email).await {
        Ok(()) => tracing::info!(kind, to = %to, "Notification email sent"),
        Err(err) => tracing::error!(kind, to = %to, error = ?err, "Failed to send notification email"),
    }
}

/// Runs until every sender is dropped.
pub fn spawn_notification_worker(
    mut receiver: UnboundedReceiver<Notification>,
    mailer: Arc<dyn Mailer>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(notification) = receiver.recv().await {
            deliver(mailer.as_ref(), notification).await;
        }
        tracing::debug!("Notification worker stopped");
    })
}

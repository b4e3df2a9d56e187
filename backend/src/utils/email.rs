//! Outbound mail. Handlers never talk to SMTP directly; they enqueue a
//! [`Notification`](crate::services::notification::Notification) and the
//! worker hands the rendered message to a [`Mailer`].

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<EmailAttachment>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let transport = if settings.username.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
                .port(settings.port)
                .build()
        } else {
            let creds = Credentials::new(settings.username.clone(), settings.password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
                .port(settings.port)
                .credentials(creds)
                .build()
        };
        let from = settings
            .from_address
            .parse()
            .with_context(|| format!("invalid SMTP_FROM_ADDRESS: {}", settings.from_address))?;
        Ok(Self { transport, from })
    }
}

pub fn build_message(from: &Mailbox, email: &OutgoingEmail) -> Result<Message> {
    let builder = Message::builder()
        .from(from.clone())
        .to(email.to.parse().context("invalid recipient address")?)
        .subject(email.subject.clone());

    let message = match &email.attachment {
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?,
        Some(attachment) => {
            let content_type = ContentType::parse(&attachment.content_type)
                .context("invalid attachment content type")?;
            builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(email.body.clone()))
                    .singlepart(
                        Attachment::new(attachment.file_name.clone())
                            .body(attachment.bytes.clone(), content_type),
                    ),
            )?
        }
    };
    Ok(message)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let message = build_message(&self.from, &email)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Used when `SMTP_SKIP_SEND=true`: records what would have been sent.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            attachment = email.attachment.as_ref().map(|a| a.file_name.as_str()),
            "SMTP sending disabled; email not delivered"
        );
        Ok(())
    }
}

pub fn mailer_from_settings(settings: &SmtpSettings) -> Result<Arc<dyn Mailer>> {
    if settings.skip_send {
        return Ok(Arc::new(LogMailer));
    }
    Ok(Arc::new(SmtpMailer::new(settings)?))
}

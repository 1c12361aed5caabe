//! SMTP submission over STARTTLS using lettre.

use crate::config::MailConfig;
use crate::error::{AuditError, Result};
use crate::mail::{MailMessage, Mailer};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Message, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::info;

/// Mailer backed by an authenticated SMTP submission session.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Builds a STARTTLS transport against the configured submission host.
    ///
    /// Fails with `AuditError::Delivery` if the relay parameters are
    /// invalid. Authentication happens on send.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| {
                AuditError::delivery(format!("Invalid SMTP relay {}: {e}", config.host))
            })?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        let email = build_message(message)?;

        info!(
            "Sending report from {} to {} with {} attachment(s)",
            message.from,
            message.to,
            message.attachments.len()
        );

        self.transport
            .send(email)
            .await
            .map_err(|e| AuditError::delivery(e.to_string()))?;

        Ok(())
    }
}

/// Assembles a multipart message: plain-text body plus one attachment part
/// per queued file.
fn build_message(message: &MailMessage) -> Result<Message> {
    let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(message.body.clone()));

    for path in &message.attachments {
        let content = std::fs::read(path).map_err(|e| {
            AuditError::delivery(format!(
                "Failed to read attachment {}: {e}",
                path.display()
            ))
        })?;

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        let content_type = ContentType::parse("application/octet-stream")
            .map_err(|e| AuditError::internal(format!("Invalid content type: {e}")))?;

        multipart = multipart.singlepart(Attachment::new(filename).body(content, content_type));
    }

    Message::builder()
        .from(message.from.parse().map_err(|e| {
            AuditError::delivery(format!("Invalid from address '{}': {e}", message.from))
        })?)
        .to(message.to.parse().map_err(|e| {
            AuditError::delivery(format!("Invalid to address '{}': {e}", message.to))
        })?)
        .subject(message.subject.clone())
        .multipart(multipart)
        .map_err(|e| AuditError::delivery(format!("Failed to build message: {e}")))
}

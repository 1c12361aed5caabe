//! Outbound mail assembly and delivery.
//!
//! Provides a trait-based interface for the mail submission session, with
//! one concrete SMTP implementation and mocks for testing. One message is
//! sent per run; delivery failures are fatal and never retried.

mod mock;
mod smtp;

pub use mock::{FailingMailer, MockMailer};
pub use smtp::SmtpMailer;

use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// One outbound message with optional file attachments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// Sender address.
    pub from: String,

    /// Recipient address.
    pub to: String,

    /// Subject line.
    pub subject: String,

    /// Plain-text body.
    pub body: String,

    /// Files to attach, in order.
    pub attachments: Vec<PathBuf>,
}

/// Trait defining the interface for mail delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one message over the submission session.
    async fn send(&self, message: &MailMessage) -> Result<()>;
}

//! Mock mailers for testing.

use crate::error::{AuditError, Result};
use crate::mail::{MailMessage, Mailer};
use async_trait::async_trait;
use std::sync::Mutex;

/// A mailer that records sent messages instead of delivering them.
#[derive(Debug, Default)]
pub struct MockMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl MockMailer {
    /// Creates a new mock mailer with no recorded messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns copies of all messages sent so far.
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

/// A mailer where every send is rejected.
#[derive(Debug)]
pub struct FailingMailer {
    message: String,
}

impl FailingMailer {
    /// Creates a failing mailer that reports the given rejection message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingMailer {
    fn default() -> Self {
        Self::new("535 5.7.8 authentication credentials invalid")
    }
}

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: &MailMessage) -> Result<()> {
        Err(AuditError::delivery(self.message.clone()))
    }
}

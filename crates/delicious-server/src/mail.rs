//! Outgoing mail.
//!
//! Only the password reset flow sends mail. [`LogMailer`] writes the message
//! to the log instead of talking to an SMTP relay; [`MemoryMailer`] keeps an
//! outbox that tests can inspect.

use std::sync::Mutex;

use futures::future::BoxFuture;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    /// Link the recipient follows to choose a new password.
    pub reset_url: String,
}

impl Mail {
    pub fn password_reset(to: impl Into<String>, reset_url: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: "Password Reset".to_string(),
            reset_url: reset_url.into(),
        }
    }

    pub fn text(&self) -> String {
        format!(
            "You have requested a password reset. Please follow this link to reset your password: {}\n\
             This link will be valid for the next hour.",
            self.reset_url
        )
    }
}

pub trait Mailer: Send + Sync {
    fn send(&self, mail: Mail) -> BoxFuture<'_, Result<(), MailError>>;
}

/// Logs every message at `info` level.
#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, mail: Mail) -> BoxFuture<'_, Result<(), MailError>> {
        Box::pin(async move {
            tracing::info!(
                to = %mail.to,
                subject = %mail.subject,
                reset_url = %mail.reset_url,
                "mail: sent"
            );
            Ok(())
        })
    }
}

/// Keeps sent messages in memory.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<Mail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message sent so far, oldest first.
    pub fn outbox(&self) -> Vec<Mail> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

impl Mailer for MemoryMailer {
    fn send(&self, mail: Mail) -> BoxFuture<'_, Result<(), MailError>> {
        Box::pin(async move {
            self.outbox
                .lock()
                .map_err(|e| MailError::Transport(e.to_string()))?
                .push(mail);
            Ok(())
        })
    }
}

//! Email notifications.
//!
//! A [`NotificationSender`] makes one delivery attempt per call. Failures
//! surface as [`DeliveryError`] and are never retried; callers decide
//! whether to care.

mod sendgrid;
pub mod templates;

pub use sendgrid::SendGridSender;

use async_trait::async_trait;
use thiserror::Error;

/// How the body of an [`OutgoingEmail`] is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Html,
    Plain,
}

impl ContentKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            ContentKind::Html => "text/html",
            ContentKind::Plain => "text/plain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub kind: ContentKind,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to send email: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to send email: provider answered {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to send email: no delivery credential configured")]
    MissingCredential,

    #[error("failed to schedule email: {0}")]
    Scheduling(String),
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Synchronous pre-flight check run before any send is scheduled.
    fn ready(&self) -> Result<(), DeliveryError> {
        Ok(())
    }

    /// Deliver one email. `Ok` means the provider accepted it for sending.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError>;
}

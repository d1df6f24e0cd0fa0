//! SendGrid v3 `mail/send` sender.

use super::{DeliveryError, NotificationSender, OutgoingEmail};
use crate::config::{NotificationConfig, REDACTED};
use crate::validation::EmailAddress;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::fmt;
use tracing::{error, info};
use url::Url;

/// Sends email through the SendGrid HTTP API.
///
/// The provider answers `202 Accepted` once a message is queued; every
/// other status is a failure.
#[derive(Clone)]
pub struct SendGridSender {
    http: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    sender: EmailAddress,
}

impl SendGridSender {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            endpoint: config.sendgrid_endpoint.clone(),
            api_key: config.sendgrid_api_key.clone(),
            sender: config.sender_email.clone(),
        }
    }

    fn api_key(&self) -> Result<&str, DeliveryError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(DeliveryError::MissingCredential)
    }
}

impl fmt::Debug for SendGridSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendGridSender")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("sender", &self.sender)
            .finish()
    }
}

#[derive(Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    mime_type: &'static str,
    value: &'a str,
}

#[async_trait]
impl NotificationSender for SendGridSender {
    fn ready(&self) -> Result<(), DeliveryError> {
        self.api_key().map(|_| ())
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        let api_key = self.api_key()?;
        let request = MailSendRequest {
            personalizations: vec![Personalization {
                to: vec![Address { email: &email.to }],
            }],
            from: Address {
                email: self.sender.as_str(),
            },
            subject: &email.subject,
            content: vec![Content {
                mime_type: email.kind.mime_type(),
                value: &email.body,
            }],
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .inspect_err(|e| error!(to = %email.to, error = %e, "Failed to send email"))?;

        let status = response.status();
        if status == StatusCode::ACCEPTED {
            info!(to = %email.to, status = status.as_u16(), "Email sent successfully");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            error!(to = %email.to, status = status.as_u16(), "Email provider rejected message");
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

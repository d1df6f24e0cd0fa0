//! Email delivery configuration.

use crate::validation::EmailAddress;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Clone)]
pub struct NotificationConfig {
    /// `From` address of every outgoing email.
    pub sender_email: EmailAddress,
    /// Recipient of the new-registration notification.
    pub admin_email: EmailAddress,
    /// Bearer token for the delivery API. Sending fails while unset.
    pub sendgrid_api_key: Option<String>,
    pub sendgrid_endpoint: Url,
    pub timeout: Duration,
}

/// Placeholder printed instead of a configured API key.
pub const REDACTED: &str = "<redacted>";

impl fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("sender_email", &self.sender_email)
            .field("admin_email", &self.admin_email)
            .field(
                "sendgrid_api_key",
                &self.sendgrid_api_key.as_ref().map(|_| REDACTED),
            )
            .field("sendgrid_endpoint", &self.sendgrid_endpoint.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_api_key() {
        let config = NotificationConfig {
            sender_email: EmailAddress::parse("noreply@example.com").unwrap(),
            admin_email: EmailAddress::parse("support@example.com").unwrap(),
            sendgrid_api_key: Some("SG.secret-value".to_string()),
            sendgrid_endpoint: Url::parse(DEFAULT_SENDGRID_ENDPOINT).unwrap(),
            timeout: Duration::from_secs(30),
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("SG.secret-value"));
        assert!(printed.contains(REDACTED));
        assert!(printed.contains("support@example.com"));
    }
}

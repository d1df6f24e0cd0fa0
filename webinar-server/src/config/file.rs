//! TOML file configuration structures.
//!
//! These structs directly map to the `webinar-config.toml` file format.
//! Every section and key is optional.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use webinar_core::config::{DEFAULT_SENDGRID_ENDPOINT, REDACTED};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8001").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// Origins allowed to call the API from a browser. Empty allows any.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8001))
}

/// Email delivery section.
#[derive(Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_sender_email")]
    pub sender_email: String,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    /// Falls back to the `SENDGRID_API_KEY` environment variable.
    #[serde(default)]
    pub sendgrid_api_key: Option<String>,
    #[serde(default = "default_sendgrid_endpoint")]
    pub sendgrid_endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for NotificationsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationsConfig")
            .field("sender_email", &self.sender_email)
            .field("admin_email", &self.admin_email)
            .field(
                "sendgrid_api_key",
                &self.sendgrid_api_key.as_ref().map(|_| REDACTED),
            )
            .field("sendgrid_endpoint", &self.sendgrid_endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            sender_email: default_sender_email(),
            admin_email: default_admin_email(),
            sendgrid_api_key: None,
            sendgrid_endpoint: default_sendgrid_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_sender_email() -> String {
    "noreply@transformbuddy.ai".to_string()
}

fn default_admin_email() -> String {
    "support@transformbuddy.ai".to_string()
}

fn default_sendgrid_endpoint() -> String {
    DEFAULT_SENDGRID_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

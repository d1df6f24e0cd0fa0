//! Configuration module for webinar-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::FileConfig;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;
use webinar_core::config::{NotificationConfig, ServerConfig};
use webinar_core::validation::EmailAddress;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub notifications: NotificationConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// A missing file is not an error; every setting has a default.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = if self.config_path.exists() {
            let config_content = std::fs::read_to_string(&self.config_path)?;
            toml::from_str::<FileConfig>(&config_content)?
        } else {
            tracing::warn!(
                "Config file {:?} not found, using defaults",
                self.config_path
            );
            FileConfig::default()
        };

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        build_loaded_config(file_config, std::env::var("SENDGRID_API_KEY").ok())
    }
}

/// Validate the file config and convert it into runtime config.
///
/// `env_api_key` fills the delivery key when the file leaves it unset.
fn build_loaded_config(
    file_config: FileConfig,
    env_api_key: Option<String>,
) -> Result<LoadedConfig, ConfigError> {
    let n = file_config.notifications;

    let sender_email = EmailAddress::parse(&n.sender_email).map_err(|e| {
        ConfigError::ValidationError(format!("notifications.sender_email: {e}"))
    })?;
    let admin_email = EmailAddress::parse(&n.admin_email)
        .map_err(|e| ConfigError::ValidationError(format!("notifications.admin_email: {e}")))?;
    let sendgrid_endpoint = Url::parse(&n.sendgrid_endpoint).map_err(|e| {
        ConfigError::ValidationError(format!("notifications.sendgrid_endpoint: {e}"))
    })?;
    if n.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "notifications.timeout_secs must be positive".to_string(),
        ));
    }

    Ok(LoadedConfig {
        server: ServerConfig {
            listen: file_config.server.listen,
            allowed_origins: file_config.server.allowed_origins,
        },
        notifications: NotificationConfig {
            sender_email,
            admin_email,
            sendgrid_api_key: n.sendgrid_api_key.or(env_api_key),
            sendgrid_endpoint,
            timeout: Duration::from_secs(n.timeout_secs),
        },
    })
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_fills_missing_file_key() {
        let loaded = build_loaded_config(FileConfig::default(), Some("from-env".to_string()))
            .unwrap();
        assert_eq!(
            loaded.notifications.sendgrid_api_key.as_deref(),
            Some("from-env")
        );
        assert!(!format!("{loaded:?}").contains("from-env"));
    }

    #[test]
    fn test_file_key_wins_over_env() {
        let mut file = FileConfig::default();
        file.notifications.sendgrid_api_key = Some("from-file".to_string());
        let loaded = build_loaded_config(file, Some("from-env".to_string())).unwrap();
        assert_eq!(
            loaded.notifications.sendgrid_api_key.as_deref(),
            Some("from-file")
        );
    }

    #[test]
    fn test_invalid_admin_email_is_rejected() {
        let mut file = FileConfig::default();
        file.notifications.admin_email = "support".to_string();
        let err = build_loaded_config(file, None).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("admin_email")));
    }

    #[test]
    fn test_missing_file_uses_defaults_and_override() {
        let listen: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let loader = ConfigLoader::new("./does-not-exist.toml", Some(listen));
        let loaded = loader.load().unwrap();
        assert_eq!(loaded.server.listen, listen);
        assert_eq!(
            loaded.notifications.admin_email.as_str(),
            "support@transformbuddy.ai"
        );
    }
}

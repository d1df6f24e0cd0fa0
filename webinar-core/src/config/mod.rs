//! Validated runtime configuration.
//!
//! Loading and parsing the TOML file is the server's job; these are the
//! types the rest of the system consumes.

mod notification;
mod server;

pub use notification::{DEFAULT_SENDGRID_ENDPOINT, NotificationConfig, REDACTED};
pub use server::ServerConfig;

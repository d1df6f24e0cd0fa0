//! HTTP server configuration.

use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address and port to bind.
    pub listen: SocketAddr,
    /// Origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

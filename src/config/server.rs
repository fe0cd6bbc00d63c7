//! HTTP server configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::Deserialize;

use super::error::ValidationError;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: IpAddr,

    /// Port to listen on.
    pub port: u16,

    /// Deployment environment; production switches logs to JSON.
    pub environment: Environment,

    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Whole-request deadline, in seconds.
    pub request_timeout_secs: u64,

    /// Comma-separated CORS origins. Unset allows any origin, which suits
    /// a kiosk frontend served from file:// or a dev server.
    pub cors_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            environment: Environment::default(),
            log_level: "info,lockbox_checkout=debug,sqlx=warn".to_string(),
            request_timeout_secs: 30,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Configured CORS origins, empty when unrestricted.
    pub fn cors_origins_list(&self) -> Vec<String> {
        match &self.cors_origins {
            Some(raw) => raw.split(',').map(|o| o.trim().to_string()).collect(),
            None => Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=300).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

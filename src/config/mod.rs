//! Application configuration module
//!
//! Configuration is read from environment variables (prefix `LOCKBOX`,
//! nesting separator `__`) via the `config` crate, with `.env` support
//! from `dotenvy` for development.
//!
//! Every section has workable defaults: a bare environment boots a
//! degraded service (no Stripe keys, no SMS gateway, in-memory dedup)
//! rather than refusing to start. Validation only rejects values that are
//! present but malformed.

mod database;
mod error;
mod payment;
mod server;
mod sms;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use sms::{SmsConfig, SmsProvider};

use serde::Deserialize;

/// Root application configuration
///
/// ```no_run
/// use lockbox_checkout::config::AppConfig;
///
/// let config = AppConfig::load().expect("Failed to load configuration");
/// config.validate().expect("Invalid configuration");
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration (bind address, environment, timeouts)
    pub server: ServerConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// SMS gateway configuration
    pub sms: SmsConfig,

    /// Database configuration (webhook dedup store)
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// `LOCKBOX__SERVER__PORT=5000` sets `server.port`,
    /// `LOCKBOX__PAYMENT__STRIPE_WEBHOOK_SECRET=whsec_...` sets
    /// `payment.stripe_webhook_secret`, and so on.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let loaded = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LOCKBOX")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(loaded)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        self.sms.validate()?;
        self.database.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

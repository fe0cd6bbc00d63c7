//! Database configuration (webhook dedup store)

use serde::Deserialize;

use super::error::ValidationError;

/// Database configuration.
///
/// The database only backs the webhook dedup store. With no URL set the
/// service falls back to an in-memory store and logs a warning at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: Option<String>,

    /// How long processed webhook events are retained, in hours.
    #[serde(default = "default_retention_hours")]
    pub dedup_retention_hours: i64,
}

impl DatabaseConfig {
    /// Retention window as a chrono duration.
    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::hours(self.dedup_retention_hours)
    }

    /// Validate database configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = &self.url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(ValidationError::InvalidDatabaseUrl);
            }
        }
        if self.dedup_retention_hours < 1 {
            return Err(ValidationError::InvalidRetention);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            dedup_retention_hours: default_retention_hours(),
        }
    }
}

/// Stripe retries webhooks for up to three days.
fn default_retention_hours() -> i64 {
    72
}

//! Payment configuration (Stripe)

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration.
///
/// Both secrets are optional: a deployment missing them still boots and
/// serves what it can, failing only the operations that need the missing
/// secret.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key (sk_...). Intent creation needs it.
    pub stripe_secret_key: Option<String>,

    /// Stripe webhook signing secret (whsec_...). Webhook verification
    /// needs it.
    pub stripe_webhook_secret: Option<String>,

    /// Currency for created payment intents (lowercase ISO 4217).
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Reject test-mode webhook events.
    #[serde(default)]
    pub require_livemode: bool,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_secret_key
            .as_deref()
            .is_some_and(|k| k.starts_with("sk_test_"))
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(key) = &self.stripe_secret_key {
            if !key.starts_with("sk_") {
                return Err(ValidationError::InvalidStripeKey);
            }
        }
        if let Some(secret) = &self.stripe_webhook_secret {
            if !secret.starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_secret_key: None,
            stripe_webhook_secret: None,
            currency: default_currency(),
            require_livemode: false,
        }
    }
}

fn default_currency() -> String {
    "sek".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_sek_with_no_secrets() {
        let config = PaymentConfig::default();
        assert_eq!(config.currency, "sek");
        assert!(config.stripe_secret_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mode_detected_from_key_prefix() {
        let config = PaymentConfig {
            stripe_secret_key: Some("sk_test_xxx".to_string()),
            ..Default::default()
        };
        assert!(config.is_test_mode());

        let config = PaymentConfig {
            stripe_secret_key: Some("sk_live_xxx".to_string()),
            ..Default::default()
        };
        assert!(!config.is_test_mode());
    }

    #[test]
    fn wrong_key_prefix_fails_validation() {
        let config = PaymentConfig {
            stripe_secret_key: Some("pk_test_xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn wrong_webhook_secret_prefix_fails_validation() {
        let config = PaymentConfig {
            stripe_webhook_secret: Some("secret_xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn uppercase_currency_fails_validation() {
        let config = PaymentConfig {
            currency: "SEK".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn full_config_passes_validation() {
        let config = PaymentConfig {
            stripe_secret_key: Some("sk_test_abcd1234".to_string()),
            stripe_webhook_secret: Some("whsec_xyz789".to_string()),
            currency: "sek".to_string(),
            require_livemode: false,
        };
        assert!(config.validate().is_ok());
    }
}

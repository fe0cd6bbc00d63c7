//! SMS gateway configuration

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// Supported SMS gateways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsProvider {
    Vonage,
    FortySixElks,
}

/// SMS gateway configuration.
///
/// Leaving `provider` unset disables unlock-code delivery; the webhook
/// still acknowledges events and logs a warning instead.
#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    /// Which gateway to send through.
    pub provider: Option<SmsProvider>,

    /// Vonage credentials.
    pub vonage_api_key: Option<String>,
    pub vonage_api_secret: Option<String>,

    /// 46elks credentials.
    pub elks_api_username: Option<String>,
    pub elks_api_password: Option<String>,

    /// Sender number or alphanumeric id.
    pub from: Option<String>,

    /// Deadline for a single send request, in seconds.
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

impl SmsConfig {
    /// Send deadline as a duration.
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    /// Validate SMS configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.send_timeout_secs == 0 || self.send_timeout_secs > 30 {
            return Err(ValidationError::InvalidSendTimeout);
        }

        match self.provider {
            Some(SmsProvider::Vonage) => {
                if self.vonage_api_key.is_none() {
                    return Err(ValidationError::MissingSmsCredential("VONAGE_API_KEY"));
                }
                if self.vonage_api_secret.is_none() {
                    return Err(ValidationError::MissingSmsCredential("VONAGE_API_SECRET"));
                }
            }
            Some(SmsProvider::FortySixElks) => {
                if self.elks_api_username.is_none() {
                    return Err(ValidationError::MissingSmsCredential("ELKS_API_USERNAME"));
                }
                if self.elks_api_password.is_none() {
                    return Err(ValidationError::MissingSmsCredential("ELKS_API_PASSWORD"));
                }
            }
            None => {}
        }

        Ok(())
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: None,
            vonage_api_key: None,
            vonage_api_secret: None,
            elks_api_username: None,
            elks_api_password: None,
            from: None,
            send_timeout_secs: default_send_timeout_secs(),
        }
    }
}

fn default_send_timeout_secs() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_sms_delivery() {
        let config = SmsConfig::default();
        assert!(config.provider.is_none());
        assert_eq!(config.send_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn vonage_requires_both_credentials() {
        let config = SmsConfig {
            provider: Some(SmsProvider::Vonage),
            vonage_api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingSmsCredential("VONAGE_API_SECRET"))
        ));
    }

    #[test]
    fn elks_requires_both_credentials() {
        let config = SmsConfig {
            provider: Some(SmsProvider::FortySixElks),
            elks_api_password: Some("pass".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingSmsCredential("ELKS_API_USERNAME"))
        ));
    }

    #[test]
    fn missing_from_is_allowed() {
        // Degraded mode: delivery is skipped at event time with a warning.
        let config = SmsConfig {
            provider: Some(SmsProvider::Vonage),
            vonage_api_key: Some("key".to_string()),
            vonage_api_secret: Some("secret".to_string()),
            from: None,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_send_timeout_fails_validation() {
        let config = SmsConfig {
            send_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SmsConfig {
            send_timeout_secs: 120,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn provider_names_deserialize_snake_case() {
        assert_eq!(
            serde_json::from_str::<SmsProvider>(r#""vonage""#).unwrap(),
            SmsProvider::Vonage
        );
        assert_eq!(
            serde_json::from_str::<SmsProvider>(r#""forty_six_elks""#).unwrap(),
            SmsProvider::FortySixElks
        );
    }
}

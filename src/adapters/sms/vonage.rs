//! Vonage (Nexmo) SMS adapter.
//!
//! Sends via the legacy `POST /sms/json` endpoint. Vonage expects
//! recipients as plain digit strings with the country code and no `+`.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::checkout::{NumberFormat, Recipient};
use crate::ports::{SmsError, SmsSender};

use super::transport_error;

/// Vonage API configuration.
#[derive(Clone)]
pub struct VonageConfig {
    api_key: SecretString,
    api_secret: SecretString,

    /// Sender number or alphanumeric id. Absent in degraded deployments.
    from: Option<String>,

    /// Base URL for the Vonage REST API.
    api_base_url: String,

    /// Deadline for a single send request.
    send_timeout: Duration,
}

impl VonageConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_secret: SecretString::new(api_secret.into()),
            from: None,
            api_base_url: "https://rest.nexmo.com".to_string(),
            send_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }
}

/// Vonage SMS sender.
pub struct VonageSmsSender {
    config: VonageConfig,
    http_client: reqwest::Client,
}

impl VonageSmsSender {
    pub fn new(config: VonageConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

/// Response envelope from `POST /sms/json`.
#[derive(Debug, Deserialize)]
struct VonageSmsResponse {
    #[serde(default)]
    messages: Vec<VonageMessageResult>,
}

/// Per-message delivery result. Status "0" means accepted.
#[derive(Debug, Deserialize)]
struct VonageMessageResult {
    status: String,

    #[serde(rename = "error-text")]
    error_text: Option<String>,
}

#[async_trait]
impl SmsSender for VonageSmsSender {
    fn number_format(&self) -> NumberFormat {
        NumberFormat::DigitsOnly
    }

    async fn send(&self, to: &Recipient, body: &str) -> Result<(), SmsError> {
        let Some(from) = &self.config.from else {
            return Err(SmsError::SenderNotConfigured);
        };

        let url = format!("{}/sms/json", self.config.api_base_url);
        let params = [
            ("api_key", self.config.api_key.expose_secret().as_str()),
            ("api_secret", self.config.api_secret.expose_secret().as_str()),
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("text", body),
        ];

        let response = self
            .http_client
            .post(&url)
            .timeout(self.config.send_timeout)
            .form(&params)
            .send()
            .await
            .map_err(|e| transport_error(e, self.config.send_timeout))?;

        if !response.status().is_success() {
            return Err(SmsError::Rejected(format!(
                "HTTP {} from Vonage",
                response.status()
            )));
        }

        let parsed: VonageSmsResponse = response
            .json()
            .await
            .map_err(|e| SmsError::Network(e.to_string()))?;

        match parsed.messages.first() {
            Some(message) if message.status == "0" => Ok(()),
            Some(message) => Err(SmsError::Rejected(
                message
                    .error_text
                    .clone()
                    .unwrap_or_else(|| format!("status {}", message.status)),
            )),
            None => Err(SmsError::Rejected("empty Vonage response".to_string())),
        }
    }
}

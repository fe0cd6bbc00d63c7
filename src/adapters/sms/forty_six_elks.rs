//! 46elks SMS adapter.
//!
//! Sends via `POST /a1/sms` with HTTP Basic auth. 46elks expects
//! recipients in E.164 form (`+46...`).

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::checkout::{NumberFormat, Recipient};
use crate::ports::{SmsError, SmsSender};

use super::transport_error;

/// 46elks API configuration.
#[derive(Clone)]
pub struct FortySixElksConfig {
    api_username: String,
    api_password: SecretString,

    /// Sender number or alphanumeric id. Absent in degraded deployments.
    from: Option<String>,

    /// Base URL for the 46elks API.
    api_base_url: String,

    /// Deadline for a single send request.
    send_timeout: Duration,
}

impl FortySixElksConfig {
    pub fn new(api_username: impl Into<String>, api_password: impl Into<String>) -> Self {
        Self {
            api_username: api_username.into(),
            api_password: SecretString::new(api_password.into()),
            from: None,
            api_base_url: "https://api.46elks.com".to_string(),
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

/// 46elks SMS sender.
pub struct FortySixElksSmsSender {
    config: FortySixElksConfig,
    http_client: reqwest::Client,
}

impl FortySixElksSmsSender {
    pub fn new(config: FortySixElksConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

/// Response from `POST /a1/sms`.
#[derive(Debug, Deserialize)]
struct ElksSmsResponse {
    status: String,
}

#[async_trait]
impl SmsSender for FortySixElksSmsSender {
    fn number_format(&self) -> NumberFormat {
        NumberFormat::E164
    }

    async fn send(&self, to: &Recipient, body: &str) -> Result<(), SmsError> {
        let Some(from) = &self.config.from else {
            return Err(SmsError::SenderNotConfigured);
        };

        let url = format!("{}/a1/sms", self.config.api_base_url);
        let params = [
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("message", body),
        ];

        let response = self
            .http_client
            .post(&url)
            .timeout(self.config.send_timeout)
            .basic_auth(
                &self.config.api_username,
                Some(self.config.api_password.expose_secret()),
            )
            .form(&params)
            .send()
            .await
            .map_err(|e| transport_error(e, self.config.send_timeout))?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SmsError::Rejected(detail));
        }

        let parsed: ElksSmsResponse = response
            .json()
            .await
            .map_err(|e| SmsError::Network(e.to_string()))?;

        match parsed.status.as_str() {
            "created" | "sent" | "delivered" => Ok(()),
            other => Err(SmsError::Rejected(format!("unexpected status {other}"))),
        }
    }
}

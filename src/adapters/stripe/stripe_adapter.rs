//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API:
//! payment intent creation and webhook signature verification.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`
//!
//! Both secrets are optional at construction so a partially configured
//! deployment can still boot; operations that need a missing secret fail
//! with a `NotConfigured` error instead of a forged-looking rejection.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::PaymentConfig;
use crate::ports::{
    CreatePaymentIntentRequest, PaymentError, PaymentIntent, PaymentIntentSnapshot,
    PaymentProvider, WebhookEvent, WebhookEventData, WebhookEventType,
};

use super::webhook_types::{
    hex_encode, SignatureHeader, StripePaymentIntent, StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    secret_key: Option<SecretString>,

    /// Webhook signing secret (whsec_...).
    webhook_secret: Option<SecretString>,

    /// Currency for created payment intents (lowercase).
    currency: String,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Whether to reject test-mode events.
    require_livemode: bool,
}

impl StripeConfig {
    /// Create a fully configured instance (both secrets present).
    pub fn new(secret_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            secret_key: Some(SecretString::new(secret_key.into())),
            webhook_secret: Some(SecretString::new(webhook_secret.into())),
            currency: "sek".to_string(),
            api_base_url: "https://api.stripe.com".to_string(),
            require_livemode: false,
        }
    }

    /// Create an instance with no secrets set.
    pub fn unconfigured() -> Self {
        Self {
            secret_key: None,
            webhook_secret: None,
            currency: "sek".to_string(),
            api_base_url: "https://api.stripe.com".to_string(),
            require_livemode: false,
        }
    }

    /// Build from the application payment configuration.
    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        Self {
            secret_key: config
                .stripe_secret_key
                .clone()
                .map(SecretString::new),
            webhook_secret: config
                .stripe_webhook_secret
                .clone()
                .map(SecretString::new),
            currency: config.currency.clone(),
            api_base_url: "https://api.stripe.com".to_string(),
            require_livemode: config.require_livemode,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Reject test-mode events.
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Verify webhook signature using HMAC-SHA256.
    ///
    /// The timestamp window bounds replay attacks; the comparison is
    /// constant-time. Any of the header's v1 signatures may match, which
    /// keeps deliveries valid during signing-secret rotation.
    fn verify_signature(
        &self,
        payload: &[u8],
        header: &SignatureHeader,
        secret: &SecretString,
    ) -> Result<(), PaymentError> {
        let now = chrono::Utc::now().timestamp();
        let age = now - header.timestamp;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                age_secs = age,
                "Webhook event too old - possible replay"
            );
            return Err(PaymentError::invalid_webhook(format!(
                "Event too old ({} seconds)",
                age
            )));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                "Webhook event timestamp in the future"
            );
            return Err(PaymentError::invalid_webhook("Event timestamp in future"));
        }

        let signed_payload = format!(
            "{}.{}",
            header.timestamp,
            String::from_utf8_lossy(payload)
        );

        let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signed_payload.as_bytes());
        let expected = mac.finalize().into_bytes();
        let expected_bytes: &[u8] = expected.as_slice();

        let matched = header
            .v1_signatures
            .iter()
            .any(|provided| expected_bytes.ct_eq(provided.as_slice()).unwrap_u8() == 1);

        if !matched {
            tracing::warn!(
                expected_signature = hex_encode(expected_bytes),
                "Invalid webhook signature"
            );
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }

        Ok(())
    }

    /// Parse a Stripe event envelope and convert it to the port's types.
    fn parse_event(&self, payload: &[u8]) -> Result<WebhookEvent, PaymentError> {
        let stripe_event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse webhook payload");
            PaymentError::invalid_webhook(format!("Invalid JSON: {}", e))
        })?;

        if self.config.require_livemode && !stripe_event.livemode {
            tracing::warn!(
                event_id = %stripe_event.id,
                "Rejected test mode event in production"
            );
            return Err(PaymentError::invalid_webhook(
                "Test mode events not allowed in production",
            ));
        }

        let (event_type, data) = match stripe_event.event_type.as_str() {
            "payment_intent.succeeded" => (
                WebhookEventType::PaymentIntentSucceeded,
                self.extract_intent_snapshot(&stripe_event)?,
            ),
            "payment_intent.payment_failed" => (
                WebhookEventType::PaymentIntentFailed,
                self.extract_intent_snapshot(&stripe_event)?,
            ),
            other => (
                WebhookEventType::Unknown(other.to_string()),
                WebhookEventData::Raw {
                    json: stripe_event.data.object.to_string(),
                },
            ),
        };

        Ok(WebhookEvent {
            id: stripe_event.id,
            event_type,
            data,
            created_at: stripe_event.created,
        })
    }

    fn extract_intent_snapshot(
        &self,
        event: &StripeWebhookEvent,
    ) -> Result<WebhookEventData, PaymentError> {
        let intent: StripePaymentIntent = serde_json::from_value(event.data.object.clone())
            .map_err(|e| {
                PaymentError::invalid_webhook(format!("Invalid payment intent object: {}", e))
            })?;

        Ok(WebhookEventData::PaymentIntent(PaymentIntentSnapshot {
            id: intent.id,
            amount: intent.amount,
            currency: intent.currency,
            status: intent.status,
            metadata: intent.metadata,
            receipt_email: intent.receipt_email,
            last_error_message: intent.last_payment_error.and_then(|e| e.message),
        }))
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let Some(secret_key) = &self.config.secret_key else {
            return Err(PaymentError::not_configured("Stripe secret key"));
        };

        let url = format!("{}/v1/payment_intents", self.config.api_base_url);
        let amount = request.amount.minor_units().to_string();
        let params = [
            ("amount", amount.as_str()),
            ("currency", self.config.currency.as_str()),
            ("payment_method_types[]", "card"),
            ("metadata[phoneNumber]", request.phone_number.as_str()),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(secret_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Stripe payment intent creation failed");
            return Err(PaymentError::provider(format!(
                "Stripe API error: {}",
                error_text
            )));
        }

        let stripe_intent: StripePaymentIntent = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let client_secret = stripe_intent.client_secret.ok_or_else(|| {
            PaymentError::provider("Stripe response did not include a client secret")
        })?;

        Ok(PaymentIntent {
            id: stripe_intent.id,
            client_secret,
            amount: stripe_intent.amount,
            currency: stripe_intent.currency,
            status: stripe_intent.status,
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        let Some(webhook_secret) = &self.config.webhook_secret else {
            tracing::error!("Stripe webhook signing secret is not set");
            return Err(PaymentError::not_configured("webhook signing secret"));
        };

        let header = SignatureHeader::parse(signature).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse Stripe-Signature header");
            PaymentError::invalid_webhook(e.to_string())
        })?;

        self.verify_signature(payload, &header, webhook_secret)?;

        let event = self.parse_event(payload)?;

        tracing::info!(
            event_id = %event.id,
            event_type = event.event_type.as_str(),
            "Webhook signature verified"
        );

        Ok(event)
    }
}

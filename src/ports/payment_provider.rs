//! Payment provider port for external payment processing.
//!
//! Defines the contract for payment gateway integrations (e.g., Stripe).
//! Implementations create payment intents and verify/parse the asynchronous
//! webhook events the gateway delivers afterwards.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::checkout::{ChargeAmount, PhoneNumber};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment intent for a checkout, tagging it with the
    /// customer's phone number so the webhook side can reach them later.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Verify a webhook signature against the raw request body and parse
    /// the event.
    ///
    /// Returns the typed event if the signature is valid, an error
    /// otherwise. Verification MUST run over the exact bytes received on
    /// the wire, not a re-serialized object.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError>;
}

/// Request to create a payment intent.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentRequest {
    /// Validated charge amount.
    pub amount: ChargeAmount,

    /// Customer phone number, stored as intent metadata.
    pub phone_number: PhoneNumber,
}

/// A payment intent as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's intent ID (pi_...).
    pub id: String,

    /// Client-facing secret used by the embedded payment form.
    pub client_secret: String,

    /// Amount in minor currency units.
    pub amount: i64,

    /// Lowercase currency code.
    pub currency: String,

    /// Provider-reported status string.
    pub status: String,
}

/// Webhook event from the payment provider.
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    /// Event ID from the provider (evt_...).
    pub id: String,

    /// Event type.
    pub event_type: WebhookEventType,

    /// Event payload.
    pub data: WebhookEventData,

    /// When the event occurred (Unix timestamp).
    pub created_at: i64,
}

/// Webhook event types the service distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventType {
    /// Payment completed; the unlock code should be delivered.
    PaymentIntentSucceeded,

    /// Payment attempt failed.
    PaymentIntentFailed,

    /// Any other provider event type.
    Unknown(String),
}

impl WebhookEventType {
    /// Provider wire name of the event type.
    pub fn as_str(&self) -> &str {
        match self {
            WebhookEventType::PaymentIntentSucceeded => "payment_intent.succeeded",
            WebhookEventType::PaymentIntentFailed => "payment_intent.payment_failed",
            WebhookEventType::Unknown(other) => other,
        }
    }
}

/// Webhook event payload.
#[derive(Debug, Clone)]
pub enum WebhookEventData {
    /// Snapshot of the payment intent the event refers to.
    PaymentIntent(PaymentIntentSnapshot),

    /// Raw JSON for event types the service does not model.
    Raw { json: String },
}

/// Snapshot of a payment intent embedded in a webhook event.
#[derive(Debug, Clone, Default)]
pub struct PaymentIntentSnapshot {
    /// Intent ID (pi_...).
    pub id: String,

    /// Amount in minor currency units.
    pub amount: i64,

    /// Lowercase currency code.
    pub currency: String,

    /// Intent status at event time.
    pub status: String,

    /// Metadata attached at creation time.
    pub metadata: HashMap<String, String>,

    /// Receipt email, when the customer supplied one.
    pub receipt_email: Option<String>,

    /// Message of the last payment error, on failed intents.
    pub last_error_message: Option<String>,
}

impl PaymentIntentSnapshot {
    /// The customer phone number stored at intent creation, if any.
    pub fn phone_number(&self) -> Option<&str> {
        self.metadata.get("phoneNumber").map(String::as_str)
    }
}

/// Errors from payment provider operations.
#[derive(Debug, Clone)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// A required credential or secret is missing from the configuration.
    pub fn not_configured(what: impl Into<String>) -> Self {
        Self::new(
            PaymentErrorCode::NotConfigured,
            format!("{} is not configured", what.into()),
        )
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// A required secret/credential is missing locally.
    NotConfigured,

    /// Invalid webhook signature or payload.
    InvalidWebhook,

    /// Provider API error.
    ProviderError,
}

impl PaymentErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorCode::NetworkError)
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::NotConfigured => "not_configured",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        f.write_str(s)
    }
}

//! Checkout error types.

use thiserror::Error;

use super::{AmountError, PhoneError};

/// Errors from the payment-intent creation flow.
#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("invalid phone number: {0}")]
    InvalidPhoneNumber(#[from] PhoneError),

    #[error("invalid request body: {0}")]
    InvalidRequest(String),

    /// Provider-side failure. Details are logged, never surfaced to the
    /// caller.
    #[error("payment provider request failed")]
    ProviderUnavailable,
}

/// Errors from the webhook processing flow.
///
/// These are the only webhook conditions that fail the HTTP request; once
/// an event verifies, side-effect failures degrade to warnings so the
/// provider does not re-deliver an already-understood event.
#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    /// The signing secret is missing locally. A `500`, so the provider
    /// retries once the operator fixes the deployment.
    #[error("webhook signing secret is not configured")]
    SecretNotConfigured,

    /// Signature or payload rejected. A `400`; the event is never
    /// processed.
    #[error("webhook verification failed: {0}")]
    VerificationFailed(String),
}

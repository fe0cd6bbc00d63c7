//! HTTP handlers for the checkout API.
//!
//! These handlers connect axum routes to the application layer command
//! handlers and map domain errors onto HTTP statuses.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::checkout::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler,
};
use crate::domain::checkout::{CheckoutError, WebhookError};
use crate::ports::{PaymentProvider, SmsSender, WebhookEventStore};

use super::dto::{
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, ErrorResponse, HealthResponse,
    WebhookAckResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Constructed once at startup and cloned per request; every dependency is
/// Arc-wrapped and injected rather than reached through globals.
#[derive(Clone)]
pub struct CheckoutAppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub event_store: Arc<dyn WebhookEventStore>,
    pub sms_sender: Option<Arc<dyn SmsSender>>,
}

impl CheckoutAppState {
    pub fn create_payment_intent_handler(&self) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(self.payment_provider.clone())
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.payment_provider.clone(),
            self.event_store.clone(),
            self.sms_sender.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /create-payment-intent - Start a card payment for the selection.
pub async fn create_payment_intent(
    State(state): State<CheckoutAppState>,
    payload: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    // Malformed or mistyped bodies become 400, not axum's default 422.
    let Json(request) = payload.map_err(|e| CheckoutError::InvalidRequest(e.body_text()))?;

    let handler = state.create_payment_intent_handler();
    let cmd = CreatePaymentIntentCommand {
        amount: request.amount,
        phone_number: request.phone_number,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(CreatePaymentIntentResponse {
        client_secret: result.client_secret,
    }))
}

/// POST /webhook - Receive Stripe webhook events.
///
/// The body is taken as raw bytes because the signature covers the exact
/// wire payload.
pub async fn handle_stripe_webhook(
    State(state): State<CheckoutAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    // An absent header becomes an empty signature: the configuration check
    // must run first, so a missing secret is reported as 500 no matter
    // what the request looks like.
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let handler = state.webhook_handler();
    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    handler.handle(cmd).await?;

    Ok(Json(WebhookAckResponse::received()))
}

/// GET /health - Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::ok())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for the payment-intent creation endpoint.
pub struct CheckoutApiError(CheckoutError);

impl From<CheckoutError> for CheckoutApiError {
    fn from(err: CheckoutError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self.0 {
            CheckoutError::InvalidAmount(_) => (
                StatusCode::BAD_REQUEST,
                "Invalid amount provided. Amount must be a positive number.".to_string(),
            ),
            CheckoutError::InvalidPhoneNumber(_) => (
                StatusCode::BAD_REQUEST,
                "Invalid phone number provided.".to_string(),
            ),
            CheckoutError::InvalidRequest(detail) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {detail}"),
            ),
            // Provider details stay in the logs.
            CheckoutError::ProviderUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create payment intent.".to_string(),
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// API error wrapper for the webhook endpoint.
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self.0 {
            WebhookError::SecretNotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Webhook Error: Secret not configured.".to_string(),
            ),
            WebhookError::VerificationFailed(detail) => (
                StatusCode::BAD_REQUEST,
                format!("Webhook Error: {detail}"),
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

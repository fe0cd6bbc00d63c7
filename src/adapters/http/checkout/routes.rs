//! Axum router configuration for the checkout API.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_payment_intent, handle_stripe_webhook, health, CheckoutAppState};

/// Create the checkout API router.
///
/// # Routes
///
/// - `POST /create-payment-intent` - start a card payment for the selection
/// - `POST /webhook` - Stripe webhook receiver (no auth; signature verified)
/// - `GET /health` - liveness probe
///
/// Non-POST requests to the POST routes get `405` with an `Allow` header
/// from axum's method routing.
pub fn checkout_router() -> Router<CheckoutAppState> {
    Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/webhook", post(handle_stripe_webhook))
        .route("/health", get(health))
}

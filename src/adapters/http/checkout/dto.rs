//! HTTP DTOs for the checkout API.
//!
//! These types define the JSON wire format: the checkout form's request,
//! the client-secret response, and the webhook acknowledgment.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request body for `POST /create-payment-intent`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    /// Amount in major currency units.
    pub amount: f64,

    /// Customer phone number for unlock-code delivery.
    pub phone_number: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a created payment intent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    /// Secret handed to the embedded payment form. Never the full intent.
    pub client_secret: String,
}

/// Acknowledgment body for processed webhooks.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub received: bool,
}

impl WebhookAckResponse {
    pub fn received() -> Self {
        Self { received: true }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Error body for all failure responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case_phone_number() {
        let json = r#"{"amount": 20, "phoneNumber": "0701234567"}"#;
        let request: CreatePaymentIntentRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.amount, 20.0);
        assert_eq!(request.phone_number, "0701234567");
    }

    #[test]
    fn request_rejects_non_numeric_amount() {
        let json = r#"{"amount": "20", "phoneNumber": "0701234567"}"#;
        assert!(serde_json::from_str::<CreatePaymentIntentRequest>(json).is_err());
    }

    #[test]
    fn request_rejects_non_string_phone_number() {
        let json = r#"{"amount": 20, "phoneNumber": 701234567}"#;
        assert!(serde_json::from_str::<CreatePaymentIntentRequest>(json).is_err());
    }

    #[test]
    fn client_secret_serializes_camel_case() {
        let response = CreatePaymentIntentResponse {
            client_secret: "pi_1_secret_x".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["clientSecret"], "pi_1_secret_x");
    }

    #[test]
    fn webhook_ack_matches_provider_contract() {
        let json = serde_json::to_value(WebhookAckResponse::received()).unwrap();
        assert_eq!(json, serde_json::json!({"received": true}));
    }

    #[test]
    fn error_response_has_single_error_field() {
        let json = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "boom"}));
    }
}

//! Mock payment provider for testing.
//!
//! Configurable `PaymentProvider` implementation used by unit and
//! integration tests, and handy for local development without Stripe keys.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::ports::{
    CreatePaymentIntentRequest, PaymentError, PaymentIntent, PaymentProvider, WebhookEvent,
};

/// In-memory stand-in for the Stripe adapter.
///
/// Records every intent creation request and returns canned results; the
/// webhook verification outcome is set up front by the test.
pub struct MockPaymentProvider {
    fail_creation: bool,
    verify_error: Option<PaymentError>,
    webhook_event: Option<WebhookEvent>,
    created: Mutex<Vec<CreatePaymentIntentRequest>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self {
            fail_creation: false,
            verify_error: None,
            webhook_event: None,
            created: Mutex::new(Vec::new()),
        }
    }

    /// Every intent creation fails with a provider error.
    pub fn failing_creation() -> Self {
        Self {
            fail_creation: true,
            ..Self::new()
        }
    }

    /// `verify_webhook` returns the given event.
    pub fn with_webhook_event(event: WebhookEvent) -> Self {
        Self {
            webhook_event: Some(event),
            ..Self::new()
        }
    }

    /// `verify_webhook` fails with the given error.
    pub fn failing_verification(error: PaymentError) -> Self {
        Self {
            verify_error: Some(error),
            ..Self::new()
        }
    }

    /// Intent creation requests seen so far.
    pub fn created_requests(&self) -> Vec<CreatePaymentIntentRequest> {
        self.created.lock().unwrap().clone()
    }
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        if self.fail_creation {
            return Err(PaymentError::provider("mock provider failure"));
        }

        let amount = request.amount.minor_units();
        self.created.lock().unwrap().push(request);

        let sequence = self.created.lock().unwrap().len();
        Ok(PaymentIntent {
            id: format!("pi_mock_{sequence}"),
            client_secret: format!("pi_mock_{sequence}_secret_test"),
            amount,
            currency: "sek".to_string(),
            status: "requires_payment_method".to_string(),
        })
    }

    async fn verify_webhook(
        &self,
        _payload: &[u8],
        _signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        if let Some(error) = &self.verify_error {
            return Err(error.clone());
        }
        self.webhook_event
            .clone()
            .ok_or_else(|| PaymentError::invalid_webhook("no event configured on mock"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checkout::{ChargeAmount, PhoneNumber};
    use crate::ports::{PaymentErrorCode, WebhookEventData, WebhookEventType};

    fn request() -> CreatePaymentIntentRequest {
        CreatePaymentIntentRequest {
            amount: ChargeAmount::from_major_units(20.0).unwrap(),
            phone_number: PhoneNumber::new("0701234567").unwrap(),
        }
    }

    #[tokio::test]
    async fn returns_client_secret_and_records_request() {
        let mock = MockPaymentProvider::new();

        let intent = mock.create_payment_intent(request()).await.unwrap();

        assert_eq!(intent.amount, 2000);
        assert!(intent.client_secret.contains("secret"));
        assert_eq!(mock.created_requests().len(), 1);
    }

    #[tokio::test]
    async fn failing_creation_returns_provider_error() {
        let mock = MockPaymentProvider::failing_creation();

        let err = mock.create_payment_intent(request()).await.unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::ProviderError);
        assert!(mock.created_requests().is_empty());
    }

    #[tokio::test]
    async fn verify_returns_configured_event() {
        let event = WebhookEvent {
            id: "evt_mock".to_string(),
            event_type: WebhookEventType::Unknown("ping".to_string()),
            data: WebhookEventData::Raw {
                json: "{}".to_string(),
            },
            created_at: 1704067200,
        };
        let mock = MockPaymentProvider::with_webhook_event(event);

        let verified = mock.verify_webhook(b"{}", "sig").await.unwrap();
        assert_eq!(verified.id, "evt_mock");
    }

    #[tokio::test]
    async fn verify_fails_when_configured_to() {
        let mock = MockPaymentProvider::failing_verification(PaymentError::invalid_webhook(
            "bad signature",
        ));

        let err = mock.verify_webhook(b"{}", "sig").await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidWebhook);
    }
}

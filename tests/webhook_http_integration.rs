//! Integration tests for the checkout HTTP API.
//!
//! These drive the real router with the real Stripe signature verification
//! path (HMAC over the raw body) and in-process fakes for the SMS gateway
//! and dedup store.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use tower::ServiceExt;

use lockbox_checkout::adapters::events::InMemoryWebhookEventStore;
use lockbox_checkout::adapters::http::{checkout_router, CheckoutAppState};
use lockbox_checkout::adapters::stripe::{MockPaymentProvider, StripeConfig, StripePaymentAdapter};
use lockbox_checkout::domain::checkout::{NumberFormat, Recipient};
use lockbox_checkout::ports::{SmsError, SmsSender};

const TEST_WEBHOOK_SECRET: &str = "whsec_integration_secret";

// =============================================================================
// Test Infrastructure
// =============================================================================

enum SendBehavior {
    Succeed,
    TimeOut,
}

/// SMS gateway fake that records every send.
struct RecordingSmsSender {
    behavior: SendBehavior,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSmsSender {
    fn new() -> Self {
        Self {
            behavior: SendBehavior::Succeed,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn timing_out() -> Self {
        Self {
            behavior: SendBehavior::TimeOut,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsSender for RecordingSmsSender {
    fn number_format(&self) -> NumberFormat {
        NumberFormat::E164
    }

    async fn send(&self, to: &Recipient, body: &str) -> Result<(), SmsError> {
        match self.behavior {
            SendBehavior::Succeed => {
                self.sent
                    .lock()
                    .unwrap()
                    .push((to.as_str().to_string(), body.to_string()));
                Ok(())
            }
            SendBehavior::TimeOut => Err(SmsError::Timeout(Duration::from_secs(5))),
        }
    }
}

fn webhook_state(sender: Option<Arc<RecordingSmsSender>>) -> CheckoutAppState {
    CheckoutAppState {
        payment_provider: Arc::new(StripePaymentAdapter::new(StripeConfig::new(
            "sk_test_key",
            TEST_WEBHOOK_SECRET,
        ))),
        event_store: Arc::new(InMemoryWebhookEventStore::with_default_ttl()),
        sms_sender: sender.map(|s| s as Arc<dyn SmsSender>),
    }
}

fn app(state: CheckoutAppState) -> Router {
    checkout_router().with_state(state)
}

fn sign(secret: &str, payload: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp();
    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(signed_payload.as_bytes());
    let signature: String = mac
        .finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();
    format!("t={},v1={}", timestamp, signature)
}

fn succeeded_payload(event_id: &str, phone: Option<&str>) -> String {
    let mut metadata = json!({});
    if let Some(phone) = phone {
        metadata = json!({ "phoneNumber": phone });
    }
    json!({
        "id": event_id,
        "type": "payment_intent.succeeded",
        "created": chrono::Utc::now().timestamp(),
        "data": {
            "object": {
                "id": "pi_int_1",
                "amount": 2000,
                "currency": "sek",
                "status": "succeeded",
                "metadata": metadata
            }
        },
        "livemode": false,
        "pending_webhooks": 1
    })
    .to_string()
}

fn webhook_request(payload: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/webhook").header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("Stripe-Signature", signature);
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes: Bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Webhook Endpoint
// =============================================================================

#[tokio::test]
async fn get_on_webhook_returns_405_with_allow_post() {
    let response = app(webhook_state(None))
        .oneshot(Request::get("/webhook").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let allow = response
        .headers()
        .get(http::header::ALLOW)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(allow.contains("POST"));
}

#[tokio::test]
async fn webhook_without_configured_secret_returns_500() {
    let state = CheckoutAppState {
        payment_provider: Arc::new(StripePaymentAdapter::new(StripeConfig::unconfigured())),
        event_store: Arc::new(InMemoryWebhookEventStore::with_default_ttl()),
        sms_sender: None,
    };
    let payload = succeeded_payload("evt_nosecret", Some("0701234567"));
    let signature = sign(TEST_WEBHOOK_SECRET, &payload);

    let response = app(state)
        .oneshot(webhook_request(&payload, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Secret not configured"));
}

#[tokio::test]
async fn missing_secret_wins_over_missing_signature() {
    // With no signing secret the answer is 500 no matter what the request
    // looks like, even with no signature header at all.
    let state = CheckoutAppState {
        payment_provider: Arc::new(StripePaymentAdapter::new(StripeConfig::unconfigured())),
        event_store: Arc::new(InMemoryWebhookEventStore::with_default_ttl()),
        sms_sender: None,
    };

    let response = app(state)
        .oneshot(webhook_request("{}", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn webhook_with_invalid_signature_returns_400() {
    let payload = succeeded_payload("evt_badsig", Some("0701234567"));
    let signature = sign("whsec_wrong_secret", &payload);

    let response = app(webhook_state(None))
        .oneshot(webhook_request(&payload, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Webhook Error"));
}

#[tokio::test]
async fn webhook_without_signature_header_returns_400() {
    let payload = succeeded_payload("evt_nosig", Some("0701234567"));

    let response = app(webhook_state(None))
        .oneshot(webhook_request(&payload, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tampered_payload_fails_verification() {
    let payload = succeeded_payload("evt_tamper", Some("0701234567"));
    let signature = sign(TEST_WEBHOOK_SECRET, &payload);
    let tampered = payload.replace("2000", "1");

    let response = app(webhook_state(None))
        .oneshot(webhook_request(&tampered, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn valid_succeeded_event_acknowledges_and_sends_unlock_code() {
    let sender = Arc::new(RecordingSmsSender::new());
    let payload = succeeded_payload("evt_ok", Some("0701234567"));
    let signature = sign(TEST_WEBHOOK_SECRET, &payload);

    let response = app(webhook_state(Some(sender.clone())))
        .oneshot(webhook_request(&payload, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"received": true}));

    let sent = sender.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+46701234567");
    assert!(sent[0].1.contains("unlock code"));
}

#[tokio::test]
async fn duplicate_delivery_acknowledges_but_sends_once() {
    let sender = Arc::new(RecordingSmsSender::new());
    let state = webhook_state(Some(sender.clone()));
    let payload = succeeded_payload("evt_dup", Some("0701234567"));

    for _ in 0..2 {
        let signature = sign(TEST_WEBHOOK_SECRET, &payload);
        let response = app(state.clone())
            .oneshot(webhook_request(&payload, Some(&signature)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(sender.sent_messages().len(), 1);
}

#[tokio::test]
async fn succeeded_event_without_phone_acknowledges_without_sms() {
    let sender = Arc::new(RecordingSmsSender::new());
    let payload = succeeded_payload("evt_nophone", None);
    let signature = sign(TEST_WEBHOOK_SECRET, &payload);

    let response = app(webhook_state(Some(sender.clone())))
        .oneshot(webhook_request(&payload, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(sender.sent_messages().is_empty());
}

#[tokio::test]
async fn unknown_event_type_acknowledges_without_side_effects() {
    let sender = Arc::new(RecordingSmsSender::new());
    let payload = json!({
        "id": "evt_unknown",
        "type": "charge.refunded",
        "created": chrono::Utc::now().timestamp(),
        "data": {"object": {"id": "ch_1"}},
        "livemode": false,
        "pending_webhooks": 0
    })
    .to_string();
    let signature = sign(TEST_WEBHOOK_SECRET, &payload);

    let response = app(webhook_state(Some(sender.clone())))
        .oneshot(webhook_request(&payload, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"received": true}));
    assert!(sender.sent_messages().is_empty());
}

#[tokio::test]
async fn payment_failed_event_acknowledges_without_sms() {
    let sender = Arc::new(RecordingSmsSender::new());
    let payload = json!({
        "id": "evt_failed",
        "type": "payment_intent.payment_failed",
        "created": chrono::Utc::now().timestamp(),
        "data": {
            "object": {
                "id": "pi_failed",
                "amount": 4500,
                "currency": "sek",
                "status": "requires_payment_method",
                "metadata": {"phoneNumber": "0701234567"},
                "last_payment_error": {"code": "card_declined", "message": "Card declined"}
            }
        },
        "livemode": false,
        "pending_webhooks": 1
    })
    .to_string();
    let signature = sign(TEST_WEBHOOK_SECRET, &payload);

    let response = app(webhook_state(Some(sender.clone())))
        .oneshot(webhook_request(&payload, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(sender.sent_messages().is_empty());
}

#[tokio::test]
async fn sms_timeout_still_acknowledges_the_webhook() {
    let sender = Arc::new(RecordingSmsSender::timing_out());
    let payload = succeeded_payload("evt_timeout", Some("0701234567"));
    let signature = sign(TEST_WEBHOOK_SECRET, &payload);

    let response = app(webhook_state(Some(sender)))
        .oneshot(webhook_request(&payload, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"received": true}));
}

// =============================================================================
// Payment Intent Creation Endpoint
// =============================================================================

fn intent_state() -> CheckoutAppState {
    CheckoutAppState {
        payment_provider: Arc::new(MockPaymentProvider::new()),
        event_store: Arc::new(InMemoryWebhookEventStore::with_default_ttl()),
        sms_sender: None,
    }
}

fn intent_request(body: Value) -> Request<Body> {
    Request::post("/create-payment-intent")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn whole_amount_returns_client_secret() {
    let response = app(intent_state())
        .oneshot(intent_request(
            json!({"amount": 20, "phoneNumber": "0701234567"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["clientSecret"].as_str().unwrap().contains("secret"));
}

#[tokio::test]
async fn fractional_minor_unit_amount_is_rejected() {
    let response = app(intent_state())
        .oneshot(intent_request(
            json!({"amount": 19.999, "phoneNumber": "0701234567"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid amount"));
}

#[tokio::test]
async fn negative_amount_is_rejected() {
    let response = app(intent_state())
        .oneshot(intent_request(
            json!({"amount": -5, "phoneNumber": "0701234567"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_phone_number_is_rejected_with_400() {
    let response = app(intent_state())
        .oneshot(intent_request(json!({"amount": 20})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_string_phone_number_is_rejected_with_400() {
    let response = app(intent_state())
        .oneshot(intent_request(
            json!({"amount": 20, "phoneNumber": 701234567}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn short_phone_number_is_rejected_with_400() {
    let response = app(intent_state())
        .oneshot(intent_request(
            json!({"amount": 20, "phoneNumber": "070"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("phone number"));
}

#[tokio::test]
async fn provider_failure_returns_generic_500() {
    let state = CheckoutAppState {
        payment_provider: Arc::new(MockPaymentProvider::failing_creation()),
        event_store: Arc::new(InMemoryWebhookEventStore::with_default_ttl()),
        sms_sender: None,
    };

    let response = app(state)
        .oneshot(intent_request(
            json!({"amount": 20, "phoneNumber": "0701234567"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to create payment intent.");
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let response = app(webhook_state(None))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));
}

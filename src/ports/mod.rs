//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentProvider` - payment intent creation and webhook verification
//! - `SmsSender` - unlock-code delivery via an SMS gateway
//! - `WebhookEventStore` - idempotency tracking for webhook deliveries

mod payment_provider;
mod sms_sender;
mod webhook_event_store;

pub use payment_provider::{
    CreatePaymentIntentRequest, PaymentError, PaymentErrorCode, PaymentIntent,
    PaymentIntentSnapshot, PaymentProvider, WebhookEvent, WebhookEventData, WebhookEventType,
};
pub use sms_sender::{SmsError, SmsSender};
pub use webhook_event_store::{ClaimResult, EventOutcome, StoreError, WebhookEventStore};

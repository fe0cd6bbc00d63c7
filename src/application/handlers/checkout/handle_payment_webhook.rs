//! HandlePaymentWebhookHandler - Command handler for payment provider webhooks.
//!
//! The pipeline is: verify signature, claim the event id in the dedup
//! store, then dispatch by event type. The claim happens BEFORE the SMS
//! side effect so a redelivered `payment_intent.succeeded` can never text
//! the customer twice.
//!
//! Once an event verifies, nothing in dispatch fails the request: missing
//! phone numbers, an unconfigured gateway, and delivery failures all
//! degrade to warnings so the provider stops re-delivering an event the
//! service already understood.

use std::sync::Arc;

use crate::domain::checkout::{Recipient, UnlockCode, WebhookError};
use crate::ports::{
    ClaimResult, EventOutcome, PaymentErrorCode, PaymentIntentSnapshot, PaymentProvider, SmsError,
    SmsSender, WebhookEvent, WebhookEventData, WebhookEventType, WebhookEventStore,
};

/// Command to handle a payment webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Value of the signature header.
    pub signature: String,
}

/// Result of webhook processing. All variants acknowledge with `200`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// Payment succeeded and the unlock code went out.
    UnlockCodeSent { intent_id: String },

    /// Payment succeeded but the SMS step was skipped or failed.
    DeliverySkipped { intent_id: String },

    /// Payment failure event, logged.
    PaymentFailureLogged { intent_id: String },

    /// Duplicate delivery of an already-claimed event.
    AlreadyProcessed { event_id: String },

    /// Event type this service does not handle.
    Ignored { event_type: String },
}

/// Handler for processing payment provider webhooks.
pub struct HandlePaymentWebhookHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    event_store: Arc<dyn WebhookEventStore>,
    sms_sender: Option<Arc<dyn SmsSender>>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        event_store: Arc<dyn WebhookEventStore>,
        sms_sender: Option<Arc<dyn SmsSender>>,
    ) -> Self {
        Self {
            payment_provider,
            event_store,
            sms_sender,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        // 1. Verify signature over the raw bytes and parse the event.
        let event = self
            .payment_provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await
            .map_err(|e| match e.code {
                PaymentErrorCode::NotConfigured => WebhookError::SecretNotConfigured,
                _ => WebhookError::VerificationFailed(e.message),
            })?;

        // 2. Claim the event id before any side effect.
        match self.event_store.claim(&event.id, event.event_type.as_str()).await {
            Ok(ClaimResult::AlreadySeen) => {
                tracing::info!(
                    event_id = %event.id,
                    event_type = event.event_type.as_str(),
                    "Duplicate webhook delivery; side effects already ran"
                );
                return Ok(HandlePaymentWebhookResult::AlreadyProcessed {
                    event_id: event.id,
                });
            }
            Ok(ClaimResult::Claimed) => {}
            Err(e) => {
                // Availability beats strict once-only here: a paid customer
                // waiting for a code outweighs the risk of a duplicate text.
                tracing::warn!(
                    event_id = %event.id,
                    error = %e,
                    "Dedup store unavailable; processing without dedup"
                );
            }
        }

        // 3. Dispatch by event type.
        let result = match &event.event_type {
            WebhookEventType::PaymentIntentSucceeded => self.handle_payment_succeeded(&event).await,
            WebhookEventType::PaymentIntentFailed => self.handle_payment_failed(&event),
            WebhookEventType::Unknown(event_type) => {
                tracing::info!(
                    event_id = %event.id,
                    event_type = %event_type,
                    "Unhandled webhook event type"
                );
                HandlePaymentWebhookResult::Ignored {
                    event_type: event_type.clone(),
                }
            }
        };

        // 4. Record the outcome for auditing. Best effort.
        let outcome = match &result {
            HandlePaymentWebhookResult::UnlockCodeSent { .. } => EventOutcome::Delivered,
            HandlePaymentWebhookResult::DeliverySkipped { .. } => EventOutcome::Skipped,
            HandlePaymentWebhookResult::PaymentFailureLogged { .. } => EventOutcome::PaymentFailed,
            HandlePaymentWebhookResult::Ignored { .. }
            | HandlePaymentWebhookResult::AlreadyProcessed { .. } => EventOutcome::Ignored,
        };
        if let Err(e) = self.event_store.record_outcome(&event.id, outcome).await {
            tracing::debug!(event_id = %event.id, error = %e, "Failed to record event outcome");
        }

        Ok(result)
    }

    async fn handle_payment_succeeded(&self, event: &WebhookEvent) -> HandlePaymentWebhookResult {
        let WebhookEventData::PaymentIntent(intent) = &event.data else {
            tracing::warn!(event_id = %event.id, "Succeeded event without an intent snapshot");
            return HandlePaymentWebhookResult::Ignored {
                event_type: event.event_type.as_str().to_string(),
            };
        };

        tracing::info!(
            intent_id = %intent.id,
            amount_minor = intent.amount,
            currency = %intent.currency,
            receipt_email = intent.receipt_email.as_deref(),
            "Payment intent succeeded"
        );

        let Some(raw_phone) = intent.phone_number() else {
            tracing::warn!(
                intent_id = %intent.id,
                "Payment succeeded without a phoneNumber in metadata; unlock code not sent"
            );
            return HandlePaymentWebhookResult::DeliverySkipped {
                intent_id: intent.id.clone(),
            };
        };

        let Some(sender) = &self.sms_sender else {
            tracing::warn!(
                intent_id = %intent.id,
                "SMS gateway is not configured; unlock code not sent"
            );
            return HandlePaymentWebhookResult::DeliverySkipped {
                intent_id: intent.id.clone(),
            };
        };

        self.deliver_unlock_code(intent, raw_phone, sender.as_ref())
            .await
    }

    async fn deliver_unlock_code(
        &self,
        intent: &PaymentIntentSnapshot,
        raw_phone: &str,
        sender: &dyn SmsSender,
    ) -> HandlePaymentWebhookResult {
        let recipient = Recipient::from_raw(raw_phone, sender.number_format());
        if recipient.is_passthrough() {
            tracing::warn!(
                intent_id = %intent.id,
                recipient = recipient.as_str(),
                "Unrecognized phone number prefix; forwarding unformatted"
            );
        }

        let code = UnlockCode::placeholder();
        match sender.send(&recipient, &code.message_body()).await {
            Ok(()) => {
                tracing::info!(
                    intent_id = %intent.id,
                    recipient = recipient.as_str(),
                    "Unlock code sent"
                );
                HandlePaymentWebhookResult::UnlockCodeSent {
                    intent_id: intent.id.clone(),
                }
            }
            Err(SmsError::SenderNotConfigured) => {
                tracing::warn!(
                    intent_id = %intent.id,
                    "No sender number configured for the SMS gateway; unlock code not sent"
                );
                HandlePaymentWebhookResult::DeliverySkipped {
                    intent_id: intent.id.clone(),
                }
            }
            Err(error) => {
                // Timeouts land here too; no in-request retry, the
                // acknowledgment must not be held hostage by the gateway.
                tracing::warn!(
                    intent_id = %intent.id,
                    error = %error,
                    "Unlock code delivery failed"
                );
                HandlePaymentWebhookResult::DeliverySkipped {
                    intent_id: intent.id.clone(),
                }
            }
        }
    }

    fn handle_payment_failed(&self, event: &WebhookEvent) -> HandlePaymentWebhookResult {
        let WebhookEventData::PaymentIntent(intent) = &event.data else {
            tracing::warn!(event_id = %event.id, "Failed event without an intent snapshot");
            return HandlePaymentWebhookResult::Ignored {
                event_type: event.event_type.as_str().to_string(),
            };
        };

        tracing::warn!(
            intent_id = %intent.id,
            amount_minor = intent.amount,
            error = intent.last_error_message.as_deref(),
            "Payment intent failed"
        );
        HandlePaymentWebhookResult::PaymentFailureLogged {
            intent_id: intent.id.clone(),
        }
    }
}

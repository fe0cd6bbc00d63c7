//! WebhookEventStore port - idempotency tracking for webhook deliveries.
//!
//! The payment provider retries webhook deliveries on timeouts, 5xx
//! responses, and lost acknowledgments, so the same event can arrive more
//! than once. The store lets the handler claim an event id atomically
//! before running its side effect, guaranteeing the unlock-code SMS goes
//! out at most once per unique event.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Outcome of attempting to claim an event id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimResult {
    /// First time this event id was seen; the caller owns its side effects.
    Claimed,

    /// The event was already claimed by an earlier delivery.
    AlreadySeen,
}

/// How a claimed event ended up being handled. Recorded for auditing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Unlock code was sent.
    Delivered,

    /// Side effect skipped (missing phone, gateway unconfigured, send failure).
    Skipped,

    /// Event carried a payment failure; logged only.
    PaymentFailed,

    /// Event type is not handled by this service.
    Ignored,
}

impl EventOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventOutcome::Delivered => "delivered",
            EventOutcome::Skipped => "skipped",
            EventOutcome::PaymentFailed => "payment_failed",
            EventOutcome::Ignored => "ignored",
        }
    }
}

/// Errors from the dedup store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("webhook event store unavailable: {0}")]
    Unavailable(String),
}

/// Port for tracking processed webhook events.
///
/// Implementations must make `claim` atomic under concurrent deliveries of
/// the same event (database uniqueness constraint, or a single write lock
/// for in-process stores).
#[async_trait]
pub trait WebhookEventStore: Send + Sync {
    /// Atomically record the event id if unseen.
    ///
    /// Called BEFORE executing side effects, so a redelivered event can
    /// never trigger a second send.
    async fn claim(&self, event_id: &str, event_type: &str) -> Result<ClaimResult, StoreError>;

    /// Record how a claimed event was handled. Best effort.
    async fn record_outcome(
        &self,
        event_id: &str,
        outcome: EventOutcome,
    ) -> Result<(), StoreError>;

    /// Delete records processed before `cutoff`. Returns rows removed.
    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;
}

//! In-memory webhook event store.
//!
//! Default dedup backend when no database is configured. Entries expire
//! after a TTL sized to the payment provider's webhook retry horizon and
//! are pruned lazily on claim. State does not survive restarts; startup
//! logs a warning when this backend is active.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::ports::{ClaimResult, EventOutcome, StoreError, WebhookEventStore};

#[derive(Debug, Clone)]
struct SeenEvent {
    #[allow(dead_code)]
    event_type: String,
    processed_at: DateTime<Utc>,
    outcome: Option<EventOutcome>,
}

/// Process-local dedup store with TTL-bounded retention.
pub struct InMemoryWebhookEventStore {
    ttl: Duration,
    seen: RwLock<HashMap<String, SeenEvent>>,
}

impl InMemoryWebhookEventStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            seen: RwLock::new(HashMap::new()),
        }
    }

    /// 72 hours covers Stripe's webhook retry schedule.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::hours(72))
    }

    #[cfg(test)]
    async fn outcome_of(&self, event_id: &str) -> Option<EventOutcome> {
        self.seen
            .read()
            .await
            .get(event_id)
            .and_then(|e| e.outcome)
    }
}

#[async_trait]
impl WebhookEventStore for InMemoryWebhookEventStore {
    async fn claim(&self, event_id: &str, event_type: &str) -> Result<ClaimResult, StoreError> {
        let now = Utc::now();
        let mut seen = self.seen.write().await;

        // Lazy pruning keeps the map bounded without a background task.
        seen.retain(|_, event| now - event.processed_at < self.ttl);

        if seen.contains_key(event_id) {
            return Ok(ClaimResult::AlreadySeen);
        }

        seen.insert(
            event_id.to_string(),
            SeenEvent {
                event_type: event_type.to_string(),
                processed_at: now,
                outcome: None,
            },
        );
        Ok(ClaimResult::Claimed)
    }

    async fn record_outcome(
        &self,
        event_id: &str,
        outcome: EventOutcome,
    ) -> Result<(), StoreError> {
        if let Some(event) = self.seen.write().await.get_mut(event_id) {
            event.outcome = Some(outcome);
        }
        Ok(())
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut seen = self.seen.write().await;
        let before = seen.len();
        seen.retain(|_, event| event.processed_at >= cutoff);
        Ok((before - seen.len()) as u64)
    }
}

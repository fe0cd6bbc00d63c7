//! PostgreSQL implementation of the webhook event store.
//!
//! The `webhook_events` table carries a primary key on the event id, so a
//! claim is a single `INSERT ... ON CONFLICT DO NOTHING`: concurrent
//! deliveries of the same event race on the constraint and exactly one
//! wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::ports::{ClaimResult, EventOutcome, StoreError, WebhookEventStore};

/// Durable dedup store backed by PostgreSQL.
pub struct PostgresWebhookEventStore {
    pool: PgPool,
}

impl PostgresWebhookEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn store_error(error: sqlx::Error) -> StoreError {
    StoreError::Unavailable(error.to_string())
}

#[async_trait]
impl WebhookEventStore for PostgresWebhookEventStore {
    async fn claim(&self, event_id: &str, event_type: &str) -> Result<ClaimResult, StoreError> {
        let result = sqlx::query(
            "INSERT INTO webhook_events (event_id, event_type, processed_at, outcome)
             VALUES ($1, $2, $3, 'received')
             ON CONFLICT (event_id) DO NOTHING",
        )
        .bind(event_id)
        .bind(event_type)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 1 {
            Ok(ClaimResult::Claimed)
        } else {
            Ok(ClaimResult::AlreadySeen)
        }
    }

    async fn record_outcome(
        &self,
        event_id: &str,
        outcome: EventOutcome,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE webhook_events SET outcome = $2 WHERE event_id = $1")
            .bind(event_id)
            .bind(outcome.as_str())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM webhook_events WHERE processed_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected())
    }
}

//! PostgreSQL adapters - Database implementations for persistence ports.
//!
//! - `PostgresWebhookEventStore` - Durable webhook dedup tracking

mod webhook_event_store;

pub use webhook_event_store::PostgresWebhookEventStore;

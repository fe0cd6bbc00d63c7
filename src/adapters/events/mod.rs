//! Webhook dedup store adapters.
//!
//! - `InMemoryWebhookEventStore` - TTL-bounded, process-local store used
//!   when no database is configured, and in tests

mod in_memory;

pub use in_memory::InMemoryWebhookEventStore;

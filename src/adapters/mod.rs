//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `stripe` - Payment provider (intent creation, webhook verification)
//! - `sms` - SMS gateways (Vonage, 46elks)
//! - `events` - In-memory webhook dedup store
//! - `postgres` - Durable webhook dedup store
//! - `http` - REST API

pub mod events;
pub mod http;
pub mod postgres;
pub mod sms;
pub mod stripe;

//! Lockbox Checkout - payment backend for a self-service locker kiosk.
//!
//! Customers pay for their selection by card; Stripe reports the outcome
//! asynchronously to the webhook endpoint, which delivers a locker unlock
//! code to the customer's phone by SMS, at most once per payment event.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

//! Application handlers.
//!
//! Command handlers that orchestrate domain operations across ports.

pub mod checkout;

pub use checkout::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, CreatePaymentIntentResult,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};

//! SmsSender port - outbound text message delivery.
//!
//! One implementation per SMS gateway; the active one is selected by
//! configuration. Each provider declares the recipient number format it
//! expects so callers can format numbers before handing them over.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::checkout::{NumberFormat, Recipient};

/// Port for SMS gateway integrations.
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Recipient number format this gateway expects on the wire.
    fn number_format(&self) -> NumberFormat;

    /// Send a text message.
    ///
    /// Implementations bound the outbound request with their configured
    /// deadline so a slow gateway cannot stall the caller.
    async fn send(&self, to: &Recipient, body: &str) -> Result<(), SmsError>;
}

/// Errors from SMS delivery.
#[derive(Debug, Clone, Error)]
pub enum SmsError {
    /// The gateway has no sender number/identity configured.
    #[error("no sender number configured for the SMS gateway")]
    SenderNotConfigured,

    /// The outbound request exceeded its deadline.
    #[error("SMS delivery timed out after {0:?}")]
    Timeout(Duration),

    /// The gateway accepted the request but refused the message.
    #[error("SMS gateway rejected the message: {0}")]
    Rejected(String),

    /// Transport-level failure reaching the gateway.
    #[error("SMS gateway unreachable: {0}")]
    Network(String),
}

//! SMS gateway adapters.
//!
//! One `SmsSender` implementation per provider; the active one is chosen
//! by configuration. Providers disagree on recipient number shape, so each
//! adapter declares the `NumberFormat` it expects.

mod forty_six_elks;
mod vonage;

pub use forty_six_elks::{FortySixElksConfig, FortySixElksSmsSender};
pub use vonage::{VonageConfig, VonageSmsSender};

use std::time::Duration;

use crate::ports::SmsError;

/// Map a reqwest transport failure onto the port's error type.
pub(crate) fn transport_error(error: reqwest::Error, deadline: Duration) -> SmsError {
    if error.is_timeout() {
        SmsError::Timeout(deadline)
    } else {
        SmsError::Network(error.to_string())
    }
}

//! Customer phone numbers and provider-specific recipient formatting.
//!
//! Numbers arrive from the checkout form as the customer typed them,
//! typically in Swedish national notation (`070…`). Each SMS provider
//! expects its own shape on the wire, so formatting is deferred until a
//! concrete sender is chosen.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum characters accepted for a phone number at intake.
const MIN_PHONE_LENGTH: usize = 5;

/// Swedish country calling code, substituted for a leading national `0`.
const SWEDISH_CALLING_CODE: &str = "46";

/// Errors from phone number validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("phone number cannot be empty")]
    Empty,

    #[error("phone number must be at least {MIN_PHONE_LENGTH} characters")]
    TooShort,
}

/// Recipient shape an SMS provider expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// `+` followed by country code and subscriber number.
    E164,
    /// Country code and subscriber number with no `+` prefix.
    DigitsOnly,
}

/// A phone number as entered by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: impl Into<String>) -> Result<Self, PhoneError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(PhoneError::Empty);
        }
        if raw.len() < MIN_PHONE_LENGTH {
            return Err(PhoneError::TooShort);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format this number for an outbound provider.
    pub fn recipient(&self, format: NumberFormat) -> Recipient {
        Recipient::from_raw(&self.0, format)
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A provider-ready recipient number.
///
/// `Passthrough` marks numbers whose prefix was not recognized; they are
/// forwarded unchanged rather than rejected, and the caller is expected to
/// log a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Rewritten into the provider's expected format.
    Normalized(String),
    /// Unrecognized prefix, forwarded as-is.
    Passthrough(String),
}

impl Recipient {
    /// Apply the Swedish-prefix rewrite rules to a raw number.
    ///
    /// - leading `0` is replaced by the country calling code, with or
    ///   without a `+` depending on the provider's format;
    /// - leading `+` is kept for E.164 providers and stripped for
    ///   digits-only providers;
    /// - anything else passes through untouched.
    pub fn from_raw(raw: &str, format: NumberFormat) -> Self {
        if let Some(rest) = raw.strip_prefix('0') {
            let number = match format {
                NumberFormat::E164 => format!("+{SWEDISH_CALLING_CODE}{rest}"),
                NumberFormat::DigitsOnly => format!("{SWEDISH_CALLING_CODE}{rest}"),
            };
            Recipient::Normalized(number)
        } else if let Some(rest) = raw.strip_prefix('+') {
            match format {
                NumberFormat::E164 => Recipient::Normalized(raw.to_string()),
                NumberFormat::DigitsOnly => Recipient::Normalized(rest.to_string()),
            }
        } else {
            Recipient::Passthrough(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Recipient::Normalized(s) | Recipient::Passthrough(s) => s,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Recipient::Passthrough(_))
    }
}

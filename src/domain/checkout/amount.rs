//! Charge amounts expressed as exact minor currency units.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest single charge accepted, in major units.
const MAX_MAJOR_UNITS: f64 = 100_000.0;

/// Errors from charge amount validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount must be a positive number")]
    NotPositive,

    #[error("amount is not an exact number of minor currency units")]
    FractionalMinorUnits,

    #[error("amount exceeds the maximum allowed charge")]
    ExceedsMaximum,
}

/// A charge amount held as an integer count of minor currency units (öre).
///
/// Construction rejects any amount whose hundredfold is not an exact
/// integer, so a request like `19.999` can never silently round into a
/// different charge than the customer saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeAmount(i64);

impl ChargeAmount {
    /// Validate a major-unit amount (e.g. `20.00` SEK) into minor units.
    pub fn from_major_units(amount: f64) -> Result<Self, AmountError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AmountError::NotPositive);
        }
        if amount > MAX_MAJOR_UNITS {
            return Err(AmountError::ExceedsMaximum);
        }

        let minor = amount * 100.0;
        if minor.fract() != 0.0 {
            return Err(AmountError::FractionalMinorUnits);
        }

        Ok(Self(minor as i64))
    }

    /// Construct directly from minor units (provider-reported values).
    pub fn from_minor_units(minor: i64) -> Self {
        Self(minor)
    }

    /// The amount in minor currency units.
    pub fn minor_units(&self) -> i64 {
        self.0
    }
}

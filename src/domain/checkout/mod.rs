//! Checkout domain: value objects for charges, phone numbers, and codes.

mod amount;
mod error;
mod phone;
mod unlock_code;

pub use amount::{AmountError, ChargeAmount};
pub use error::{CheckoutError, WebhookError};
pub use phone::{NumberFormat, PhoneError, PhoneNumber, Recipient};
pub use unlock_code::UnlockCode;

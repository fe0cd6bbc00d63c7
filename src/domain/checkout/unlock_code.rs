//! Locker unlock codes delivered to the customer by SMS.

// TODO: replace the placeholder with a per-locker code lookup once the
// locker inventory service exists; nothing maps orders to compartments yet.
const PLACEHOLDER_CODE: &str = "TEMP_LOCK_CODE_123";

/// The code a customer enters on the locker keypad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockCode(String);

impl UnlockCode {
    /// The placeholder code used until real code provisioning lands.
    pub fn placeholder() -> Self {
        Self(PLACEHOLDER_CODE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Body of the SMS sent after a successful payment.
    pub fn message_body(&self) -> String {
        format!("Your unlock code is {}. Thank you for your purchase!", self.0)
    }
}

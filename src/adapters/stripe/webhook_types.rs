//! Stripe-specific wire types for webhook handling.
//!
//! These types mirror the JSON Stripe puts on the wire: the signature
//! header, the event envelope, and the payment intent object embedded in
//! payment events.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Signature Parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Error parsing the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureParseError {
    /// Header is empty or missing.
    MissingHeader,
    /// Missing timestamp component (t=...).
    MissingTimestamp,
    /// No v1 signature component present.
    MissingSignature,
    /// Timestamp is not a valid integer.
    InvalidTimestamp,
    /// A signature component is not valid hex.
    InvalidHex,
}

impl std::fmt::Display for SignatureParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MissingHeader => "missing Stripe-Signature header",
            Self::MissingTimestamp => "missing timestamp (t=) in signature header",
            Self::MissingSignature => "missing v1 signature in header",
            Self::InvalidTimestamp => "invalid timestamp in signature header",
            Self::InvalidHex => "signature is not valid hex",
        };
        f.write_str(s)
    }
}

impl std::error::Error for SignatureParseError {}

/// Parsed `Stripe-Signature` header.
///
/// Wire format: `t=<timestamp>,v1=<hex>[,v1=<hex>...]`. Stripe includes
/// several `v1` entries while a signing secret is being rotated, so all of
/// them are collected; verification succeeds if any one matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp Stripe attached when signing.
    pub timestamp: i64,

    /// All v1 signatures, hex-decoded. Never empty.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Result<Self, SignatureParseError> {
        if header.trim().is_empty() {
            return Err(SignatureParseError::MissingHeader);
        }

        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            match key.trim() {
                "t" => {
                    timestamp = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| SignatureParseError::InvalidTimestamp)?,
                    );
                }
                "v1" => {
                    v1_signatures
                        .push(hex_decode(value.trim()).ok_or(SignatureParseError::InvalidHex)?);
                }
                // Ignore v0 and any future scheme for forward compatibility.
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(SignatureParseError::MissingTimestamp)?;
        if v1_signatures.is_empty() {
            return Err(SignatureParseError::MissingSignature);
        }

        Ok(Self {
            timestamp,
            v1_signatures,
        })
    }
}

fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    if hex.is_empty() || !hex.is_ascii() || hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Event Types
// ════════════════════════════════════════════════════════════════════════════════

/// Raw Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeWebhookEvent {
    /// Unique event identifier (evt_...).
    pub id: String,

    /// Event type (e.g., "payment_intent.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp when the event was created.
    pub created: i64,

    /// Event payload containing the affected object.
    pub data: StripeEventData,

    /// Whether this is a live or test event.
    pub livemode: bool,

    /// Stripe API version used for this event.
    pub api_version: Option<String>,

    /// Pending webhook deliveries for this event.
    #[serde(default)]
    pub pending_webhooks: i32,
}

/// Event data container.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object affected by this event.
    pub object: serde_json::Value,
}

/// Stripe PaymentIntent object as embedded in webhook payloads.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentIntent {
    /// Unique intent identifier (pi_...).
    pub id: String,

    /// Amount in minor currency units.
    pub amount: i64,

    /// Lowercase currency code.
    pub currency: String,

    /// Intent status (requires_payment_method, processing, succeeded, ...).
    pub status: String,

    /// Client secret; present on API responses, may be absent in events.
    pub client_secret: Option<String>,

    /// Custom metadata attached at creation.
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Receipt email when the customer supplied one.
    pub receipt_email: Option<String>,

    /// Details of the last failed payment attempt.
    pub last_payment_error: Option<StripePaymentError>,
}

/// Error details on a failed payment intent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentError {
    /// Provider error code.
    pub code: Option<String>,

    /// Human-readable message.
    pub message: Option<String>,
}

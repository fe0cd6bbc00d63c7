//! CreatePaymentIntentHandler - Command handler for starting a checkout.

use std::sync::Arc;

use crate::domain::checkout::{ChargeAmount, CheckoutError, PhoneNumber};
use crate::ports::{CreatePaymentIntentRequest, PaymentProvider};

/// Command to create a payment intent.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentCommand {
    /// Amount in major currency units, as sent by the checkout form.
    pub amount: f64,
    /// Customer phone number, as typed.
    pub phone_number: String,
}

/// Result of payment intent creation.
///
/// Only the client secret leaves the service; the full intent stays with
/// the provider.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentResult {
    pub client_secret: String,
}

/// Handler validating checkout input and creating the provider intent.
pub struct CreatePaymentIntentHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CreatePaymentIntentHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<CreatePaymentIntentResult, CheckoutError> {
        let amount = ChargeAmount::from_major_units(cmd.amount)?;
        let phone_number = PhoneNumber::new(cmd.phone_number)?;

        let intent = self
            .payment_provider
            .create_payment_intent(CreatePaymentIntentRequest {
                amount,
                phone_number,
            })
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Payment intent creation failed");
                CheckoutError::ProviderUnavailable
            })?;

        tracing::info!(
            intent_id = %intent.id,
            amount_minor = intent.amount,
            currency = %intent.currency,
            "Payment intent created"
        );

        Ok(CreatePaymentIntentResult {
            client_secret: intent.client_secret,
        })
    }
}

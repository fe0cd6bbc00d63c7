//! HTTP adapter for the checkout API.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, ErrorResponse, HealthResponse,
    WebhookAckResponse,
};
pub use handlers::{CheckoutApiError, CheckoutAppState, WebhookApiError};
pub use routes::checkout_router;

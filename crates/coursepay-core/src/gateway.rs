//! # Payment Gateway Trait
//!
//! The seam between the HTTP layer and the payment provider. The provider
//! implementation (Stripe) lives in its own crate; handlers and tests work
//! against this trait.

use crate::error::PaymentResult;
use crate::event::WebhookEvent;
use crate::purchase::{CoursePurchase, PaymentIntent};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for a validated purchase.
    ///
    /// Returns the provider's intent, including the client secret the
    /// storefront needs to confirm payment.
    async fn create_payment_intent(&self, purchase: &CoursePurchase)
        -> PaymentResult<PaymentIntent>;

    /// Verify a webhook signature and decode the event.
    ///
    /// Deterministic and pure given the payload, the signature header, and
    /// the provider's configured signing secret: the same triple always
    /// yields the same outcome.
    fn verify_webhook(&self, payload: &[u8], signature_header: &str)
        -> PaymentResult<WebhookEvent>;

    /// Provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

//! # coursepay-stripe
//!
//! Stripe payment gateway for the coursepay backend.
//!
//! This crate covers the two provider-facing operations:
//!
//! 1. **Payment-intent creation** — [`StripeGateway`] posts a form-encoded
//!    request to `/v1/payment_intents` with the course metadata attached, and
//!    returns the client secret the storefront confirms payment with.
//!
//! 2. **Webhook verification and dispatch** — [`webhook::construct_event`]
//!    authenticates an inbound payload against the configured signing secret
//!    (HMAC-SHA256, constant-time compare) and decodes it into a typed event;
//!    [`dispatch_webhook_event`] routes it to a [`FulfillmentHandler`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coursepay_stripe::StripeGateway;
//! use coursepay_core::{CoursePurchase, PaymentGateway};
//!
//! let gateway = StripeGateway::from_env()?;
//!
//! let purchase = CoursePurchase::new("Go 101", "c1", "19.99", None)?;
//! let intent = gateway.create_payment_intent(&purchase).await?;
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use coursepay_stripe::{dispatch_webhook_event, LoggingFulfillment};
//!
//! let event = gateway.verify_webhook(&payload, signature)?;
//! dispatch_webhook_event(&LoggingFulfillment, &event)?;
//! ```

pub mod config;
pub mod intents;
pub mod signature;
pub mod webhook;

// Re-exports
pub use config::StripeConfig;
pub use intents::StripeGateway;
pub use webhook::{dispatch_webhook_event, FulfillmentHandler, LoggingFulfillment};

//! # coursepay-core
//!
//! Core types and traits for the coursepay payment backend.
//!
//! This crate provides:
//! - `CoursePurchase` and minor-unit price conversion
//! - `PaymentIntent` returned by the provider
//! - `WebhookEvent` and `FulfillmentRecord` for decoded webhook payloads
//! - `PaymentGateway` trait for the provider seam
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use coursepay_core::{CoursePurchase, PaymentGateway};
//!
//! // Validate the storefront request
//! let purchase = CoursePurchase::new("Go 101", "c1", "19.99", Some("a@b.com".into()))?;
//!
//! // Create the intent through whatever gateway is configured
//! let intent = gateway.create_payment_intent(&purchase).await?;
//!
//! // Hand the client secret back to the storefront
//! println!("{}", intent.client_secret);
//! ```

pub mod error;
pub mod event;
pub mod gateway;
pub mod purchase;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use event::{FulfillmentRecord, WebhookEvent};
pub use gateway::{BoxedPaymentGateway, PaymentGateway};
pub use purchase::{price_to_minor_units, CoursePurchase, PaymentIntent};

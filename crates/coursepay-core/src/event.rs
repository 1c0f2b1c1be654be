//! # Webhook Event Types
//!
//! Typed webhook events. The provider's payload is decoded into one variant
//! per event type we act on, with a passthrough variant for everything else,
//! so downstream code reads fields instead of casting map entries.

use serde::Serialize;

/// The structured record emitted for a payment event.
///
/// Field presence tracks what the provider actually sent; a missing or
/// non-numeric `amount_received` is reported as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FulfillmentRecord {
    /// Payment intent ID (pi_...)
    pub id: Option<String>,

    /// Email the provider sends the receipt to
    pub receipt_email: Option<String>,

    /// Course name from the intent's metadata
    pub course_name: Option<String>,

    /// Course identifier from the intent's metadata
    pub course_id: Option<String>,

    /// Amount received in minor units
    pub amount_received: i64,

    /// Provider event type string (e.g. `payment_intent.succeeded`)
    pub event_type: String,

    /// Intent status as reported by the provider
    pub status: Option<String>,
}

/// A verified, decoded webhook event.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    /// `payment_intent.succeeded` — the purchase completed
    PaymentIntentSucceeded(FulfillmentRecord),

    /// `payment_intent.created` — intent registered, nothing to fulfill yet
    PaymentIntentCreated { intent_id: Option<String> },

    /// `charge.updated` — charge state changed
    ChargeUpdated { charge_id: Option<String> },

    /// Any other event type (passthrough)
    Other(FulfillmentRecord),
}

impl WebhookEvent {
    /// Provider event type string, for logging.
    pub fn event_type(&self) -> &str {
        match self {
            WebhookEvent::PaymentIntentSucceeded(record) | WebhookEvent::Other(record) => {
                &record.event_type
            }
            WebhookEvent::PaymentIntentCreated { .. } => "payment_intent.created",
            WebhookEvent::ChargeUpdated { .. } => "charge.updated",
        }
    }
}

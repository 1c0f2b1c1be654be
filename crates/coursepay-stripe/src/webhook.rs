//! # Stripe Webhook Handling
//!
//! Verified-payload decoding and event dispatch. [`construct_event`] is the
//! one entry point the live endpoint uses: verify the signature, then decode
//! the payload into a typed [`WebhookEvent`].

use crate::signature;
use coursepay_core::{FulfillmentRecord, PaymentError, PaymentResult, WebhookEvent};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Verify a webhook payload and decode it into a typed event.
///
/// The signing secret comes from configuration; mismatch, malformed header,
/// or unparseable payload is a terminal failure for the request.
pub fn construct_event(
    payload: &[u8],
    signature_header: &str,
    signing_secret: &str,
) -> PaymentResult<WebhookEvent> {
    signature::verify(payload, signature_header, signing_secret)?;
    decode_event(payload)
}

/// Decode an already-verified payload into a typed event.
pub fn decode_event(payload: &[u8]) -> PaymentResult<WebhookEvent> {
    let raw: StripeWebhookEvent = serde_json::from_slice(payload)
        .map_err(|e| PaymentError::WebhookParse(format!("Failed to parse webhook: {e}")))?;

    debug!(
        event_id = raw.id.as_deref().unwrap_or("unknown"),
        event_type = %raw.event_type,
        "decoded webhook event"
    );

    let object = &raw.data.object;
    let event = match raw.event_type.as_str() {
        "payment_intent.succeeded" => {
            WebhookEvent::PaymentIntentSucceeded(record_from_object(&raw.event_type, object))
        }
        "payment_intent.created" => WebhookEvent::PaymentIntentCreated {
            intent_id: string_field(object, "id"),
        },
        "charge.updated" => WebhookEvent::ChargeUpdated {
            charge_id: string_field(object, "id"),
        },
        _ => WebhookEvent::Other(record_from_object(&raw.event_type, object)),
    };

    Ok(event)
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(|v| v.as_str()).map(String::from)
}

fn metadata_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get("metadata")
        .and_then(|m| m.get(key))
        .and_then(|v| v.as_str())
        .map(String::from)
}

fn record_from_object(event_type: &str, object: &Map<String, Value>) -> FulfillmentRecord {
    // amount_received: present and numeric, else 0
    let amount_received = object
        .get("amount_received")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0);

    FulfillmentRecord {
        id: string_field(object, "id"),
        receipt_email: string_field(object, "receipt_email"),
        course_name: metadata_field(object, "course_name"),
        course_id: metadata_field(object, "course_id"),
        amount_received,
        event_type: event_type.to_string(),
        status: string_field(object, "status"),
    }
}

// =============================================================================
// Stripe Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    event_type: String,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: Map<String, Value>,
}

// =============================================================================
// Event Dispatch
// =============================================================================

/// Webhook event handler trait.
///
/// The default method impls are the logging stand-in for a real fulfillment
/// call: the structured record goes to stdout, the course-grant signal to the
/// log stream. Implement to wire actual side effects.
pub trait FulfillmentHandler: Send + Sync {
    /// Called when a payment intent succeeds
    fn on_payment_succeeded(&self, record: &FulfillmentRecord) -> PaymentResult<()> {
        emit_record(record)?;
        info!(
            course_id = record.course_id.as_deref().unwrap_or("unknown"),
            course_name = record.course_name.as_deref().unwrap_or("unknown"),
            "payment received, granting course access"
        );
        Ok(())
    }

    /// Called when a payment intent is created
    fn on_payment_created(&self, intent_id: Option<&str>) -> PaymentResult<()> {
        info!(
            "payment intent created: {}",
            intent_id.unwrap_or("unknown")
        );
        Ok(())
    }

    /// Called when a charge is updated
    fn on_charge_updated(&self, charge_id: Option<&str>) -> PaymentResult<()> {
        info!("charge updated: {}", charge_id.unwrap_or("unknown"));
        Ok(())
    }

    /// Called for any other event type
    fn on_unhandled(&self, record: &FulfillmentRecord) -> PaymentResult<()> {
        emit_record(record)
    }
}

/// Default handler (logs events, grants nothing)
pub struct LoggingFulfillment;

impl FulfillmentHandler for LoggingFulfillment {}

/// Pretty-print the structured record to stdout.
fn emit_record(record: &FulfillmentRecord) -> PaymentResult<()> {
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| PaymentError::Serialization(e.to_string()))?;
    println!("{json}");
    Ok(())
}

/// Dispatch a webhook event to the appropriate handler method.
///
/// Total over event types: every event reaches exactly one branch.
pub fn dispatch_webhook_event(
    handler: &dyn FulfillmentHandler,
    event: &WebhookEvent,
) -> PaymentResult<()> {
    match event {
        WebhookEvent::PaymentIntentSucceeded(record) => handler.on_payment_succeeded(record),
        WebhookEvent::PaymentIntentCreated { intent_id } => {
            handler.on_payment_created(intent_id.as_deref())
        }
        WebhookEvent::ChargeUpdated { charge_id } => {
            handler.on_charge_updated(charge_id.as_deref())
        }
        WebhookEvent::Other(record) => handler.on_unhandled(record),
    }
}

//! # Webhook Signature Verification
//!
//! The single verification path for inbound webhook payloads. Stripe signs
//! the string `"{timestamp}.{payload}"` with HMAC-SHA256 under the endpoint's
//! signing secret and sends the result in the `Stripe-Signature` header as
//! `t=<timestamp>,v1=<hex>` (multiple `v1` entries are possible during secret
//! rotation).
//!
//! Verification is deterministic given (payload, header, secret): no clock
//! input, all-or-nothing per request.

use coursepay_core::{PaymentError, PaymentResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> PaymentResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        match key.trim() {
            "t" => {
                timestamp = value.parse().ok();
            }
            "v1" => {
                signatures.push(value.to_string());
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        PaymentError::WebhookVerification("Missing timestamp in signature header".to_string())
    })?;

    if signatures.is_empty() {
        return Err(PaymentError::WebhookVerification(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

/// HMAC-SHA256 over `"{timestamp}." || payload`, hex-encoded.
///
/// The payload is fed to the MAC as raw bytes; it never round-trips through
/// a UTF-8 conversion.
fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(format!("{timestamp}.").as_bytes());
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Verify a webhook payload against its signature header.
///
/// Any malformed header, missing signature, or mismatch is a terminal
/// failure; there is no partial trust.
pub fn verify(payload: &[u8], signature_header: &str, secret: &str) -> PaymentResult<()> {
    let header = parse_signature_header(signature_header)?;
    let expected = compute_signature(secret, header.timestamp, payload);

    let valid = header
        .signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected));

    if !valid {
        return Err(PaymentError::WebhookVerification(
            "Signature mismatch".to_string(),
        ));
    }

    Ok(())
}

/// Build a valid `Stripe-Signature` header value for a payload.
///
/// For constructing signed payloads in tests and local tooling.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    format!(
        "t={timestamp},v1={}",
        compute_signature(secret, timestamp, payload)
    )
}

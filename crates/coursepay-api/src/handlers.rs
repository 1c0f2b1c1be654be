//! # Request Handlers
//!
//! Axum request handlers for the coursepay API: payment-intent creation and
//! the webhook receiver. Each request owns its data; nothing is shared
//! between requests beyond the immutable [`AppState`].

use crate::state::AppState;
use axum::{
    body::{to_bytes, Body},
    extract::rejection::JsonRejection,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use coursepay_core::{CoursePurchase, PaymentError};
use coursepay_stripe::{dispatch_webhook_event, LoggingFulfillment};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// Maximum accepted webhook body size in bytes. Reads beyond this are a
/// terminal failure for the request, before signature verification runs.
pub const WEBHOOK_MAX_BODY_BYTES: usize = 65536;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create payment intent request
///
/// Every field defaults when absent: a missing required field fails
/// validation with an error naming it, not a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Cart items (informational only; the charge amount comes from `price`)
    #[serde(default)]
    pub items: Vec<PurchaseItem>,
    /// Course display name (required, non-empty)
    #[serde(default)]
    pub course_name: String,
    /// Course identifier (required, non-empty)
    #[serde(default)]
    pub course_id: String,
    /// Decimal price string, e.g. "19.99"
    #[serde(default)]
    pub price: String,
    /// Receipt email
    #[serde(default)]
    pub email: String,
}

/// Item in the request's cart
#[derive(Debug, Deserialize)]
pub struct PurchaseItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub amount: i64,
}

/// Create payment intent response
#[derive(Debug, Serialize)]
pub struct CreatePaymentIntentResponse {
    /// Opaque token the storefront confirms payment with
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// Error response body: `{"error":{"message":"..."}}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
            },
        }
    }
}

/// Map a payment error to its HTTP response.
///
/// Full detail goes to the server log; the client receives the sanitized
/// message for the error's class.
fn error_response(err: &PaymentError) -> (StatusCode, Json<ErrorBody>) {
    error!("payment request failed: {err}");
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody::new(err.client_message())))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "coursepay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// CORS response for OPTIONS requests to the API endpoints.
///
/// No business logic runs for OPTIONS; the permissive headers are always
/// attached.
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

/// Create a payment intent for a course purchase
#[instrument(skip(state, payload))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<Json<CreatePaymentIntentResponse>, (StatusCode, Json<ErrorBody>)> {
    let Json(request) = payload.map_err(|rejection| {
        error!("request body decode failed: {rejection}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("Malformed request body")),
        )
    })?;

    debug!(
        items = request.items.len(),
        course_id = %request.course_id,
        "create payment intent"
    );

    let email = (!request.email.is_empty()).then(|| request.email.clone());
    let purchase = CoursePurchase::new(&request.course_name, &request.course_id, &request.price, email)
        .map_err(|e| error_response(&e))?;

    let intent = state
        .gateway
        .create_payment_intent(&purchase)
        .await
        .map_err(|e| error_response(&e))?;

    info!(intent_id = %intent.id, "payment intent created");

    Ok(Json(CreatePaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// Receive a payment webhook
///
/// Outcomes per call: verified → 200, signature invalid → 400, body too
/// large → 503. Acknowledgement never depends on downstream handler success;
/// redelivery is governed entirely by the provider's retry policy.
#[instrument(skip(state, headers, body))]
pub async fn payments_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> StatusCode {
    let payload = match to_bytes(body, WEBHOOK_MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("failed to read webhook body: {err}");
            return StatusCode::SERVICE_UNAVAILABLE;
        }
    };

    let signature = match headers.get("stripe-signature").and_then(|v| v.to_str().ok()) {
        Some(value) => value,
        None => {
            error!("missing Stripe-Signature header");
            return StatusCode::BAD_REQUEST;
        }
    };

    let event = match state.gateway.verify_webhook(&payload, signature) {
        Ok(event) => event,
        Err(err) => {
            error!("webhook verification failed: {err}");
            return StatusCode::BAD_REQUEST;
        }
    };

    info!(event_type = event.event_type(), "verified webhook event");

    // Acknowledge regardless of handler outcome; the provider retries on
    // non-2xx, and fulfillment failures are not the provider's concern.
    if let Err(err) = dispatch_webhook_event(&LoggingFulfillment, &event) {
        error!("webhook dispatch failed: {err}");
    }

    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use crate::state::AppConfig;
    use async_trait::async_trait;
    use axum::http::{HeaderName, HeaderValue};
    use axum_test::TestServer;
    use coursepay_core::{
        PaymentGateway, PaymentIntent, PaymentResult, WebhookEvent,
    };
    use coursepay_stripe::{signature::sign_payload, StripeConfig, StripeGateway};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const WEBHOOK_SECRET: &str = "whsec_endpoint_secret";

    /// Records calls instead of talking to a provider.
    #[derive(Default)]
    struct RecordingGateway {
        calls: AtomicUsize,
        last_purchase: Mutex<Option<CoursePurchase>>,
        fail_with: Mutex<Option<String>>,
    }

    #[async_trait]
    impl PaymentGateway for RecordingGateway {
        async fn create_payment_intent(
            &self,
            purchase: &CoursePurchase,
        ) -> PaymentResult<PaymentIntent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_purchase.lock().unwrap() = Some(purchase.clone());

            if let Some(message) = self.fail_with.lock().unwrap().clone() {
                return Err(PaymentError::Provider { message });
            }

            Ok(PaymentIntent {
                id: "pi_test_123".to_string(),
                client_secret: "pi_test_123_secret_456".to_string(),
                status: Some("requires_payment_method".to_string()),
                amount: Some(purchase.amount),
            })
        }

        fn verify_webhook(
            &self,
            _payload: &[u8],
            _signature_header: &str,
        ) -> PaymentResult<WebhookEvent> {
            Err(PaymentError::WebhookVerification(
                "not supported by recording gateway".to_string(),
            ))
        }

        fn provider_name(&self) -> &'static str {
            "recording"
        }
    }

    fn test_config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
        }
    }

    fn server_with_recording() -> (TestServer, Arc<RecordingGateway>) {
        let gateway = Arc::new(RecordingGateway::default());
        let state = AppState::with_gateway(test_config(), gateway.clone());
        (TestServer::new(create_router(state)).unwrap(), gateway)
    }

    fn server_with_stripe() -> TestServer {
        let gateway = StripeGateway::new(StripeConfig::new("sk_test_abc", WEBHOOK_SECRET));
        let state = AppState::with_gateway(test_config(), Arc::new(gateway));
        TestServer::new(create_router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_create_payment_intent_success() {
        let (server, gateway) = server_with_recording();

        let response = server
            .post("/create-payment-intent")
            .json(&json!({
                "items": [{"id": "xl-course", "amount": 1}],
                "course_name": "Go 101",
                "course_id": "c1",
                "price": "19.99",
                "email": "a@b.com"
            }))
            .await;

        assert_eq!(response.status_code(), 200);
        let body: Value = response.json();
        assert_eq!(body["clientSecret"], "pi_test_123_secret_456");

        let purchase = gateway.last_purchase.lock().unwrap().clone().unwrap();
        assert_eq!(purchase.amount, 1999);
        assert_eq!(purchase.course_name, "Go 101");
        assert_eq!(purchase.course_id, "c1");
        assert_eq!(purchase.receipt_email.as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_create_payment_intent_invalid_course_name() {
        let (server, gateway) = server_with_recording();

        let response = server
            .post("/create-payment-intent")
            .json(&json!({
                "course_name": "",
                "course_id": "c1",
                "price": "19.99"
            }))
            .await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(
            response.text(),
            r#"{"error":{"message":"Invalid course_name"}}"#
        );
        // no provider call on invalid input
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_payment_intent_missing_fields() {
        let (server, gateway) = server_with_recording();

        // absent course_id behaves like an empty one
        let response = server
            .post("/create-payment-intent")
            .json(&json!({
                "course_name": "Go 101",
                "price": "19.99"
            }))
            .await;

        assert_eq!(response.status_code(), 400);
        let body: Value = response.json();
        assert_eq!(body["error"]["message"], "Invalid course_id");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_payment_intent_invalid_amount() {
        let (server, gateway) = server_with_recording();

        let response = server
            .post("/create-payment-intent")
            .json(&json!({
                "course_name": "Go 101",
                "course_id": "c1",
                "price": "free"
            }))
            .await;

        assert_eq!(response.status_code(), 400);
        let body: Value = response.json();
        assert_eq!(body["error"]["message"], "Invalid amount");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_payment_intent_provider_failure_is_sanitized() {
        let (server, gateway) = server_with_recording();
        *gateway.fail_with.lock().unwrap() =
            Some("No such customer: cus_42; secrets inside".to_string());

        let response = server
            .post("/create-payment-intent")
            .json(&json!({
                "course_name": "Go 101",
                "course_id": "c1",
                "price": "19.99"
            }))
            .await;

        assert_eq!(response.status_code(), 500);
        let body: Value = response.json();
        assert_eq!(body["error"]["message"], "Payment request failed");
        assert!(!response.text().contains("cus_42"));
    }

    #[tokio::test]
    async fn test_create_payment_intent_malformed_json() {
        let (server, gateway) = server_with_recording();

        let response = server
            .post("/create-payment-intent")
            .content_type("application/json")
            .text("{not json")
            .await;

        assert_eq!(response.status_code(), 500);
        let body: Value = response.json();
        assert_eq!(body["error"]["message"], "Malformed request body");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_preflight_response() {
        let response = preflight().await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers
                .get("access-control-allow-origin")
                .unwrap()
                .to_str()
                .unwrap(),
            "*"
        );
        assert_eq!(
            headers
                .get("access-control-allow-methods")
                .unwrap()
                .to_str()
                .unwrap(),
            "POST, OPTIONS"
        );
        assert_eq!(
            headers
                .get("access-control-allow-headers")
                .unwrap()
                .to_str()
                .unwrap(),
            "Content-Type"
        );
    }

    fn signed_webhook_request(payload: &[u8], secret: &str) -> (Vec<u8>, HeaderValue) {
        let header = sign_payload(secret, 1700000000, payload);
        (payload.to_vec(), HeaderValue::from_str(&header).unwrap())
    }

    #[tokio::test]
    async fn test_webhook_valid_signature_acknowledged() {
        let server = server_with_stripe();

        let payload = json!({
            "id": "evt_1",
            "type": "payment_intent.succeeded",
            "data": {
                "object": {
                    "id": "pi_123",
                    "receipt_email": "a@b.com",
                    "amount_received": 1999,
                    "status": "succeeded",
                    "metadata": {"course_name": "Go 101", "course_id": "c1"}
                }
            }
        })
        .to_string();
        let (body, signature) = signed_webhook_request(payload.as_bytes(), WEBHOOK_SECRET);

        let response = server
            .post("/payments")
            .bytes(body.into())
            .add_header(
                HeaderName::from_static("stripe-signature"),
                signature,
            )
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn test_webhook_unknown_event_still_acknowledged() {
        let server = server_with_stripe();

        let payload = json!({
            "type": "invoice.payment_failed",
            "data": {"object": {"id": "in_1"}}
        })
        .to_string();
        let (body, signature) = signed_webhook_request(payload.as_bytes(), WEBHOOK_SECRET);

        let response = server
            .post("/payments")
            .bytes(body.into())
            .add_header(HeaderName::from_static("stripe-signature"), signature)
            .await;

        assert_eq!(response.status_code(), 200);
    }

    #[tokio::test]
    async fn test_webhook_wrong_secret_rejected() {
        let server = server_with_stripe();

        let payload = json!({
            "type": "payment_intent.succeeded",
            "data": {"object": {"id": "pi_123"}}
        })
        .to_string();
        let (body, signature) = signed_webhook_request(payload.as_bytes(), "whsec_attacker");

        let response = server
            .post("/payments")
            .bytes(body.into())
            .add_header(HeaderName::from_static("stripe-signature"), signature)
            .await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn test_webhook_missing_signature_rejected() {
        let server = server_with_stripe();

        let response = server.post("/payments").text("{}").await;
        assert_eq!(response.status_code(), 400);
    }

    #[tokio::test]
    async fn test_webhook_body_size_boundary() {
        let server = server_with_stripe();

        // a valid signed payload padded to exactly the cap is accepted
        let mut payload = json!({
            "type": "payment_intent.created",
            "data": {"object": {"id": "pi_1"}}
        })
        .to_string()
        .into_bytes();
        payload.resize(WEBHOOK_MAX_BODY_BYTES, b' ');
        let (body, signature) = signed_webhook_request(&payload, WEBHOOK_SECRET);

        let response = server
            .post("/payments")
            .bytes(body.into())
            .add_header(HeaderName::from_static("stripe-signature"), signature)
            .await;
        assert_eq!(response.status_code(), 200);

        // one byte over fails before signature verification, even unsigned
        let oversized = vec![b'x'; WEBHOOK_MAX_BODY_BYTES + 1];
        let response = server.post("/payments").bytes(oversized.into()).await;
        assert_eq!(response.status_code(), 503);
    }

    #[tokio::test]
    async fn test_health() {
        let (server, _) = server_with_recording();

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), 200);
        let body: Value = response.json();
        assert_eq!(body["service"], "coursepay");
    }
}

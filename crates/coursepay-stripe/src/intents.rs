//! # Stripe Payment Intents
//!
//! Payment-intent creation against Stripe's `/v1/payment_intents` endpoint,
//! and the [`PaymentGateway`] implementation wiring it together with webhook
//! verification.

use crate::config::StripeConfig;
use crate::webhook;
use async_trait::async_trait;
use coursepay_core::{
    CoursePurchase, PaymentError, PaymentGateway, PaymentIntent, PaymentResult, WebhookEvent,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Fixed settlement currency; the processor owns all currency handling.
const CURRENCY: &str = "usd";

/// Stripe payment gateway
///
/// Creates payment intents over Stripe's form-encoded REST API and verifies
/// inbound webhooks with the configured signing secret.
pub struct StripeGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeGateway {
    /// Create a new gateway from explicit configuration
    pub fn new(config: StripeConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = StripeConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Build form data for the payment-intent call
    fn build_form(purchase: &CoursePurchase) -> Vec<(String, String)> {
        let mut form: Vec<(String, String)> = vec![
            ("amount".to_string(), purchase.amount.to_string()),
            ("currency".to_string(), CURRENCY.to_string()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
            (
                "metadata[course_name]".to_string(),
                purchase.course_name.clone(),
            ),
            (
                "metadata[course_id]".to_string(),
                purchase.course_id.clone(),
            ),
        ];

        if let Some(email) = &purchase.receipt_email {
            form.push(("receipt_email".to_string(), email.clone()));
        }

        form
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, purchase), fields(course_id = %purchase.course_id, amount = purchase.amount))]
    async fn create_payment_intent(
        &self,
        purchase: &CoursePurchase,
    ) -> PaymentResult<PaymentIntent> {
        let form = Self::build_form(purchase);
        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        debug!("creating Stripe payment intent");

        let idempotency_key = Uuid::new_v4().to_string();

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &idempotency_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::Provider {
                    message: error_response.error.message,
                });
            }

            return Err(PaymentError::Provider {
                message: format!("HTTP {status}: {body}"),
            });
        }

        let intent_response: StripePaymentIntentResponse = serde_json::from_str(&body)
            .map_err(|e| {
                PaymentError::Serialization(format!("Failed to parse Stripe response: {e}"))
            })?;

        info!(
            "created payment intent: id={}, status={}",
            intent_response.id,
            intent_response.status.as_deref().unwrap_or("unknown")
        );

        Ok(PaymentIntent {
            id: intent_response.id,
            client_secret: intent_response.client_secret,
            status: intent_response.status,
            amount: intent_response.amount,
        })
    }

    fn verify_webhook(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> PaymentResult<WebhookEvent> {
        webhook::construct_event(payload, signature_header, &self.config.webhook_secret)
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    client_secret: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    amount: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

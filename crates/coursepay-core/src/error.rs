//! # Payment Error Types
//!
//! Typed error handling for the coursepay backend.
//! All payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A request field failed validation. The display form is the exact
    /// message returned to the client (`Invalid amount`, `Invalid course_name`).
    #[error("Invalid {field}")]
    InvalidField { field: &'static str },

    /// Payment provider rejected the request
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// Network/HTTP error communicating with the provider
    #[error("Network error: {0}")]
    Network(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerification(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidField { .. } => 400,
            PaymentError::Provider { .. } => 500,
            PaymentError::Network(_) => 500,
            PaymentError::WebhookVerification(_) => 400,
            PaymentError::WebhookParse(_) => 400,
            PaymentError::Serialization(_) => 500,
        }
    }

    /// Returns the message exposed to HTTP clients.
    ///
    /// Validation errors are safe to return verbatim. Provider, network, and
    /// internal detail stays in the server-side logs only; clients get a
    /// generic message.
    pub fn client_message(&self) -> String {
        match self {
            PaymentError::InvalidField { .. } => self.to_string(),
            PaymentError::WebhookVerification(_) | PaymentError::WebhookParse(_) => {
                "Invalid webhook payload".to_string()
            }
            PaymentError::Provider { .. }
            | PaymentError::Network(_)
            | PaymentError::Configuration(_)
            | PaymentError::Serialization(_) => "Payment request failed".to_string(),
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

//! # Course Purchase Types
//!
//! A validated course purchase and the payment intent the provider creates
//! for it. Prices arrive as decimal strings from the storefront and are
//! converted to minor units (cents) before any provider call.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};

/// Convert a decimal price string to an amount in minor units.
///
/// The storefront sends prices like `"19.99"`. Every decimal separator is
/// stripped and the remaining digits are parsed base-10, so `"19.99"` becomes
/// `1999` cents. Non-numeric input and negative values are rejected.
pub fn price_to_minor_units(price: &str) -> PaymentResult<i64> {
    let digits = price.replace('.', "");

    let amount: i64 = digits
        .parse()
        .map_err(|_| PaymentError::InvalidField { field: "amount" })?;

    if amount < 0 {
        return Err(PaymentError::InvalidField { field: "amount" });
    }

    Ok(amount)
}

/// A validated request to sell one course.
///
/// Construction via [`CoursePurchase::new`] is the only path; an instance
/// always carries a non-negative amount and non-empty course fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePurchase {
    /// Course display name, carried to the provider as metadata
    pub course_name: String,

    /// Course identifier, carried to the provider as metadata
    pub course_id: String,

    /// Amount in minor units (cents)
    pub amount: i64,

    /// Email for the provider's payment receipt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_email: Option<String>,
}

impl CoursePurchase {
    /// Validate the raw request fields into a purchase.
    ///
    /// Checks run in a fixed order (amount, course_name, course_id) and the
    /// first failure names the offending field.
    pub fn new(
        course_name: &str,
        course_id: &str,
        price: &str,
        receipt_email: Option<String>,
    ) -> PaymentResult<Self> {
        let amount = price_to_minor_units(price)?;

        if course_name.is_empty() {
            return Err(PaymentError::InvalidField {
                field: "course_name",
            });
        }
        if course_id.is_empty() {
            return Err(PaymentError::InvalidField { field: "course_id" });
        }

        Ok(Self {
            course_name: course_name.to_string(),
            course_id: course_id.to_string(),
            amount,
            receipt_email: receipt_email.filter(|e| !e.is_empty()),
        })
    }
}

/// A payment intent created by the provider.
///
/// The provider owns the intent's lifecycle; only the client secret goes back
/// to the caller, the rest is kept for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's intent ID (pi_...)
    pub id: String,

    /// Opaque token the storefront uses to confirm payment client-side
    pub client_secret: String,

    /// Intent status as reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Amount in minor units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

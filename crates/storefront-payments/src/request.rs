//! Checkout Wire Contract
//!
//! The payloads exchanged with a payment-session provider. Every amount is in
//! integer minor units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::CustomerInfo;

use crate::config::{CheckoutMode, Currency};

/// Request to open a checkout session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub line_items: Vec<CheckoutLineItem>,

    pub shipping: ShippingLine,

    /// Absent means the provider collects contact details itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerInfo>,
}

impl CheckoutRequest {
    /// Σ unit_amount × quantity, excluding shipping
    pub fn subtotal(&self) -> i64 {
        self.line_items
            .iter()
            .map(|line| line.unit_amount.saturating_mul(i64::from(line.quantity)))
            .fold(0, i64::saturating_add)
    }

    /// Subtotal plus shipping
    pub fn total(&self) -> i64 {
        self.subtotal().saturating_add(self.shipping.amount)
    }

    /// Whether the provider must ask for name, email and phone
    pub fn collects_customer_details(&self) -> bool {
        self.customer.is_none()
    }
}

/// One priced line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLineItem {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub unit_amount: i64,

    pub quantity: u32,
}

/// Shipping charge attached to every request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingLine {
    /// Zero when the subtotal reached `free_threshold`
    pub amount: i64,

    pub currency: Currency,

    pub free_threshold: i64,
}

impl ShippingLine {
    pub fn is_free(&self) -> bool {
        self.amount == 0
    }

    pub fn label(&self) -> &'static str {
        if self.is_free() {
            "Free shipping"
        } else {
            "Courier delivery"
        }
    }
}

/// Opaque handle returned for a new session: a redirect URL for hosted
/// checkout, a client secret for embedded checkout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub session_token: String,

    #[serde(default)]
    pub mode: CheckoutMode,

    /// Publishable key the browser mounts the embedded form with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publishable_key: Option<String>,
}

impl SessionToken {
    /// Token for a hosted page the shopper is redirected to
    pub fn hosted(url: impl Into<String>) -> Self {
        Self {
            session_token: url.into(),
            mode: CheckoutMode::Hosted,
            publishable_key: None,
        }
    }

    /// Token for a form mounted in our own page
    pub fn embedded(client_secret: impl Into<String>, publishable_key: impl Into<String>) -> Self {
        Self {
            session_token: client_secret.into(),
            mode: CheckoutMode::Embedded,
            publishable_key: Some(publishable_key.into()),
        }
    }
}

/// Error body returned by providers and our own HTTP surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,

    /// Machine-readable code, see [`PaymentError::code`](crate::PaymentError::code)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<ErrorBody> for crate::error::PaymentError {
    fn from(body: ErrorBody) -> Self {
        Self::from_code(body.code.as_deref().unwrap_or_default(), body.error)
    }
}

/// Provider-reported payment state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
}

impl PaymentStatus {
    /// Whether the order is settled and the cart can go
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Paid | Self::NoPaymentRequired)
    }
}

/// A line as the provider resolved it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLineItem {
    #[serde(default)]
    pub description: Option<String>,

    pub quantity: u64,

    /// Line total in minor units
    pub amount_total: i64,
}

/// Contact details the provider holds for the session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Postal address as the provider returns it
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Where the order ships
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<PostalAddress>,
}

/// Read-back of an existing session, for the order confirmation view
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetails {
    pub line_items: Vec<SessionLineItem>,

    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,

    #[serde(default)]
    pub shipping_details: Option<ShippingDetails>,

    pub payment_status: PaymentStatus,

    /// Grand total in minor units, when reported
    #[serde(default)]
    pub amount_total: Option<i64>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_json_shape() {
        let request = CheckoutRequest {
            line_items: vec![CheckoutLineItem {
                name: "Roller blind".into(),
                description: None,
                unit_amount: 15025,
                quantity: 2,
            }],
            shipping: ShippingLine {
                amount: 1999,
                currency: Currency::Pln,
                free_threshold: 39900,
            },
            customer: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "line_items": [{ "name": "Roller blind", "unit_amount": 15025, "quantity": 2 }],
                "shipping": { "amount": 1999, "currency": "pln", "free_threshold": 39900 }
            })
        );
        assert_eq!(request.subtotal(), 30050);
        assert_eq!(request.total(), 32049);
        assert!(request.collects_customer_details());
    }

    #[test]
    fn test_payment_status() {
        assert!(PaymentStatus::Paid.is_complete());
        assert!(PaymentStatus::NoPaymentRequired.is_complete());
        assert!(!PaymentStatus::Unpaid.is_complete());

        let status: PaymentStatus = serde_json::from_str(r#""no_payment_required""#).unwrap();
        assert_eq!(status, PaymentStatus::NoPaymentRequired);
    }

    #[test]
    fn test_session_token_carries_mode() {
        let hosted = serde_json::to_value(SessionToken::hosted("https://pay.example/cs_1")).unwrap();
        assert_eq!(hosted, serde_json::json!({ "session_token": "https://pay.example/cs_1", "mode": "hosted" }));

        let embedded: SessionToken = serde_json::from_value(serde_json::json!({
            "session_token": "cs_1_secret_abc",
            "mode": "embedded",
            "publishable_key": "pk_test_123"
        }))
        .unwrap();
        assert_eq!(embedded, SessionToken::embedded("cs_1_secret_abc", "pk_test_123"));

        let bare: SessionToken = serde_json::from_value(serde_json::json!({ "session_token": "cs_2" })).unwrap();
        assert_eq!(bare.mode, CheckoutMode::Hosted);
    }
}

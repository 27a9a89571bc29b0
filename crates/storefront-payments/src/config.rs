//! Checkout Configuration
//!
//! Shipping policy and provider settings, read from the environment.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, Result};

/// Currencies the shop charges in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Pln,
    Eur,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pln => "pln",
            Self::Eur => "eur",
            Self::Usd => "usd",
        }
    }
}

impl FromStr for Currency {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pln" => Ok(Self::Pln),
            "eur" => Ok(Self::Eur),
            "usd" => Ok(Self::Usd),
            other => Err(PaymentError::Config(format!("unsupported currency: {other}"))),
        }
    }
}

/// Flat-fee shipping with a free-shipping threshold
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    pub currency: Currency,

    /// Charged when the subtotal is below `free_threshold`
    pub flat_fee: Decimal,

    /// Subtotal from which shipping is free
    pub free_threshold: Decimal,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            currency: Currency::Pln,
            flat_fee: Decimal::new(1999, 2),
            free_threshold: Decimal::new(39900, 2),
        }
    }
}

impl ShippingPolicy {
    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let currency = lookup("SHOP_CURRENCY")
            .map(|raw| raw.parse::<Currency>())
            .transpose()?
            .unwrap_or(defaults.currency);
        let flat_fee = parse_amount(&lookup, "SHIPPING_FEE")?.unwrap_or(defaults.flat_fee);
        let free_threshold =
            parse_amount(&lookup, "FREE_SHIPPING_THRESHOLD")?.unwrap_or(defaults.free_threshold);

        Ok(Self {
            currency,
            flat_fee,
            free_threshold,
        })
    }

    /// Shipping charge for a given subtotal
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_threshold {
            Decimal::ZERO
        } else {
            self.flat_fee
        }
    }
}

/// How the shopper completes payment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    /// Redirect to the provider's hosted page; the token is a URL
    #[default]
    Hosted,
    /// Mount the provider's form in our page; the token is a client secret
    Embedded,
}

impl FromStr for CheckoutMode {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hosted" => Ok(Self::Hosted),
            "embedded" => Ok(Self::Embedded),
            other => Err(PaymentError::Config(format!("unknown checkout mode: {other}"))),
        }
    }
}

/// Stripe account settings
#[derive(Clone, Debug)]
pub struct StripeConfig {
    pub secret_key: String,

    /// Origin the shopper returns to after paying
    pub public_base_url: String,

    pub mode: CheckoutMode,

    /// Browser-side key, required for embedded checkout
    pub publishable_key: Option<String>,
}

impl StripeConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret_key = lookup("STRIPE_SECRET_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;
        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();
        let mode = lookup("CHECKOUT_MODE")
            .map(|raw| raw.parse::<CheckoutMode>())
            .transpose()?
            .unwrap_or_default();
        let publishable_key = lookup("STRIPE_PUBLISHABLE_KEY").filter(|key| !key.is_empty());
        if mode == CheckoutMode::Embedded && publishable_key.is_none() {
            return Err(PaymentError::Config(
                "STRIPE_PUBLISHABLE_KEY is required for embedded checkout".into(),
            ));
        }

        Ok(Self {
            secret_key,
            public_base_url,
            mode,
            publishable_key,
        })
    }

    /// Where the provider sends the shopper after a successful payment
    pub fn success_url(&self) -> String {
        format!(
            "{}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.public_base_url
        )
    }

    /// Where the provider sends the shopper who backs out
    pub fn cancel_url(&self) -> String {
        format!("{}/checkout/cancel", self.public_base_url)
    }
}

fn parse_amount(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<Decimal>> {
    lookup(key)
        .map(|raw| {
            let amount = Decimal::from_str(raw.trim())
                .map_err(|e| PaymentError::Config(format!("{key}: {e}")))?;
            if amount.is_sign_negative() {
                return Err(PaymentError::Config(format!("{key} must not be negative")));
            }
            Ok(amount)
        })
        .transpose()
}

//! Stripe Checkout Integration
//!
//! Hosted mode returns the Checkout page URL as the session token; embedded
//! mode returns the client secret, paired with the publishable key, for
//! Stripe.js to mount.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use stripe::{
    CheckoutSession, CheckoutSessionBillingAddressCollection, CheckoutSessionId,
    CheckoutSessionMode, CheckoutSessionPaymentStatus, CheckoutSessionUiMode, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData, CreateCheckoutSessionLineItemsPriceDataProductData,
    CreateCheckoutSessionPhoneNumberCollection, CreateCheckoutSessionShippingOptions,
    CreateCheckoutSessionShippingOptionsShippingRateData,
    CreateCheckoutSessionShippingOptionsShippingRateDataFixedAmount, RequestStrategy, StripeError,
};

use crate::config::{CheckoutMode, Currency, StripeConfig};
use crate::error::{PaymentError, Result};
use crate::provider::PaymentSessionProvider;
use crate::request::{
    CheckoutRequest, CustomerDetails, PaymentStatus, PostalAddress, SessionDetails,
    SessionLineItem, SessionToken, ShippingDetails,
};

/// Stripe-backed payment-session provider
pub struct StripeSessionProvider {
    client: Client,
    config: StripeConfig,
}

impl StripeSessionProvider {
    /// Create a new provider; the client never retries on its own
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(config.secret_key.clone()).with_strategy(RequestStrategy::Once),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(StripeConfig::from_env()?))
    }

    pub fn mode(&self) -> CheckoutMode {
        self.config.mode
    }

    /// Get the underlying Stripe client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

fn stripe_currency(currency: Currency) -> stripe::Currency {
    match currency {
        Currency::Pln => stripe::Currency::PLN,
        Currency::Eur => stripe::Currency::EUR,
        Currency::Usd => stripe::Currency::USD,
    }
}

fn map_stripe_error(err: StripeError, session_id: Option<&str>) -> PaymentError {
    match err {
        StripeError::Stripe(request) if request.http_status == 404 => {
            PaymentError::SessionNotFound(session_id.unwrap_or_default().to_string())
        }
        StripeError::Stripe(request) => PaymentError::Provider(
            request
                .message
                .unwrap_or_else(|| format!("Stripe returned status {}", request.http_status)),
        ),
        other => PaymentError::Network(other.to_string()),
    }
}

fn postal_address(address: stripe::Address) -> PostalAddress {
    PostalAddress {
        line1: address.line1,
        line2: address.line2,
        postal_code: address.postal_code,
        city: address.city,
        country: address.country,
    }
}

fn session_details(session: CheckoutSession) -> SessionDetails {
    let line_items = session
        .line_items
        .map(|list| {
            list.data
                .into_iter()
                .map(|item| {
                    let quantity: Option<u64> = item.quantity.into();
                    SessionLineItem {
                        description: item.description.into(),
                        quantity: quantity.unwrap_or(1),
                        amount_total: item.amount_total,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let customer_details = session.customer_details.map(|details| CustomerDetails {
        name: details.name,
        email: details.email,
        phone: details.phone,
    });

    let shipping_details = session.shipping_details.map(|shipping| {
        let address: Option<stripe::Address> = shipping.address.into();
        ShippingDetails {
            name: shipping.name.into(),
            address: address.map(postal_address),
        }
    });

    let payment_status = match session.payment_status {
        CheckoutSessionPaymentStatus::Paid => PaymentStatus::Paid,
        CheckoutSessionPaymentStatus::NoPaymentRequired => PaymentStatus::NoPaymentRequired,
        _ => PaymentStatus::Unpaid,
    };

    SessionDetails {
        line_items,
        customer_details,
        shipping_details,
        payment_status,
        amount_total: session.amount_total,
        created_at: DateTime::from_timestamp(session.created, 0),
    }
}

#[async_trait]
impl PaymentSessionProvider for StripeSessionProvider {
    async fn create_session(&self, request: &CheckoutRequest) -> Result<SessionToken> {
        let currency = stripe_currency(request.shipping.currency);
        let success_url = self.config.success_url();
        let cancel_url = self.config.cancel_url();

        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Payment);

        match self.config.mode {
            CheckoutMode::Hosted => {
                params.success_url = Some(&success_url);
                params.cancel_url = Some(&cancel_url);
            }
            CheckoutMode::Embedded => {
                params.ui_mode = Some(CheckoutSessionUiMode::Embedded);
                params.return_url = Some(&success_url);
            }
        }

        params.line_items = Some(
            request
                .line_items
                .iter()
                .map(|line| CreateCheckoutSessionLineItems {
                    quantity: Some(u64::from(line.quantity)),
                    price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                        currency,
                        unit_amount: Some(line.unit_amount),
                        product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                            name: line.name.clone(),
                            description: line.description.clone(),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .collect(),
        );

        params.shipping_options = Some(vec![CreateCheckoutSessionShippingOptions {
            shipping_rate_data: Some(CreateCheckoutSessionShippingOptionsShippingRateData {
                display_name: request.shipping.label().to_string(),
                fixed_amount: Some(
                    CreateCheckoutSessionShippingOptionsShippingRateDataFixedAmount {
                        amount: request.shipping.amount,
                        currency,
                        currency_options: None,
                    },
                ),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        // Contact details: pass ours along, or let Stripe ask for them
        let mut metadata = HashMap::new();
        match &request.customer {
            Some(customer) => {
                params.customer_email = Some(&customer.email);
                metadata.insert("customer_name".to_string(), customer.name.clone());
                metadata.insert("customer_phone".to_string(), customer.phone.clone());
                if let Some(address) = &customer.address {
                    metadata.insert("shipping_address".to_string(), address.one_line());
                }
            }
            None => {
                params.phone_number_collection =
                    Some(CreateCheckoutSessionPhoneNumberCollection { enabled: true });
                params.billing_address_collection =
                    Some(CheckoutSessionBillingAddressCollection::Required);
            }
        }
        params.metadata = Some(metadata);

        let session = CheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| map_stripe_error(e, None))?;

        tracing::info!(session_id = %session.id, mode = ?self.config.mode, "Stripe session created");

        let token = match self.config.mode {
            CheckoutMode::Hosted => session.url.map(SessionToken::hosted),
            CheckoutMode::Embedded => session
                .client_secret
                .zip(self.config.publishable_key.clone())
                .map(|(secret, key)| SessionToken::embedded(secret, key)),
        };

        token.ok_or_else(|| PaymentError::Provider("No checkout token returned".into()))
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionDetails> {
        let id = session_id
            .parse::<CheckoutSessionId>()
            .map_err(|_| PaymentError::InvalidSessionId(session_id.to_string()))?;

        let session = CheckoutSession::retrieve(&self.client, &id, &["line_items"])
            .await
            .map_err(|e| map_stripe_error(e, Some(session_id)))?;

        Ok(session_details(session))
    }

    fn name(&self) -> &str {
        "Stripe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_mapping() {
        assert_eq!(stripe_currency(Currency::Pln), stripe::Currency::PLN);
        assert_eq!(stripe_currency(Currency::Usd), stripe::Currency::USD);
    }

    #[test]
    fn test_error_mapping() {
        let err = map_stripe_error(StripeError::ClientError("connection reset".into()), None);
        assert!(matches!(err, PaymentError::Network(_)));
        assert!(err.is_retryable());
    }
}

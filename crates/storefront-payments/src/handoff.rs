//! Checkout Handoff
//!
//! Turns a cart snapshot into a priced provider request, hands back the
//! session token, reads sessions back for the confirmation page, and clears
//! the cart once a session is seen completed.

use rust_decimal::Decimal;
use storefront_core::{Cart, CartStore, CustomerInfo, DurableStorage, to_minor_units};

use crate::config::ShippingPolicy;
use crate::error::{PaymentError, Result};
use crate::provider::PaymentSessionProvider;
use crate::request::{CheckoutLineItem, CheckoutRequest, SessionDetails, SessionToken, ShippingLine};

/// Checkout orchestration over a payment-session provider
pub struct CheckoutHandoff<P> {
    provider: P,
    shipping: ShippingPolicy,
}

impl<P: PaymentSessionProvider> CheckoutHandoff<P> {
    pub fn new(provider: P, shipping: ShippingPolicy) -> Self {
        Self { provider, shipping }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn shipping(&self) -> &ShippingPolicy {
        &self.shipping
    }

    /// Price a cart for the provider. Fails only on an empty cart or an
    /// amount that does not fit in minor units.
    pub fn build_request(
        &self,
        cart: &Cart,
        customer: Option<&CustomerInfo>,
    ) -> Result<CheckoutRequest> {
        if cart.is_empty() {
            return Err(PaymentError::EmptyCart);
        }

        let line_items = cart
            .items()
            .iter()
            .map(|item| -> Result<CheckoutLineItem> {
                Ok(CheckoutLineItem {
                    name: item.name.clone(),
                    description: item.options.summary(),
                    unit_amount: to_minor_units(item.price)?,
                    quantity: item.quantity,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CheckoutRequest {
            line_items,
            shipping: self.shipping_line(cart.total())?,
            customer: customer.cloned(),
        })
    }

    /// Shipping line for a subtotal under the configured policy
    pub fn shipping_line(&self, subtotal: Decimal) -> Result<ShippingLine> {
        Ok(ShippingLine {
            amount: to_minor_units(self.shipping.shipping_for(subtotal))?,
            currency: self.shipping.currency,
            free_threshold: to_minor_units(self.shipping.free_threshold)?,
        })
    }

    /// Open a provider session for a cart snapshot.
    ///
    /// One attempt only. On failure the caller keeps its cart and the shopper
    /// may try again by hand.
    pub async fn begin(&self, cart: Cart, customer: Option<CustomerInfo>) -> Result<SessionToken> {
        let request = self.build_request(&cart, customer.as_ref())?;
        self.submit(&request).await
    }

    /// Send an already priced request to the provider, once.
    ///
    /// Lines need a quantity of at least one and a non-negative unit amount
    /// whose line total fits in minor units.
    pub async fn submit(&self, request: &CheckoutRequest) -> Result<SessionToken> {
        if request.line_items.is_empty() {
            return Err(PaymentError::EmptyCart);
        }
        request.line_items.iter().try_for_each(check_line)?;

        tracing::info!(
            provider = self.provider.name(),
            lines = request.line_items.len(),
            subtotal = request.subtotal(),
            shipping = request.shipping.amount,
            collect_details = request.collects_customer_details(),
            "Creating checkout session"
        );

        match self.provider.create_session(request).await {
            Ok(token) => {
                tracing::info!(provider = self.provider.name(), "Checkout session created");
                Ok(token)
            }
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "Checkout session failed");
                Err(e)
            }
        }
    }

    /// Fetch a session for the confirmation page. Pure read.
    pub async fn read_back(&self, session_id: &str) -> Result<SessionDetails> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(PaymentError::InvalidSessionId(session_id.to_string()));
        }

        self.provider
            .retrieve_session(session_id)
            .await
            .inspect_err(|e| tracing::warn!(session_id, error = %e, "Session read-back failed"))
    }

    /// Clear the cart if this session is complete and has not been recorded
    /// before. Recorded sessions live in the store's durable storage, so a
    /// reloaded confirmation page does not clear again. Returns whether the
    /// cart was cleared.
    pub fn record_completion<S: DurableStorage>(
        &self,
        session_id: &str,
        session: &SessionDetails,
        store: &mut CartStore<S>,
    ) -> bool {
        if !session.payment_status.is_complete() {
            tracing::debug!(session_id, status = ?session.payment_status, "Session not complete");
            return false;
        }

        if !store.mark_session_completed(session_id) {
            tracing::debug!(session_id, "Session already recorded");
            return false;
        }

        store.clear();
        tracing::info!(session_id, "Order complete, cart cleared");
        true
    }
}

fn check_line(line: &CheckoutLineItem) -> Result<()> {
    if line.quantity == 0 {
        return Err(PaymentError::InvalidAmount(format!("{}: quantity 0", line.name)));
    }
    if line.unit_amount < 0
        || line.unit_amount.checked_mul(i64::from(line.quantity)).is_none()
    {
        return Err(PaymentError::InvalidAmount(format!(
            "{}: {} x {}",
            line.name, line.unit_amount, line.quantity
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Currency;
    use crate::provider::MemorySessionProvider;
    use crate::request::PaymentStatus;
    use rust_decimal_macros::dec;
    use storefront_core::{CART_STORAGE_KEY, CartItem, ItemOptions, MemoryStorage};

    fn handoff() -> CheckoutHandoff<MemorySessionProvider> {
        CheckoutHandoff::new(MemorySessionProvider::new(), ShippingPolicy::default())
    }

    #[test]
    fn test_shipping_charged_below_threshold() {
        let cart = Cart::from_items(vec![
            CartItem::new("a", "Pillowcase", dec!(50.00), 2),
            CartItem::new("b", "Sheet", dec!(30.00), 1),
        ]);
        assert_eq!(cart.total(), dec!(130.00));

        let request = handoff().build_request(&cart, None).unwrap();
        assert_eq!(request.shipping.amount, 1999);
        assert_eq!(request.shipping.free_threshold, 39900);
        assert_eq!(request.shipping.currency, Currency::Pln);
        assert!(!request.shipping.is_free());
    }

    #[test]
    fn test_shipping_free_at_threshold() {
        let cart = Cart::from_items(vec![CartItem::new("a", "Duvet set", dec!(399.00), 1)]);

        let request = handoff().build_request(&cart, None).unwrap();
        assert_eq!(request.shipping.amount, 0);
        assert!(request.shipping.is_free());
    }

    #[test]
    fn test_unit_amount_is_exact() {
        let options = ItemOptions {
            width: Some("140 cm".into()),
            height: Some("250 cm".into()),
            ..Default::default()
        };
        let cart = Cart::from_items(vec![
            CartItem::new("c", "Velvet curtain", dec!(150.25), 1).with_options(options),
        ]);

        let request = handoff().build_request(&cart, None).unwrap();
        let line = &request.line_items[0];
        assert_eq!(line.unit_amount, 15025);
        assert_eq!(line.name, "Velvet curtain");
        assert_eq!(line.description.as_deref(), Some("140 cm x 250 cm"));
    }

    #[test]
    fn test_empty_cart_rejected() {
        let result = handoff().build_request(&Cart::new(), None);
        assert!(matches!(result, Err(PaymentError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_customer_attached_or_delegated() {
        let handoff = handoff();
        let cart = Cart::from_items(vec![CartItem::new("a", "Sheet", dec!(89.00), 1)]);
        let customer = CustomerInfo::new("Anna Nowak", "anna@example.com", "+48 600 100 200");

        handoff.begin(cart.clone(), Some(customer.clone())).await.unwrap();
        let sent = handoff.provider().last_request().unwrap();
        assert_eq!(sent.customer, Some(customer));

        handoff.begin(cart, None).await.unwrap();
        let sent = handoff.provider().last_request().unwrap();
        assert!(sent.collects_customer_details());
    }

    #[tokio::test]
    async fn test_failure_is_not_retried() {
        let handoff = handoff();
        handoff.provider().fail_next("Amount too small");
        let cart = Cart::from_items(vec![CartItem::new("a", "Sheet", dec!(89.00), 1)]);

        let err = handoff.begin(cart, None).await.unwrap_err();
        assert_eq!(err.user_message(), "Amount too small");
        assert_eq!(handoff.provider().create_calls(), 1);
    }

    #[tokio::test]
    async fn test_submit_rejects_malformed_lines() {
        let handoff = handoff();
        let cart = Cart::from_items(vec![CartItem::new("a", "Sheet", dec!(89.00), 1)]);
        let valid = handoff.build_request(&cart, None).unwrap();

        let mut negative = valid.clone();
        negative.line_items[0].unit_amount = -31465;
        let mut zero = valid.clone();
        zero.line_items[0].quantity = 0;
        let mut overflowing = valid.clone();
        overflowing.line_items[0].unit_amount = i64::MAX;
        overflowing.line_items[0].quantity = 2;

        for request in [negative, zero, overflowing] {
            let result = handoff.submit(&request).await;
            assert!(matches!(result, Err(PaymentError::InvalidAmount(_))));
        }
        assert_eq!(handoff.provider().create_calls(), 0);

        let mut free = valid;
        free.line_items[0].unit_amount = 0;
        assert!(handoff.submit(&free).await.is_ok());
    }

    #[tokio::test]
    async fn test_request_is_a_snapshot() {
        let handoff = handoff();
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_item(CartItem::new("a", "Sheet", dec!(89.00), 1));

        let pending = handoff.begin(store.snapshot(), None);
        store.update_quantity("a", 5);
        pending.await.unwrap();

        let sent = handoff.provider().last_request().unwrap();
        assert_eq!(sent.line_items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_read_back() {
        let handoff = handoff();
        let cart = Cart::from_items(vec![CartItem::new("a", "Sheet", dec!(89.00), 2)]);
        let token = handoff.begin(cart, None).await.unwrap();

        let session = handoff.read_back(&token.session_token).await.unwrap();
        assert_eq!(session.line_items.len(), 1);
        assert_eq!(session.amount_total, Some(17800 + 1999));

        let result = handoff.read_back("").await;
        assert!(matches!(result, Err(PaymentError::InvalidSessionId(_))));
        let result = handoff.read_back("cs_test_missing").await;
        assert!(matches!(result, Err(PaymentError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_completion_clears_exactly_once() {
        let handoff = handoff();
        let storage = MemoryStorage::new();
        let mut store = CartStore::new(&storage);
        store.add_item(CartItem::new("a", "Sheet", dec!(89.00), 1));

        let token = handoff.begin(store.snapshot(), None).await.unwrap();
        let id = token.session_token;

        let unpaid = handoff.read_back(&id).await.unwrap();
        assert!(!handoff.record_completion(&id, &unpaid, &mut store));
        assert!(!store.cart().is_empty());

        handoff.provider().mark_paid(&id);
        let paid = handoff.read_back(&id).await.unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert!(handoff.record_completion(&id, &paid, &mut store));
        assert!(store.cart().is_empty());
        assert!(storage.get(CART_STORAGE_KEY).is_none());

        // a new cart started after the thank-you page survives a reload of it
        store.add_item(CartItem::new("b", "Pillowcase", dec!(39.00), 1));
        assert!(!handoff.record_completion(&id, &paid, &mut store));
        assert_eq!(store.cart().items().len(), 1);
    }

    #[tokio::test]
    async fn test_completion_not_repeated_after_reload() {
        let storage = MemoryStorage::new();
        let first_visit = handoff();
        let mut store = CartStore::open(&storage);
        store.add_item(CartItem::new("a", "Sheet", dec!(89.00), 1));

        let id = first_visit.begin(store.snapshot(), None).await.unwrap().session_token;
        first_visit.provider().mark_paid(&id);
        let paid = first_visit.read_back(&id).await.unwrap();
        assert!(first_visit.record_completion(&id, &paid, &mut store));

        store.add_item(CartItem::new("b", "Pillowcase", dec!(39.00), 1));

        // a reload builds a fresh handoff and store over the same storage
        let reloaded = handoff();
        let mut store = CartStore::open(&storage);
        assert!(!reloaded.record_completion(&id, &paid, &mut store));
        assert_eq!(store.cart().items().len(), 1);
        assert_eq!(store.cart().items()[0].id, "b");
    }
}

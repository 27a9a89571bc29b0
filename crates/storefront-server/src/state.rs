//! Application State

use std::sync::Arc;

use storefront_catalog::CatalogProvider;
use storefront_payments::{CheckoutHandoff, PaymentSessionProvider};

/// Checkout over whichever provider was configured at start-up
pub type Checkout = CheckoutHandoff<Box<dyn PaymentSessionProvider>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Product catalog
    pub catalog: Arc<dyn CatalogProvider>,

    /// Checkout handoff (None if payments are not configured)
    pub checkout: Option<Arc<Checkout>>,
}

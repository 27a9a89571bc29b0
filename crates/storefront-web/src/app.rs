//! Main App Component

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::{components::*, path};

use storefront_core::CartStore;
use storefront_payments::{CheckoutHandoff, ShippingPolicy};

use crate::api::HttpSessionProvider;
use crate::components::CartBadge;
use crate::pages::{CancelPage, CartPage, ShopPage, SuccessPage};
use crate::storage::BrowserStorage;

/// The cart, shared through context
pub type CartSignal = RwSignal<CartStore<BrowserStorage>>;

/// Checkout through the server, shared through context
pub type Checkout = Arc<CheckoutHandoff<HttpSessionProvider>>;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let cart: CartSignal = RwSignal::new(CartStore::open(BrowserStorage));
    provide_context(cart);

    // Shipping shown here is a preview; the server applies its own policy
    let checkout: Checkout = Arc::new(CheckoutHandoff::new(
        HttpSessionProvider::from_location(),
        ShippingPolicy::default(),
    ));
    provide_context(checkout);

    view! {
        <Router>
            <nav class="topbar">
                <a href="/" class="brand">"Textile Atelier"</a>
                <CartBadge />
            </nav>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=ShopPage />
                    <Route path=path!("/cart") view=CartPage />
                    <Route path=path!("/checkout/success") view=SuccessPage />
                    <Route path=path!("/checkout/cancel") view=CancelPage />
                </Routes>
            </main>
        </Router>
    }
}

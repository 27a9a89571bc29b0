//! Checkout Cancelled Page

use leptos::prelude::*;

#[component]
pub fn CancelPage() -> impl IntoView {
    view! {
        <div class="cancelled">
            <h1>"Checkout cancelled"</h1>
            <p>"Nothing was charged. Your cart is still here whenever you're ready."</p>
            <div class="cta">
                <a href="/cart" class="btn btn-primary">"Back to cart"</a>
                <a href="/" class="btn">"Keep shopping"</a>
            </div>
        </div>
    }
}

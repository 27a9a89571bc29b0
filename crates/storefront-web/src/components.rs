//! UI Components

use leptos::prelude::*;

use storefront_core::{CartItem, from_minor_units};

use crate::app::CartSignal;

/// Item count linking to the cart
#[component]
pub fn CartBadge() -> impl IntoView {
    let cart = expect_context::<CartSignal>();

    view! {
        <a href="/cart" class="cart-badge">
            "Cart (" {move || cart.with(|store| store.cart().item_count())} ")"
        </a>
    }
}

/// One cart row with quantity controls
#[component]
pub fn CartRow(item: CartItem) -> impl IntoView {
    let cart = expect_context::<CartSignal>();
    let quantity = i64::from(item.quantity);

    let id = item.id.clone();
    let decrement = move |_| {
        // reaching zero removes the row
        cart.update(|store| {
            store.update_quantity(id.clone(), quantity - 1);
        });
    };
    let id = item.id.clone();
    let increment = move |_| {
        cart.update(|store| {
            store.update_quantity(id.clone(), quantity + 1);
        });
    };
    let id = item.id.clone();
    let remove = move |_| {
        cart.update(|store| {
            store.remove_item(id.clone());
        });
    };

    view! {
        <div class="cart-row">
            {item.image.clone().map(|src| view! { <img class="thumb" src=src /> })}
            <div class="details">
                <span class="name">{item.name.clone()}</span>
                {item.options.summary().map(|summary| view! { <span class="options">{summary}</span> })}
            </div>
            <div class="quantity">
                <button on:click=decrement>"−"</button>
                <span>{item.quantity}</span>
                <button on:click=increment>"+"</button>
            </div>
            <span class="line-total">{format!("{:.2}", item.line_total())}</span>
            <button class="remove" on:click=remove>"Remove"</button>
        </div>
    }
}

/// Amount in minor units, shown in major units
#[component]
pub fn Amount(minor: i64) -> impl IntoView {
    view! { <span class="amount">{format!("{:.2}", from_minor_units(minor))}</span> }
}

/// Terminal error with a way out
#[component]
pub fn ErrorPanel(message: String) -> impl IntoView {
    view! {
        <div class="error-panel">
            <p>{message}</p>
            <div class="cta">
                <a href="/cart" class="btn">"Back to cart"</a>
                <a href="/" class="btn">"Home"</a>
            </div>
        </div>
    }
}

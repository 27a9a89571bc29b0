//! Shop Page

use leptos::prelude::*;

use storefront_catalog::{PricingRule, Product};
use storefront_core::{ItemOptions, PurchaseType};

use crate::api;
use crate::app::CartSignal;

const PURCHASE_TYPES: [PurchaseType; 3] = [
    PurchaseType::SetWithTopper,
    PurchaseType::MainOnly,
    PurchaseType::TopperOnly,
];

#[component]
pub fn ShopPage() -> impl IntoView {
    let (products, set_products) = signal(Vec::<Product>::new());
    let (error, set_error) = signal(None::<String>);

    leptos::task::spawn_local(async move {
        match api::fetch_products().await {
            Ok(list) => set_products.set(list),
            Err(e) => set_error.set(Some(e)),
        }
    });

    view! {
        <div class="shop">
            <header class="hero">
                <h1>"Curtains, blinds & bedding"</h1>
                <p class="tagline">"Made to measure in our own workshop"</p>
            </header>

            {move || error.get().map(|message| view! { <p class="error">{message}</p> })}

            <section class="products">
                <For
                    each=move || products.get()
                    key=|product| product.id.clone()
                    children=move |product| view! { <ProductCard product=product /> }
                />
            </section>
        </div>
    }
}

#[component]
fn ProductCard(product: Product) -> impl IntoView {
    let cart = expect_context::<CartSignal>();
    let (width, set_width) = signal(String::new());
    let (height, set_height) = signal(String::new());
    let (color, set_color) = signal(product.colors.first().cloned());
    let (purchase_type, set_purchase_type) = signal(PurchaseType::SetWithTopper);
    let (status, set_status) = signal(None::<String>);

    let custom = product.is_custom_size();
    let per_type = matches!(product.pricing, PricingRule::PerPurchaseType { .. });
    let colors = product.colors.clone();

    let id = product.id.clone();
    let add = move |_| {
        let options = ItemOptions {
            width: custom.then(|| width.get_untracked()),
            height: custom.then(|| height.get_untracked()),
            purchase_type: per_type.then(|| purchase_type.get_untracked()),
            color: color.get_untracked(),
            ..Default::default()
        };
        let id = id.clone();
        leptos::task::spawn_local(async move {
            match api::quote(&id, &options, 1).await {
                Ok(item) => {
                    cart.update(|store| {
                        store.add_item(item);
                    });
                    set_status.set(Some("Added to cart".into()));
                }
                Err(e) => set_status.set(Some(e)),
            }
        });
    };

    view! {
        <div class="product">
            {product.image.clone().map(|src| view! { <img src=src alt=product.name.clone() /> })}
            <h3>{product.name.clone()}</h3>
            <p class="price">"from " {format!("{:.2}", product.starting_price())}</p>

            <Show when=move || custom>
                <div class="field">
                    <label>"Width"</label>
                    <input
                        type="text"
                        placeholder="140 cm"
                        prop:value=move || width.get()
                        on:input=move |ev| set_width.set(event_target_value(&ev))
                    />
                    <label>"Height"</label>
                    <input
                        type="text"
                        placeholder="250 cm"
                        prop:value=move || height.get()
                        on:input=move |ev| set_height.set(event_target_value(&ev))
                    />
                </div>
            </Show>

            <Show when=move || per_type>
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    if let Some(chosen) = PURCHASE_TYPES.iter().find(|t| t.as_str() == value) {
                        set_purchase_type.set(*chosen);
                    }
                }>
                    {PURCHASE_TYPES
                        .iter()
                        .map(|t| view! { <option value=t.as_str()>{t.label()}</option> })
                        .collect_view()}
                </select>
            </Show>

            {(!colors.is_empty())
                .then(|| {
                    view! {
                        <select on:change=move |ev| set_color.set(Some(event_target_value(&ev)))>
                            {colors
                                .into_iter()
                                .map(|c| {
                                    let value = c.clone();
                                    view! { <option value=value>{c}</option> }
                                })
                                .collect_view()}
                        </select>
                    }
                })}

            <button class="btn btn-primary" on:click=add>"Add to cart"</button>
            {move || status.get().map(|message| view! { <p class="status">{message}</p> })}
        </div>
    }
}

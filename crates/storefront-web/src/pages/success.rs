//! Order Confirmation Page

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use storefront_payments::{PaymentStatus, SessionDetails};

use crate::app::{CartSignal, Checkout};
use crate::components::{Amount, ErrorPanel};

#[derive(Clone, Debug)]
enum ReadBack {
    Loading,
    Loaded(SessionDetails),
    Failed(String),
}

#[component]
pub fn SuccessPage() -> impl IntoView {
    let cart = expect_context::<CartSignal>();
    let checkout = expect_context::<Checkout>();
    let session_id = use_query_map()
        .with_untracked(|query| query.get("session_id"))
        .unwrap_or_default();
    let (state, set_state) = signal(ReadBack::Loading);

    leptos::task::spawn_local(async move {
        match checkout.read_back(&session_id).await {
            Ok(session) => {
                cart.update(|store| {
                    checkout.record_completion(&session_id, &session, store);
                });
                set_state.set(ReadBack::Loaded(session));
            }
            Err(e) => set_state.set(ReadBack::Failed(e.user_message())),
        }
    });

    view! {
        <div class="confirmation">
            {move || match state.get() {
                ReadBack::Loading => view! { <p>"Loading your order..."</p> }.into_any(),
                ReadBack::Loaded(session) => view! { <OrderSummary session=session /> }.into_any(),
                ReadBack::Failed(message) => view! { <ErrorPanel message=message /> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn OrderSummary(session: SessionDetails) -> impl IntoView {
    let heading = match session.payment_status {
        PaymentStatus::Paid | PaymentStatus::NoPaymentRequired => "Thank you for your order!",
        PaymentStatus::Unpaid => "Your payment is still being processed",
    };

    let contact = session.customer_details.and_then(|c| c.email);
    let address = session
        .shipping_details
        .and_then(|s| s.address)
        .map(|a| {
            [a.line1, a.line2, a.postal_code, a.city, a.country]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ")
        });
    let placed = session
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string());

    view! {
        <h1>{heading}</h1>
        {placed.map(|at| view! { <p class="placed">"Placed " {at}</p> })}

        <ul class="lines">
            {session
                .line_items
                .into_iter()
                .map(|line| {
                    view! {
                        <li>
                            <span>{line.description.unwrap_or_default()}</span>
                            " × " {line.quantity} " "
                            <Amount minor=line.amount_total />
                        </li>
                    }
                })
                .collect_view()}
        </ul>

        {session.amount_total.map(|total| view! { <p class="total">"Total: " <Amount minor=total /></p> })}
        {contact.map(|email| view! { <p>"Confirmation sent to " {email}</p> })}
        {address.map(|address| view! { <p>"Shipping to " {address}</p> })}

        <a href="/" class="btn btn-primary">"Continue shopping"</a>
    }
}

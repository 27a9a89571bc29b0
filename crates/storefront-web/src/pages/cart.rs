//! Cart Page

use leptos::prelude::*;

use storefront_core::{CustomerInfo, from_minor_units};
use storefront_payments::{CheckoutMode, PaymentError, SessionToken};

use crate::api;
use crate::app::{CartSignal, Checkout};
use crate::components::CartRow;
use crate::embedded;

/// Client secret and publishable key of an embedded session
#[derive(Clone, Debug, PartialEq, Eq)]
struct EmbeddedSession {
    client_secret: String,
    publishable_key: String,
}

/// Redirect to a hosted session, or hand back an embedded one for mounting
fn open_session(token: SessionToken) -> Result<Option<EmbeddedSession>, PaymentError> {
    match (token.mode, token.publishable_key) {
        (CheckoutMode::Hosted, _) => {
            api::redirect(&token.session_token);
            Ok(None)
        }
        (CheckoutMode::Embedded, Some(publishable_key)) => Ok(Some(EmbeddedSession {
            client_secret: token.session_token,
            publishable_key,
        })),
        (CheckoutMode::Embedded, None) => Err(PaymentError::Config(
            "embedded session without a publishable key".into(),
        )),
    }
}

#[component]
pub fn CartPage() -> impl IntoView {
    let cart = expect_context::<CartSignal>();
    let checkout = expect_context::<Checkout>();
    let (pending, set_pending) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let (embedded_form, set_embedded_form) = signal(None::<EmbeddedSession>);

    // runs after the mount point below has rendered
    Effect::new(move |_| {
        if let Some(session) = embedded_form.get() {
            embedded::mount(&session.publishable_key, &session.client_secret, move |message| {
                set_error.set(Some(message));
            });
        }
    });

    let preview = checkout.clone();
    let shipping = move || {
        cart.with(|store| preview.shipping_line(store.cart().total()).ok())
            .map(|line| format!("{} {:.2}", line.label(), from_minor_units(line.amount)))
    };

    let begin = move |_| {
        if pending.get_untracked() {
            return;
        }
        let (snapshot, customer) =
            cart.with_untracked(|store| (store.snapshot(), store.customer().cloned()));
        let checkout = checkout.clone();

        set_pending.set(true);
        set_error.set(None);
        leptos::task::spawn_local(async move {
            match checkout.begin(snapshot, customer).await.and_then(open_session) {
                Ok(Some(session)) => set_embedded_form.set(Some(session)),
                Ok(None) => {}
                Err(e) => set_error.set(Some(e.user_message())),
            }
            set_pending.set(false);
        });
    };

    view! {
        <div class="cart">
            <h1>"Your cart"</h1>
            <Show
                when=move || cart.with(|store| !store.cart().is_empty())
                fallback=|| {
                    view! {
                        <p>"Your cart is empty."</p>
                        <a href="/" class="btn">"Continue shopping"</a>
                    }
                }
            >
                <For
                    each=move || cart.with(|store| store.cart().items().to_vec())
                    key=|item| (item.id.clone(), item.quantity)
                    children=|item| view! { <CartRow item=item /> }
                />

                <div class="summary">
                    <p>"Subtotal: " {move || cart.with(|store| format!("{:.2}", store.cart().total()))}</p>
                    <p>"Shipping: " {shipping.clone()}</p>
                </div>

                <CustomerForm />

                {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
                <button class="btn btn-primary" on:click=begin.clone() disabled=move || pending.get()>
                    {move || if pending.get() { "..." } else { "Go to payment" }}
                </button>

                <Show when=move || embedded_form.with(Option::is_some)>
                    <div id=embedded::MOUNT_ID></div>
                </Show>
            </Show>
        </div>
    }
}

/// Optional contact details; when left empty the payment page asks for them
#[component]
fn CustomerForm() -> impl IntoView {
    let cart = expect_context::<CartSignal>();
    let saved = cart.with_untracked(|store| store.customer().cloned());

    let (name, set_name) = signal(saved.as_ref().map(|c| c.name.clone()).unwrap_or_default());
    let (email, set_email) = signal(saved.as_ref().map(|c| c.email.clone()).unwrap_or_default());
    let (phone, set_phone) = signal(saved.map(|c| c.phone).unwrap_or_default());

    let save = move |_| {
        let customer = CustomerInfo::new(name.get_untracked(), email.get_untracked(), phone.get_untracked());
        cart.update(|store| store.set_customer(customer));
    };
    let forget = move |_| {
        set_name.set(String::new());
        set_email.set(String::new());
        set_phone.set(String::new());
        cart.update(|store| store.clear_customer());
    };

    view! {
        <fieldset class="customer">
            <legend>"Contact details (optional)"</legend>
            <input
                type="text"
                placeholder="Full name"
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <input
                type="email"
                placeholder="Email"
                prop:value=move || email.get()
                on:input=move |ev| set_email.set(event_target_value(&ev))
            />
            <input
                type="tel"
                placeholder="Phone"
                prop:value=move || phone.get()
                on:input=move |ev| set_phone.set(event_target_value(&ev))
            />
            <button class="btn" on:click=save>"Save"</button>
            <button class="btn" on:click=forget>"Forget"</button>
        </fieldset>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_token_is_mounted() {
        let session = open_session(SessionToken::embedded("cs_1_secret", "pk_test_1")).unwrap();
        assert_eq!(
            session,
            Some(EmbeddedSession {
                client_secret: "cs_1_secret".into(),
                publishable_key: "pk_test_1".into(),
            })
        );
    }

    #[test]
    fn test_embedded_token_without_key_is_an_error() {
        let mut token = SessionToken::embedded("cs_1_secret", "pk_test_1");
        token.publishable_key = None;
        assert!(matches!(open_session(token), Err(PaymentError::Config(_))));
    }
}

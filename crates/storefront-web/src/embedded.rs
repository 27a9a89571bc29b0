//! Embedded Checkout
//!
//! Mounts Stripe's embedded payment form into the cart page. Stripe.js is
//! loaded on first use.

use wasm_bindgen::prelude::*;

/// Element the payment form mounts into
pub const MOUNT_ID: &str = "embedded-checkout";

#[wasm_bindgen(module = "/js/embedded_checkout.js")]
extern "C" {
    #[wasm_bindgen(js_name = mountEmbeddedCheckout)]
    fn mount_embedded_checkout(
        publishable_key: &str,
        client_secret: &str,
        selector: &str,
        on_error: JsValue,
    );
}

/// Mount the form for `client_secret`; `on_error` gets a displayable message
pub fn mount(publishable_key: &str, client_secret: &str, on_error: impl FnOnce(String) + 'static) {
    let on_error = Closure::once_into_js(on_error);
    mount_embedded_checkout(publishable_key, client_secret, &format!("#{MOUNT_ID}"), on_error);
}

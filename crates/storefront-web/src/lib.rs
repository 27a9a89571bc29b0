//! Textile Storefront Web Frontend
//!
//! Leptos-based WASM frontend: product list, cart and order confirmation.
//! The cart lives in `localStorage` and survives reloads; checkout goes
//! through the storefront server.

mod api;
mod app;
mod components;
mod embedded;
mod pages;
mod storage;

pub use app::App;
pub use storage::BrowserStorage;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}

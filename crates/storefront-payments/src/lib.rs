//! # storefront-payments
//!
//! Checkout hand-off from the cart to a payment-session provider.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐  build   ┌──────────────────┐  create  ┌─────────────┐
//! │  CartStore  │─────────▶│ CheckoutHandoff  │─────────▶│  Provider   │
//! │ (snapshot)  │          │ minor units +    │◀─────────│  (Stripe)   │
//! └─────────────┘          │ shipping line    │  token   └─────────────┘
//!        ▲                 └──────────────────┘                │
//!        │ clear once               │ read back                │
//!        └──────────────────────────┴──────────────────────────┘
//! ```
//!
//! ## Stripe Integration Modes
//!
//! ### 1. Hosted Checkout
//!
//! **Flow:** Cart → Redirect to Stripe's hosted page → Redirect back to
//! `/checkout/success?session_id=...`
//!
//! The session token is the page URL. Stripe collects contact and billing
//! details when the shopper has not given them to us.
//!
//! ### 2. Embedded Checkout
//!
//! **Flow:** The payment form is mounted inside our checkout page.
//!
//! The session token is a client secret handed to Stripe.js together with
//! the publishable key (`STRIPE_PUBLISHABLE_KEY`); the shopper lands on the
//! same success page once payment settles. `SessionToken::mode` tells the
//! browser which of the two to do.
//!
//! Neither mode retries a failed request. Checkout is started by the shopper
//! and a repeated call could open a second session for the same cart.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_payments::{CheckoutHandoff, CheckoutMode, MemorySessionProvider, ShippingPolicy};
//!
//! let handoff = CheckoutHandoff::new(MemorySessionProvider::new(), ShippingPolicy::from_env()?);
//!
//! let token = handoff.begin(store.snapshot(), store.customer().cloned()).await?;
//! match token.mode {
//!     CheckoutMode::Hosted => redirect(&token.session_token),
//!     CheckoutMode::Embedded => mount(token.publishable_key, &token.session_token),
//! }
//!
//! // Later, on the success page
//! let session = handoff.read_back(&session_id).await?;
//! handoff.record_completion(&session_id, &session, &mut store);
//! ```

pub mod config;
pub mod error;
pub mod handoff;
pub mod provider;
pub mod request;
#[cfg(feature = "stripe")]
pub mod stripe;

pub use config::{CheckoutMode, Currency, ShippingPolicy, StripeConfig};
pub use error::{PaymentError, Result};
pub use handoff::CheckoutHandoff;
pub use provider::{MemorySessionProvider, PaymentSessionProvider};
pub use request::{
    CheckoutLineItem, CheckoutRequest, CustomerDetails, ErrorBody, PaymentStatus, PostalAddress,
    SessionDetails, SessionLineItem, SessionToken, ShippingDetails, ShippingLine,
};
#[cfg(feature = "stripe")]
pub use stripe::StripeSessionProvider;

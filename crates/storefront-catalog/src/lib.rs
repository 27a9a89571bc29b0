//! # storefront-catalog
//!
//! Product records for made-to-measure curtains, blinds and bedding, and the
//! pricing rules that turn a chosen configuration into a cart entry.
//!
//! ## Pricing
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Curtains / blinds   width × height × rate  (≥ minimum)      │
//! │  Bedding sets        set with topper | main only | topper    │
//! │  Standard sizes      price per variant index                 │
//! │  Add-ons             + embroidery  + hardware (per unit)     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The resolved price is frozen into the [`CartItem`](storefront_core::CartItem);
//! later catalog changes never reach items already in a cart.

pub mod catalog;
pub mod error;
pub mod model;
pub mod pricing;

pub use catalog::{CatalogProvider, StaticCatalog};
pub use error::{CatalogError, Result};
pub use model::{PricingRule, Product, ProductFamily};
pub use pricing::{configuration_id, parse_centimeters, quote, unit_price};

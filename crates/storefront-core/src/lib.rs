//! # storefront-core
//!
//! Shopping-cart state for the textile storefront: line items, pure reducers,
//! derived totals and the bridge to durable client storage.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  CartAction  ┌─────────────────────────────────────┐
//! │  UI events   │─────────────▶│              CartStore              │
//! └──────────────┘              │  ┌───────────┐   ┌───────────────┐  │
//!                               │  │ Cart::    │──▶│ Persistence   │  │
//!                               │  │ apply()   │   │ Bridge        │  │
//!                               │  └───────────┘   └───────┬───────┘  │
//!                               └──────────────────────────┼──────────┘
//!                                                          ▼
//!                                              DurableStorage (localStorage)
//! ```
//!
//! `Cart::apply` is pure; the store persists after every transition. The
//! total is always re-derived from the items.
//!
//! ## Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use storefront_core::{CartItem, CartStore, MemoryStorage};
//!
//! let mut store = CartStore::open(MemoryStorage::new());
//! store.add_item(CartItem::new("p1", "Linen curtain", Decimal::new(10000, 2), 1));
//! assert_eq!(store.cart().total(), Decimal::new(10000, 2));
//! ```

pub mod cart;
pub mod customer;
pub mod error;
pub mod item;
pub mod money;
pub mod persistence;
pub mod storage;
pub mod store;

pub use cart::{Cart, CartAction};
pub use customer::{Address, CustomerInfo};
pub use error::{CartError, Result};
pub use item::{CartItem, ItemOptions, PurchaseType};
pub use money::{from_minor_units, to_minor_units};
pub use persistence::{
    CART_STORAGE_KEY, COMPLETED_SESSIONS_KEY, CUSTOMER_STORAGE_KEY, CartPersistence, decode_cart, encode_cart,
};
pub use storage::{DurableStorage, MemoryStorage, UnavailableStorage};
pub use store::CartStore;

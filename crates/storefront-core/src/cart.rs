//! Cart State & Reducer
//!
//! `Cart::apply` is a pure transition: old state + action → new state. It never
//! touches storage; the [`CartStore`](crate::store::CartStore) persists the
//! result afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::item::CartItem;

/// Mutations a shopper can make
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartAction {
    /// Add or merge by id
    AddItem { item: CartItem },

    /// Drop every entry with this id
    RemoveItem { id: String },

    /// Set the quantity; zero or below removes the entry
    UpdateQuantity { id: String, quantity: i64 },

    /// Empty the cart
    Clear,
}

/// The cart aggregate
///
/// `total` is private and only ever written by `recompute`, so it cannot
/// drift from the items.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredCart")]
pub struct Cart {
    items: Vec<CartItem>,
    total: Decimal,
}

/// Wire shape; the stored total is ignored and re-derived, and entries with a
/// zero quantity or a negative price are dropped
#[derive(Deserialize)]
struct StoredCart {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl From<StoredCart> for Cart {
    fn from(stored: StoredCart) -> Self {
        let items = stored
            .items
            .into_iter()
            .filter(|item| item.quantity > 0 && !item.price.is_sign_negative())
            .collect();
        Self::from_items(items)
    }
}

impl Cart {
    /// Empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from items, deriving the total
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self {
            items,
            total: Decimal::ZERO,
        };
        cart.recompute();
        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Σ price × quantity
    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of units across all entries
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Apply an action, returning the next state
    #[must_use]
    pub fn apply(&self, action: CartAction) -> Self {
        let mut next = self.clone();

        match action {
            CartAction::AddItem { item } => next.add(item),
            CartAction::RemoveItem { id } => next.remove(&id),
            CartAction::UpdateQuantity { id, quantity } => next.set_quantity(&id, quantity),
            CartAction::Clear => next.items.clear(),
        }

        next.recompute();
        next
    }

    fn add(&mut self, incoming: CartItem) {
        match self.items.iter_mut().find(|item| item.same_entry(&incoming)) {
            // existing price and options win
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(incoming.quantity);
            }
            None => self.items.push(incoming),
        }
    }

    fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    fn set_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
        }
    }

    // Always from scratch, never incrementally.
    fn recompute(&mut self) {
        self.total = self
            .items
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add);
    }
}

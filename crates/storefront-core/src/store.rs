//! Cart Store
//!
//! Owns the canonical cart, runs the pure reducer, then mirrors the result to
//! durable storage. One instance per client, constructed explicitly and passed
//! around by the caller.

use crate::cart::{Cart, CartAction};
use crate::customer::CustomerInfo;
use crate::item::CartItem;
use crate::persistence::CartPersistence;
use crate::storage::DurableStorage;

/// Cart state plus its persistence
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    customer: Option<CustomerInfo>,
    completed_sessions: Vec<String>,
    persistence: CartPersistence<S>,
}

impl<S: DurableStorage> CartStore<S> {
    /// Create an empty store without reading storage
    pub fn new(storage: S) -> Self {
        Self {
            cart: Cart::new(),
            customer: None,
            completed_sessions: Vec::new(),
            persistence: CartPersistence::new(storage),
        }
    }

    /// Create a store and rehydrate it from storage
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.initialize();
        store
    }

    /// Re-read storage, replacing in-memory state. Falls back to an empty cart.
    pub fn initialize(&mut self) -> &Cart {
        self.cart = self.persistence.load_cart().unwrap_or_default();
        self.customer = self.persistence.load_customer();
        self.completed_sessions = self.persistence.load_completed_sessions();

        tracing::debug!(
            items = self.cart.items().len(),
            total = %self.cart.total(),
            "Cart rehydrated"
        );
        &self.cart
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Owned copy for display or checkout
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    pub fn storage(&self) -> &S {
        self.persistence.storage()
    }

    /// Reduce an action into the cart and persist the new state
    pub fn dispatch(&mut self, action: CartAction) -> &Cart {
        let clearing = matches!(action, CartAction::Clear);
        self.cart = self.cart.apply(action);

        if clearing {
            self.persistence.clear_cart();
        } else {
            self.persistence.save_cart(&self.cart);
        }
        &self.cart
    }

    pub fn add_item(&mut self, item: CartItem) -> &Cart {
        self.dispatch(CartAction::AddItem { item })
    }

    pub fn remove_item(&mut self, id: impl Into<String>) -> &Cart {
        self.dispatch(CartAction::RemoveItem { id: id.into() })
    }

    /// Set a quantity; zero or negative removes the entry
    pub fn update_quantity(&mut self, id: impl Into<String>, quantity: i64) -> &Cart {
        self.dispatch(CartAction::UpdateQuantity {
            id: id.into(),
            quantity,
        })
    }

    pub fn clear(&mut self) -> &Cart {
        self.dispatch(CartAction::Clear)
    }

    /// Remember a completed checkout session. Returns `false` when it was
    /// already recorded by this store or by an earlier visit.
    pub fn mark_session_completed(&mut self, session_id: &str) -> bool {
        for id in self.persistence.load_completed_sessions() {
            if !self.completed_sessions.contains(&id) {
                self.completed_sessions.push(id);
            }
        }
        if self.completed_sessions.iter().any(|id| id == session_id) {
            return false;
        }

        self.completed_sessions.push(session_id.to_string());
        self.persistence.save_completed_sessions(&self.completed_sessions);
        true
    }

    pub fn customer(&self) -> Option<&CustomerInfo> {
        self.customer.as_ref()
    }

    pub fn set_customer(&mut self, customer: CustomerInfo) {
        self.persistence.save_customer(&customer);
        self.customer = Some(customer);
    }

    pub fn clear_customer(&mut self) {
        self.persistence.clear_customer();
        self.customer = None;
    }
}

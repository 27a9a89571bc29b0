//! Persistence Bridge
//!
//! Mirrors cart and customer state into fixed storage keys. Reads never fail:
//! a missing or unreadable slot is reported as "nothing stored".

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cart::Cart;
use crate::customer::CustomerInfo;
use crate::error::{CartError, Result};
use crate::storage::DurableStorage;

/// Storage key holding the encoded cart
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Storage key holding the encoded customer info
pub const CUSTOMER_STORAGE_KEY: &str = "customer-info";

/// Storage key holding ids of checkout sessions already seen completed
pub const COMPLETED_SESSIONS_KEY: &str = "completed-sessions";

/// How many completed session ids are remembered
pub const COMPLETED_SESSIONS_KEPT: usize = 20;

/// Encode a cart (items + total) for storage
pub fn encode_cart(cart: &Cart) -> Result<String> {
    Ok(serde_json::to_string(cart)?)
}

/// Decode a stored cart
pub fn decode_cart(raw: &str) -> Result<Cart> {
    Ok(serde_json::from_str(raw)?)
}

/// Bridge between in-memory state and a [`DurableStorage`]
#[derive(Debug)]
pub struct CartPersistence<S> {
    storage: S,
}

impl<S: DurableStorage> CartPersistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Rehydrate the stored cart, if any
    pub fn load_cart(&self) -> Option<Cart> {
        self.load(CART_STORAGE_KEY)
    }

    pub fn save_cart(&self, cart: &Cart) {
        self.store(CART_STORAGE_KEY, cart);
    }

    /// Drop the stored cart entirely
    pub fn clear_cart(&self) {
        self.discard(CART_STORAGE_KEY);
    }

    pub fn load_customer(&self) -> Option<CustomerInfo> {
        self.load(CUSTOMER_STORAGE_KEY)
    }

    pub fn save_customer(&self, customer: &CustomerInfo) {
        self.store(CUSTOMER_STORAGE_KEY, customer);
    }

    pub fn clear_customer(&self) {
        self.discard(CUSTOMER_STORAGE_KEY);
    }

    /// Completed checkout session ids, oldest first
    pub fn load_completed_sessions(&self) -> Vec<String> {
        self.load(COMPLETED_SESSIONS_KEY).unwrap_or_default()
    }

    /// Store completed session ids, keeping only the newest
    pub fn save_completed_sessions(&self, ids: &[String]) {
        let kept = &ids[ids.len().saturating_sub(COMPLETED_SESSIONS_KEPT)..];
        self.store(COMPLETED_SESSIONS_KEY, &kept);
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.storage.is_available() {
            return None;
        }

        let raw = self.storage.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable stored state");
                None
            }
        }
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) {
        if !self.storage.is_available() {
            tracing::debug!(key, "No durable storage in this context, skipping write");
            return;
        }

        let written = serde_json::to_string(value)
            .map_err(CartError::from)
            .and_then(|raw| self.storage.set(key, &raw));

        if let Err(e) = written {
            tracing::warn!(key, error = %e, "Failed to persist state");
        }
    }

    fn discard(&self, key: &str) {
        if self.storage.is_available() {
            self.storage.remove(key);
        }
    }
}

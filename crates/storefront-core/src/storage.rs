//! Durable Storage
//!
//! Key-value slot abstraction over browser `localStorage` and friends. Only
//! browser-like contexts have one; everywhere else use [`UnavailableStorage`].

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::Result;

/// Durable key-value storage
pub trait DurableStorage {
    /// Whether this context has durable storage at all
    fn is_available(&self) -> bool {
        true
    }

    /// Read the value under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`
    fn remove(&self, key: &str);
}

impl<S: DurableStorage + ?Sized> DurableStorage for &S {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key);
    }
}

/// Storage for server-rendered / non-browser contexts: always absent
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableStorage;

impl DurableStorage for UnavailableStorage {
    fn is_available(&self) -> bool {
        false
    }

    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) {}
}

/// In-memory storage (for development/testing)
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied keys
    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.remove(key);
    }
}

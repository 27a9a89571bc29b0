//! Browser Storage
//!
//! `localStorage` for the cart. Shared by every tab on the origin; the last
//! write wins.

use storefront_core::{CartError, DurableStorage, Result};

/// Handle to the window's `localStorage`
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn local() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl DurableStorage for BrowserStorage {
    fn is_available(&self) -> bool {
        Self::local().is_some()
    }

    fn get(&self, key: &str) -> Option<String> {
        Self::local()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let storage =
            Self::local().ok_or_else(|| CartError::Storage("localStorage unavailable".into()))?;
        // Quota errors land here
        storage
            .set_item(key, value)
            .map_err(|e| CartError::Storage(format!("{e:?}")))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::local() {
            let _ = storage.remove_item(key);
        }
    }
}

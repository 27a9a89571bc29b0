//! Catalog Providers
//!
//! Abstractions over where product records come from.

mod fixed;

pub use fixed::StaticCatalog;

use async_trait::async_trait;
use storefront_core::{CartItem, ItemOptions};

use crate::error::Result;
use crate::model::Product;
use crate::pricing;

/// Catalog provider trait (Strategy pattern)
///
/// Implement this for each product source: static fixtures, a CMS, the
/// admin database.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Look up one product
    async fn product(&self, id: &str) -> Result<Product>;

    /// All products, in display order
    async fn products(&self) -> Result<Vec<Product>>;

    /// Price a configuration and build the cart entry for it
    async fn quote(&self, id: &str, options: ItemOptions, quantity: u32) -> Result<CartItem> {
        let product = self.product(id).await?;
        pricing::quote(&product, options, quantity)
    }

    /// Check if the source is reachable
    async fn health_check(&self) -> bool;

    /// Provider name
    fn name(&self) -> &str;
}

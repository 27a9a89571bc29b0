//! Static Catalog
//!
//! In-memory product list for development, tests and small deployments that
//! ship their catalog as a JSON file.

use async_trait::async_trait;
use rust_decimal_macros::dec;

use super::CatalogProvider;
use crate::error::{CatalogError, Result};
use crate::model::{PricingRule, Product, ProductFamily};

/// Catalog backed by a fixed product list
#[derive(Clone, Debug)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticCatalog {
    /// Catalog seeded with the house collection
    pub fn new() -> Self {
        Self::with_products(Self::house_collection())
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load a catalog from a JSON array of products
    pub fn from_json(raw: &str) -> Result<Self> {
        let products: Vec<Product> = serde_json::from_str(raw)?;
        tracing::info!(products = products.len(), "Loaded catalog");
        Ok(Self::with_products(products))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn house_collection() -> Vec<Product> {
        vec![
            Product::new(
                "velvet-curtain",
                "Velvet curtain",
                ProductFamily::Curtains,
                PricingRule::PerSquareMeter {
                    rate: dec!(89.90),
                    minimum: dec!(150.00),
                },
            )
            .with_colors(["sage", "ivory", "bottle green", "dusty rose"])
            .with_hardware(dec!(45.00))
            .with_image("/img/velvet-curtain.jpg"),
            Product::new(
                "linen-curtain",
                "Linen curtain",
                ProductFamily::Curtains,
                PricingRule::PerSquareMeter {
                    rate: dec!(74.50),
                    minimum: dec!(120.00),
                },
            )
            .with_colors(["natural", "white", "graphite"])
            .with_hardware(dec!(45.00))
            .with_image("/img/linen-curtain.jpg"),
            Product::new(
                "roller-blind",
                "Roller blind",
                ProductFamily::Blinds,
                PricingRule::PerSquareMeter {
                    rate: dec!(119.00),
                    minimum: dec!(99.00),
                },
            )
            .with_colors(["white", "cream", "grey"])
            .with_hardware(dec!(25.00))
            .with_image("/img/roller-blind.jpg"),
            Product::new(
                "satin-duvet-set",
                "Satin duvet set",
                ProductFamily::Bedding,
                PricingRule::PerPurchaseType {
                    set_with_topper: dec!(499.00),
                    main_only: dec!(379.00),
                    topper_only: dec!(149.00),
                },
            )
            .with_colors(["pearl", "champagne", "navy"])
            .with_embroidery(dec!(60.00))
            .with_image("/img/satin-duvet-set.jpg"),
            Product::new(
                "cotton-pillowcase",
                "Cotton pillowcase",
                ProductFamily::Bedding,
                PricingRule::PerVariant {
                    prices: vec![dec!(39.00), dec!(49.00), dec!(59.00)],
                },
            )
            .with_colors(["white", "sand"])
            .with_embroidery(dec!(25.00))
            .with_image("/img/cotton-pillowcase.jpg"),
        ]
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn product(&self, id: &str) -> Result<Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))
    }

    async fn products(&self) -> Result<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "StaticCatalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::ItemOptions;

    #[tokio::test]
    async fn test_lookup() {
        let catalog = StaticCatalog::new();

        let product = catalog.product("roller-blind").await.unwrap();
        assert_eq!(product.family, ProductFamily::Blinds);

        let result = catalog.product("nope").await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_quote_through_provider() {
        let catalog = StaticCatalog::new();
        let options = ItemOptions {
            variant: Some(1),
            color: Some("sand".into()),
            ..Default::default()
        };

        let item = catalog.quote("cotton-pillowcase", options, 4).await.unwrap();
        assert_eq!(item.price, dec!(49.00));
        assert_eq!(item.id, "cotton-pillowcase|color=sand|variant=1");
        assert_eq!(item.image.as_deref(), Some("/img/cotton-pillowcase.jpg"));
    }

    #[test]
    fn test_from_json() {
        let raw = r#"[{
            "id": "sheet",
            "name": "Fitted sheet",
            "family": "bedding",
            "pricing": { "kind": "fixed", "price": "89.00" }
        }]"#;
        let catalog = StaticCatalog::from_json(raw).unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(StaticCatalog::from_json("{}").is_err());
    }
}

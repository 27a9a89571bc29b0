//! Error Types for the Catalog

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Missing dimension: {0}")]
    MissingDimension(&'static str),

    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Option {option} not offered for {product}")]
    UnsupportedOption { product: String, option: String },

    #[error("Variant {variant} does not exist for {product}")]
    UnknownVariant { product: String, variant: u32 },

    #[error("Price out of range for {0}")]
    PriceOutOfRange(String),

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    /// Whether the shopper can fix this by changing the configuration
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::ProductNotFound(_) | Self::Serialization(_))
    }
}

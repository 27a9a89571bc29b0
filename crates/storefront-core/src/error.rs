//! Error Types

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for cart operations
pub type Result<T> = std::result::Result<T, CartError>;

/// Cart error types
///
/// None of these reach the shopper: storage problems degrade to an empty
/// cart and are only logged.
#[derive(Error, Debug)]
pub enum CartError {
    /// Durable storage rejected a write (quota, privacy mode, ...)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Amount does not fit the provider's integer minor-unit field
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(Decimal),
}

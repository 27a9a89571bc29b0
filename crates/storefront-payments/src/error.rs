//! Payment Error Types

use storefront_core::CartError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Checkout-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Error reported by the payment provider, kept verbatim
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// No session with this id
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Session id is malformed or missing
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    /// Nothing to pay for
    #[error("Cart is empty")]
    EmptyCart,

    /// An amount could not be expressed in minor units
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PaymentError {
    /// Whether trying again by hand may succeed. Nothing here retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::Network(_))
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(message) => message.clone(),
            Self::Network(_) => {
                "Could not reach the payment service. Please check your connection and try again."
                    .into()
            }
            Self::SessionNotFound(_) | Self::InvalidSessionId(_) => {
                "We couldn't find this order. Go back to your cart or the home page.".into()
            }
            Self::EmptyCart => "Your cart is empty.".into(),
            Self::InvalidAmount(_) => "One of the items in your cart has an invalid price.".into(),
            Self::Config(_) => "Payments are not available right now.".into(),
            Self::Serialization(_) => "An error occurred processing your request.".into(),
        }
    }

    /// Stable machine-readable code for HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::SessionNotFound(_) => "SESSION_NOT_FOUND",
            Self::InvalidSessionId(_) => "INVALID_SESSION_ID",
            Self::EmptyCart => "EMPTY_CART",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::Config(_) => "PAYMENTS_DISABLED",
            Self::Serialization(_) => "BAD_PAYLOAD",
        }
    }

    /// Rebuild an error from an HTTP error body
    pub fn from_code(code: &str, message: String) -> Self {
        match code {
            "NETWORK_ERROR" => Self::Network(message),
            "SESSION_NOT_FOUND" => Self::SessionNotFound(message),
            "INVALID_SESSION_ID" => Self::InvalidSessionId(message),
            "EMPTY_CART" => Self::EmptyCart,
            "INVALID_AMOUNT" => Self::InvalidAmount(message),
            "PAYMENTS_DISABLED" => Self::Config(message),
            _ => Self::Provider(message),
        }
    }
}

impl From<CartError> for PaymentError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::AmountOutOfRange(amount) => Self::InvalidAmount(amount.to_string()),
            CartError::Serialization(e) => Self::Serialization(e),
            CartError::Storage(message) => Self::Config(message),
        }
    }
}

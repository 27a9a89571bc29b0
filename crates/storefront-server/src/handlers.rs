//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use storefront_catalog::{CatalogError, Product};
use storefront_core::{CartItem, ItemOptions, from_minor_units};
use storefront_payments::{CheckoutRequest, PaymentError, SessionDetails, SessionToken};

use crate::state::{AppState, Checkout};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub catalog: String,
    pub catalog_healthy: bool,
    pub payments_provider: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub options: ItemOptions,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn catalog_error(err: &CatalogError) -> ApiError {
    let (status, code) = match err {
        CatalogError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "PRODUCT_NOT_FOUND"),
        CatalogError::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CATALOG_ERROR"),
        _ => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_CONFIGURATION"),
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: code.into(),
        }),
    )
}

fn payment_error(err: &PaymentError) -> ApiError {
    let status = match err {
        PaymentError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        PaymentError::InvalidSessionId(_)
        | PaymentError::EmptyCart
        | PaymentError::InvalidAmount(_)
        | PaymentError::Serialization(_) => StatusCode::BAD_REQUEST,
        PaymentError::Provider(_) | PaymentError::Network(_) => StatusCode::BAD_GATEWAY,
        PaymentError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: err.code().into(),
        }),
    )
}

fn require_checkout(state: &AppState) -> Result<&Checkout, ApiError> {
    state.checkout.as_deref().ok_or_else(|| {
        payment_error(&PaymentError::Config("Payments not configured".into()))
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        catalog: state.catalog.name().to_string(),
        catalog_healthy: state.catalog.health_check().await,
        payments_provider: state
            .checkout
            .as_ref()
            .map(|c| c.provider().name().to_string()),
    })
}

/// List every product
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    state
        .catalog
        .products()
        .await
        .map(Json)
        .map_err(|e| catalog_error(&e))
}

/// Single product by id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .catalog
        .product(&id)
        .await
        .map(Json)
        .map_err(|e| catalog_error(&e))
}

/// Price a configuration, returning the cart entry to add
pub async fn quote_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<CartItem>, ApiError> {
    let item = state
        .catalog
        .quote(&id, payload.options, payload.quantity)
        .await
        .map_err(|e| {
            tracing::debug!(product = %id, error = %e, "Quote rejected");
            catalog_error(&e)
        })?;

    Ok(Json(item))
}

/// Create a checkout session
///
/// Shipping is re-derived from the server's own policy; the client's value is
/// only a preview.
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(mut payload): Json<CheckoutRequest>,
) -> Result<Json<SessionToken>, ApiError> {
    let checkout = require_checkout(&state)?;

    payload.shipping = checkout
        .shipping_line(from_minor_units(payload.subtotal()))
        .map_err(|e| payment_error(&e))?;

    let token = checkout.submit(&payload).await.map_err(|e| {
        tracing::error!("Checkout error: {}", e);
        payment_error(&e)
    })?;

    Ok(Json(token))
}

/// Read a session back for the confirmation page
pub async fn get_checkout_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionDetails>, ApiError> {
    let checkout = require_checkout(&state)?;

    checkout
        .read_back(&session_id)
        .await
        .map(Json)
        .map_err(|e| payment_error(&e))
}

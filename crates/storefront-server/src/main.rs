//! Textile Storefront HTTP Server
//!
//! Axum-based server for the catalog, configuration quotes and checkout
//! sessions. The built frontend is served from `static/`.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    http::Request,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_catalog::{CatalogProvider, StaticCatalog};
use storefront_payments::{
    CheckoutHandoff, PaymentSessionProvider, ShippingPolicy, StripeSessionProvider,
};

use crate::handlers::{
    create_checkout, get_checkout_session, get_product, health_check, list_products,
    quote_product,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Catalog
    let catalog: Arc<dyn CatalogProvider> = match std::env::var("CATALOG_PATH") {
        Ok(path) => {
            let raw = tokio::fs::read_to_string(&path).await?;
            Arc::new(StaticCatalog::from_json(&raw)?)
        }
        Err(_) => Arc::new(StaticCatalog::new()),
    };
    tracing::info!("✓ Catalog: {} ({} products)", catalog.name(), catalog.products().await?.len());

    // Payments
    let shipping = ShippingPolicy::from_env()?;
    let checkout = match StripeSessionProvider::from_env() {
        Ok(stripe) => {
            tracing::info!("✓ Stripe configured ({:?} checkout)", stripe.mode());
            let provider: Box<dyn PaymentSessionProvider> = Box::new(stripe);
            Some(Arc::new(CheckoutHandoff::new(provider, shipping)))
        }
        Err(e) => {
            tracing::warn!("⚠ Stripe not configured - payments disabled ({})", e);
            tracing::warn!("  Set STRIPE_SECRET_KEY in .env");
            None
        }
    };

    let state = AppState { catalog, checkout };

    let app = router(state)
        // Static files (WASM frontend)
        .fallback_service(ServeDir::new("static"));

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🧵 storefront server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                    - Health check");
    tracing::info!("  GET  /api/products              - List products");
    tracing::info!("  GET  /api/products/{{id}}         - Product details");
    tracing::info!("  POST /api/products/{{id}}/quote   - Price a configuration");
    tracing::info!("  POST /api/checkout              - Create checkout session");
    tracing::info!("  GET  /api/checkout/{{session_id}} - Read back a session");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

/// API routes with CORS and request tracing
fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        // Catalog
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product))
        .route("/api/products/{id}/quote", post(quote_product))
        // Checkout
        .route("/api/checkout", post(create_checkout))
        .route("/api/checkout/{session_id}", get(get_checkout_session))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "request",
                    id = %uuid::Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use storefront_payments::MemorySessionProvider;
    use tower::ServiceExt;

    fn state(with_payments: bool) -> AppState {
        let checkout = with_payments.then(|| {
            let provider: Box<dyn PaymentSessionProvider> = Box::new(MemorySessionProvider::new());
            Arc::new(CheckoutHandoff::new(provider, ShippingPolicy::default()))
        });
        AppState {
            catalog: Arc::new(StaticCatalog::new()),
            checkout,
        }
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = call(router(state(true)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["catalog"], "StaticCatalog");
        assert_eq!(body["payments_provider"], "MemorySessionProvider");
    }

    #[tokio::test]
    async fn test_quote_and_missing_product() {
        let request = post_json(
            "/api/products/satin-duvet-set/quote",
            &json!({ "options": { "purchaseType": "main-only", "embroidery": true }, "quantity": 1 }),
        );
        let (status, body) = call(router(state(false)), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["price"], "439.00");

        let request = Request::get("/api/products/nope").body(Body::empty()).unwrap();
        let (status, body) = call(router(state(false)), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "PRODUCT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_quote_with_huge_dimensions_is_rejected() {
        let request = post_json(
            "/api/products/velvet-curtain/quote",
            &json!({ "options": { "width": "79228162514264337593543950335", "height": "100" } }),
        );
        let (status, body) = call(router(state(false)), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "INVALID_CONFIGURATION");
    }

    #[tokio::test]
    async fn test_checkout_flow() {
        let state = state(true);
        let request = post_json(
            "/api/checkout",
            &json!({
                "line_items": [{ "name": "Pillowcase", "unit_amount": 5000, "quantity": 2 }],
                "shipping": { "amount": 0, "currency": "pln", "free_threshold": 0 }
            }),
        );
        let (status, body) = call(router(state.clone()), request).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["session_token"].as_str().unwrap().to_string();

        let request = Request::get(format!("/api/checkout/{token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(router(state), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["payment_status"], "unpaid");
        // the client's free shipping was replaced by the server policy
        assert_eq!(body["amount_total"], 10000 + 1999);
    }

    #[tokio::test]
    async fn test_checkout_errors() {
        let request = post_json(
            "/api/checkout",
            &json!({ "line_items": [], "shipping": { "amount": 0, "currency": "pln", "free_threshold": 0 } }),
        );
        let (status, body) = call(router(state(true)), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "EMPTY_CART");

        let request = post_json(
            "/api/checkout",
            &json!({
                "line_items": [{ "name": "Pillowcase", "unit_amount": -31465, "quantity": 0 }],
                "shipping": { "amount": 0, "currency": "pln", "free_threshold": 0 }
            }),
        );
        let (status, body) = call(router(state(true)), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_AMOUNT");

        let request = Request::get("/api/checkout/cs_test_9").body(Body::empty()).unwrap();
        let (status, body) = call(router(state(true)), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "SESSION_NOT_FOUND");

        let request = Request::get("/api/checkout/cs_test_1").body(Body::empty()).unwrap();
        let (status, body) = call(router(state(false)), request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "PAYMENTS_DISABLED");
    }
}

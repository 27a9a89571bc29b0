//! API Client

use async_trait::async_trait;
use serde::Serialize;

use storefront_catalog::Product;
use storefront_core::{CartItem, ItemOptions};
use storefront_payments::{
    CheckoutRequest, ErrorBody, PaymentError, PaymentSessionProvider, Result, SessionDetails,
    SessionToken,
};

/// Origin the app was served from
pub fn origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into())
}

/// Send the browser to another page
pub fn redirect(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(url);
    }
}

async fn error_message(response: reqwest::Response) -> String {
    response
        .json::<ErrorBody>()
        .await
        .map_or_else(|_| "Request failed".into(), |body| body.error)
}

/// Fetch the product list
pub async fn fetch_products() -> std::result::Result<Vec<Product>, String> {
    let response = reqwest::Client::new()
        .get(format!("{}/api/products", origin()))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        Err(error_message(response).await)
    }
}

#[derive(Serialize)]
struct QuoteBody<'a> {
    options: &'a ItemOptions,
    quantity: u32,
}

/// Price a configuration on the server
pub async fn quote(
    product_id: &str,
    options: &ItemOptions,
    quantity: u32,
) -> std::result::Result<CartItem, String> {
    let response = reqwest::Client::new()
        .post(format!("{}/api/products/{product_id}/quote", origin()))
        .json(&QuoteBody { options, quantity })
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        Err(error_message(response).await)
    }
}

/// Payment sessions through our own server, which holds the provider keys
#[derive(Clone, Debug)]
pub struct HttpSessionProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSessionProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Talk to the server this page came from
    pub fn from_location() -> Self {
        Self::new(origin())
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| PaymentError::Provider(format!("Unexpected response: {e}")))
        } else {
            let status = response.status();
            let body = response.json::<ErrorBody>().await.unwrap_or_else(|_| ErrorBody {
                error: format!("Request failed with status {status}"),
                code: None,
            });
            Err(body.into())
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl PaymentSessionProvider for HttpSessionProvider {
    async fn create_session(&self, request: &CheckoutRequest) -> Result<SessionToken> {
        let response = self
            .client
            .post(format!("{}/api/checkout", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        Self::decode(response).await
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionDetails> {
        let response = self
            .client
            .get(format!("{}/api/checkout/{session_id}", self.base_url))
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        Self::decode(response).await
    }

    fn name(&self) -> &str {
        "HttpSessionProvider"
    }
}

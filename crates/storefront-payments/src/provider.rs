//! Payment Session Providers
//!
//! The seam between checkout and whichever service actually takes the money.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{PaymentError, Result};
use crate::request::{
    CheckoutRequest, CustomerDetails, PaymentStatus, PostalAddress, SessionDetails,
    SessionLineItem, SessionToken, ShippingDetails,
};

/// External payment-session service
///
/// Implementations make exactly one attempt per call. Timeouts belong to the
/// underlying HTTP client.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait PaymentSessionProvider: Send + Sync {
    /// Open a session for a priced request
    async fn create_session(&self, request: &CheckoutRequest) -> Result<SessionToken>;

    /// Fetch the state of an existing session
    async fn retrieve_session(&self, session_id: &str) -> Result<SessionDetails>;

    /// Get provider name
    fn name(&self) -> &str;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<P: PaymentSessionProvider + ?Sized> PaymentSessionProvider for Box<P> {
    async fn create_session(&self, request: &CheckoutRequest) -> Result<SessionToken> {
        (**self).create_session(request).await
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionDetails> {
        (**self).retrieve_session(session_id).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    sessions: HashMap<String, SessionDetails>,
    requests: Vec<CheckoutRequest>,
    next_failure: Option<String>,
}

/// In-process provider for development and tests
///
/// Issues `cs_test_N` tokens, records every request, and can be scripted to
/// fail the next call.
#[derive(Debug, Default)]
pub struct MemorySessionProvider {
    state: Mutex<MemoryState>,
}

impl MemorySessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call fail with this provider message
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state().next_failure = Some(message.into());
    }

    /// Settle a session as if the shopper paid
    pub fn mark_paid(&self, session_id: &str) -> bool {
        match self.state().sessions.get_mut(session_id) {
            Some(session) => {
                session.payment_status = PaymentStatus::Paid;
                true
            }
            None => false,
        }
    }

    /// Number of create calls that reached the provider
    pub fn create_calls(&self) -> usize {
        self.state().requests.len()
    }

    /// Most recent request received
    pub fn last_request(&self) -> Option<CheckoutRequest> {
        self.state().requests.last().cloned()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn session_from_request(request: &CheckoutRequest) -> SessionDetails {
    let line_items = request
        .line_items
        .iter()
        .map(|line| SessionLineItem {
            description: Some(
                line.description
                    .as_ref()
                    .map_or_else(|| line.name.clone(), |d| format!("{} ({d})", line.name)),
            ),
            quantity: u64::from(line.quantity),
            amount_total: line.unit_amount.saturating_mul(i64::from(line.quantity)),
        })
        .collect();

    let customer_details = request.customer.as_ref().map(|c| CustomerDetails {
        name: Some(c.name.clone()),
        email: Some(c.email.clone()),
        phone: Some(c.phone.clone()),
    });

    let shipping_details = request.customer.as_ref().and_then(|c| {
        c.address.as_ref().map(|a| ShippingDetails {
            name: Some(c.name.clone()),
            address: Some(PostalAddress {
                line1: Some(format!("{} {}", a.street, a.house_number)),
                line2: None,
                postal_code: Some(a.postal_code.clone()),
                city: Some(a.city.clone()),
                country: None,
            }),
        })
    });

    SessionDetails {
        line_items,
        customer_details,
        shipping_details,
        payment_status: PaymentStatus::Unpaid,
        amount_total: Some(request.total()),
        created_at: Some(Utc::now()),
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl PaymentSessionProvider for MemorySessionProvider {
    async fn create_session(&self, request: &CheckoutRequest) -> Result<SessionToken> {
        let mut state = self.state();
        state.requests.push(request.clone());

        if let Some(message) = state.next_failure.take() {
            return Err(PaymentError::Provider(message));
        }

        let session_token = format!("cs_test_{}", state.sessions.len() + 1);
        state
            .sessions
            .insert(session_token.clone(), session_from_request(request));

        Ok(SessionToken::hosted(session_token))
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionDetails> {
        if session_id.trim().is_empty() {
            return Err(PaymentError::InvalidSessionId(session_id.to_string()));
        }

        let mut state = self.state();
        if let Some(message) = state.next_failure.take() {
            return Err(PaymentError::Provider(message));
        }

        state
            .sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| PaymentError::SessionNotFound(session_id.to_string()))
    }

    fn name(&self) -> &str {
        "MemorySessionProvider"
    }
}

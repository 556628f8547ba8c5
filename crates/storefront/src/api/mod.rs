//! REST API clients for the storefront backend.
//!
//! # Architecture
//!
//! - [`ApiClient`] wraps `reqwest`: base-URL joining, bearer auth, error
//!   normalization, fixed timeout
//! - One service per REST resource: [`CatalogService`], [`AddressService`],
//!   [`CheckoutService`], [`PaymentService`], [`OrderService`],
//!   [`CustomerService`]
//! - [`decode`] turns the backend's loosely-shaped JSON into the typed
//!   domain model in [`types`]
//! - [`demo`] holds the canned data served by demo-mode fallbacks
//!
//! Read-path services degrade to local data when the backend fails and the
//! configured [`FallbackMode`](crate::config::FallbackMode) is `Demo`;
//! write paths (payment) reject with a clear message instead.

mod addresses;
mod catalog;
mod checkout;
mod client;
mod customer;
mod orders;
mod payment;

pub mod decode;
pub mod demo;
pub mod types;

pub use addresses::AddressService;
pub use catalog::CatalogService;
pub use checkout::CheckoutService;
pub use client::{ApiClient, GENERIC_ERROR};
pub use customer::{CustomerService, LoginSession};
pub use decode::DecodeError;
pub use orders::OrderService;
pub use payment::PaymentService;

use std::sync::Arc;

use thiserror::Error;

use crate::config::StorefrontConfig;
use crate::session::TokenStore;

/// Errors from talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend rejected the request; message prefers server-supplied text.
    #[error("{message}")]
    Backend {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Transport-level failure (connect, timeout, body read).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Response arrived but held no recognized shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The (simulated) gateway declined the payment. Retryable.
    #[error("{0}")]
    PaymentDeclined(String),
}

/// All domain services, constructed over one shared [`ApiClient`].
pub struct Services {
    pub catalog: CatalogService,
    pub addresses: AddressService,
    pub checkout: CheckoutService,
    pub payment: PaymentService,
    pub orders: OrderService,
    pub customer: CustomerService,
}

impl Services {
    /// Build the service set from configuration and a session token store.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let client = ApiClient::new(&config.api, tokens)?;
        let api = &config.api;

        Ok(Self {
            catalog: CatalogService::new(
                client.clone(),
                api.products_path.clone(),
                config.fallback,
            ),
            addresses: AddressService::new(
                client.clone(),
                api.addresses_path.clone(),
                api.profile_path.clone(),
            ),
            checkout: CheckoutService::new(
                client.clone(),
                api.checkout_path.clone(),
                config.fallback,
            ),
            payment: PaymentService::new(
                client.clone(),
                api.payments_path.clone(),
                config.fallback,
            ),
            orders: OrderService::new(client.clone(), api.orders_path.clone(), config.fallback),
            customer: CustomerService::new(client, api.login_path.clone(), api.profile_path.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_uses_message() {
        let err = ApiError::Backend {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: "Cart is empty".to_owned(),
        };
        assert_eq!(err.to_string(), "Cart is empty");
    }

    #[test]
    fn test_payment_declined_display() {
        let err = ApiError::PaymentDeclined("Payment authorization failed. Please retry.".to_owned());
        assert_eq!(
            err.to_string(),
            "Payment authorization failed. Please retry."
        );
    }
}

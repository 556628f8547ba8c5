//! Tidemark Storefront - Headless storefront session engine.
//!
//! Drives a storefront session against a REST commerce backend: catalog
//! browsing, cart management, checkout, payment, and order confirmation.
//! The backend may be partially built or unreachable; in demo mode every
//! read path degrades to deterministic local data so a session is always
//! drivable end to end.
//!
//! # Architecture
//!
//! - [`config`] - Environment-driven configuration (base URL, endpoint
//!   paths, timeout, fallback mode)
//! - [`api`] - HTTP client wrapper plus one service per REST resource, with
//!   typed decoding of the backend's loosely-shaped responses
//! - [`shop`] - The shop state store: a reducer over session state with
//!   derived pricing/filtering and the checkout → payment → order
//!   orchestration
//! - [`session`] - Bearer-token session store (file-backed or in-memory)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tidemark_core::PaymentMethod;
//! use tidemark_storefront::api::Services;
//! use tidemark_storefront::config::StorefrontConfig;
//! use tidemark_storefront::session::FileTokenStore;
//! use tidemark_storefront::shop::ShopStore;
//!
//! let config = StorefrontConfig::from_env()?;
//! let tokens = Arc::new(FileTokenStore::new(config.session_file.clone()));
//! let services = Services::new(&config, tokens)?;
//! let store = ShopStore::new(services);
//!
//! store.bootstrap().await;
//! let product = store.filtered_products().remove(0);
//! let variant = product.variants[0].clone();
//! store.add_to_cart(&product, Some(&variant), 1);
//! store.prepare_checkout().await?;
//! let order_id = store.start_payment(PaymentMethod::Card).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod session;
pub mod shop;

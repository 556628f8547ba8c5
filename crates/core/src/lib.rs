//! Tidemark Core - Shared types library.
//!
//! This crate provides common types used across all Tidemark components:
//! - `storefront` - Headless storefront session engine
//! - `cli` - Command-line demo driver
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, cart keys, money
//!   formatting, and small domain enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

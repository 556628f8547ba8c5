//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Backend identifiers
//! are opaque strings (`"p-101"`, `"addr-2"`, `"ord_17..."`), so the
//! wrappers hold `String` rather than integers.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use tidemark_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(ShelfId);
///
/// let warehouse_id = WarehouseId::new("wh-1");
/// let shelf_id = ShelfId::new("wh-1");
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = shelf_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the ID is the empty string.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(VariantId);
define_id!(AddressId);
define_id!(OrderId);
define_id!(PaymentId);
define_id!(CheckoutId);
define_id!(CustomerId);
define_id!(ToastId);

/// Deterministic key for a cart line.
///
/// Combines the product and variant IDs so the cart holds at most one line
/// per purchasable variant. Adding the same variant twice merges quantities
/// instead of duplicating the line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartKey(String);

impl CartKey {
    /// Derive the key for a (product, variant) pair.
    #[must_use]
    pub fn for_line(product_id: &ProductId, variant_id: &VariantId) -> Self {
        Self(format!("{product_id}::{variant_id}"))
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CartKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = ProductId::new("p-101");
        assert_eq!(id.as_str(), "p-101");
        assert_eq!(id.to_string(), "p-101");
        assert_eq!(ProductId::from("p-101"), id);
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = VariantId::new("v-101-3");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"v-101-3\"");

        let back: VariantId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn test_cart_key_is_deterministic() {
        let a = CartKey::for_line(&ProductId::new("p-101"), &VariantId::new("v-101-1"));
        let b = CartKey::for_line(&ProductId::new("p-101"), &VariantId::new("v-101-1"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "p-101::v-101-1");
    }

    #[test]
    fn test_cart_key_distinguishes_variants() {
        let product = ProductId::new("p-101");
        let a = CartKey::for_line(&product, &VariantId::new("v-101-1"));
        let b = CartKey::for_line(&product, &VariantId::new("v-101-2"));
        assert_ne!(a, b);
    }
}

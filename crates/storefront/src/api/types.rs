//! Domain types for the storefront REST API.
//!
//! These types provide a clean, ergonomic API separate from the raw JSON
//! payloads; the [`decode`](super::decode) module turns loose backend
//! shapes into them. Wire-facing structs serialize in the backend's
//! camelCase vocabulary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tidemark_core::{
    AddressId, CartKey, CheckoutId, CustomerId, OrderId, PaymentId, PaymentMethod, ProductId,
    VariantId,
};

// =============================================================================
// Catalog Types
// =============================================================================

/// A purchasable option of a product (size/color) with its own stock count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Variant ID.
    pub id: VariantId,
    /// Display label (e.g., "Black / 41").
    pub label: String,
    /// Units available.
    pub stock: u32,
}

impl Variant {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A product in the catalog.
///
/// Invariant: `variants` is never empty; a synthetic default variant is
/// created during decoding when the backend omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Plain text description.
    pub description: String,
    /// Category name.
    pub category: String,
    /// Primary image URL.
    pub image: String,
    /// Unit price in USD.
    pub price: Decimal,
    /// Purchasable variants.
    pub variants: Vec<Variant>,
}

impl Product {
    /// Look up a variant by ID.
    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// Whether any variant has stock.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.variants.iter().any(Variant::in_stock)
    }
}

// =============================================================================
// Address Types
// =============================================================================

/// A shipping address. Immutable once fetched; selection is tracked by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Address ID.
    pub id: AddressId,
    /// Short label (e.g., "Home", "Office").
    pub label: String,
    /// Recipient name.
    pub recipient: String,
    /// Street line.
    pub line1: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Postal code.
    pub zip: String,
    /// Country code.
    pub country: String,
}

impl Address {
    /// One-line display form: `line1, city, state zip`.
    #[must_use]
    pub fn formatted(&self) -> String {
        format!("{}, {}, {} {}", self.line1, self.city, self.state, self.zip)
    }
}

// =============================================================================
// Customer Types
// =============================================================================

/// Customer profile as returned by the login/profile endpoints.
///
/// The backend's customer object is loosely shaped; everything beyond the
/// fields the engine reads is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Free-form address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Credentials submitted to the customer login endpoint.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    /// Login email.
    pub email: String,
    /// Password (serialized to the wire, never logged).
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Fields accepted by the profile update endpoint.
///
/// Sent as JSON via `PUT`, or as a multipart `POST` with a `_method=PUT`
/// override marker when a profile image is attached.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New address line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Attached profile image; forces the multipart path.
    #[serde(skip)]
    pub profile_image: Option<ProfileImage>,
}

/// An image file attached to a profile update.
#[derive(Debug, Clone)]
pub struct ProfileImage {
    /// Original file name.
    pub file_name: String,
    /// MIME type (e.g., `image/jpeg`).
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// A line in the cart.
///
/// Price and stock are snapshots taken when the line was created; later
/// catalog changes do not affect an existing line. Quantity is clamped to
/// `[1, stock]` on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Deterministic cart key (`product::variant`).
    pub key: CartKey,
    /// Product ID.
    pub product_id: ProductId,
    /// Variant ID.
    pub variant_id: VariantId,
    /// Product name at add-time.
    pub name: String,
    /// Variant label at add-time.
    pub variant_label: String,
    /// Unit price at add-time.
    pub price: Decimal,
    /// Variant stock at add-time.
    pub stock: u32,
    /// Product image URL.
    pub image: String,
    /// Units in the cart.
    pub quantity: u32,
}

impl CartItem {
    /// Line total (price × quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

// =============================================================================
// Checkout Types
// =============================================================================

/// Frozen copy of cart, totals, and shipping address taken when checkout is
/// confirmed. Decouples the payment step from later cart mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSnapshot {
    /// Cart lines at confirmation time.
    pub items: Vec<CartItem>,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Tax on the subtotal.
    pub tax: Decimal,
    /// Flat shipping fee.
    pub shipping: Decimal,
    /// Grand total.
    pub total: Decimal,
    /// Selected shipping address.
    pub address: Address,
    /// One-line display form of the address.
    pub address_label: String,
}

/// Backend acknowledgement of a submitted checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfirmation {
    /// Checkout ID (server-issued, or locally synthesized in demo mode).
    pub checkout_id: CheckoutId,
}

// =============================================================================
// Payment Types
// =============================================================================

/// Request body for payment initiation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Selected payment method.
    pub method: PaymentMethod,
    /// Amount to authorize (the snapshot total).
    pub amount: Decimal,
    /// The frozen checkout the payment is for.
    pub checkout: CheckoutSnapshot,
}

/// Successful payment authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// Payment ID.
    pub payment_id: PaymentId,
    /// Gateway status string (e.g., `"success"`).
    pub status: String,
    /// Provider reference for reconciliation.
    pub provider_ref: String,
}

// =============================================================================
// Order Types
// =============================================================================

/// Request body for order creation: the payment outcome merged into the
/// checkout snapshot fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Payment ID from the receipt.
    pub payment_id: PaymentId,
    /// Method the payment was made with.
    pub payment_method: PaymentMethod,
    /// Provider reference from the receipt.
    pub provider_ref: String,
    /// Checkout snapshot fields, flattened into the body.
    #[serde(flatten)]
    pub checkout: CheckoutSnapshot,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Server-defined status string (e.g., "Processing", "In Transit").
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Ordered tracking steps.
    #[serde(default)]
    pub tracking: Vec<String>,
    /// Line items (may be empty on bare lookups).
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Order total.
    #[serde(default)]
    pub total: Decimal,
}

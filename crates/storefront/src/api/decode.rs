//! Typed decoding of the backend's loosely-shaped JSON.
//!
//! The backend (and the mock gateways standing in for it) is not consistent
//! about field names or nesting: payloads may or may not sit under a `data`
//! envelope, tokens appear under three different keys, addresses use several
//! regional vocabularies. Each decoder here enumerates the accepted source
//! fields exactly once and fails with a clear [`DecodeError`] when none is
//! present, instead of silently chaining fallbacks at every call site.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
use tidemark_core::{AddressId, CheckoutId, CustomerId, OrderId, PaymentId, ProductId, VariantId};

use super::types::{
    Address, CartItem, CheckoutConfirmation, Customer, Order, PaymentReceipt, Product, Variant,
};

/// Field aliases accepted for the auth token.
const TOKEN_FIELDS: &[&str] = &["token", "access_token", "accessToken"];
/// Field aliases accepted for the customer object.
const CUSTOMER_FIELDS: &[&str] = &["customer", "user", "profile"];

/// A response arrived but could not be decoded into the expected shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// None of the accepted field names were present.
    #[error("no recognized {field} field in response (tried {tried:?})")]
    MissingField {
        field: &'static str,
        tried: &'static [&'static str],
    },

    /// A field was present but held an unusable value.
    #[error("invalid {field} field: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// The response body was not JSON of the expected shape.
    #[error("{context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// Envelope Helpers
// =============================================================================

/// Unwrap the optional `data` envelope: `{"data": X}` → `X`, else the value
/// itself.
#[must_use]
pub fn unwrap_envelope(value: &Value) -> &Value {
    match value.get("data") {
        Some(inner) if !inner.is_null() => inner,
        _ => value,
    }
}

/// Server-supplied error message from a failure body, if any.
///
/// Accepted locations: `message` at the root or under the `data` envelope.
#[must_use]
pub fn error_message(body: &Value) -> Option<String> {
    let message = body
        .get("message")
        .or_else(|| body.get("data").and_then(|data| data.get("message")))?;
    let message = message.as_str()?.trim();
    if message.is_empty() {
        return None;
    }
    Some(message.to_owned())
}

/// Read a string field under any of `fields`, at the root or under `data`.
fn string_alias(value: &Value, fields: &[&str]) -> Option<String> {
    let candidates = [value, unwrap_envelope(value)];
    for candidate in candidates {
        for field in fields {
            if let Some(found) = candidate.get(field).and_then(Value::as_str) {
                return Some(found.to_owned());
            }
        }
    }
    None
}

/// Coerce a JSON value holding a number or numeric string into a [`Decimal`].
fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(_) => serde_json::from_value(value.clone()).ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerce a JSON value holding a string or number into an owned ID string.
fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-null value among `fields` on `value`.
fn field_alias<'a>(value: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .map(|field| value.get(field))
        .find_map(|found| found.filter(|v| !v.is_null()))
}

// =============================================================================
// Auth Decoding
// =============================================================================

/// Extract the bearer token from a login response.
///
/// # Errors
///
/// Returns [`DecodeError::MissingField`] when no accepted token field is
/// present; a login that "succeeded" without a usable token is an error.
pub fn token(body: &Value) -> Result<String, DecodeError> {
    string_alias(body, TOKEN_FIELDS)
        .filter(|token| !token.is_empty())
        .ok_or(DecodeError::MissingField {
            field: "token",
            tried: TOKEN_FIELDS,
        })
}

/// Extract the customer object from a login/profile response, if present.
#[must_use]
pub fn customer(body: &Value) -> Option<Customer> {
    let candidates = [body, unwrap_envelope(body)];
    for candidate in candidates {
        if let Some(found) = field_alias(candidate, CUSTOMER_FIELDS)
            && found.is_object()
        {
            return parse_customer(found);
        }
    }
    None
}

/// Extract a customer, treating the (unwrapped) body itself as the customer
/// object when no named field matches.
///
/// # Errors
///
/// Returns [`DecodeError::MissingField`] when the response holds no object
/// at all.
pub fn customer_or_body(body: &Value) -> Result<Customer, DecodeError> {
    if let Some(found) = customer(body) {
        return Ok(found);
    }

    let inner = unwrap_envelope(body);
    if inner.is_object() {
        return parse_customer(inner).ok_or(DecodeError::MissingField {
            field: "customer",
            tried: CUSTOMER_FIELDS,
        });
    }

    Err(DecodeError::MissingField {
        field: "customer",
        tried: CUSTOMER_FIELDS,
    })
}

fn parse_customer(value: &Value) -> Option<Customer> {
    let id = field_alias(value, &["id", "customer_id"])
        .and_then(coerce_id)
        .map(CustomerId::new);
    Some(Customer {
        id,
        name: string_alias(value, &["name", "full_name"]),
        email: string_alias(value, &["email"]),
        address: string_alias(value, &["address"]),
    })
}

// =============================================================================
// Catalog Decoding
// =============================================================================

/// Decode the product listing body into normalized products.
///
/// Products that cannot be normalized are dropped (the caller logs them);
/// a non-array body decodes to an empty list.
#[must_use]
pub fn product_list(body: &Value) -> Vec<Result<Product, DecodeError>> {
    unwrap_envelope(body)
        .as_array()
        .map(|raw| raw.iter().map(product).collect())
        .unwrap_or_default()
}

/// Normalize one raw product.
///
/// - `id` and `name` are required (`id` | `product_id`, `name` | `title`)
/// - `price` is coerced from a number or numeric string and must be ≥ 0
/// - `category` accepts a string or a nested object's `name`
/// - `image` accepts `image` | `image_url` | the first entry of `images`
///   (strings or `{url}` objects)
/// - missing or empty `variants` get one synthetic default variant whose
///   stock comes from a product-level `stock` | `quantity` field (0 when
///   absent)
///
/// # Errors
///
/// Returns [`DecodeError`] when a required field is absent or unusable.
pub fn product(raw: &Value) -> Result<Product, DecodeError> {
    let id = field_alias(raw, &["id", "product_id"])
        .and_then(coerce_id)
        .ok_or(DecodeError::MissingField {
            field: "product id",
            tried: &["id", "product_id"],
        })?;
    let id = ProductId::new(id);

    let name = string_alias(raw, &["name", "title"]).ok_or(DecodeError::MissingField {
        field: "product name",
        tried: &["name", "title"],
    })?;

    let price_value = field_alias(raw, &["price"]).ok_or(DecodeError::MissingField {
        field: "price",
        tried: &["price"],
    })?;
    let price = coerce_decimal(price_value).ok_or_else(|| DecodeError::InvalidField {
        field: "price",
        reason: format!("expected a number or numeric string, got {price_value}"),
    })?;
    if price.is_sign_negative() {
        return Err(DecodeError::InvalidField {
            field: "price",
            reason: format!("negative price {price}"),
        });
    }

    let category = match raw.get("category") {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Object(object)) => object
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("General")
            .to_owned(),
        _ => "General".to_owned(),
    };

    let image = product_image(raw).unwrap_or_default();

    let variants = raw
        .get("variants")
        .and_then(Value::as_array)
        .map(|raw_variants| {
            raw_variants
                .iter()
                .filter_map(|v| variant(v))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let variants = if variants.is_empty() {
        vec![default_variant(&id, raw)]
    } else {
        variants
    };

    Ok(Product {
        id,
        name,
        description: string_alias(raw, &["description"]).unwrap_or_default(),
        category,
        image,
        price,
        variants,
    })
}

fn product_image(raw: &Value) -> Option<String> {
    if let Some(url) = string_alias(raw, &["image", "image_url"]) {
        return Some(url);
    }
    let first = raw.get("images")?.as_array()?.first()?;
    match first {
        Value::String(url) => Some(url.clone()),
        Value::Object(object) => object
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_owned),
        _ => None,
    }
}

fn variant(raw: &Value) -> Option<Variant> {
    let id = field_alias(raw, &["id", "variant_id"]).and_then(coerce_id)?;
    let label =
        string_alias(raw, &["label", "name", "title"]).unwrap_or_else(|| "Default".to_owned());
    Some(Variant {
        id: VariantId::new(id),
        label,
        stock: stock_count(raw),
    })
}

/// Synthetic variant for a product the backend lists without any.
fn default_variant(product_id: &ProductId, raw: &Value) -> Variant {
    Variant {
        id: VariantId::new(format!("{product_id}-default")),
        label: "Default".to_owned(),
        stock: stock_count(raw),
    }
}

fn stock_count(raw: &Value) -> u32 {
    field_alias(raw, &["stock", "quantity", "inventory"])
        .and_then(Value::as_u64)
        .and_then(|stock| u32::try_from(stock).ok())
        .unwrap_or(0)
}

// =============================================================================
// Address Decoding
// =============================================================================

/// Normalize one raw address; `None` when it holds no usable location
/// fields (no line, city, state, or zip).
#[must_use]
pub fn address(raw: &Value, index: usize) -> Option<Address> {
    if !raw.is_object() {
        return None;
    }

    let line1 = string_alias(
        raw,
        &["line1", "address_line_1", "address1", "street", "address"],
    )
    .unwrap_or_default();
    let city = string_alias(raw, &["city", "township", "district"]).unwrap_or_default();
    let state = string_alias(raw, &["state", "region", "province"]).unwrap_or_default();
    let zip = string_alias(raw, &["zip", "postal_code", "zip_code"]).unwrap_or_default();

    if line1.is_empty() && city.is_empty() && state.is_empty() && zip.is_empty() {
        return None;
    }

    let id = field_alias(raw, &["id", "address_id"])
        .and_then(coerce_id)
        .unwrap_or_else(|| format!("addr-{index}"));

    Some(Address {
        id: AddressId::new(id),
        label: string_alias(raw, &["label", "type", "name"]).unwrap_or_else(|| "Address".to_owned()),
        recipient: string_alias(raw, &["recipient", "full_name", "contact_name"])
            .unwrap_or_default(),
        line1,
        city,
        state,
        zip,
        country: string_alias(raw, &["country", "country_code"]).unwrap_or_else(|| "US".to_owned()),
    })
}

/// Decode an address listing body.
///
/// Accepted collection locations: `data.addresses` | `addresses` | `data` |
/// the body itself (when an array). Unusable entries are dropped.
#[must_use]
pub fn address_list(body: &Value) -> Vec<Address> {
    let collection = body
        .get("data")
        .and_then(|data| data.get("addresses"))
        .or_else(|| body.get("addresses"))
        .or_else(|| body.get("data"))
        .unwrap_or(body);

    collection
        .as_array()
        .map(|raw| {
            raw.iter()
                .enumerate()
                .filter_map(|(index, entry)| address(entry, index))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Checkout / Payment / Order Decoding
// =============================================================================

/// Decode a checkout acknowledgement.
///
/// # Errors
///
/// Returns [`DecodeError::MissingField`] when no checkout ID is present.
pub fn checkout_confirmation(body: &Value) -> Result<CheckoutConfirmation, DecodeError> {
    let inner = unwrap_envelope(body);
    let id = field_alias(inner, &["checkoutId", "checkout_id", "id"])
        .and_then(coerce_id)
        .ok_or(DecodeError::MissingField {
            field: "checkout id",
            tried: &["checkoutId", "checkout_id", "id"],
        })?;
    Ok(CheckoutConfirmation {
        checkout_id: CheckoutId::new(id),
    })
}

/// Decode a payment initiation response.
///
/// # Errors
///
/// Returns [`DecodeError::MissingField`] when no payment ID is present.
pub fn payment_receipt(body: &Value) -> Result<PaymentReceipt, DecodeError> {
    let inner = unwrap_envelope(body);
    let payment_id = field_alias(inner, &["paymentId", "payment_id", "id"])
        .and_then(coerce_id)
        .ok_or(DecodeError::MissingField {
            field: "payment id",
            tried: &["paymentId", "payment_id", "id"],
        })?;

    Ok(PaymentReceipt {
        payment_id: PaymentId::new(payment_id),
        status: string_alias(inner, &["status"]).unwrap_or_else(|| "success".to_owned()),
        provider_ref: string_alias(inner, &["providerRef", "provider_ref"]).unwrap_or_default(),
    })
}

/// Decode an order payload.
///
/// # Errors
///
/// Returns [`DecodeError::MissingField`] when no order ID is present.
pub fn order(body: &Value) -> Result<Order, DecodeError> {
    let inner = unwrap_envelope(body);
    let id = field_alias(inner, &["id", "order_id"])
        .and_then(coerce_id)
        .ok_or(DecodeError::MissingField {
            field: "order id",
            tried: &["id", "order_id"],
        })?;

    let created_at = string_alias(inner, &["createdAt", "created_at"])
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map_or_else(Utc::now, |parsed| parsed.with_timezone(&Utc));

    let tracking = inner
        .get("tracking")
        .and_then(Value::as_array)
        .map(|steps| {
            steps
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let items = inner
        .get("items")
        .cloned()
        .map(serde_json::from_value::<Vec<CartItem>>)
        .and_then(Result::ok)
        .unwrap_or_default();

    let total = field_alias(inner, &["total"])
        .and_then(coerce_decimal)
        .unwrap_or_default();

    Ok(Order {
        id: OrderId::new(id),
        status: string_alias(inner, &["status"]).unwrap_or_else(|| "Processing".to_owned()),
        created_at,
        tracking,
        items,
        total,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope() {
        let wrapped = json!({"data": {"id": 1}});
        assert_eq!(unwrap_envelope(&wrapped), &json!({"id": 1}));

        let bare = json!({"id": 1});
        assert_eq!(unwrap_envelope(&bare), &bare);
    }

    #[test]
    fn test_error_message_prefers_server_text() {
        assert_eq!(
            error_message(&json!({"message": "Out of stock"})),
            Some("Out of stock".to_owned())
        );
        assert_eq!(
            error_message(&json!({"data": {"message": "Nope"}})),
            Some("Nope".to_owned())
        );
        assert_eq!(error_message(&json!({"message": "  "})), None);
        assert_eq!(error_message(&json!({"error": "ignored"})), None);
    }

    #[test]
    fn test_token_aliases() {
        for key in ["token", "access_token", "accessToken"] {
            let body = json!({key: "tok"});
            assert_eq!(token(&body).unwrap(), "tok");
        }
        let nested = json!({"data": {"access_token": "tok2"}});
        assert_eq!(token(&nested).unwrap(), "tok2");
    }

    #[test]
    fn test_token_missing_is_explicit_error() {
        let err = token(&json!({"customer": {}})).unwrap_err();
        assert!(err.to_string().contains("token"));
        assert!(err.to_string().contains("access_token"));
    }

    #[test]
    fn test_customer_aliases() {
        let body = json!({"user": {"id": 7, "name": "Alex", "email": "a@b.c"}});
        let found = customer(&body).unwrap();
        assert_eq!(found.id.unwrap().as_str(), "7");
        assert_eq!(found.name.as_deref(), Some("Alex"));

        let nested = json!({"data": {"customer": {"name": "Sam"}}});
        assert_eq!(customer(&nested).unwrap().name.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_customer_or_body_falls_back_to_envelope() {
        let body = json!({"data": {"name": "Jo", "address": "1 Main St"}});
        let found = customer_or_body(&body).unwrap();
        assert_eq!(found.name.as_deref(), Some("Jo"));
        assert_eq!(found.address.as_deref(), Some("1 Main St"));

        assert!(customer_or_body(&json!("nope")).is_err());
    }

    #[test]
    fn test_product_normalization() {
        let raw = json!({
            "product_id": 42,
            "title": "Trail Sock",
            "category": {"name": "Apparel"},
            "price": "12.50",
            "images": [{"url": "https://img/1.jpg"}, {"url": "https://img/2.jpg"}],
            "variants": [
                {"variant_id": "v-1", "name": "S", "quantity": 3},
                {"id": "v-2", "label": "M", "stock": 0}
            ]
        });

        let product = product(&raw).unwrap();
        assert_eq!(product.id.as_str(), "42");
        assert_eq!(product.name, "Trail Sock");
        assert_eq!(product.category, "Apparel");
        assert_eq!(product.price, Decimal::new(1250, 2));
        assert_eq!(product.image, "https://img/1.jpg");
        assert_eq!(product.variants.len(), 2);
        assert_eq!(product.variants[0].stock, 3);
        assert_eq!(product.variants[1].label, "M");
    }

    #[test]
    fn test_product_synthesizes_default_variant() {
        let raw = json!({"id": "p-9", "name": "Poster", "price": 15, "stock": 4});
        let product = product(&raw).unwrap();
        assert_eq!(product.variants.len(), 1);
        assert_eq!(product.variants[0].id.as_str(), "p-9-default");
        assert_eq!(product.variants[0].label, "Default");
        assert_eq!(product.variants[0].stock, 4);
    }

    #[test]
    fn test_product_requires_id_name_price() {
        assert!(product(&json!({"name": "x", "price": 1})).is_err());
        assert!(product(&json!({"id": "p", "price": 1})).is_err());
        assert!(product(&json!({"id": "p", "name": "x"})).is_err());
        assert!(product(&json!({"id": "p", "name": "x", "price": "soon"})).is_err());
        assert!(product(&json!({"id": "p", "name": "x", "price": -4})).is_err());
    }

    #[test]
    fn test_address_alias_vocabularies() {
        let raw = json!({
            "address_id": 9,
            "type": "Office",
            "contact_name": "Alex",
            "address_line_1": "845 Market St",
            "district": "San Francisco",
            "province": "CA",
            "postal_code": "94103",
            "country_code": "US"
        });

        let decoded = address(&raw, 0).unwrap();
        assert_eq!(decoded.id.as_str(), "9");
        assert_eq!(decoded.label, "Office");
        assert_eq!(decoded.line1, "845 Market St");
        assert_eq!(decoded.city, "San Francisco");
        assert_eq!(decoded.state, "CA");
        assert_eq!(decoded.zip, "94103");
    }

    #[test]
    fn test_address_without_location_is_dropped() {
        assert!(address(&json!({"id": "a", "label": "Home"}), 0).is_none());
        assert!(address(&json!(null), 0).is_none());
    }

    #[test]
    fn test_address_list_locations() {
        let entry = json!({"id": "a1", "line1": "1 Pine St"});
        for body in [
            json!({"data": {"addresses": [entry]}}),
            json!({"addresses": [entry]}),
            json!({"data": [entry]}),
            json!([entry]),
        ] {
            let list = address_list(&body);
            assert_eq!(list.len(), 1, "failed for {body}");
            assert_eq!(list[0].line1, "1 Pine St");
        }
        assert!(address_list(&json!({"data": "oops"})).is_empty());
    }

    #[test]
    fn test_payment_receipt_decoding() {
        let body = json!({"data": {"payment_id": "pay_1", "providerRef": "ref_9"}});
        let receipt = payment_receipt(&body).unwrap();
        assert_eq!(receipt.payment_id.as_str(), "pay_1");
        assert_eq!(receipt.status, "success");
        assert_eq!(receipt.provider_ref, "ref_9");

        assert!(payment_receipt(&json!({"status": "pending"})).is_err());
    }

    #[test]
    fn test_order_decoding_defaults() {
        let body = json!({"data": {"id": "ord_1", "total": "34.00"}});
        let order = order(&body).unwrap();
        assert_eq!(order.id.as_str(), "ord_1");
        assert_eq!(order.status, "Processing");
        assert!(order.tracking.is_empty());
        assert!(order.items.is_empty());
        assert_eq!(order.total, Decimal::new(3400, 2));
    }
}

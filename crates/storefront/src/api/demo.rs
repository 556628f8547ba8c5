//! Canned data served by demo-mode fallbacks.
//!
//! When the backend is unreachable in demo mode, the catalog service hands
//! out this fixed four-product catalog and the order service stamps
//! synthesized orders with the fixed tracking timeline. The data is already
//! in normalized domain shape.

use rust_decimal::Decimal;
use tidemark_core::{ProductId, VariantId};

use super::types::{Product, Variant};

/// Tracking steps stamped onto synthesized orders.
pub const TRACKING_TIMELINE: &[&str] = &[
    "Order confirmed",
    "Packed at warehouse",
    "Shipped to courier",
    "Out for delivery",
];

fn variant(id: &str, label: &str, stock: u32) -> Variant {
    Variant {
        id: VariantId::new(id),
        label: label.to_owned(),
        stock,
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    description: &str,
    category: &str,
    image: &str,
    price: i64,
    variants: Vec<Variant>,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        category: category.to_owned(),
        image: image.to_owned(),
        price: Decimal::new(price, 0),
        variants,
    }
}

/// The demo catalog.
#[must_use]
pub fn catalog() -> Vec<Product> {
    vec![
        product(
            "p-101",
            "Nimbus Runner",
            "Lightweight running sneaker with responsive foam support.",
            "Shoes",
            "https://images.unsplash.com/photo-1542291026-7eec264c27ff?auto=format&fit=crop&w=800&q=80",
            89,
            vec![
                variant("v-101-1", "Black / 40", 7),
                variant("v-101-2", "Black / 41", 0),
                variant("v-101-3", "Grey / 42", 4),
            ],
        ),
        product(
            "p-102",
            "Arc Hoodie",
            "Midweight hoodie crafted for everyday layering.",
            "Apparel",
            "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?auto=format&fit=crop&w=800&q=80",
            59,
            vec![
                variant("v-102-1", "S / Navy", 5),
                variant("v-102-2", "M / Navy", 8),
                variant("v-102-3", "L / Navy", 2),
            ],
        ),
        product(
            "p-103",
            "Terra Bottle",
            "Insulated stainless steel bottle with leakproof cap.",
            "Accessories",
            "https://images.unsplash.com/photo-1602143407151-7111542de6e8?auto=format&fit=crop&w=800&q=80",
            24,
            vec![
                variant("v-103-1", "500ml / Sand", 12),
                variant("v-103-2", "750ml / Olive", 3),
            ],
        ),
        product(
            "p-104",
            "Studio Headphones",
            "Wireless over-ear headphones with active noise cancellation.",
            "Electronics",
            "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?auto=format&fit=crop&w=800&q=80",
            149,
            vec![
                variant("v-104-1", "Matte Black", 10),
                variant("v-104-2", "Silver", 1),
            ],
        ),
    ]
}

/// Tracking timeline as owned strings.
#[must_use]
pub fn tracking_timeline() -> Vec<String> {
    TRACKING_TIMELINE.iter().map(|&s| s.to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let products = catalog();
        assert_eq!(products.len(), 4);
        for product in &products {
            assert!(!product.variants.is_empty());
            assert!(!product.price.is_sign_negative());
        }
        // One variant is deliberately out of stock for filter/clamp demos
        assert!(
            products
                .iter()
                .flat_map(|p| &p.variants)
                .any(|v| v.stock == 0)
        );
    }
}

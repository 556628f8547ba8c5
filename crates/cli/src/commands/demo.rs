//! Scripted checkout flow: add to cart, checkout, pay, confirm.

#![allow(clippy::print_stdout)] // terminal output is this command's job

use tidemark_core::{format_usd, PaymentMethod};
use tidemark_storefront::api::Services;
use tidemark_storefront::shop::ShopStore;
use tracing::info;

/// Drive one full session: pick the first two purchasable variants, freeze
/// a checkout, pay, and print the confirmed order.
///
/// # Errors
///
/// Returns an error when checkout is rejected or payment fails (payment
/// may be declined by the simulated gateway; rerun to retry).
pub async fn run(
    services: Services,
    method: PaymentMethod,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ShopStore::new(services);
    store.bootstrap().await;

    // Fill the cart with the first two products that have stock
    let products = store.products();
    let mut added = 0;
    for product in &products {
        let Some(variant) = product.variants.iter().find(|v| v.in_stock()) else {
            continue;
        };
        store.add_to_cart(product, Some(variant), 1);
        added += 1;
        if added == 2 {
            break;
        }
    }

    if added == 0 {
        return Err("no purchasable products in the catalog".into());
    }

    println!("Cart:");
    for item in store.cart() {
        println!(
            "  {} x{}  {} ({})  {}",
            item.name,
            item.quantity,
            item.variant_label,
            item.variant_id,
            format_usd(item.line_total())
        );
    }
    println!(
        "  subtotal {}  tax {}  total {}",
        format_usd(store.cart_subtotal()),
        format_usd(store.cart_tax()),
        format_usd(store.cart_total())
    );

    let snapshot = store.prepare_checkout().await?;
    info!(address = %snapshot.address_label, "checkout confirmed");

    let order_id = store.start_payment(method).await?;

    let order = store.latest_order().ok_or("order missing after payment")?;
    println!();
    println!("Order {order_id} placed ({})", order.status);
    println!("  total {}", format_usd(order.total));
    for step in &order.tracking {
        println!("  - {step}");
    }

    Ok(())
}

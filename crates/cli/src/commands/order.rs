//! Order lookup command.

#![allow(clippy::print_stdout)] // terminal output is this command's job

use tidemark_core::{format_usd, OrderId};
use tidemark_storefront::api::Services;

/// Fetch and print one order.
///
/// # Errors
///
/// Returns an error when the lookup fails (strict mode with an unreachable
/// backend).
pub async fn show(services: Services, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let order = services.orders.fetch(&OrderId::new(id)).await?;

    println!("Order {}  ({})", order.id, order.status);
    println!("  created {}", order.created_at.to_rfc3339());
    if !order.total.is_zero() {
        println!("  total {}", format_usd(order.total));
    }
    for item in &order.items {
        println!("  {} x{}  {}", item.name, item.quantity, item.variant_label);
    }
    for step in &order.tracking {
        println!("  - {step}");
    }

    Ok(())
}

//! Catalog listing command.

#![allow(clippy::print_stdout)] // terminal output is this command's job

use tidemark_core::format_usd;
use tidemark_storefront::api::Services;
use tidemark_storefront::shop::{FilterUpdate, ProductSort, ShopStore};

/// Bootstrap a session and print the filtered catalog.
///
/// # Errors
///
/// Returns an error when the session cannot be bootstrapped (strict mode
/// with an unreachable backend).
pub async fn list(
    services: Services,
    search: Option<String>,
    category: Option<String>,
    in_stock: bool,
    sort: ProductSort,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ShopStore::new(services);
    store.bootstrap().await;

    store.set_filters(FilterUpdate {
        search,
        category,
        in_stock_only: Some(in_stock),
    });

    let products = store.listed_products(sort);
    if products.is_empty() {
        println!("No products match the current filters.");
        return Ok(());
    }

    println!("Categories: {}", store.categories().join(", "));
    println!();

    for product in products {
        println!(
            "{}  {}  [{}]  {}",
            product.id,
            product.name,
            product.category,
            format_usd(product.price)
        );
        for variant in &product.variants {
            let availability = if variant.in_stock() {
                format!("{} in stock", variant.stock)
            } else {
                "out of stock".to_owned()
            };
            println!("    {}  {}  ({availability})", variant.id, variant.label);
        }
    }

    Ok(())
}

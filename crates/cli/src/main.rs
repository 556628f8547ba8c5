//! Tidemark CLI - Drive a storefront session from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog (filters optional)
//! tidemark products --search hoodie --category Apparel --in-stock
//!
//! # Run the scripted add-to-cart -> checkout -> payment flow
//! tidemark demo --method card
//!
//! # Look up an order
//! tidemark order ord_1712345678901
//! ```
//!
//! Without a reachable backend the engine runs in demo mode and serves the
//! canned catalog, so every command works offline.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tidemark_core::PaymentMethod;
use tidemark_storefront::api::Services;
use tidemark_storefront::config::StorefrontConfig;
use tidemark_storefront::session::FileTokenStore;
use tidemark_storefront::shop::ProductSort;

mod commands;

#[derive(Parser)]
#[command(name = "tidemark")]
#[command(author, version, about = "Tidemark storefront demo CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Substring matched against name and description
        #[arg(short, long)]
        search: Option<String>,

        /// Category name (defaults to all categories)
        #[arg(short, long)]
        category: Option<String>,

        /// Only show products with stock
        #[arg(long)]
        in_stock: bool,

        /// Ordering: featured, price-asc, price-desc, newest
        #[arg(long, default_value = "featured")]
        sort: String,
    },
    /// Run the scripted checkout flow end to end
    Demo {
        /// Payment method: card, wallet, bank
        #[arg(short, long, default_value = "card")]
        method: String,
    },
    /// Look up an order by ID
    Order {
        /// Order ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing (RUST_LOG overrides the default level)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tidemark=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let tokens = Arc::new(FileTokenStore::new(config.session_file.clone()));
    let services = Services::new(&config, tokens)?;

    match cli.command {
        Commands::Products {
            search,
            category,
            in_stock,
            sort,
        } => {
            let sort = parse_sort(&sort)?;
            commands::products::list(services, search, category, in_stock, sort).await?;
        }
        Commands::Demo { method } => {
            let method = parse_method(&method)?;
            commands::demo::run(services, method).await?;
        }
        Commands::Order { id } => {
            commands::order::show(services, &id).await?;
        }
    }
    Ok(())
}

fn parse_sort(raw: &str) -> Result<ProductSort, String> {
    match raw {
        "featured" => Ok(ProductSort::Featured),
        "price-asc" => Ok(ProductSort::PriceLowHigh),
        "price-desc" => Ok(ProductSort::PriceHighLow),
        "newest" => Ok(ProductSort::Newest),
        other => Err(format!(
            "unknown sort '{other}' (expected featured, price-asc, price-desc, newest)"
        )),
    }
}

fn parse_method(raw: &str) -> Result<PaymentMethod, String> {
    match raw {
        "card" => Ok(PaymentMethod::Card),
        "wallet" => Ok(PaymentMethod::Wallet),
        "bank" => Ok(PaymentMethod::Bank),
        other => Err(format!(
            "unknown payment method '{other}' (expected card, wallet, bank)"
        )),
    }
}

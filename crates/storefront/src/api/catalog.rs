//! Product catalog service.

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument, warn};

use crate::config::FallbackMode;

use super::types::Product;
use super::{decode, demo, ApiClient, ApiError};

const CACHE_KEY: &str = "products";
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes
const FALLBACK_DELAY: Duration = Duration::from_millis(400);

/// Client for the product listing endpoint.
///
/// Listings are normalized through [`decode::product`] and cached for five
/// minutes. In demo mode a failed request is absorbed: after a short
/// simulated delay the canned catalog is served instead, so the caller
/// always sees non-empty, well-shaped data.
pub struct CatalogService {
    client: ApiClient,
    path: String,
    mode: FallbackMode,
    cache: Cache<String, Vec<Product>>,
}

impl CatalogService {
    pub(crate) fn new(client: ApiClient, path: String, mode: FallbackMode) -> Self {
        Self {
            client,
            path,
            mode,
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// Fetch the normalized product catalog.
    ///
    /// Products that fail normalization are skipped with a warning rather
    /// than failing the whole listing.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`ApiError`] when the request fails. In demo
    /// mode the listing never fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(products) = self.cache.get(CACHE_KEY).await {
            debug!("cache hit for products");
            return Ok(products);
        }

        let products = match self.client.get(&self.path).await {
            Ok(body) => {
                let mut products = Vec::new();
                for decoded in decode::product_list(&body) {
                    match decoded {
                        Ok(product) => products.push(product),
                        Err(e) => warn!("skipping product that failed normalization: {e}"),
                    }
                }
                products
            }
            Err(err) if self.mode.is_demo() => {
                warn!("product listing failed, serving demo catalog: {err}");
                tokio::time::sleep(FALLBACK_DELAY).await;
                demo::catalog()
            }
            Err(err) => return Err(err),
        };

        self.cache.insert(CACHE_KEY.to_owned(), products.clone()).await;
        Ok(products)
    }

    /// Drop the cached catalog so the next listing refetches.
    pub async fn invalidate(&self) {
        self.cache.invalidate(CACHE_KEY).await;
    }
}

//! Order creation and lookup service.

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tidemark_core::OrderId;
use tracing::{instrument, warn};

use crate::config::FallbackMode;

use super::types::{Order, OrderRequest};
use super::{decode, demo, ApiClient, ApiError};

const CREATE_FALLBACK_DELAY: Duration = Duration::from_millis(400);
const FETCH_FALLBACK_DELAY: Duration = Duration::from_millis(350);

/// Client for the orders endpoint.
///
/// Demo-mode fallbacks synthesize orders locally: creation echoes the
/// checkout payload under a generated ID with the fixed tracking timeline;
/// lookup returns an "In Transit" order for the requested ID.
pub struct OrderService {
    client: ApiClient,
    path: String,
    mode: FallbackMode,
}

impl OrderService {
    pub(crate) fn new(client: ApiClient, path: String, mode: FallbackMode) -> Self {
        Self { client, path, mode }
    }

    /// Create an order for a paid checkout.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`ApiError`] when the request fails or the
    /// order payload is undecodable. In demo mode creation never fails.
    #[instrument(skip_all, fields(payment_id = %request.payment_id))]
    pub async fn create(&self, request: &OrderRequest) -> Result<Order, ApiError> {
        let result = match self.client.post(&self.path, request).await {
            Ok(body) => decode::order(&body).map_err(ApiError::from),
            Err(err) => Err(err),
        };

        match result {
            Ok(order) => Ok(order),
            Err(err) if self.mode.is_demo() => {
                warn!("order creation failed, synthesizing local order: {err}");
                tokio::time::sleep(CREATE_FALLBACK_DELAY).await;
                Ok(Order {
                    id: OrderId::new(format!("ord_{}", Utc::now().timestamp_millis())),
                    status: "Processing".to_owned(),
                    created_at: Utc::now(),
                    tracking: demo::tracking_timeline(),
                    items: request.checkout.items.clone(),
                    total: request.checkout.total,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Look up an order by ID.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`ApiError`] when the request fails or the
    /// order payload is undecodable. In demo mode lookup never fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn fetch(&self, id: &OrderId) -> Result<Order, ApiError> {
        let path = format!("{}/{id}", self.path.trim_end_matches('/'));
        let result = match self.client.get(&path).await {
            Ok(body) => decode::order(&body).map_err(ApiError::from),
            Err(err) => Err(err),
        };

        match result {
            Ok(order) => Ok(order),
            Err(err) if self.mode.is_demo() => {
                warn!("order lookup failed, synthesizing tracking view: {err}");
                tokio::time::sleep(FETCH_FALLBACK_DELAY).await;
                Ok(Order {
                    id: id.clone(),
                    status: "In Transit".to_owned(),
                    created_at: Utc::now(),
                    tracking: demo::tracking_timeline(),
                    items: Vec::new(),
                    total: Decimal::ZERO,
                })
            }
            Err(err) => Err(err),
        }
    }
}

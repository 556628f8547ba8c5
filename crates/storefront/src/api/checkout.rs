//! Checkout submission service.

use std::time::Duration;

use chrono::Utc;
use tidemark_core::CheckoutId;
use tracing::{instrument, warn};

use crate::config::FallbackMode;

use super::types::{CheckoutConfirmation, CheckoutSnapshot};
use super::{decode, ApiClient, ApiError};

const FALLBACK_DELAY: Duration = Duration::from_millis(500);

/// Client for the checkout endpoint.
///
/// In demo mode a failed submission still "succeeds": a local checkout ID
/// is synthesized after a short delay, so the flow can proceed to payment
/// without a backend.
pub struct CheckoutService {
    client: ApiClient,
    path: String,
    mode: FallbackMode,
}

impl CheckoutService {
    pub(crate) fn new(client: ApiClient, path: String, mode: FallbackMode) -> Self {
        Self { client, path, mode }
    }

    /// Submit a frozen checkout snapshot.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`ApiError`] when the request fails or the
    /// acknowledgement is undecodable. In demo mode submission never fails.
    #[instrument(skip_all)]
    pub async fn submit(
        &self,
        snapshot: &CheckoutSnapshot,
    ) -> Result<CheckoutConfirmation, ApiError> {
        let result = match self.client.post(&self.path, snapshot).await {
            Ok(body) => decode::checkout_confirmation(&body).map_err(ApiError::from),
            Err(err) => Err(err),
        };

        match result {
            Ok(confirmation) => Ok(confirmation),
            Err(err) if self.mode.is_demo() => {
                warn!("checkout submission failed, synthesizing local checkout: {err}");
                tokio::time::sleep(FALLBACK_DELAY).await;
                Ok(CheckoutConfirmation {
                    checkout_id: CheckoutId::new(format!("chk_{}", Utc::now().timestamp_millis())),
                })
            }
            Err(err) => Err(err),
        }
    }
}

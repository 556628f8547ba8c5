//! Payment initiation service.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tidemark_core::PaymentId;
use tracing::{instrument, warn};

use crate::config::FallbackMode;

use super::types::{PaymentRequest, PaymentReceipt};
use super::{decode, ApiClient, ApiError};

const GATEWAY_DELAY: Duration = Duration::from_millis(1200);
/// Authorization rate of the simulated gateway.
const GATEWAY_SUCCESS_RATE: f64 = 0.8;

/// Client for the payment initiation endpoint.
///
/// Payment is transactional: unlike the read paths, a demo-mode fallback
/// does not always succeed. The simulated gateway authorizes ~80% of
/// attempts after a delay and declines the rest with a retryable
/// [`ApiError::PaymentDeclined`], leaving the caller free to retry without
/// redoing checkout.
pub struct PaymentService {
    client: ApiClient,
    path: String,
    mode: FallbackMode,
}

impl PaymentService {
    pub(crate) fn new(client: ApiClient, path: String, mode: FallbackMode) -> Self {
        Self { client, path, mode }
    }

    /// Initiate a payment for a frozen checkout.
    ///
    /// # Errors
    ///
    /// - [`ApiError::PaymentDeclined`] when the (simulated) gateway refuses
    ///   authorization; safe to retry.
    /// - Any other [`ApiError`] in strict mode when the request fails.
    #[instrument(skip_all, fields(method = %request.method, amount = %request.amount))]
    pub async fn initiate(&self, request: &PaymentRequest) -> Result<PaymentReceipt, ApiError> {
        let result = match self.client.post(&self.path, request).await {
            Ok(body) => decode::payment_receipt(&body).map_err(ApiError::from),
            Err(err) => Err(err),
        };

        match result {
            Ok(receipt) => Ok(receipt),
            Err(err) if self.mode.is_demo() => {
                warn!("payment endpoint failed, simulating gateway: {err}");
                tokio::time::sleep(GATEWAY_DELAY).await;
                Self::simulate_gateway()
            }
            Err(err) => Err(err),
        }
    }

    fn simulate_gateway() -> Result<PaymentReceipt, ApiError> {
        let mut rng = rand::rng();
        if !rng.random_bool(GATEWAY_SUCCESS_RATE) {
            return Err(ApiError::PaymentDeclined(
                "Payment authorization failed. Please retry.".to_owned(),
            ));
        }

        Ok(PaymentReceipt {
            payment_id: PaymentId::new(format!("pay_{}", Utc::now().timestamp_millis())),
            status: "success".to_owned(),
            provider_ref: format!("ref_{}", rng.random_range(0..100_000)),
        })
    }
}

//! Shipping address service.

use serde_json::json;
use tracing::{instrument, warn};

use super::types::Address;
use super::{decode, ApiClient};

/// Client for the customer addresses endpoint.
///
/// Listing never fails: when the dedicated endpoint returns nothing usable,
/// one synthetic address is derived from the customer profile; when that
/// also fails, the list is empty. Checkout then rejects on "no address
/// selected" rather than the session dying here.
pub struct AddressService {
    client: ApiClient,
    addresses_path: String,
    profile_path: String,
}

impl AddressService {
    pub(crate) fn new(client: ApiClient, addresses_path: String, profile_path: String) -> Self {
        Self {
            client,
            addresses_path,
            profile_path,
        }
    }

    /// Fetch the customer's addresses.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Vec<Address> {
        match self.client.get(&self.addresses_path).await {
            Ok(body) => {
                let addresses = decode::address_list(&body);
                if addresses.is_empty() {
                    self.from_profile().await
                } else {
                    addresses
                }
            }
            Err(err) => {
                warn!("address listing failed, deriving from profile: {err}");
                self.from_profile().await
            }
        }
    }

    /// Derive a single default address from the customer profile.
    async fn from_profile(&self) -> Vec<Address> {
        let Ok(body) = self.client.get(&self.profile_path).await else {
            return Vec::new();
        };
        let Ok(customer) = decode::customer_or_body(&body) else {
            return Vec::new();
        };

        let id = customer
            .id
            .map_or_else(|| "profile".to_owned(), |id| format!("profile-{id}"));
        let raw = json!({
            "id": id,
            "label": "Default address",
            "recipient": customer.name,
            "address": customer.address,
        });

        // Runs through the same normalization as listed addresses; a profile
        // without an address line yields nothing.
        decode::address(&raw, 0).into_iter().collect()
    }
}

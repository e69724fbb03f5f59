//! Wire types for the checkout backend.
//!
//! Directory endpoints wrap their payload in `{"success": bool, "data": ...}`;
//! [`ApiEnvelope`] captures that pattern generically. The fee endpoint takes a
//! flat [`FeeRequest`] and answers with a bare [`FeeResponse`].

use relaypick_core::{CartItem, Location, LocationId, ModeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level envelope for list responses.
///
/// `success` defaults to `true` when the backend omits it.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: T,
}

fn default_success() -> bool {
    true
}

/// Destination fields of a fee request. Missing city and region are sent as
/// empty strings, missing coordinates as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryAddress {
    pub ville: String,
    pub gouvernorat: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&Location> for DeliveryAddress {
    fn from(location: &Location) -> Self {
        Self {
            ville: location.city.clone().unwrap_or_default(),
            gouvernorat: location.region.clone().unwrap_or_default(),
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

/// Body of `POST {fee_path}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeRequest {
    pub delivery_address: DeliveryAddress,
    #[serde(with = "rust_decimal::serde::float")]
    pub cart_total: Decimal,
    pub mode_livraison_id: ModeId,
    pub store_id: Option<LocationId>,
    /// Weight is not tracked client-side; always zero.
    pub total_weight: u32,
    pub cart_items: Vec<CartItem>,
}

impl FeeRequest {
    /// Builds the location-specific request for `location`.
    #[must_use]
    pub fn for_location(
        location: &Location,
        cart_total: Decimal,
        mode_livraison_id: ModeId,
        cart_items: &[CartItem],
    ) -> Self {
        Self {
            delivery_address: DeliveryAddress::from(location),
            cart_total,
            mode_livraison_id,
            store_id: Some(location.id),
            total_weight: 0,
            cart_items: cart_items.to_vec(),
        }
    }

    /// Same request with the store id cleared, asking for default pricing.
    #[must_use]
    pub fn without_store(&self) -> Self {
        Self {
            store_id: None,
            ..self.clone()
        }
    }
}

/// Response of the fee endpoint. Older backends send `delivery_fee` instead of
/// `frais_livraison`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeeResponse {
    #[serde(default)]
    pub frais_livraison: Option<Decimal>,
    #[serde(default)]
    pub delivery_fee: Option<Decimal>,
}

impl FeeResponse {
    /// The fee, preferring `frais_livraison` over the legacy `delivery_fee`.
    /// Negative amounts are not fees and read as absent.
    #[must_use]
    pub fn fee(&self) -> Option<Decimal> {
        self.frais_livraison
            .or(self.delivery_fee)
            .filter(|fee| !fee.is_sign_negative())
    }
}

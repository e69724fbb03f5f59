//! Stores and relay points as returned by the directory endpoints.

use serde::{Deserialize, Serialize};

pub type LocationId = i64;

/// A store or relay point a customer can collect an order from.
///
/// The backend names the region field `gouvernorat`; `region` is accepted as
/// an alias. Coordinates may be sent as numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, rename = "gouvernorat", alias = "region")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "crate::lenient::opt_f64")]
    pub longitude: Option<f64>,
}

impl Location {
    /// One-line human description: name, then address and city when known.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        for part in [&self.address, &self.city, &self.region].into_iter().flatten() {
            let trimmed = part.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }
        parts.join(", ")
    }
}

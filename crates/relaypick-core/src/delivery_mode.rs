//! Delivery modes and the lookup of the relay-point pricing mode.

use serde::{Deserialize, Serialize};

/// Mode identifier as the backend sends it: usually numeric, sometimes a code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ModeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeId::Number(n) => write!(f, "{n}"),
            ModeId::Text(s) => f.write_str(s),
        }
    }
}

/// Pricing mode requested when no relay mode can be found in the mode list.
pub const RELAY_MODE_SENTINEL: &str = "point_relais";

const RELAY_CODES: &[&str] = &["point_relais", "relay_point", "relais", "pr"];

const RELAY_LABELS: &[&str] = &[
    "point relais",
    "point relai",
    "relay point",
    "relais",
    "point de retrait",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryMode {
    pub id: ModeId,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, alias = "nom", alias = "name")]
    pub label: String,
}

impl DeliveryMode {
    /// Returns `true` when the code or the label names a relay-point mode.
    #[must_use]
    pub fn is_relay_point(&self) -> bool {
        let code_matches = self.code.as_deref().is_some_and(|code| {
            let code = code.trim().to_lowercase();
            RELAY_CODES.contains(&code.as_str())
        });
        let label = self.label.trim().to_lowercase();
        code_matches || RELAY_LABELS.contains(&label.as_str())
    }
}

/// Picks the pricing mode id used for relay-point fee requests.
///
/// Returns the id of the first relay-point mode in `modes`, or
/// [`RELAY_MODE_SENTINEL`] when none matches.
#[must_use]
pub fn relay_pricing_mode(modes: &[DeliveryMode]) -> ModeId {
    modes
        .iter()
        .find(|m| m.is_relay_point())
        .map_or_else(
            || ModeId::Text(RELAY_MODE_SENTINEL.to_owned()),
            |m| m.id.clone(),
        )
}

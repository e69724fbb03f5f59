//! Deserializers for backend fields that arrive as numbers or numeric strings.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrText {
    Int(i64),
    Float(f64),
    Text(String),
    /// Booleans, objects and arrays.
    Other(IgnoredAny),
}

/// Optional float: numbers, numeric strings, `null`, or an empty string.
/// Anything unparseable is treated as absent.
pub(crate) fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumOrText>::deserialize(deserializer)?;
    #[allow(clippy::cast_precision_loss)]
    let value = match raw {
        None => None,
        Some(NumOrText::Int(i)) => Some(i as f64),
        Some(NumOrText::Float(f)) => Some(f),
        Some(NumOrText::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(NumOrText::Other(_)) => None,
    };
    Ok(value.filter(|f| f.is_finite()))
}

/// Integer coerced from a number (fractions truncated) or a numeric string.
pub(crate) fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumOrText::deserialize(deserializer)? {
        NumOrText::Int(i) => Ok(i),
        NumOrText::Float(f) => float_to_int(f).ok_or_else(|| invalid_int(&f.to_string())),
        NumOrText::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_int))
                .ok_or_else(|| invalid_int(trimmed))
        }
        NumOrText::Other(_) => Err(invalid_int("a non-numeric value")),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_int(f: f64) -> Option<i64> {
    if f.is_finite() && f.abs() < 9.0e15 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

fn invalid_int<E: serde::de::Error>(raw: &str) -> E {
    E::custom(format!("expected an integer, got '{raw}'"))
}

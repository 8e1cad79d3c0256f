//! Field deserializers for saved documents written by older or sloppy clients.
//! A `null` or wrongly typed value falls back to the field's default instead of
//! failing the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Non-negative counter: numbers (rounded, negatives to 0) or numeric strings.
pub(crate) fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let parsed = match &raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed.filter(|v| v.is_finite()) {
        Some(v) => Ok(v.round().clamp(0.0, u32::MAX as f64) as u32),
        None => {
            if !raw.is_null() {
                log::warn!("Ignoring non-numeric counter {}", raw);
            }
            Ok(0)
        }
    }
}

/// Booleans, "true"/"false"/"yes"/"no" strings, or 0/1; anything else is false.
pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    })
}

/// Strings as-is, numbers stringified, anything else empty.
pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// `null` reads as the type's default.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

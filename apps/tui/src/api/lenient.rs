//! Field decoders for upstream rows, which send counts as numbers, numeric
//! strings or `null` depending on the endpoint.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn count_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(number) => number.as_u64().unwrap_or_else(|| {
            number
                .as_f64()
                .filter(|v| v.is_finite() && *v > 0.0)
                .map_or(0, |v| v.trunc() as u64)
        }),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .map_or(0, |v| v.trunc() as u64),
        _ => 0,
    }
}

pub fn ratio_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn label_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Non-negative count; anything unreadable is 0.
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, count_from_value))
}

pub fn ratio<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0.0, ratio_from_value))
}

/// Identifier that may arrive as a string or a number.
pub fn label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(label_from_value).unwrap_or_default())
}

pub fn optional_label<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(label_from_value))
}

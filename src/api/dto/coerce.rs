//! Lenient field decoding for request bodies.
//!
//! Clients send loosely typed JSON. Instead of rejecting the request, scalar
//! values are coerced to text and list fields fall back to an empty list when
//! they are not a list of scalars. Used through `#[serde(deserialize_with)]`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_list(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    // One bad element poisons the whole list.
    items
        .iter()
        .map(scalar_text)
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}

/// Optional text. Non-scalar values are dropped.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

/// Text for a partial update. Only called when the key is present:
/// - `null` -> `Some(None)` (clear)
/// - scalar -> `Some(Some(text))`
/// - anything else -> `None` (leave unchanged)
pub fn text_patch<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => Some(None),
        other => scalar_text(&other).map(Some),
    })
}

/// List of text, `[]` when malformed.
pub fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_list(&value))
}

/// List for a partial update. Present keys always replace (malformed -> `[]`).
pub fn list_patch<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(text_list(&value)))
}

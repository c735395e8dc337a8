//! Common serialization helpers shared across the workspace.
//!
//! Remote payloads are treated leniently: a field that is absent, `null`, or
//! of the wrong JSON type deserializes to `None` (or an empty list) instead of
//! failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `#[serde(default, deserialize_with = "core_serialization::lenient")]`
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_value_lenient(value))
}

/// Like [`lenient`] for sequences: a non-array becomes empty, bad elements are skipped.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().filter_map(from_value_lenient).collect(),
        _ => Vec::new(),
    })
}

/// Non-empty string or `None`; numbers are accepted and rendered as text.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn from_value_lenient<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Item {
        #[serde(default, deserialize_with = "lenient")]
        id: Option<u64>,
        #[serde(default, deserialize_with = "lenient_string")]
        title: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        rating: Option<f32>,
    }

    #[derive(Debug, Deserialize)]
    struct Page {
        #[serde(default, deserialize_with = "lenient_vec")]
        results: Vec<Item>,
    }

    #[test]
    fn wrong_types_become_none() {
        let item: Item =
            serde_json::from_str(r#"{"id": "abc", "title": 42, "rating": "high"}"#).unwrap();
        assert_eq!(item.id, None);
        assert_eq!(item.title.as_deref(), Some("42"));
        assert_eq!(item.rating, None);
    }

    #[test]
    fn blank_title_is_missing() {
        let item: Item = serde_json::from_str(r#"{"id": 1, "title": "   "}"#).unwrap();
        assert_eq!(item.id, Some(1));
        assert_eq!(item.title, None);
    }

    #[test]
    fn results_tolerate_missing_and_garbage() {
        let page: Page = serde_json::from_str("{}").unwrap();
        assert!(page.results.is_empty());

        let page: Page = serde_json::from_str(r#"{"results": "nope"}"#).unwrap();
        assert!(page.results.is_empty());

        let page: Page =
            serde_json::from_str(r#"{"results": [{"id": 1}, 7, null, {"id": 2}]}"#).unwrap();
        assert_eq!(page.results.len(), 2);
    }
}

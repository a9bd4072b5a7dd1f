//! Type-tolerant reads of loosely-structured upstream JSON.
//!
//! A field holding an unexpected type reads as absent instead of failing the
//! whole payload. The `de_*` functions are `deserialize_with` adapters over
//! the same rules.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A non-blank string.
pub(crate) fn string(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// The string entries of an array. Other entries are skipped.
pub(crate) fn strings(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

/// The object entries of an array that parse as `T`. Others are skipped.
pub(crate) fn objects<T: DeserializeOwned>(value: &Value) -> Option<Vec<T>> {
    let items = value.as_array()?;
    Some(items.iter().filter_map(object).collect())
}

/// `value` parsed as `T` when it is an object.
pub(crate) fn object<T: DeserializeOwned>(value: &Value) -> Option<T> {
    value
        .is_object()
        .then(|| T::deserialize(value).ok())
        .flatten()
}

pub(crate) fn de_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string(&Value::deserialize(deserializer)?))
}

/// Like [`de_string`] but reads absent as empty.
pub(crate) fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_string(deserializer)?.unwrap_or_default())
}

pub(crate) fn de_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(strings(&Value::deserialize(deserializer)?))
}

pub(crate) fn de_objects<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(objects(&Value::deserialize(deserializer)?))
}

/// Like [`de_objects`] but reads absent as empty.
pub(crate) fn de_object_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(de_objects(deserializer)?.unwrap_or_default())
}

pub(crate) fn de_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(object(&Value::deserialize(deserializer)?))
}

/// Accept string or numeric identifiers.
pub(crate) fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        name: String,
    }

    #[test]
    fn test_string() {
        assert_eq!(string(&json!("Oil")), Some("Oil".into()));
        assert_eq!(string(&json!("  ")), None);
        assert_eq!(string(&json!(3)), None);
    }

    #[test]
    fn test_strings_skip_other_entries() {
        let value = json!(["a", {"text": "x"}, 2, "b"]);
        assert_eq!(strings(&value), Some(vec!["a".into(), "b".into()]));
        assert_eq!(strings(&json!("a")), None);
    }

    #[test]
    fn test_objects_skip_unparseable_entries() {
        let value = json!([{"name": "kept"}, {"name": 3}, ["name"], "x"]);
        let pairs: Vec<Pair> = objects(&value).unwrap();
        assert_eq!(pairs, vec![Pair { name: "kept".into() }]);
    }
}

//! Lenient field readers for untrusted JSON objects

use haulbook_types::money::money_from_value;
use haulbook_types::timestamp::timestamp_from_value;
use haulbook_types::Timestamp;
use serde_json::{Map, Value};

type Object = Map<String, Value>;

/// First present, non-null key among `keys`, rendered as text.
pub(crate) fn text(obj: &Object, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

pub(crate) fn money(obj: &Object, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Null => None,
        value => Some(money_from_value(value)),
    }
}

pub(crate) fn timestamp(obj: &Object, key: &str) -> Option<Timestamp> {
    obj.get(key).and_then(timestamp_from_value)
}

pub(crate) fn flag(obj: &Object, key: &str) -> Option<bool> {
    match obj.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Some(true),
            "false" | "no" | "0" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Trimmed text, empty when absent
pub(crate) fn clean(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Trimmed text, `default` when absent or blank
pub(crate) fn clean_or(value: Option<String>, default: &str) -> String {
    let cleaned = clean(value);
    if cleaned.is_empty() {
        default.to_string()
    } else {
        cleaned
    }
}

/// Pick `patch` when set, else keep `base`
pub(crate) fn merge<T>(base: Option<T>, patch: Option<T>) -> Option<T> {
    patch.or(base)
}

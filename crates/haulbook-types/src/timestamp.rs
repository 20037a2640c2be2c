//! Record timestamps (epoch milliseconds, UTC)

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Next `updatedAt` value: never earlier than the previous one.
pub fn advance(previous: Timestamp, now: Timestamp) -> Timestamp {
    now.max(previous)
}

/// Read a timestamp from untrusted JSON: epoch milliseconds or an RFC 3339 string.
pub fn timestamp_from_value(value: &Value) -> Option<Timestamp> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .filter(|ms| *ms >= 0),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ms) = s.parse::<i64>() {
                return (ms >= 0).then_some(ms);
            }
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).timestamp_millis())
        }
        _ => None,
    }
}

/// Render for display as RFC 3339 in UTC.
pub fn format_timestamp(ts: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

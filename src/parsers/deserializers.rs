use chrono::{DateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Custom deserializer for timestamp that accepts both integers (ms) and RFC3339 strings
///
/// History written by earlier versions stored epoch milliseconds; current
/// versions write RFC3339. Both load to the same millisecond.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => {
            let ms = n.as_i64().ok_or_else(|| Error::custom("invalid timestamp"))?;
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| Error::custom("timestamp out of range"))
        }
        Value::String(s) => {
            // Numeric strings come from stores that kept `Date.now().toString()`
            if let Ok(ms) = s.parse::<i64>() {
                return DateTime::from_timestamp_millis(ms)
                    .ok_or_else(|| Error::custom("timestamp out of range"));
            }
            s.parse::<DateTime<Utc>>()
                .map_err(|e| Error::custom(format!("invalid RFC3339 timestamp: {}", e)))
        }
        _ => Err(Error::custom("timestamp must be a number or string")),
    }
}

/*
[INPUT]:  Tool results, errors, and payload values
[OUTPUT]: JSON-serializable success/failure envelopes
[POS]:    Tool layer - response contract shared by every tool
[UPDATE]: When the envelope contract changes
*/

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt::Display;

/// Envelope returned by every tool: `{success, data?, error?}` plus
/// per-tool metadata keys flattened alongside.
///
/// Tools never raise past their boundary; failures become `success: false`
/// with the error text.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl ToolResponse {
    pub fn ok(data: impl Into<Value>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
            meta: Map::new(),
        }
    }

    pub fn fail(error: impl Display) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            meta: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }
}

/// Instants cross the tool boundary as ISO-8601 text
pub fn json_safe_datetime(instant: DateTime<Utc>) -> Value {
    Value::String(instant.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Decimals cross the tool boundary as floats; values a float cannot hold
/// degrade to their text form rather than failing serialization
pub fn json_safe_decimal(decimal: Decimal) -> Value {
    decimal
        .to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(decimal.to_string()))
}

/// Byte sequences cross the tool boundary as best-effort text
pub fn json_safe_bytes(bytes: &[u8]) -> Value {
    Value::String(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ok_envelope_shape() {
        let response = ToolResponse::ok(serde_json::json!([1, 2]))
            .with("count", 2)
            .with("keyword", "btc");
        let body = serde_json::to_value(&response).expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({
                "success": true,
                "data": [1, 2],
                "count": 2,
                "keyword": "btc"
            })
        );
    }

    #[test]
    fn test_fail_envelope_shape() {
        let response = ToolResponse::fail("upstream exploded");
        let body = serde_json::to_value(&response).expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": "upstream exploded"})
        );
    }

    #[test]
    fn test_json_safe_datetime() {
        let instant = Utc.with_ymd_and_hms(2023, 10, 27, 10, 0, 0).unwrap();
        assert_eq!(
            json_safe_datetime(instant),
            Value::String("2023-10-27T10:00:00Z".to_string())
        );
    }

    #[test]
    fn test_json_safe_decimal() {
        let value = json_safe_decimal(Decimal::new(12345, 2));
        assert_eq!(value, serde_json::json!(123.45));
    }

    #[test]
    fn test_json_safe_bytes_lossy() {
        assert_eq!(json_safe_bytes(b"hello"), Value::String("hello".to_string()));
        let decoded = json_safe_bytes(&[0x68, 0x69, 0xFF]);
        assert_eq!(decoded, Value::String("hi\u{FFFD}".to_string()));
    }
}

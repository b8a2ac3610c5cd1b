/*
[INPUT]:  Untyped news payloads from the WebSocket feed and REST search
[OUTPUT]: Typed field accessors with fallback-chain key resolution
[POS]:    Data layer - defensive access over schemaless articles
[UPDATE]: When the upstream adds field aliases or envelope shapes
*/

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// Candidate keys per logical field, in resolution order.
///
/// The upstream guarantees no schema; every accessor walks its chain and
/// returns `None` when nothing matches.
const TITLE_KEYS: [&str; 3] = ["title", "headline", "text"];
const CONTENT_KEYS: [&str; 3] = ["content", "summary", "description"];
const URL_KEYS: [&str; 2] = ["url", "link"];
const SOURCE_KEYS: [&str; 2] = ["source", "newsType"];
const TIMESTAMP_KEYS: [&str; 4] = ["ts", "publishTime", "time", "createTime"];

/// Borrowed view over one untyped news article
#[derive(Debug, Clone, Copy)]
pub struct NewsItem<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> NewsItem<'a> {
    /// View a raw value as a news item; `None` unless it is a JSON object
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(|fields| Self { fields })
    }

    fn first_str(&self, keys: &[&str]) -> Option<&'a str> {
        keys.iter()
            .find_map(|key| self.fields.get(*key).and_then(Value::as_str))
    }

    pub fn title(&self) -> Option<&'a str> {
        self.first_str(&TITLE_KEYS)
    }

    pub fn content(&self) -> Option<&'a str> {
        self.first_str(&CONTENT_KEYS)
    }

    pub fn url(&self) -> Option<&'a str> {
        self.first_str(&URL_KEYS)
    }

    pub fn source(&self) -> Option<&'a str> {
        self.first_str(&SOURCE_KEYS)
    }

    /// Coin symbols, normalized.
    ///
    /// The upstream mixes bare strings and nested objects in the same list;
    /// objects resolve through `symbol` then `name`. Unusable entries are
    /// skipped.
    pub fn coins(&self) -> Vec<String> {
        let Some(list) = self.fields.get("coins").and_then(Value::as_array) else {
            return Vec::new();
        };
        list.iter()
            .filter_map(|entry| match entry {
                Value::String(symbol) => Some(symbol.clone()),
                Value::Object(coin) => coin
                    .get("symbol")
                    .or_else(|| coin.get("name"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect()
    }

    /// Publication instant, resolved through the timestamp key chain.
    ///
    /// Accepts epoch milliseconds (integer or numeric string) and ISO-8601
    /// text with or without a trailing `Z`. Absent or unparseable values
    /// yield `None`, never an error.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        TIMESTAMP_KEYS
            .iter()
            .find_map(|key| self.fields.get(*key).and_then(parse_instant))
    }

    fn ai_rating(&self) -> Option<&'a Map<String, Value>> {
        self.fields.get("aiRating").and_then(Value::as_object)
    }

    pub fn ai_score(&self) -> Option<i64> {
        self.ai_rating()?.get("score")?.as_i64()
    }

    pub fn ai_signal(&self) -> Option<&'a str> {
        self.ai_rating()?.get("signal")?.as_str()
    }

    pub fn ai_status(&self) -> Option<&'a str> {
        self.ai_rating()?.get("status")?.as_str()
    }
}

/// Parse a single timestamp value into a UTC instant
fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(number) => Utc.timestamp_millis_opt(number.as_i64()?).single(),
        Value::String(text) => {
            let text = text.trim();
            if !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit()) {
                let millis: i64 = text.parse().ok()?;
                return Utc.timestamp_millis_opt(millis).single();
            }
            parse_iso_instant(text)
        }
        _ => None,
    }
}

fn parse_iso_instant(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Some(with_offset.with_timezone(&Utc));
    }
    // Offset-free variants; a trailing Z without fraction falls through to
    // rfc3339 above, so strip it only for the naive formats.
    let naive = text.strip_suffix('Z').unwrap_or(text);
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(parsed.and_utc());
        }
    }
    None
}

/// Envelope handling for feed messages.
///
/// Both rules are upstream heuristics rather than documented contract, so
/// they stay configurable: the unwrap key for the one-level envelope and
/// the keys that make a payload count as news.
#[derive(Debug, Clone)]
pub struct EnvelopePolicy {
    pub unwrap_key: String,
    pub title_keys: Vec<String>,
}

impl Default for EnvelopePolicy {
    fn default() -> Self {
        Self {
            unwrap_key: "data".to_string(),
            title_keys: TITLE_KEYS.iter().map(|key| key.to_string()).collect(),
        }
    }
}

impl EnvelopePolicy {
    /// Unwrap one level of envelope when the configured key holds an object
    pub fn unwrap<'a>(&self, message: &'a Value) -> &'a Value {
        match message.get(&self.unwrap_key) {
            Some(inner) if inner.is_object() => inner,
            _ => message,
        }
    }

    /// A payload is news only if it carries a title-bearing key; anything
    /// else is treated as a control/ack message and dropped silently.
    pub fn is_news(&self, payload: &Value) -> bool {
        let Some(fields) = payload.as_object() else {
            return false;
        };
        self.title_keys.iter().any(|key| fields.contains_key(key))
    }
}

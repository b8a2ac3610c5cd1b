/*
[INPUT]:  Coin symbols, engine-type categories, has-coin flag
[OUTPUT]: Immutable subscription filter serialized as subscribe params
[POS]:    Data layer - WebSocket subscription filter
[UPDATE]: When the upstream subscribe params change
*/

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filter sent with `news.subscribe`.
///
/// Immutable once constructed. The upstream keeps no session state across
/// connections, so the same filter must be resent after every reconnect.
/// Empty fields are omitted entirely: an unconstrained filter serializes
/// to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscribeFilter {
    #[serde(rename = "engineTypes")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_types: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coins: Option<Vec<String>>,
    #[serde(rename = "hasCoin")]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    #[serde(default)]
    pub has_coin: bool,
}

impl SubscribeFilter {
    pub fn new(
        engine_types: Option<BTreeMap<String, Vec<String>>>,
        coins: Option<Vec<String>>,
        has_coin: bool,
    ) -> Self {
        Self {
            engine_types: engine_types.filter(|map| !map.is_empty()),
            coins: coins.filter(|list| !list.is_empty()),
            has_coin,
        }
    }

    /// Parse the tool-surface coin list format: `"BTC,ETH"`
    pub fn parse_coins(raw: &str) -> Option<Vec<String>> {
        let coins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|coin| !coin.is_empty())
            .map(str::to_string)
            .collect();
        if coins.is_empty() { None } else { Some(coins) }
    }

    /// Parse the tool-surface engine-type format: `"news:Bloomberg,Reuters;listing:"`
    ///
    /// An engine with no categories after the colon subscribes to the whole
    /// engine type. Segments without a colon are ignored.
    pub fn parse_engine_types(raw: &str) -> Option<BTreeMap<String, Vec<String>>> {
        let mut engine_types = BTreeMap::new();
        for part in raw.split(';') {
            let Some((engine, categories)) = part.split_once(':') else {
                continue;
            };
            let engine = engine.trim();
            if engine.is_empty() {
                continue;
            }
            let categories: Vec<String> = categories
                .split(',')
                .map(str::trim)
                .filter(|category| !category.is_empty())
                .map(str::to_string)
                .collect();
            engine_types.insert(engine.to_string(), categories);
        }
        if engine_types.is_empty() {
            None
        } else {
            Some(engine_types)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_serializes_to_empty_params() {
        let params = serde_json::to_value(SubscribeFilter::default()).expect("serialize");
        assert_eq!(params, serde_json::json!({}));
    }

    #[test]
    fn test_empty_collections_are_dropped() {
        let filter = SubscribeFilter::new(Some(BTreeMap::new()), Some(Vec::new()), false);
        let params = serde_json::to_value(filter).expect("serialize");
        assert_eq!(params, serde_json::json!({}));
    }

    #[test]
    fn test_populated_filter_round_trip() {
        let filter = SubscribeFilter::new(
            Some(BTreeMap::from([(
                "news".to_string(),
                vec!["Bloomberg".to_string(), "Reuters".to_string()],
            )])),
            Some(vec!["BTC".to_string(), "ETH".to_string()]),
            true,
        );

        let params = serde_json::to_value(&filter).expect("serialize");
        assert_eq!(
            params,
            serde_json::json!({
                "engineTypes": {"news": ["Bloomberg", "Reuters"]},
                "coins": ["BTC", "ETH"],
                "hasCoin": true
            })
        );

        let decoded: SubscribeFilter = serde_json::from_value(params).expect("deserialize");
        assert_eq!(decoded, filter);
    }

    #[test]
    fn test_parse_coins() {
        assert_eq!(
            SubscribeFilter::parse_coins(" BTC, ETH ,,SOL"),
            Some(vec![
                "BTC".to_string(),
                "ETH".to_string(),
                "SOL".to_string()
            ])
        );
        assert_eq!(SubscribeFilter::parse_coins(""), None);
        assert_eq!(SubscribeFilter::parse_coins(" , "), None);
    }

    #[test]
    fn test_parse_engine_types() {
        let parsed =
            SubscribeFilter::parse_engine_types("news:Bloomberg,Reuters;listing:;garbage")
                .expect("engine types");
        assert_eq!(
            parsed.get("news"),
            Some(&vec!["Bloomberg".to_string(), "Reuters".to_string()])
        );
        assert_eq!(parsed.get("listing"), Some(&Vec::new()));
        assert!(!parsed.contains_key("garbage"));

        assert_eq!(SubscribeFilter::parse_engine_types("no-colons-here"), None);
    }
}

/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body for POST /open/news_search
///
/// Optional filters are omitted from the wire format when unset so the
/// upstream sees only `{limit, page}` for a plain latest-news query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSearchRequest {
    pub limit: u32,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(rename = "engineTypes")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_types: Option<BTreeMap<String, Vec<String>>>,
    #[serde(rename = "hasCoin")]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    #[serde(default)]
    pub has_coin: bool,
}

impl NewsSearchRequest {
    /// Plain paginated query with no filters
    pub fn page_of(limit: u32, page: u32) -> Self {
        Self {
            limit,
            page,
            coins: None,
            q: None,
            engine_types: None,
            has_coin: false,
        }
    }
}

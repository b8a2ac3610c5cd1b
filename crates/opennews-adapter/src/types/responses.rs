/*
[INPUT]:  Raw JSON responses from the OpenNews REST API
[OUTPUT]: Typed response structs tolerant of missing fields
[POS]:    Data layer - type definitions for API responses
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response for POST /open/news_search
///
/// Articles carry no fixed schema upstream, so they stay as raw JSON and
/// go through the `NewsItem` accessors for field extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsSearchResponse {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub total: u64,
}

/// Response for GET /open/news_type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineTreeResponse {
    #[serde(default)]
    pub data: Vec<EngineType>,
}

/// Top-level news-source category (e.g. "news", "listing", "onchain")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineType {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "enName")]
    #[serde(default)]
    pub en_name: Option<String>,
    #[serde(default)]
    pub categories: Vec<EngineCategory>,
}

/// Sub-category of an engine type (e.g. "Bloomberg" under "news")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineCategory {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "enName")]
    #[serde(default)]
    pub en_name: Option<String>,
    #[serde(rename = "aiEnabled")]
    #[serde(default)]
    pub ai_enabled: bool,
}

impl EngineCategory {
    /// Display name preferring the English label
    pub fn display_name(&self) -> Option<&str> {
        self.en_name.as_deref().or(self.name.as_deref())
    }
}

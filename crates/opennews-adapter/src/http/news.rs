/*
[INPUT]:  Search filters and pagination parameters
[OUTPUT]: News articles and the engine/category tree
[POS]:    HTTP layer - OpenNews REST endpoints
[UPDATE]: When adding new endpoints or changing response format
*/

use reqwest::Method;

use crate::http::{OpenNewsClient, Result};
use crate::types::{EngineTreeResponse, NewsSearchRequest, NewsSearchResponse};

impl OpenNewsClient {
    /// Search news articles
    ///
    /// POST /open/news_search
    pub async fn search_news(&self, request: &NewsSearchRequest) -> Result<NewsSearchResponse> {
        self.send_json(Method::POST, "/open/news_search", Some(request))
            .await
    }

    /// Fetch the engine/category tree
    ///
    /// GET /open/news_type
    pub async fn get_engine_tree(&self) -> Result<EngineTreeResponse> {
        self.send_json::<_, ()>(Method::GET, "/open/news_type", None)
            .await
    }
}

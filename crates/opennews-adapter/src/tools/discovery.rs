/*
[INPUT]:  Engine/category tree from the REST API
[OUTPUT]: Summarized source listings for filter construction
[POS]:    Tool layer - discovery tools
[UPDATE]: When the engine tree summary format changes
*/

use serde_json::{Value, json};

use crate::tools::{ToolContext, ToolResponse};

/// Get all available news source categories with their metadata
pub async fn get_news_sources(ctx: &ToolContext) -> ToolResponse {
    match ctx.api.get_engine_tree().await {
        Ok(tree) => {
            let sources: Vec<Value> = tree
                .data
                .iter()
                .map(|engine| {
                    let categories: Vec<Value> = engine
                        .categories
                        .iter()
                        .map(|category| {
                            json!({
                                "code": category.code,
                                "name": category.name,
                                "enName": category.en_name,
                                "aiEnabled": category.ai_enabled,
                            })
                        })
                        .collect();
                    json!({
                        "code": engine.code,
                        "name": engine.name,
                        "enName": engine.en_name,
                        "category_count": categories.len(),
                        "categories": categories,
                    })
                })
                .collect();

            let engine_count = sources.len();
            ToolResponse::ok(sources).with("engine_count", engine_count)
        }
        Err(err) => ToolResponse::fail(err),
    }
}

/// Flat list of news type codes usable as search filters
pub async fn list_news_types(ctx: &ToolContext) -> ToolResponse {
    match ctx.api.get_engine_tree().await {
        Ok(tree) => {
            let types: Vec<Value> = tree
                .data
                .iter()
                .flat_map(|engine| {
                    engine.categories.iter().map(|category| {
                        json!({
                            "code": category.code,
                            "engineType": engine.code,
                            "name": category.display_name(),
                        })
                    })
                })
                .collect();

            let count = types.len();
            ToolResponse::ok(types).with("count", count)
        }
        Err(err) => ToolResponse::fail(err),
    }
}

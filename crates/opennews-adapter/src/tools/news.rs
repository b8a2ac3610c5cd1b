/*
[INPUT]:  Search parameters from the host runtime
[OUTPUT]: News article envelopes from the REST API
[POS]:    Tool layer - news content tools
[UPDATE]: When adding news tools or changing their parameters
*/

use serde_json::Value;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::tools::{ToolContext, ToolResponse};
use crate::types::{NewsItem, NewsSearchRequest, SubscribeFilter};

/// Get the most recent news articles, newest first
pub async fn get_latest_news(ctx: &ToolContext, limit: u32) -> ToolResponse {
    let limit = ctx.clamp_limit(limit);
    run_search(ctx, NewsSearchRequest::page_of(limit, 1), limit).await
}

/// Search news by keyword in text content
pub async fn search_news(ctx: &ToolContext, keyword: &str, limit: u32) -> ToolResponse {
    let limit = ctx.clamp_limit(limit);
    let mut request = NewsSearchRequest::page_of(limit, 1);
    request.q = Some(keyword.to_string());
    run_search(ctx, request, limit)
        .await
        .with("keyword", keyword)
}

/// Search news related to a specific coin/token
pub async fn search_news_by_coin(ctx: &ToolContext, coin: &str, limit: u32) -> ToolResponse {
    let limit = ctx.clamp_limit(limit);
    let mut request = NewsSearchRequest::page_of(limit, 1);
    request.coins = Some(vec![coin.to_string()]);
    run_search(ctx, request, limit).await.with("coin", coin)
}

/// Get news from one specific source within an engine type
pub async fn get_news_by_source(
    ctx: &ToolContext,
    engine_type: &str,
    news_type: &str,
    limit: u32,
) -> ToolResponse {
    let limit = ctx.clamp_limit(limit);
    let mut request = NewsSearchRequest::page_of(limit, 1);
    request.engine_types = Some(BTreeMap::from([(
        engine_type.to_string(),
        vec![news_type.to_string()],
    )]));
    run_search(ctx, request, limit)
        .await
        .with("engine_type", engine_type)
        .with("news_type", news_type)
}

/// Get news filtered by engine type only
pub async fn get_news_by_engine(ctx: &ToolContext, engine_type: &str, limit: u32) -> ToolResponse {
    let limit = ctx.clamp_limit(limit);
    let mut request = NewsSearchRequest::page_of(limit, 1);
    request.engine_types = Some(BTreeMap::from([(engine_type.to_string(), Vec::new())]));
    run_search(ctx, request, limit)
        .await
        .with("engine_type", engine_type)
}

/// Advanced search combining coin, keyword, engine-type, and has-coin filters.
///
/// String parameters use the tool-surface formats: `"BTC,ETH"` for coins and
/// `"news:Bloomberg,Reuters;listing:"` for engine types.
pub async fn search_news_advanced(
    ctx: &ToolContext,
    coins: &str,
    keyword: &str,
    engine_types: &str,
    has_coin: bool,
    limit: u32,
) -> ToolResponse {
    let limit = ctx.clamp_limit(limit);
    let mut request = NewsSearchRequest::page_of(limit, 1);
    request.coins = SubscribeFilter::parse_coins(coins);
    request.q = (!keyword.is_empty()).then(|| keyword.to_string());
    request.engine_types = SubscribeFilter::parse_engine_types(engine_types);
    request.has_coin = has_coin;
    run_search(ctx, request, limit).await
}

/// Get highly-rated articles, sorted by AI score descending
pub async fn get_high_score_news(ctx: &ToolContext, min_score: i64, limit: u32) -> ToolResponse {
    let limit = ctx.clamp_limit(limit);
    let fetch_limit = limit.saturating_mul(3).min(ctx.max_rows);

    match ctx
        .api
        .search_news(&NewsSearchRequest::page_of(fetch_limit, 1))
        .await
    {
        Ok(result) => {
            let mut scored: Vec<Value> = result
                .data
                .into_iter()
                .filter(|item| score_of(item) >= min_score)
                .collect();
            scored.sort_by_key(|item| Reverse(score_of(item)));
            scored.truncate(limit as usize);

            let count = scored.len();
            ToolResponse::ok(scored)
                .with("min_score", min_score)
                .with("count", count)
        }
        Err(err) => ToolResponse::fail(err),
    }
}

/// Get news carrying a completed AI trading signal ("long", "short", "neutral")
pub async fn get_news_by_signal(ctx: &ToolContext, signal: &str, limit: u32) -> ToolResponse {
    let limit = ctx.clamp_limit(limit);
    let fetch_limit = limit.saturating_mul(3).min(ctx.max_rows);

    match ctx
        .api
        .search_news(&NewsSearchRequest::page_of(fetch_limit, 1))
        .await
    {
        Ok(result) => {
            let mut matched: Vec<Value> = result
                .data
                .into_iter()
                .filter(|item| {
                    NewsItem::from_value(item).is_some_and(|item| {
                        item.ai_signal() == Some(signal) && item.ai_status() == Some("done")
                    })
                })
                .collect();
            matched.truncate(limit as usize);

            let count = matched.len();
            ToolResponse::ok(matched)
                .with("signal", signal)
                .with("count", count)
        }
        Err(err) => ToolResponse::fail(err),
    }
}

fn score_of(item: &Value) -> i64 {
    NewsItem::from_value(item)
        .and_then(|item| item.ai_score())
        .unwrap_or(0)
}

async fn run_search(ctx: &ToolContext, request: NewsSearchRequest, limit: u32) -> ToolResponse {
    match ctx.api.search_news(&request).await {
        Ok(result) => {
            let data: Vec<Value> = result.data.into_iter().take(limit as usize).collect();
            let count = data.len();
            ToolResponse::ok(data)
                .with("count", count)
                .with("total", result.total)
        }
        Err(err) => ToolResponse::fail(err),
    }
}

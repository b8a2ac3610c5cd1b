/*
[INPUT]:  Bounded wait/count parameters and filter strings
[OUTPUT]: Live feed messages collected in one ephemeral session
[POS]:    Tool layer - real-time subscription tool
[UPDATE]: When collection parameters or filter formats change
*/

use crate::tools::{ToolContext, ToolResponse};
use crate::types::SubscribeFilter;
use crate::ws::{NewsFeedSocket, collect_latest};

/// Subscribe to the live feed and collect messages for a bounded window.
///
/// Opens a fresh transport per call; nothing is shared with the background
/// monitor or with previous invocations. `wait_seconds` is clamped to
/// [1, 30] and `max_items` to [1, 20].
pub async fn subscribe_latest_news(
    ctx: &ToolContext,
    wait_seconds: u64,
    max_items: usize,
    coins: &str,
    engine_types: &str,
    has_coin: bool,
) -> ToolResponse {
    let filter = SubscribeFilter::new(
        SubscribeFilter::parse_engine_types(engine_types),
        SubscribeFilter::parse_coins(coins),
        has_coin,
    );

    let mut feed = NewsFeedSocket::new(&ctx.wss_url, &ctx.token);
    match collect_latest(&mut feed, &filter, wait_seconds, max_items).await {
        Ok(items) => {
            let count = items.len();
            ToolResponse::ok(items).with("count", count)
        }
        Err(err) => ToolResponse::fail(err),
    }
}

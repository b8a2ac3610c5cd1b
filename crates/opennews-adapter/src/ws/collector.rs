/*
[INPUT]:  Subscription filter plus bounded wait/count parameters
[OUTPUT]: Collected feed messages from one ephemeral session
[POS]:    WebSocket layer - on-demand bounded collection window
[UPDATE]: When collection bounds or early-stop semantics change
*/

use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::http::Result;
use crate::types::SubscribeFilter;
use crate::ws::NewsFeed;

pub const MIN_WAIT_SECONDS: u64 = 1;
pub const MAX_WAIT_SECONDS: u64 = 30;
pub const MIN_ITEMS: usize = 1;
pub const MAX_ITEMS: usize = 20;

/// Out-of-range waits are clamped, never rejected
pub fn clamp_wait_seconds(wait_seconds: u64) -> u64 {
    wait_seconds.clamp(MIN_WAIT_SECONDS, MAX_WAIT_SECONDS)
}

/// Out-of-range item counts are clamped, never rejected
pub fn clamp_max_items(max_items: usize) -> usize {
    max_items.clamp(MIN_ITEMS, MAX_ITEMS)
}

/// One-shot bounded listen on a fresh feed session.
///
/// Subscribes with `filter`, then waits up to `wait_seconds` per message for
/// at most `max_items` messages, stopping early on the first quiet window
/// (a quiet feed is not an error). The transport is closed on every exit
/// path; the caller owns `feed`, so cancellation of the enclosing future
/// drops the socket and tears the connection down with it. Nothing persists
/// between invocations.
pub async fn collect_latest<F: NewsFeed>(
    feed: &mut F,
    filter: &SubscribeFilter,
    wait_seconds: u64,
    max_items: usize,
) -> Result<Vec<Value>> {
    let wait = Duration::from_secs(clamp_wait_seconds(wait_seconds));
    let max_items = clamp_max_items(max_items);

    let result = collect_inner(feed, filter, wait, max_items).await;
    feed.close().await;
    result
}

async fn collect_inner<F: NewsFeed>(
    feed: &mut F,
    filter: &SubscribeFilter,
    wait: Duration,
    max_items: usize,
) -> Result<Vec<Value>> {
    feed.connect().await?;
    let ack = feed.subscribe(filter).await?;
    debug!(ack = %ack, "collector subscribed");

    let mut items = Vec::with_capacity(max_items);
    while items.len() < max_items {
        match feed.receive(wait).await? {
            Some(item) => items.push(item),
            None => break,
        }
    }
    Ok(items)
}

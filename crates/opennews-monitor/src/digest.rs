/*
[INPUT]:  Recent articles from the REST search endpoint
[OUTPUT]: One chat message per fresh article, or a heartbeat
[POS]:    Scheduled job - one-shot daily digest
[UPDATE]: When the freshness window or send pacing changes
*/

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::Value;
use std::time::Duration;
use tracing::info;

use opennews_adapter::telegram::TelegramClient;
use opennews_adapter::types::{NewsItem, NewsSearchRequest};
use opennews_adapter::OpenNewsClient;

use crate::monitor::format_news;

const FETCH_LIMIT: u32 = 20;
// One hour of slack over the 24h window covers scheduler drift
const WINDOW_HOURS: i64 = 25;
const SEND_SPACING: Duration = Duration::from_secs(1);

const HEARTBEAT_TEXT: &str = "🟢 *Daily Report*: no significant news in the past 24 hours.\n\
    Monitor is active and healthy.";

/// Fetch the latest articles and push the fresh ones to the chat.
///
/// Sends oldest first so the chat timeline reads in order, with a short gap
/// between messages for the bot API rate limit.
pub async fn run_digest(api: &OpenNewsClient, telegram: &TelegramClient) -> anyhow::Result<()> {
    info!("running daily digest");
    let articles = match api.search_news(&NewsSearchRequest::page_of(FETCH_LIMIT, 1)).await {
        Ok(response) => response.data,
        Err(err) => {
            telegram
                .notify(None, &format!("⚠️ *Monitor Error*: daily digest failed: {err}"))
                .await;
            return Err(err.into());
        }
    };

    let threshold = Utc::now() - ChronoDuration::hours(WINDOW_HOURS);
    let fresh: Vec<&Value> = articles
        .iter()
        .filter(|article| is_fresh(article, threshold))
        .collect();

    if fresh.is_empty() {
        info!("no fresh articles; sending heartbeat");
        telegram.notify(None, HEARTBEAT_TEXT).await;
        return Ok(());
    }

    info!(count = fresh.len(), "sending digest");
    for article in fresh.iter().rev() {
        telegram.notify(None, &format_news(article)).await;
        tokio::time::sleep(SEND_SPACING).await;
    }
    Ok(())
}

/// Articles with no parseable timestamp are kept rather than dropped
fn is_fresh(article: &Value, threshold: DateTime<Utc>) -> bool {
    match NewsItem::from_value(article).and_then(|item| item.published_at()) {
        Some(published) => published > threshold,
        None => true,
    }
}

/*
[INPUT]:  Feed messages from the WebSocket session, shutdown signal
[OUTPUT]: Telegram notifications per news item, status transitions
[POS]:    Core loop - resilient connect/subscribe/receive state machine
[UPDATE]: When fault handling or the notification format changes
*/

use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use opennews_adapter::telegram::TelegramClient;
use opennews_adapter::types::{EnvelopePolicy, NewsItem, SubscribeFilter};
use opennews_adapter::ws::NewsFeed;
use opennews_adapter::Result;

use crate::status::{MonitorStatus, StatusTx};

const RECEIVE_WINDOW: Duration = Duration::from_secs(20);
const RETRY_BACKOFF: Duration = Duration::from_secs(5);
const AUTH_BACKOFF: Duration = Duration::from_secs(60);

const CONTENT_PREVIEW_CHARS: usize = 200;

const STARTED_TEXT: &str = "🟢 *OpenNews Monitor Started!*\nWatching for real-time news updates...";
const TOKEN_INVALID_TEXT: &str =
    "⚠️ *Error*: API token rejected (HTTP 401). Update the token and restart.";

/// Resilient monitor over one news feed.
///
/// Reconnects forever: transient faults back off briefly, credential faults
/// back off a full minute with exactly one operator notification per
/// attempt. Only cancellation stops the loop.
pub struct NewsMonitor<F: NewsFeed> {
    feed: F,
    telegram: Option<TelegramClient>,
    status: StatusTx,
    filter: SubscribeFilter,
    policy: EnvelopePolicy,
    receive_window: Duration,
    retry_backoff: Duration,
    auth_backoff: Duration,
}

impl<F: NewsFeed> NewsMonitor<F> {
    pub fn new(feed: F, telegram: Option<TelegramClient>, status: StatusTx) -> Self {
        Self {
            feed,
            telegram,
            status,
            filter: SubscribeFilter::default(),
            policy: EnvelopePolicy::default(),
            receive_window: RECEIVE_WINDOW,
            retry_backoff: RETRY_BACKOFF,
            auth_backoff: AUTH_BACKOFF,
        }
    }

    pub fn with_filter(mut self, filter: SubscribeFilter) -> Self {
        self.filter = filter;
        self
    }

    #[cfg(test)]
    fn with_backoffs(mut self, retry: Duration, auth: Duration) -> Self {
        self.retry_backoff = retry;
        self.auth_backoff = auth;
        self
    }

    /// Run until cancelled
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!("starting news monitor");
        loop {
            let fault = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = self.session() => match result {
                    Ok(()) => continue,
                    Err(err) => err,
                },
            };

            let _ = self
                .status
                .send(MonitorStatus::disconnected(fault.to_string()));
            self.feed.close().await;

            let backoff = if fault.is_auth_error() {
                warn!(error = %fault, "credential rejected by upstream");
                self.notify(TOKEN_INVALID_TEXT).await;
                self.auth_backoff
            } else {
                error!(error = %fault, "feed connection fault");
                self.retry_backoff
            };

            info!(backoff_secs = backoff.as_secs(), "reconnecting after backoff");
            tokio::select! {
                _ = tokio::time::sleep(backoff) => {}
                _ = shutdown.cancelled() => break,
            }
        }
        self.feed.close().await;
        info!("news monitor stopped");
    }

    /// One connect/subscribe/receive session; returns only on a fault
    async fn session(&mut self) -> Result<()> {
        self.feed.connect().await?;
        let ack = self.feed.subscribe(&self.filter).await?;
        info!(ack = %ack, "subscribed to news feed");

        let _ = self.status.send(MonitorStatus::connected());
        self.notify(STARTED_TEXT).await;

        loop {
            match self.feed.receive(self.receive_window).await? {
                // A quiet window is not a fault; keep waiting
                None => continue,
                Some(message) => self.forward(&message).await,
            }
        }
    }

    async fn forward(&self, message: &Value) {
        let payload = self.policy.unwrap(message);
        if !self.policy.is_news(payload) {
            return;
        }
        if let Some(title) = NewsItem::from_value(payload).and_then(|item| item.title()) {
            info!(title, "news received");
        }
        self.notify(&format_news(payload)).await;
    }

    /// No-op when no notifier is configured; the feed is still monitored
    /// and the status channel still updated.
    async fn notify(&self, text: &str) {
        if let Some(telegram) = &self.telegram {
            telegram.notify(None, text).await;
        }
    }
}

/// Render one article as a Markdown chat message
pub fn format_news(payload: &Value) -> String {
    let Some(item) = NewsItem::from_value(payload) else {
        return String::new();
    };

    let title = item.title().unwrap_or("No Title");
    let mut text = format!("*{title}*\n\n");

    if let Some(content) = item.content() {
        let preview: String = content.chars().take(CONTENT_PREVIEW_CHARS).collect();
        text.push_str(&preview);
        if content.chars().count() > CONTENT_PREVIEW_CHARS {
            text.push('…');
        }
        text.push_str("\n\n");
    }

    let coins = item.coins();
    if !coins.is_empty() {
        text.push_str(&format!("Coins: `{}`\n", coins.join(", ")));
    }
    text.push_str(&format!("Source: {}\n", item.source().unwrap_or("Unknown")));
    if let Some(url) = item.url() {
        if !url.is_empty() {
            text.push_str(&format!("[Read More]({url})"));
        }
    }
    text
}

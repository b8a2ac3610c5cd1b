/*
[INPUT]:  Bot token, chat id, message text, poll offset
[OUTPUT]: Outbound chat messages and decoded command updates
[POS]:    Notification layer - Telegram Bot API client
[UPDATE]: When adding bot methods or changing send semantics
*/

use reqwest::{Client, Url};
use serde::Deserialize;
use std::borrow::Cow;
use std::time::Duration;
use tracing::error;

use crate::http::{OpenNewsError, Result};

/// Default Telegram Bot API host
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Protocol-imposed bound on sendMessage text
pub const MAX_MESSAGE_CHARS: usize = 4096;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_EXTRA_TIMEOUT: Duration = Duration::from_secs(10);

/// Incoming update from getUpdates
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub chat: Option<Chat>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    #[serde(default)]
    result: Vec<Update>,
}

/// Client for the Telegram Bot API
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http_client: Client,
    base_url: Url,
    bot_token: String,
    default_chat_id: String,
}

impl TelegramClient {
    pub fn new(bot_token: impl Into<String>, default_chat_id: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_TELEGRAM_API_BASE, bot_token, default_chat_id)
    }

    pub fn with_base_url(
        base_url: &str,
        bot_token: impl Into<String>,
        default_chat_id: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            http_client: Client::builder().build()?,
            base_url: Url::parse(base_url)?,
            bot_token: bot_token.into(),
            default_chat_id: default_chat_id.into(),
        })
    }

    fn method_url(&self, method: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("/bot{}/{}", self.bot_token, method))?)
    }

    /// Send a text message; `None` targets the configured default chat.
    ///
    /// Text beyond the protocol bound is truncated with a trailing ellipsis.
    /// Every call is one independent request; nothing is cached or deduped.
    pub async fn send_message(&self, chat_id: Option<&str>, text: &str) -> Result<()> {
        let chat_id = chat_id.unwrap_or(&self.default_chat_id);
        if self.bot_token.is_empty() || chat_id.is_empty() {
            return Err(OpenNewsError::Config(
                "Telegram not configured (missing bot token or chat id)".to_string(),
            ));
        }

        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": truncate_message(text),
            "parse_mode": "Markdown",
            "disable_web_page_preview": true,
        });

        let response = self
            .http_client
            .post(self.method_url("sendMessage")?)
            .timeout(SEND_TIMEOUT)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenNewsError::api_error(status, body));
        }
        Ok(())
    }

    /// Fire-and-forget send; failures are logged, never propagated.
    ///
    /// Used from the monitor and command loops, which must not break on a
    /// notifier fault.
    pub async fn notify(&self, chat_id: Option<&str>, text: &str) {
        if let Err(err) = self.send_message(chat_id, text).await {
            error!(error = %err, "failed to send telegram message");
        }
    }

    /// Long-poll getUpdates starting at `offset`.
    ///
    /// The HTTP timeout is the poll window plus slack, so an empty window
    /// returns an empty list rather than a timeout error in the common case.
    pub async fn get_updates(&self, offset: i64, poll_seconds: u64) -> Result<Vec<Update>> {
        let response = self
            .http_client
            .get(self.method_url("getUpdates")?)
            .timeout(Duration::from_secs(poll_seconds) + POLL_EXTRA_TIMEOUT)
            .query(&[("offset", offset.to_string()), ("timeout", poll_seconds.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenNewsError::api_error(status, body));
        }

        let decoded: UpdatesResponse = response.json().await?;
        Ok(decoded.result)
    }
}

/// Truncate to the protocol bound on a char boundary, marking the cut
pub fn truncate_message(text: &str) -> Cow<'_, str> {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return Cow::Borrowed(text);
    }
    let mut truncated: String = text.chars().take(MAX_MESSAGE_CHARS - 1).collect();
    truncated.push('…');
    Cow::Owned(truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> TelegramClient {
        TelegramClient::with_base_url(&server.uri(), "bot-token", "4242").expect("client init")
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_message("hello"), "hello");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "é".repeat(MAX_MESSAGE_CHARS + 50);
        let truncated = truncate_message(&long);
        assert_eq!(truncated.chars().count(), MAX_MESSAGE_CHARS);
        assert!(truncated.ends_with('…'));
    }

    #[tokio::test]
    async fn test_send_message_posts_payload() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/botbot-token/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": "4242",
                "text": "hello",
                "parse_mode": "Markdown",
                "disable_web_page_preview": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server)
            .send_message(None, "hello")
            .await
            .expect("send_message failed");
    }

    #[tokio::test]
    async fn test_identical_sends_are_independent_requests() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/botbot-token/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.send_message(None, "same text").await.expect("first send");
        client.send_message(None, "same text").await.expect("second send");
    }

    #[tokio::test]
    async fn test_notify_swallows_failures() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("POST"))
            .and(path("/botbot-token/sendMessage"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        // Must not panic or propagate
        test_client(&server).notify(None, "hello").await;
    }

    #[tokio::test]
    async fn test_send_message_requires_configuration() {
        let server = MockServer::start().await;
        let client = TelegramClient::with_base_url(&server.uri(), "bot-token", "")
            .expect("client init");
        let err = client
            .send_message(None, "hello")
            .await
            .expect_err("expected config error");
        assert!(matches!(err, OpenNewsError::Config(_)));
    }

    #[tokio::test]
    async fn test_get_updates_decodes_result() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/botbot-token/getUpdates"))
            .and(query_param("offset", "7"))
            .and(query_param("timeout", "30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [
                    {"update_id": 7, "message": {"text": "/ping", "chat": {"id": 99}}},
                    {"update_id": 8}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let updates = test_client(&server)
            .get_updates(7, 30)
            .await
            .expect("get_updates failed");
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].update_id, 7);
        assert_eq!(
            updates[0]
                .message
                .as_ref()
                .and_then(|message| message.text.as_deref()),
            Some("/ping")
        );
        assert!(updates[1].message.is_none());
    }
}

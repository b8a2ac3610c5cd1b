/*
[INPUT]:  Telegram updates via long polling
[OUTPUT]: Command replies to the originating chat
[POS]:    Bot layer - /start /ping /status /help dispatch
[UPDATE]: When adding commands or changing reply text
*/

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use opennews_adapter::telegram::{TelegramClient, Update};

use crate::status::StatusRx;

const POLL_SECONDS: u64 = 30;
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

const START_TEXT: &str = "👋 Hello! I am the OpenNews monitor bot.\n\
    I push real-time crypto news to this chat.\n\
    Send /help to see what I can do.";
const PONG_TEXT: &str = "Pong! 🏓";
const HELP_TEXT: &str = "*Available commands*\n\
    /start - introduction\n\
    /ping - liveness check\n\
    /status - feed connection state\n\
    /help - this message";
const MENTION_REPLY: &str = "I am here! Send /help for commands.";

/// Long-polling Telegram command listener.
///
/// Each update is acknowledged exactly once by advancing the offset past its
/// update id. Unknown text is ignored unless it mentions the bot.
pub struct CommandListener {
    telegram: TelegramClient,
    status: StatusRx,
    poll_seconds: u64,
    error_backoff: Duration,
}

impl CommandListener {
    pub fn new(telegram: TelegramClient, status: StatusRx) -> Self {
        Self {
            telegram,
            status,
            poll_seconds: POLL_SECONDS,
            error_backoff: ERROR_BACKOFF,
        }
    }

    #[cfg(test)]
    fn with_poll(mut self, poll_seconds: u64, error_backoff: Duration) -> Self {
        self.poll_seconds = poll_seconds;
        self.error_backoff = error_backoff;
        self
    }

    /// Run until cancelled
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!("starting telegram command listener");
        let mut offset = 0i64;
        loop {
            let updates = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = self.telegram.get_updates(offset, self.poll_seconds) => result,
            };

            match updates {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        self.handle(update).await;
                    }
                }
                // An empty long-poll window surfacing as a timeout is routine
                Err(err) if err.is_timeout() => continue,
                Err(err) => {
                    error!(error = %err, "command polling error");
                    tokio::select! {
                        _ = tokio::time::sleep(self.error_backoff) => {}
                        _ = shutdown.cancelled() => break,
                    }
                }
            }
        }
        info!("command listener stopped");
    }

    async fn handle(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(text) = message.text else {
            return;
        };
        let chat_id = message.chat.map(|chat| chat.id.to_string());
        let chat_id = chat_id.as_deref();
        info!(text = %text, "command received");

        if text.starts_with("/start") {
            self.telegram.notify(chat_id, START_TEXT).await;
        } else if text.starts_with("/ping") {
            self.telegram.notify(chat_id, PONG_TEXT).await;
        } else if text.starts_with("/status") {
            let summary = self.status.borrow().summary();
            self.telegram.notify(chat_id, &summary).await;
        } else if text.starts_with("/help") {
            self.telegram.notify(chat_id, HELP_TEXT).await;
        } else if is_mention(&text) {
            self.telegram.notify(chat_id, MENTION_REPLY).await;
        }
    }
}

/// Loose mention check: an @ anywhere plus the word "bot" in any case
pub fn is_mention(text: &str) -> bool {
    text.contains('@') && text.to_lowercase().contains("bot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{MonitorStatus, status_channel};
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_is_mention() {
        assert!(is_mention("@newsbot what happened?"));
        assert!(is_mention("hey @NewsBOT"));
        assert!(!is_mention("plain chatter"));
        assert!(!is_mention("bot without at-sign"));
        assert!(!is_mention("@someone unrelated"));
    }

    fn update(id: i64, text: &str, chat: i64) -> Value {
        json!({"update_id": id, "message": {"text": text, "chat": {"id": chat}}})
    }

    async fn sent_texts(server: &MockServer) -> Vec<(String, String)> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path().ends_with("/sendMessage"))
            .map(|request| {
                let body: Value = serde_json::from_slice(&request.body).expect("json body");
                (
                    body["chat_id"].as_str().unwrap_or_default().to_string(),
                    body["text"].as_str().unwrap_or_default().to_string(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_commands_replied_to_origin_chat_and_acked() {
        let server = MockServer::start().await;

        // First poll delivers the batch, every later offset is empty
        Mock::given(method("GET"))
            .and(path("/botbot-token/getUpdates"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [
                    update(11, "/ping", 99),
                    update(12, "unrelated chatter", 99),
                    update(13, "hi @newsbot", 77),
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/botbot-token/getUpdates"))
            .and(query_param("offset", "14"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": []})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/botbot-token/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let telegram =
            TelegramClient::with_base_url(&server.uri(), "bot-token", "4242").expect("client init");
        let (_status_tx, status_rx) = status_channel();
        let mut listener = CommandListener::new(telegram, status_rx)
            .with_poll(0, Duration::from_millis(10));

        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let task = tokio::spawn(async move { listener.run(token).await });

        tokio::time::sleep(Duration::from_millis(200)).await;
        shutdown.cancel();
        task.await.expect("listener task");

        let sent = sent_texts(&server).await;
        assert_eq!(sent.len(), 2, "sent: {sent:?}");
        assert_eq!(sent[0], ("99".to_string(), PONG_TEXT.to_string()));
        assert_eq!(sent[1].0, "77");
        assert_eq!(sent[1].1, MENTION_REPLY);
    }

    #[tokio::test]
    async fn test_status_command_reports_current_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botbot-token/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let telegram =
            TelegramClient::with_base_url(&server.uri(), "bot-token", "4242").expect("client init");
        let (status_tx, status_rx) = status_channel();
        status_tx
            .send(MonitorStatus::disconnected("socket reset"))
            .expect("send status");

        let listener = CommandListener::new(telegram, status_rx);
        let decoded: Update = serde_json::from_value(update(5, "/status", 31)).expect("update");
        listener.handle(decoded).await;

        let sent = sent_texts(&server).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "31");
        assert!(sent[0].1.contains("🔴 Disconnected"));
        assert!(sent[0].1.contains("socket reset"));
    }
}

/*
[INPUT]:  WebSocket URL and API token (token travels as a query parameter)
[OUTPUT]: Decoded feed messages and subscribe acknowledgements
[POS]:    WebSocket layer - single-connection session transport
[UPDATE]: When the subscribe protocol or handshake auth changes
*/

use async_trait::async_trait;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};

use crate::http::{OpenNewsError, Result};
use crate::types::SubscribeFilter;

/// Default WebSocket endpoint for the OpenNews feed
pub const DEFAULT_WSS_URL: &str = "wss://ai.6551.io/open/news_wss";

const SUBSCRIBE_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(0);

type Stream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One WebSocket session to the news feed.
///
/// The seam the collector and the monitor loop are written against; the
/// concrete transport is `NewsFeedSocket`.
#[async_trait]
pub trait NewsFeed: Send {
    /// Open the connection. Auth rejection during the handshake maps to an
    /// `Authentication` fault, distinguishable from transient failures.
    async fn connect(&mut self) -> Result<()>;

    /// Send one `news.subscribe` request and wait for exactly one reply.
    /// The filter must be resent after every reconnect.
    async fn subscribe(&mut self, filter: &SubscribeFilter) -> Result<Value>;

    /// Wait up to `timeout` for the next feed message. `Ok(None)` means the
    /// window passed quietly; a closed or errored stream is a fault.
    async fn receive(&mut self, timeout: Duration) -> Result<Option<Value>>;

    /// Idempotent teardown; safe on a never-opened transport.
    async fn close(&mut self);
}

/// WebSocket client for the real-time news subscription
#[derive(Debug)]
pub struct NewsFeedSocket {
    url: String,
    stream: Option<Stream>,
}

impl NewsFeedSocket {
    pub fn new(wss_url: &str, token: &str) -> Self {
        Self {
            url: format!("{wss_url}?token={token}"),
            stream: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

#[async_trait]
impl NewsFeed for NewsFeedSocket {
    async fn connect(&mut self) -> Result<()> {
        let (stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(classify_handshake_error)?;
        self.stream = Some(stream);
        debug!("websocket connected");
        Ok(())
    }

    async fn subscribe(&mut self, filter: &SubscribeFilter) -> Result<Value> {
        if self.stream.is_none() {
            self.connect().await?;
        }
        let Some(stream) = self.stream.as_mut() else {
            return Err(OpenNewsError::WebSocket("not connected".to_string()));
        };

        let request_id = next_request_id();
        let request = serde_json::json!({
            "method": "news.subscribe",
            "id": request_id,
            "params": filter,
        });
        stream
            .send(WsMessage::Text(request.to_string().into()))
            .await
            .map_err(|err| OpenNewsError::WebSocket(err.to_string()))?;
        debug!(request_id, "subscribe request sent");

        match tokio::time::timeout(SUBSCRIBE_REPLY_TIMEOUT, next_json(stream)).await {
            Ok(reply) => reply,
            Err(_) => Err(OpenNewsError::Timeout {
                duration: SUBSCRIBE_REPLY_TIMEOUT.as_secs(),
            }),
        }
    }

    async fn receive(&mut self, timeout: Duration) -> Result<Option<Value>> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            match tokio::time::timeout(remaining, stream.next()).await {
                Err(_) => return Ok(None),
                Ok(None) => return Err(OpenNewsError::WebSocket("stream closed".to_string())),
                Ok(Some(Err(err))) => return Err(OpenNewsError::WebSocket(err.to_string())),
                Ok(Some(Ok(message))) => {
                    // Control frames and malformed payloads wait out the window
                    if let Some(value) = decode_frame(message)? {
                        return Ok(Some(value));
                    }
                }
            }
        }
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(err) = stream.close(None).await {
                debug!(error = %err, "websocket close error ignored");
            }
        }
    }
}

/// Read frames until one decodes to JSON
async fn next_json(stream: &mut Stream) -> Result<Value> {
    loop {
        match stream.next().await {
            None => return Err(OpenNewsError::WebSocket("stream closed".to_string())),
            Some(Err(err)) => return Err(OpenNewsError::WebSocket(err.to_string())),
            Some(Ok(message)) => {
                if let Some(value) = decode_frame(message)? {
                    return Ok(value);
                }
            }
        }
    }
}

/// Decode one frame; `Ok(None)` for control frames and malformed payloads
fn decode_frame(message: WsMessage) -> Result<Option<Value>> {
    let text = match message {
        WsMessage::Text(text) => text.to_string(),
        WsMessage::Binary(bytes) => match String::from_utf8(bytes.to_vec()) {
            Ok(text) => text,
            Err(_) => {
                warn!(bytes = bytes.len(), "non-utf8 feed frame dropped");
                return Ok(None);
            }
        },
        WsMessage::Close(_) => {
            return Err(OpenNewsError::WebSocket(
                "connection closed by server".to_string(),
            ));
        }
        _ => return Ok(None),
    };

    match serde_json::from_str(&text) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(error = %err, bytes = text.len(), "malformed feed payload dropped");
            Ok(None)
        }
    }
}

fn classify_handshake_error(err: WsError) -> OpenNewsError {
    if let WsError::Http(response) = &err {
        let status = response.status();
        if status.as_u16() == 401 {
            return OpenNewsError::Authentication {
                message: format!("WebSocket handshake rejected: HTTP {status}"),
            };
        }
    }
    let text = err.to_string();
    if text.contains("401") {
        return OpenNewsError::Authentication { message: text };
    }
    OpenNewsError::WebSocket(text)
}

/// Unique within the process; carries no server-side correlation guarantee
fn next_request_id() -> String {
    let seq = REQUEST_SEQ.fetch_add(1, Ordering::Relaxed) + 1;
    format!("req_{}_{}", seq, Utc::now().timestamp())
}

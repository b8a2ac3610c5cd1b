/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for opennews-adapter tests

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
#[allow(dead_code)]
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Handle to one mocked feed session
#[allow(dead_code)]
pub struct FeedServerHandle {
    pub url: String,
    pub close_frames: Arc<AtomicUsize>,
    pub subscribe_request: Arc<Mutex<Option<Value>>>,
}

impl FeedServerHandle {
    /// Wait briefly for the server to observe a close frame
    #[allow(dead_code)]
    pub async fn close_frame_count(&self) -> usize {
        for _ in 0..50 {
            let count = self.close_frames.load(Ordering::SeqCst);
            if count > 0 {
                return count;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        self.close_frames.load(Ordering::SeqCst)
    }
}

/// Spawn a one-connection feed server: acknowledges the first subscribe
/// request, pushes the given messages, then stays quiet while counting
/// close frames from the client.
#[allow(dead_code)]
pub async fn spawn_feed_server(news: Vec<Value>) -> FeedServerHandle {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let close_frames = Arc::new(AtomicUsize::new(0));
    let subscribe_request = Arc::new(Mutex::new(None));

    let close_counter = close_frames.clone();
    let request_slot = subscribe_request.clone();
    tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let mut ws = accept_async(stream).await.expect("handshake");

        if let Some(Ok(Message::Text(text))) = ws.next().await {
            let request: Value = serde_json::from_str(text.as_str()).expect("subscribe json");
            let ack = serde_json::json!({
                "id": request.get("id").cloned().unwrap_or(Value::Null),
                "result": "ok",
            });
            *request_slot.lock().await = Some(request);
            let _ = ws.send(Message::Text(ack.to_string().into())).await;
        }

        for item in news {
            let _ = ws.send(Message::Text(item.to_string().into())).await;
        }

        while let Some(Ok(frame)) = ws.next().await {
            if matches!(frame, Message::Close(_)) {
                close_counter.fetch_add(1, Ordering::SeqCst);
            }
        }
    });

    FeedServerHandle {
        url: format!("ws://{addr}/"),
        close_frames,
        subscribe_request,
    }
}

/// Spawn a server rejecting every WebSocket handshake with HTTP 401
#[allow(dead_code)]
pub async fn spawn_auth_reject_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut buffer = [0u8; 2048];
            use tokio::io::AsyncReadExt;
            let _ = stream.read(&mut buffer).await;
            let _ = stream
                .write_all(b"HTTP/1.1 401 Unauthorized\r\ncontent-length: 0\r\n\r\n")
                .await;
            let _ = stream.flush().await;
        }
    });

    format!("ws://{addr}")
}

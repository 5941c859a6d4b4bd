//! Shared helpers for the integration tests: an in-process server on an
//! ephemeral port and a thin WebSocket test client.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hayaoshi_server::{bootstrap::build_server, ui::ServerConfig};
use hayaoshi_shared::time::SystemClock;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

/// How long a test waits for an expected message
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// Helper struct to manage the server lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: CancellationToken,
}

impl TestServer {
    /// Start a server with default settings
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    /// Start a server with the given settings on an ephemeral port
    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let server = build_server(config, Arc::new(SystemClock));
        let shutdown = server.shutdown_token();
        tokio::spawn(async move {
            if let Err(e) = server.serve(listener).await {
                panic!("Server error: {}", e);
            }
        });
        TestServer { addr, shutdown }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Get the URL of an HTTP API path
    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn connect(&self) -> TestClient {
        let (stream, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect");
        TestClient { stream }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Stop the server when the test ends
        self.shutdown.cancel();
    }
}

/// Helper struct wrapping one WebSocket connection
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn send_json(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .expect("Failed to send message");
    }

    pub async fn join(&mut self, room_code: &str, participant_id: &str) {
        self.send_json(serde_json::json!({
            "type": "join",
            "roomCode": room_code,
            "participant": {"id": participant_id, "displayName": participant_id.to_uppercase()},
        }))
        .await;
    }

    pub async fn buzz(&mut self, room_code: &str, participant_id: &str) {
        self.send_json(serde_json::json!({
            "type": "buzz",
            "roomCode": room_code,
            "participant": {"id": participant_id, "displayName": participant_id.to_uppercase()},
        }))
        .await;
    }

    pub async fn start_question(&mut self, room_code: &str) {
        self.send_json(serde_json::json!({"type": "startQuestion", "roomCode": room_code}))
            .await;
    }

    /// Next text message as JSON. Control frames are skipped.
    pub async fn recv_json(&mut self) -> Value {
        self.try_recv_json(RECV_TIMEOUT)
            .await
            .expect("Timed out waiting for a message")
    }

    /// Next text message within `wait`, or `None` on timeout.
    pub async fn try_recv_json(&mut self, wait: Duration) -> Option<Value> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let next = tokio::time::timeout_at(deadline, self.stream.next())
                .await
                .ok()?;
            match next {
                Some(Ok(Message::Text(text))) => {
                    return Some(serde_json::from_str(text.as_str()).expect("Invalid JSON"));
                }
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {
                    panic!("Connection closed while waiting for a message")
                }
                Some(Ok(_)) => continue,
            }
        }
    }

    /// Receive until a message of `message_type` arrives.
    pub async fn recv_type(&mut self, message_type: &str) -> Value {
        loop {
            let message = self.recv_json().await;
            if message["type"] == message_type {
                return message;
            }
        }
    }

    /// Assert no text message arrives within `wait`.
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Some(message) = self.try_recv_json(wait).await {
            panic!("Unexpected message: {}", message);
        }
    }

    /// Wait until the server closes this connection.
    ///
    /// Returns `false` if the connection is still open after `wait`.
    /// Frames that arrive before the close are skipped.
    pub async fn wait_closed(&mut self, wait: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            match tokio::time::timeout_at(deadline, self.stream.next()).await {
                Err(_) => return false,
                Ok(None) | Ok(Some(Err(_))) | Ok(Some(Ok(Message::Close(_)))) => return true,
                Ok(Some(Ok(_))) => continue,
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Ids of the `players` array of an `update` / `scoreUpdate` message
pub fn player_ids(message: &Value) -> Vec<String> {
    message["players"]
        .as_array()
        .expect("players must be an array")
        .iter()
        .map(|p| p["id"].as_str().expect("id must be a string").to_string())
        .collect()
}

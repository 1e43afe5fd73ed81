use std::time::Duration;

use axum_test::{TestServer, TestWebSocket};
use serde_json::{Value, json};

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
}

impl WsTestClient {
    /// Connect to the hub's WebSocket endpoint
    pub async fn connect(server: &TestServer) -> Self {
        let ws = server.get_websocket("/ws").await.into_websocket().await;

        Self { ws }
    }

    pub async fn join(&mut self, room: &str) {
        self.send_json(json!({ "type": "join_room", "room": room })).await;
    }

    pub async fn leave(&mut self, room: &str) {
        self.send_json(json!({ "type": "leave_room", "room": room })).await;
    }

    pub async fn broadcast(&mut self, room: &str, data: Value) {
        self.send_json(json!({ "type": "broadcast", "room": room, "data": data }))
            .await;
    }

    pub async fn send_json(&mut self, frame: Value) {
        self.ws.send_text(frame.to_string()).await;
    }

    /// Send text message verbatim
    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    /// Receive the next envelope, failing the test after two seconds
    pub async fn receive_envelope(&mut self) -> Value {
        let text = tokio::time::timeout(Duration::from_secs(2), self.ws.receive_text())
            .await
            .expect("no envelope received");
        serde_json::from_str(&text).expect("envelope is not JSON")
    }

    /// True if nothing arrives within `wait`
    pub async fn receives_nothing_within(&mut self, wait: Duration) -> bool {
        tokio::time::timeout(wait, self.ws.receive_text())
            .await
            .is_err()
    }

    /// Close the WebSocket connection
    pub async fn close(self) {
        self.ws.close().await;
    }
}

/// Connect `count` clients
pub async fn connect_clients(server: &TestServer, count: usize) -> Vec<WsTestClient> {
    let mut clients = Vec::with_capacity(count);
    for _ in 0..count {
        clients.push(WsTestClient::connect(server).await);
    }
    clients
}

#![allow(dead_code)]

use futures_util::StreamExt;
use imposter::{AppState, ExpiryPolicy, Word, WordRepository};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub struct TestServer {
    addr: String,
    client: reqwest::Client,
}

impl TestServer {
    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        let response = self.client.get(self.http_url(path)).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    pub async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .client
            .post(self.http_url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    /// Create a lobby and return its code
    pub async fn create_lobby(&self, host: &str) -> String {
        let (status, body) = self.post("/api/lobbies", json!({ "hostName": host })).await;
        assert_eq!(status, 200, "create failed: {body}");
        body["lobbyCode"].as_str().unwrap().to_string()
    }

    pub async fn join(&self, code: &str, player: &str) -> (u16, Value) {
        self.post(
            &format!("/api/lobby/{code}/join"),
            json!({ "playerName": player }),
        )
        .await
    }

    pub async fn act(&self, code: &str, action: &str, player: &str) -> (u16, Value) {
        self.post(
            &format!("/api/lobby/{code}/{action}"),
            json!({ "playerName": player }),
        )
        .await
    }

    /// Lobby with Alice hosting and Bob joined
    pub async fn lobby_with_bob(&self) -> String {
        let code = self.create_lobby("Alice").await;
        let (status, _) = self.join(&code, "Bob").await;
        assert_eq!(status, 200);
        code
    }
}

pub async fn spawn_test_server() -> TestServer {
    spawn_test_server_with(ExpiryPolicy::default()).await
}

pub async fn spawn_test_server_with(expiry: ExpiryPolicy) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let words = WordRepository::new(vec![Word::new("ocean", "water")]);
    let state = AppState::new(Arc::new(words), expiry);

    tokio::spawn(async move {
        let app = imposter::app(state);
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        addr: addr.to_string(),
        client: reqwest::Client::new(),
    }
}

pub async fn subscribe(server: &TestServer, code: &str) -> WsStream {
    let url = server.ws_url(&format!("/api/lobby/{code}/events"));
    let (ws, _) = connect_async(&url).await.expect("Failed to connect");
    ws
}

/// Next text frame as JSON, skipping control frames
pub async fn recv(ws: &mut WsStream) -> Value {
    loop {
        let msg = ws.next().await.unwrap().unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

pub fn is_lobby_code(code: &str) -> bool {
    code.len() == 8
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

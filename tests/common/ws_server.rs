//! A scripted WebSocket game server on a local port.

use std::time::Duration;

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::routing::get;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// How long a test waits for the server to observe something.
pub const SEEN_TIMEOUT: Duration = Duration::from_secs(2);

/// What the server saw from the client.
#[derive(Debug, PartialEq)]
pub enum Seen {
    Text(Value),
    Close(Option<u16>),
    /// The connection ended without a close frame.
    Dropped,
}

/// What the server does once its replies run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhenDone {
    /// Keep the connection open and say nothing.
    Silent,
    /// Send a close frame and drop the connection.
    HangUp,
}

/// Serves `/ws`, reporting every client frame and answering the n-th text
/// message with the n-th reply. Returns the endpoint URL.
pub async fn spawn_ws_server(
    replies: Vec<Value>,
    when_done: WhenDone,
) -> (String, mpsc::UnboundedReceiver<Seen>) {
    let (seen_tx, seen_rx) = mpsc::unbounded_channel();
    let app = Router::new().route(
        "/ws",
        get(move |ws: WebSocketUpgrade| {
            let seen = seen_tx.clone();
            let replies = replies.clone();
            async move {
                ws.on_upgrade(move |socket| handle_socket(socket, seen, replies, when_done))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });
    (format!("ws://{}/ws", addr), seen_rx)
}

async fn handle_socket(
    mut socket: WebSocket,
    seen: mpsc::UnboundedSender<Seen>,
    replies: Vec<Value>,
    when_done: WhenDone,
) {
    let mut replies = replies.into_iter();
    loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => {
                let value: Value =
                    serde_json::from_str(text.as_str()).expect("Client sent bad JSON");
                let _ = seen.send(Seen::Text(value));
                match (replies.next(), when_done) {
                    (Some(reply), _) => {
                        let _ = socket.send(Message::Text(reply.to_string().into())).await;
                    }
                    (None, WhenDone::HangUp) => {
                        let _ = socket.send(Message::Close(None)).await;
                        return;
                    }
                    (None, WhenDone::Silent) => {}
                }
            }
            Some(Ok(Message::Close(frame))) => {
                let _ = seen.send(Seen::Close(frame.map(|f| f.code)));
                return;
            }
            Some(Ok(_)) => {}
            Some(Err(_)) | None => {
                let _ = seen.send(Seen::Dropped);
                return;
            }
        }
    }
}

/// Next thing the server saw, or `None` if nothing arrives in time.
pub async fn next_seen(seen: &mut mpsc::UnboundedReceiver<Seen>) -> Option<Seen> {
    tokio::time::timeout(SEEN_TIMEOUT, seen.recv())
        .await
        .ok()
        .flatten()
}

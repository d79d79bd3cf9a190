//! Message-oriented transport session over a WebSocket.
//!
//! A [`Session`] owns one connection. Outbound text goes through a writer
//! task and inbound text arrives through a reader task, each behind a
//! channel that holds at most one frame. Closing is signalled out of band
//! through a [`CloseHandle`] so it can overtake a pending write and never
//! waits on the protocol loop. Dropping the session closes it too.
//!
//! The writer owns teardown: once it has sent the close frame it gives the
//! reader [`CLOSE_LINGER`] to see the peer's answer, then aborts it so both
//! halves of the socket are released.

use std::sync::Arc;
use std::time::Duration;

use derive_more::{Display, Error};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::net::TcpStream;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, instrument, warn};

/// Frames buffered per direction.
pub const FRAME_BUFFER: usize = 1;

/// Longest a WebSocket handshake may take before the dial fails.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(45);

/// How long the reader may wait for the peer's close reply.
pub const CLOSE_LINGER: Duration = Duration::from_millis(500);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Inbound = Result<String, TransportError>;

/// Category of transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum TransportErrorKind {
    /// The endpoint could not be reached.
    ConnectionFailed,
    /// The connection closed while a message was expected.
    Closed,
    /// A message could not be encoded or decoded.
    Malformed,
    /// A message could not be written.
    SendFailed,
}

/// Transport error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Transport error ({}): {} at {}:{}", kind, message, file, line)]
pub struct TransportError {
    /// Failure category.
    pub kind: TransportErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TransportError {
    /// Creates a new transport error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        debug!(kind = %kind, error_message = %message, "Transport error created");
        Self {
            kind,
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Requests a normal-closure frame on a session.
///
/// Cloneable and idempotent: closing twice, or after the connection has
/// already failed, does nothing.
#[derive(Debug, Clone)]
pub struct CloseHandle {
    closing: Arc<Notify>,
}

impl CloseHandle {
    /// Signals the session to send its close frame.
    pub fn close(&self) {
        debug!("Close requested");
        self.closing.notify_one();
    }
}

/// One bidirectional message connection.
#[derive(Debug)]
pub struct Session {
    outbound: mpsc::Sender<String>,
    inbound: mpsc::Receiver<Inbound>,
    closing: Arc<Notify>,
}

impl Session {
    /// Dials a WebSocket endpoint.
    ///
    /// There is no retry: an unreachable endpoint, or one that does not
    /// finish the handshake within `handshake_timeout`, is reported
    /// immediately as [`TransportErrorKind::ConnectionFailed`].
    #[instrument]
    pub async fn connect(
        endpoint: &str,
        handshake_timeout: Duration,
    ) -> Result<Self, TransportError> {
        info!("Connecting to game server");

        let dial = tokio::time::timeout(handshake_timeout, connect_async(endpoint))
            .await
            .map_err(|_| {
                error!("Handshake timed out");
                TransportError::new(
                    TransportErrorKind::ConnectionFailed,
                    format!(
                        "dial {}: handshake timed out after {:?}",
                        endpoint, handshake_timeout
                    ),
                )
            })?;
        let (stream, response) = dial.map_err(|e| {
            error!(error = %e, "Dial failed");
            TransportError::new(
                TransportErrorKind::ConnectionFailed,
                format!("dial {}: {}", endpoint, e),
            )
        })?;
        debug!(status = %response.status(), "WebSocket handshake complete");

        let (sink, stream) = stream.split();
        let (outbound, outbound_rx) = mpsc::channel(FRAME_BUFFER);
        let (inbound_tx, inbound) = mpsc::channel(FRAME_BUFFER);
        let closing = Arc::new(Notify::new());

        let reader = tokio::spawn(read_frames(stream, inbound_tx));
        tokio::spawn(write_frames(sink, outbound_rx, closing.clone(), reader));

        info!("Connected to game server");
        Ok(Self {
            outbound,
            inbound,
            closing,
        })
    }

    /// Creates a session wired to an in-memory [`Peer`].
    pub fn pair() -> (Self, Peer) {
        let (outbound, frames) = mpsc::channel(FRAME_BUFFER);
        let (replies, inbound) = mpsc::channel(FRAME_BUFFER);
        let closing = Arc::new(Notify::new());
        let peer = Peer {
            frames,
            replies: Some(replies),
            closing: closing.clone(),
        };
        (
            Self {
                outbound,
                inbound,
                closing,
            },
            peer,
        )
    }

    /// Serializes and writes one message.
    #[instrument(skip_all)]
    pub async fn send<M: Serialize>(&mut self, message: &M) -> Result<(), TransportError> {
        let text = serde_json::to_string(message).map_err(|e| {
            TransportError::new(TransportErrorKind::Malformed, format!("encode: {}", e))
        })?;
        debug!(message = %text, "Sending message");
        self.outbound.send(text).await.map_err(|_| {
            TransportError::new(
                TransportErrorKind::SendFailed,
                "connection writer has shut down",
            )
        })
    }

    /// Waits for the next full message and decodes it.
    #[instrument(skip_all)]
    pub async fn receive<T: DeserializeOwned>(&mut self) -> Result<T, TransportError> {
        match self.inbound.recv().await {
            Some(Ok(text)) => {
                debug!(message = %text, "Received message");
                serde_json::from_str(&text).map_err(|e| {
                    warn!(error = %e, message = %text, "Undecodable message");
                    TransportError::new(TransportErrorKind::Malformed, format!("decode: {}", e))
                })
            }
            Some(Err(e)) => Err(e),
            None => Err(TransportError::new(
                TransportErrorKind::Closed,
                "connection closed",
            )),
        }
    }

    /// Returns a handle that can close this session from another task.
    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle {
            closing: self.closing.clone(),
        }
    }

    /// Sends a normal-closure frame.
    pub fn close(&self) {
        self.close_handle().close();
    }
}

/// Writes queued text until the session is closed or dropped, then sends
/// the close frame and tears the connection down.
async fn write_frames(
    mut sink: SplitSink<WsStream, Message>,
    mut frames: mpsc::Receiver<String>,
    closing: Arc<Notify>,
    mut reader: JoinHandle<()>,
) {
    loop {
        tokio::select! {
            biased;
            () = closing.notified() => {
                debug!("Close requested");
                break;
            }
            frame = frames.recv() => match frame {
                Some(text) => {
                    if let Err(e) = sink.send(Message::Text(text.into())).await {
                        error!(error = %e, "WebSocket write failed");
                        reader.abort();
                        return;
                    }
                }
                None => {
                    debug!("Session dropped");
                    break;
                }
            },
        }
    }

    let frame = CloseFrame {
        code: CloseCode::Normal,
        reason: "".into(),
    };
    match sink.send(Message::Close(Some(frame))).await {
        Ok(()) => info!("Close frame sent"),
        Err(e) => warn!(error = %e, "Failed to send close frame"),
    }

    if tokio::time::timeout(CLOSE_LINGER, &mut reader).await.is_err() {
        debug!("Peer did not answer the close, dropping connection");
        reader.abort();
    }
    info!("Connection torn down");
}

/// Forwards complete text messages until the peer closes.
async fn read_frames(mut stream: SplitStream<WsStream>, inbound: mpsc::Sender<Inbound>) {
    while let Some(message) = stream.next().await {
        let item = match message {
            Ok(Message::Text(text)) => Ok(text.as_str().to_string()),
            Ok(Message::Binary(bytes)) => String::from_utf8(bytes.to_vec()).map_err(|e| {
                TransportError::new(TransportErrorKind::Malformed, format!("binary frame: {}", e))
            }),
            Ok(Message::Close(frame)) => {
                info!(frame = ?frame, "Peer closed connection");
                return;
            }
            Ok(_) => continue,
            Err(e) => Err(TransportError::new(
                TransportErrorKind::Closed,
                format!("read failed: {}", e),
            )),
        };

        let failed = item.is_err();
        if inbound.send(item).await.is_err() || failed {
            return;
        }
    }
    debug!("WebSocket stream ended");
}

/// What a [`Peer`] observes from its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A serialized message.
    Text(String),
    /// A normal-closure request.
    Close,
}

/// The remote end of [`Session::pair`], for driving the protocol in-process.
#[derive(Debug)]
pub struct Peer {
    frames: mpsc::Receiver<String>,
    replies: Option<mpsc::Sender<Inbound>>,
    closing: Arc<Notify>,
}

impl Peer {
    /// Waits for the next frame from the session.
    ///
    /// Returns `None` once the session is gone.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        tokio::select! {
            biased;
            () = self.closing.notified() => Some(Frame::Close),
            text = self.frames.recv() => text.map(Frame::Text),
        }
    }

    /// Waits for the next message and parses it as JSON.
    ///
    /// Returns `None` on close or when the session is gone.
    pub async fn next_message(&mut self) -> Option<serde_json::Value> {
        match self.next_frame().await? {
            Frame::Text(text) => serde_json::from_str(&text).ok(),
            Frame::Close => None,
        }
    }

    /// Delivers a message to the session. Returns false if it is gone.
    pub async fn reply(&self, message: serde_json::Value) -> bool {
        self.reply_raw(message.to_string()).await
    }

    /// Delivers raw text to the session. Returns false if it is gone.
    pub async fn reply_raw(&self, text: impl Into<String>) -> bool {
        match &self.replies {
            Some(replies) => replies.send(Ok(text.into())).await.is_ok(),
            None => false,
        }
    }

    /// Closes the connection from the remote side.
    pub fn hang_up(&mut self) {
        self.replies = None;
    }
}

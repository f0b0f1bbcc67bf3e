//! Transport - how a session talks to its client
//!
//! A session only needs two things from a connection: the next inbound text
//! frame, and a way to push an outbound one. [`WsTransport`] provides them
//! over an axum WebSocket; [`ChannelTransport`] provides them over in-memory
//! channels so sessions can be driven directly.

use std::future::Future;

use axum::extract::ws::{Message, WebSocket};
use derive_more::{Display, Error};
use tokio::sync::mpsc;

#[derive(Debug, Display, Error)]
pub enum TransportError {
    #[display("connection closed")]
    Closed,
    #[display("websocket error: {source}")]
    WebSocket { source: axum::Error },
}

pub trait Transport: Send {
    /// Next inbound text frame; `None` once the peer has gone away
    ///
    /// Must be cancel-safe: it is raced against ticks and cancellation.
    fn recv(&mut self) -> impl Future<Output = Option<Result<String, TransportError>>> + Send;

    fn send(&mut self, text: String) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// WebSocket connection upgraded by axum
pub struct WsTransport {
    socket: WebSocket,
}

impl WsTransport {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

impl Transport for WsTransport {
    async fn recv(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            match self.socket.recv().await? {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(Ok(text)),
                    Err(_) => eprintln!("[Transport] dropping non-UTF-8 binary frame"),
                },
                Ok(Message::Close(_)) => return None,
                // Pings are answered by axum itself.
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Err(source) => return Some(Err(TransportError::WebSocket { source })),
            }
        }
    }

    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.socket
            .send(Message::Text(text))
            .await
            .map_err(|source| TransportError::WebSocket { source })
    }
}

/// In-memory transport; the other half is a [`ChannelClient`]
#[derive(Debug)]
pub struct ChannelTransport {
    inbound: mpsc::UnboundedReceiver<String>,
    outbound: mpsc::UnboundedSender<String>,
}

/// Client side of a [`ChannelTransport`]
#[derive(Debug)]
pub struct ChannelClient {
    pub tx: mpsc::UnboundedSender<String>,
    pub rx: mpsc::UnboundedReceiver<String>,
}

impl ChannelTransport {
    pub fn pair() -> (ChannelTransport, ChannelClient) {
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        (
            ChannelTransport {
                inbound: in_rx,
                outbound: out_tx,
            },
            ChannelClient {
                tx: in_tx,
                rx: out_rx,
            },
        )
    }
}

impl Transport for ChannelTransport {
    async fn recv(&mut self) -> Option<Result<String, TransportError>> {
        self.inbound.recv().await.map(Ok)
    }

    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.outbound
            .send(text)
            .map_err(|_| TransportError::Closed)
    }
}

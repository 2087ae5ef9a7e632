//! Client transport layer for fourline.
//!
//! Provides the [`Connection`] trait that abstracts over a duplex message
//! channel to the game server, and the [`ConnectionManager`] that owns the
//! lifecycle of exactly one such channel per session:
//!
//! ```text
//! connect() ──→ Open ──→ Closed   (local close, remote close, or error)
//! ```
//!
//! There is no reconnection. Once a manager reaches `Closed` it stays there.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket client via `tokio-tungstenite`
//! - `native-tls`: `wss://` support through the platform TLS library.
//!   Without it, connecting to a `wss://` URL fails with `ConnectFailed`.

#![allow(async_fn_in_trait)]

mod error;
mod manager;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use manager::{ConnectionManager, ConnectionState};
#[cfg(feature = "websocket")]
pub use websocket::WebSocketConnection;

use std::fmt;

/// Process-local number of a channel, used to tag log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wraps a raw counter value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw counter value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A single duplex channel that can send and receive message frames.
///
/// The WebSocket client is the production implementation. Tests drive the
/// [`ConnectionManager`] with in-memory implementations.
pub trait Connection: Send + Sync + 'static {
    /// Sends one message frame to the server.
    async fn send(&self, data: &[u8]) -> Result<(), TransportError>;

    /// Receives the next message frame from the server.
    ///
    /// `Ok(None)` means the server closed the channel.
    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError>;

    /// Sends a close frame and releases the socket.
    async fn close(&self) -> Result<(), TransportError>;

    /// The channel's log tag.
    fn id(&self) -> ConnectionId;
}

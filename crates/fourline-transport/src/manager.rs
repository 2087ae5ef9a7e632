//! The connection manager: one channel, one lifecycle.

use std::fmt;

use crate::{Connection, ConnectionId, TransportError};

// ---------------------------------------------------------------------------
// ConnectionState
// ---------------------------------------------------------------------------

/// Lifecycle state of the session's channel.
///
/// ```text
/// Open → Closed
/// ```
///
/// The connecting phase has no state value: it is the pending
/// [`ConnectionManager::connect`] call, and no manager exists until the
/// handshake succeeds. `Closed` is terminal: a dropped connection ends the
/// session and the user has to start a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closed,
}

impl ConnectionState {
    /// Returns `true` if messages may be sent.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!((self, target), (Self::Open, Self::Closed))
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

// ---------------------------------------------------------------------------
// ConnectionManager
// ---------------------------------------------------------------------------

/// Owns the single duplex channel of a session.
///
/// Inbound frames are dispatched through exactly one place, [`recv`],
/// so there is no handler slot that a second registration could clobber.
///
/// [`recv`]: ConnectionManager::recv
pub struct ConnectionManager<C: Connection> {
    conn: C,
    state: ConnectionState,
}

#[cfg(feature = "websocket")]
impl ConnectionManager<crate::WebSocketConnection> {
    /// Opens a WebSocket channel to `url`.
    ///
    /// The manager is handed back `Open` once the handshake completes. If
    /// the transport cannot be established the error is returned and no
    /// manager exists.
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        tracing::info!(url, "connecting");
        let conn = crate::WebSocketConnection::connect(url)
            .await
            .inspect_err(|e| {
                tracing::warn!(url, error = %e, "connection failed");
            })?;
        Ok(Self::new(conn))
    }
}

impl<C: Connection> ConnectionManager<C> {
    /// Wraps an already-established connection. The manager starts `Open`.
    pub fn new(conn: C) -> Self {
        tracing::info!(conn_id = %conn.id(), "connection open");
        Self {
            conn,
            state: ConnectionState::Open,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns `true` while the channel is open.
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Identifier of the underlying connection.
    pub fn id(&self) -> ConnectionId {
        self.conn.id()
    }

    /// Transmits one serialized message.
    ///
    /// Fails with [`TransportError::NotConnected`] without touching the
    /// wire if the channel is not open. A transport failure closes the
    /// channel.
    pub async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if !self.state.is_open() {
            return Err(TransportError::NotConnected(self.state));
        }
        if let Err(e) = self.conn.send(data).await {
            tracing::warn!(conn_id = %self.id(), error = %e, "send failed");
            self.transition(ConnectionState::Closed);
            return Err(e);
        }
        tracing::trace!(conn_id = %self.id(), bytes = data.len(), "frame sent");
        Ok(())
    }

    /// Waits for the next inbound frame.
    ///
    /// Returns `None` once the channel is closed, whether by the server,
    /// by a transport error, or locally. Cancel-safe: no state changes
    /// until a frame or a terminal condition has actually been observed.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        if !self.state.is_open() {
            return None;
        }
        match self.conn.recv().await {
            Ok(Some(frame)) => {
                tracing::trace!(
                    conn_id = %self.id(), bytes = frame.len(), "frame received"
                );
                Some(frame)
            }
            Ok(None) => {
                tracing::info!(conn_id = %self.id(), "connection closed by server");
                self.transition(ConnectionState::Closed);
                None
            }
            Err(e) => {
                tracing::warn!(conn_id = %self.id(), error = %e, "receive failed");
                self.transition(ConnectionState::Closed);
                None
            }
        }
    }

    /// Releases the channel. Idempotent: only the first call touches the wire.
    pub async fn close(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        self.transition(ConnectionState::Closed);
        if let Err(e) = self.conn.close().await {
            tracing::debug!(conn_id = %self.id(), error = %e, "close failed");
        }
    }

    fn transition(&mut self, target: ConnectionState) {
        if self.state.can_transition_to(target) {
            tracing::debug!(
                conn_id = %self.id(), from = %self.state, to = %target,
                "connection state changed"
            );
            self.state = target;
        }
    }
}

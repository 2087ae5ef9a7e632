/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The channel to the server could not be established (refused,
    /// unreachable, bad URL, TLS mismatch). Fatal to the session.
    #[error("connect to {url} failed: {source}")]
    ConnectFailed {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// An operation required an open channel but the manager is already
    /// closed. Nothing was transmitted.
    #[error("not connected (state: {0})")]
    NotConnected(crate::ConnectionState),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}

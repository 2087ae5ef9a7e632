//! Unified error type for the fourline client.

use fourline_protocol::ProtocolError;
use fourline_session::MoveError;
use fourline_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum FourlineError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A local move was refused.
    #[error(transparent)]
    Move(#[from] MoveError),

    /// Joining requires a non-blank username.
    #[error("username must not be empty")]
    EmptyUsername,

    /// A configuration value could not be understood.
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use fourline_transport::ConnectionState;

    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::NotConnected(ConnectionState::Closed);
        let fourline_err: FourlineError = err.into();
        assert!(matches!(fourline_err, FourlineError::Transport(_)));
        assert!(fourline_err.to_string().contains("Closed"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let fourline_err: FourlineError = err.into();
        assert!(matches!(fourline_err, FourlineError::Protocol(_)));
    }

    #[test]
    fn test_from_move_error() {
        let fourline_err: FourlineError = MoveError::ColumnFull(3).into();
        assert_eq!(fourline_err.to_string(), "column 3 is full");
    }

    #[test]
    fn test_invalid_config_message() {
        let err = FourlineError::InvalidConfig {
            key: "FOURLINE_USE_WSS",
            value: "maybe".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value \"maybe\" for FOURLINE_USE_WSS"
        );
    }
}

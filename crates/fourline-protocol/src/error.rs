//! Error types for the protocol layer.
//!
//! When you see a `ProtocolError`, the problem is in what travelled on the
//! wire (bad JSON, unknown message, impossible game state), never in the
//! network or in the local player's action.

/// Errors that can occur while encoding or decoding messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields,
    /// wrong data types, or a payload that doesn't fit its `type`.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The envelope's `type` discriminator names no known message.
    #[error("unknown message type: {0:?}")]
    UnknownType(String),

    /// The message parsed but describes something impossible: a floating
    /// piece, a winner who isn't seated, a turn owned by nobody.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

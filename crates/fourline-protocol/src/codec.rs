//! Codec trait and the JSON implementation.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw frame
//! bytes. The session layer never touches `serde_json` directly; it calls
//! [`Codec::encode_message`] on the way out and [`Codec::decode_message`]
//! on the way in.

use serde::{de::DeserializeOwned, Serialize};

use crate::{ClientMessage, Envelope, ProtocolError, ServerMessage};

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` lets a codec live inside long-lived async tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;

    /// Encodes an outbound intent as one frame.
    fn encode_message(&self, msg: &ClientMessage) -> Result<Vec<u8>, ProtocolError> {
        self.encode(&msg.to_envelope()?)
    }

    /// Decodes one inbound frame into a typed, validated server message.
    ///
    /// # Errors
    /// `Decode` for malformed JSON or payloads, `UnknownType` for an
    /// unrecognized discriminator, `InvalidMessage` for a snapshot that
    /// breaks the game's invariants.
    fn decode_message(&self, data: &[u8]) -> Result<ServerMessage, ProtocolError> {
        let envelope: Envelope = self.decode(data)?;
        tracing::trace!(
            kind = %envelope.kind,
            game_id = envelope.game_id.as_deref().unwrap_or(""),
            "decoded envelope"
        );
        ServerMessage::from_envelope(envelope)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`), which is what the game
/// server speaks.
///
/// ## Example
///
/// ```rust
/// use fourline_protocol::{ClientMessage, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode_message(&ClientMessage::Move { column: 3 }).unwrap();
/// assert_eq!(bytes, br#"{"type":"move","payload":{"column":3}}"#);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

//! Message envelopes: what the client sends and what the server pushes.
//!
//! Every frame on the wire is one JSON object with a `type` discriminator
//! and an optional `payload`:
//!
//! ```text
//! { "type": "move", "payload": { "column": 3 } }
//! { "type": "game-state", "game_id": "…", "payload": { "game": {…}, "player_id": "…" } }
//! ```
//!
//! Decoding is two-step. The frame is first parsed into a loose
//! [`Envelope`] (any `type`, any payload), then the `type` picks which
//! typed payload to parse. This keeps "unknown type" and "bad payload for a
//! known type" as distinct failures.

use serde::{Deserialize, Serialize};

use crate::{GameSnapshot, PlayerId, ProtocolError};

/// The top-level wire object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message discriminator, e.g. `"join"` or `"game-state"`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Game the message refers to. Only the server sets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,

    /// Type-specific body. Left untyped until `kind` is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// Intents the client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Enter matchmaking under a display name.
    Join { username: String },
    /// Drop a piece into a column (0..7).
    Move { column: usize },
    /// Abandon the current game.
    Leave,
}

#[derive(Serialize)]
struct JoinPayload<'a> {
    username: &'a str,
}

#[derive(Serialize)]
struct MovePayload {
    column: usize,
}

#[derive(Serialize)]
struct LeavePayload {}

impl ClientMessage {
    /// The wire `type` for this intent.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Move { .. } => "move",
            Self::Leave => "leave",
        }
    }

    /// Wraps this intent in an [`Envelope`].
    pub fn to_envelope(&self) -> Result<Envelope, ProtocolError> {
        let payload = match self {
            Self::Join { username } => {
                serde_json::to_value(JoinPayload { username })
            }
            Self::Move { column } => {
                serde_json::to_value(MovePayload { column: *column })
            }
            Self::Leave => serde_json::to_value(LeavePayload {}),
        }
        .map_err(ProtocolError::Encode)?;

        Ok(Envelope {
            kind: self.kind().to_string(),
            game_id: None,
            payload: Some(payload),
        })
    }
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// Body of a `game-state` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatePayload {
    /// The full authoritative snapshot.
    pub game: GameSnapshot,

    /// The id of the player this copy was addressed to.
    pub player_id: PlayerId,

    /// Optional human-readable note from the server ("Move accepted").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorPayload {
    error: String,
}

/// Events the server pushes to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// A new authoritative snapshot.
    GameState(GameStatePayload),
    /// The server refused something (usually a move).
    Error { message: String },
}

impl ServerMessage {
    /// Interprets a loosely-parsed envelope.
    ///
    /// Snapshots are validated before being handed out, so a
    /// `ServerMessage::GameState` is always internally consistent.
    pub fn from_envelope(envelope: Envelope) -> Result<Self, ProtocolError> {
        let payload = envelope.payload.unwrap_or(serde_json::Value::Null);
        match envelope.kind.as_str() {
            "game-state" => {
                let state: GameStatePayload =
                    serde_json::from_value(payload).map_err(ProtocolError::Decode)?;
                state.game.validate()?;
                if state.player_id.is_empty() {
                    return Err(ProtocolError::InvalidMessage(
                        "game-state without a player_id".into(),
                    ));
                }
                Ok(Self::GameState(state))
            }
            "error" => {
                let body: ErrorPayload =
                    serde_json::from_value(payload).map_err(ProtocolError::Decode)?;
                Ok(Self::Error {
                    message: body.error,
                })
            }
            other => Err(ProtocolError::UnknownType(other.to_string())),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

//! Error types for the session layer.

use fourline_protocol::{GameStatus, PlayerId};

/// Why a local move was refused.
///
/// Each variant is a distinct precondition of
/// [`attempt_move`](crate::attempt_move), checked in declaration order.
/// When one of these is returned the board is untouched and nothing has
/// been sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// No `game-state` has been received yet, so there is no board.
    #[error("game not initialized")]
    NotReady,

    /// The channel to the server is not open.
    #[error("connection lost")]
    Disconnected,

    /// The server is waiting on the other player.
    #[error("not your turn (current turn: {current})")]
    NotYourTurn { current: PlayerId },

    /// The game is waiting for an opponent or already over.
    #[error("game is not active (status: {0})")]
    GameNotActive(GameStatus),

    /// The column index is outside the board.
    #[error("invalid column {0}")]
    InvalidColumn(usize),

    /// The column's topmost cell is occupied.
    #[error("column {0} is full")]
    ColumnFull(usize),
}

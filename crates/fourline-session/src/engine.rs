//! The optimistic move engine.
//!
//! A local move is applied to the board *before* the server has seen it,
//! so the piece appears immediately. The engine does not judge wins or
//! draws and knows nothing of the server's rules beyond "the column has
//! room". If the server disagrees, its next snapshot replaces the board
//! and the display corrects itself; there is no rollback step.
//!
//! At most one unconfirmed move exists per client: applying a move hands
//! the turn to the opponent, so a second attempt fails the turn check
//! until the server hands it back.

use fourline_protocol::{COLUMNS, Cell, GameStatus, PlayerId};

use crate::{MoveError, SessionState};

/// What a successful [`attempt_move`] did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeculativeMove {
    /// Column the piece was dropped into.
    pub column: usize,
    /// Row it settled in.
    pub row: usize,
    /// The local player's piece.
    pub piece: Cell,
    /// Who the turn was handed to.
    pub next_turn: PlayerId,
}

/// Validates and speculatively applies a local move.
///
/// Preconditions are checked in order, and the first one that fails is
/// returned without touching state:
///
/// 1. a session exists ([`MoveError::NotReady`])
/// 2. the connection is open ([`MoveError::Disconnected`])
/// 3. it is the local player's turn ([`MoveError::NotYourTurn`])
/// 4. the game is active ([`MoveError::GameNotActive`])
/// 5. the column exists and has room ([`MoveError::InvalidColumn`],
///    [`MoveError::ColumnFull`])
///
/// On success the local piece is placed at the landing row and the turn
/// is flipped to the opponent. The caller is responsible for redrawing
/// and for sending the `move` intent.
pub fn attempt_move(
    session: Option<&mut SessionState>,
    connection_open: bool,
    column: usize,
) -> Result<SpeculativeMove, MoveError> {
    let session = session.ok_or(MoveError::NotReady)?;

    if !connection_open {
        return Err(MoveError::Disconnected);
    }

    if !session.is_my_turn() {
        return Err(MoveError::NotYourTurn {
            current: session.snapshot.current_turn.clone(),
        });
    }

    if session.snapshot.status != GameStatus::Active {
        return Err(MoveError::GameNotActive(session.snapshot.status));
    }

    if column >= COLUMNS {
        return Err(MoveError::InvalidColumn(column));
    }
    let board = &session.snapshot.board;
    if board.is_column_full(column) {
        return Err(MoveError::ColumnFull(column));
    }
    let row = board
        .landing_row(column)
        .ok_or(MoveError::ColumnFull(column))?;

    let piece = session.context().seat.piece();
    let next_turn = session.opponent_id().clone();

    session.snapshot.board.set(row, column, piece);
    session.snapshot.current_turn = next_turn.clone();
    session.pending_move = Some(column);

    tracing::debug!(
        column, row, next_turn = %next_turn, "speculative move applied"
    );

    Ok(SpeculativeMove {
        column,
        row,
        piece,
        next_turn,
    })
}

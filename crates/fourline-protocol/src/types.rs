//! Game types that travel on the wire.
//!
//! Everything here is the client's typed view of what the server pushes:
//! who the players are, what the board looks like, and whose turn it is.
//! The server is the only authority on these values; the client reads
//! them, validates that they are self-consistent, and renders them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ProtocolError;

/// Number of rows on the board. Row 0 is the top row.
pub const ROWS: usize = 6;

/// Number of columns on the board.
pub const COLUMNS: usize = 7;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A server-assigned player identifier.
///
/// The server mints this on join (username plus a random suffix) and it
/// never changes for the life of the connection. The client treats it as
/// an opaque token: it is only ever compared, never parsed.
///
/// `#[serde(transparent)]` keeps the wire form a plain JSON string.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Creates a `PlayerId` from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The server sends an empty string for "nobody" (no winner yet,
    /// second seat not filled).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the two fixed player slots in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    /// The cell value a piece dropped by this seat takes.
    pub fn piece(self) -> Cell {
        match self {
            Self::One => Cell::Player1,
            Self::Two => Cell::Player2,
        }
    }

    /// The other seat.
    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The content of a single board cell.
///
/// On the wire a cell is a bare integer: `0` empty, `1` seat one,
/// `2` seat two. `try_from`/`into` route serde through `u8` so any other
/// number is rejected at decode time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cell {
    #[default]
    Empty,
    Player1,
    Player2,
}

impl TryFrom<u8> for Cell {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Player1),
            2 => Ok(Self::Player2),
            other => Err(format!("invalid cell value {other}, expected 0, 1 or 2")),
        }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => 0,
            Cell::Player1 => 1,
            Cell::Player2 => 2,
        }
    }
}

/// A fixed 6×7 grid, indexed `[row][column]` with row 0 on top.
///
/// Pieces never float: a non-empty cell implies every cell below it in
/// the same column is non-empty. Boards decoded from the wire are checked
/// against this by [`GameSnapshot::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board([[Cell; COLUMNS]; ROWS]);

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw rows, top to bottom.
    pub fn rows(&self) -> &[[Cell; COLUMNS]; ROWS] {
        &self.0
    }

    /// The cell at `(row, column)`, or `None` if out of range.
    pub fn get(&self, row: usize, column: usize) -> Option<Cell> {
        self.0.get(row)?.get(column).copied()
    }

    /// Overwrites the cell at `(row, column)`.
    ///
    /// This is a raw write with no gravity check; callers are expected to
    /// write at [`landing_row`](Self::landing_row).
    pub fn set(&mut self, row: usize, column: usize, cell: Cell) {
        if let Some(slot) = self.0.get_mut(row).and_then(|r| r.get_mut(column)) {
            *slot = cell;
        }
    }

    /// A column is full when its topmost cell is occupied.
    ///
    /// Out-of-range columns count as full.
    pub fn is_column_full(&self, column: usize) -> bool {
        self.get(0, column).is_none_or(|top| top != Cell::Empty)
    }

    /// The row a piece dropped into `column` settles in.
    ///
    /// Scans from the bottom row upward and returns the first empty cell.
    /// `None` when the column is full or out of range.
    pub fn landing_row(&self, column: usize) -> Option<usize> {
        if column >= COLUMNS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.0[row][column] == Cell::Empty)
    }

    /// Number of pieces in `column`.
    pub fn column_height(&self, column: usize) -> usize {
        if column >= COLUMNS {
            return 0;
        }
        (0..ROWS).filter(|&row| self.0[row][column] != Cell::Empty).count()
    }

    /// Finds a piece with an empty cell below it, if any.
    pub fn floating_piece(&self) -> Option<(usize, usize)> {
        for column in 0..COLUMNS {
            for row in 0..ROWS - 1 {
                if self.0[row][column] != Cell::Empty
                    && self.0[row + 1][column] == Cell::Empty
                {
                    return Some((row, column));
                }
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// GameStatus and GameSnapshot
// ---------------------------------------------------------------------------

/// Where a game is in its lifecycle.
///
/// ```text
/// Waiting → Active → Won | Draw
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Matchmaking has not found an opponent yet.
    #[default]
    Waiting,
    /// Both seats filled; moves are being played.
    Active,
    /// Someone connected four.
    Won,
    /// The board filled up with no winner.
    Draw,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Active => write!(f, "active"),
            Self::Won => write!(f, "won"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

/// The complete authoritative game state pushed by the server.
///
/// Every `game-state` message carries a full snapshot that replaces the
/// previous one. Fields the client has no use for (timestamps) are ignored
/// on decode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Server-side game identifier.
    #[serde(default)]
    pub id: String,

    pub player1_id: PlayerId,

    /// Empty while waiting for an opponent; `"bot"` in bot games.
    #[serde(default)]
    pub player2_id: PlayerId,

    pub player1_name: String,

    #[serde(default)]
    pub player2_name: String,

    pub board: Board,

    /// The player whose move the server is waiting for.
    pub current_turn: PlayerId,

    pub status: GameStatus,

    /// Set only when `status` is `Won`. The server sends `""` for none.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub winner: Option<PlayerId>,

    #[serde(default)]
    pub is_bot: bool,
}

impl GameSnapshot {
    /// The seat `player` occupies in this game, if any.
    pub fn seat_of(&self, player: &PlayerId) -> Option<Seat> {
        if player.is_empty() {
            None
        } else if *player == self.player1_id {
            Some(Seat::One)
        } else if *player == self.player2_id {
            Some(Seat::Two)
        } else {
            None
        }
    }

    /// The id seated in `seat`.
    pub fn player_in(&self, seat: Seat) -> &PlayerId {
        match seat {
            Seat::One => &self.player1_id,
            Seat::Two => &self.player2_id,
        }
    }

    /// Checks the invariants the rest of the client relies on.
    ///
    /// - no floating pieces on the board
    /// - `Won` has a winner, and the winner is seated
    /// - `Active` has a current turn owned by exactly one seat
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if let Some((row, column)) = self.board.floating_piece() {
            return Err(ProtocolError::InvalidMessage(format!(
                "floating piece at row {row}, column {column}"
            )));
        }

        match self.status {
            GameStatus::Won => {
                let winner = self.winner.as_ref().ok_or_else(|| {
                    ProtocolError::InvalidMessage("won game without a winner".into())
                })?;
                if self.seat_of(winner).is_none() {
                    return Err(ProtocolError::InvalidMessage(format!(
                        "winner {winner} is not seated in this game"
                    )));
                }
            }
            GameStatus::Active => {
                if self.seat_of(&self.current_turn).is_none() {
                    return Err(ProtocolError::InvalidMessage(format!(
                        "turn owner {:?} is not seated in this game",
                        self.current_turn.as_str()
                    )));
                }
            }
            GameStatus::Waiting | GameStatus::Draw => {}
        }

        Ok(())
    }
}

/// Treats a missing, `null`, or `""` winner as no winner.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<PlayerId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(PlayerId))
}

// =========================================================================
// Tests
// =========================================================================

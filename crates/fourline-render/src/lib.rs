//! Render projector for fourline.
//!
//! [`project`] maps a snapshot plus the local identity to a [`BoardView`]:
//! cells seen from the local player's side (mine / opponent / empty) and
//! the turn and status lines. It is a total, pure function. Calling it
//! twice on the same state yields equal views, so redrawing after every
//! change, including a change that turns out to be a no-op, is always safe.
//!
//! Turn and outcome text are derived here on every call and never stored.

use std::fmt;

use fourline_protocol::{COLUMNS, Cell, GameSnapshot, GameStatus, ROWS, Seat};
use fourline_session::{LocalSessionContext, SessionState};

/// A cell as the local player sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellView {
    #[default]
    Empty,
    Mine,
    Opponent,
}

impl CellView {
    fn glyph(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Mine => 'X',
            Self::Opponent => 'O',
        }
    }
}

/// Everything a front-end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Cells indexed `[row][column]`, row 0 on top.
    pub cells: [[CellView; COLUMNS]; ROWS],
    /// The local player's display name.
    pub my_name: String,
    /// The opponent's display name (empty while waiting).
    pub opponent_name: String,
    /// Whether the local player may move now.
    pub is_my_turn: bool,
    /// "Your Turn", "Opponent's Turn", ...
    pub turn_text: String,
    /// Outcome line once the game is over.
    pub status_text: Option<String>,
}

/// Projects a snapshot as seen by `context`.
pub fn project(snapshot: &GameSnapshot, context: &LocalSessionContext) -> BoardView {
    let mine = context.seat.piece();

    let mut cells = [[CellView::Empty; COLUMNS]; ROWS];
    for (row, line) in snapshot.board.rows().iter().enumerate() {
        for (column, cell) in line.iter().enumerate() {
            cells[row][column] = match *cell {
                Cell::Empty => CellView::Empty,
                piece if piece == mine => CellView::Mine,
                _ => CellView::Opponent,
            };
        }
    }

    let (my_name, opponent_name) = match context.seat {
        Seat::One => (&snapshot.player1_name, &snapshot.player2_name),
        Seat::Two => (&snapshot.player2_name, &snapshot.player1_name),
    };

    let is_my_turn = snapshot.status == GameStatus::Active
        && snapshot.current_turn == context.player_id;

    let turn_text = match snapshot.status {
        GameStatus::Waiting => "Waiting for opponent...",
        GameStatus::Active if is_my_turn => "Your Turn",
        GameStatus::Active => "Opponent's Turn",
        GameStatus::Won | GameStatus::Draw => "Game Over",
    }
    .to_string();

    let status_text = match snapshot.status {
        GameStatus::Won if snapshot.winner.as_ref() == Some(&context.player_id) => {
            Some("You Won!".to_string())
        }
        GameStatus::Won => Some("You Lost!".to_string()),
        GameStatus::Draw => Some("Draw!".to_string()),
        GameStatus::Waiting | GameStatus::Active => None,
    };

    BoardView {
        cells,
        my_name: my_name.clone(),
        opponent_name: opponent_name.clone(),
        is_my_turn,
        turn_text,
        status_text,
    }
}

/// Projects a whole session.
pub fn project_session(session: &SessionState) -> BoardView {
    project(session.snapshot(), session.context())
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.opponent_name.is_empty() {
            writeln!(f, "{}", self.my_name)?;
        } else {
            writeln!(f, "{} (X) vs {} (O)", self.my_name, self.opponent_name)?;
        }
        for row in &self.cells {
            let line: Vec<String> =
                row.iter().map(|c| c.glyph().to_string()).collect();
            writeln!(f, " {}", line.join(" "))?;
        }
        let header: Vec<String> = (0..COLUMNS).map(|c| c.to_string()).collect();
        writeln!(f, " {}", header.join(" "))?;
        write!(f, "{}", self.turn_text)?;
        if let Some(status) = &self.status_text {
            write!(f, " | {status}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fourline_protocol::{Board, PlayerId};

    use super::*;

    fn snapshot(status: GameStatus, turn: &str, winner: Option<&str>) -> GameSnapshot {
        let mut board = Board::new();
        board.set(5, 0, Cell::Player1);
        board.set(5, 1, Cell::Player2);
        GameSnapshot {
            id: "g-1".into(),
            player1_id: PlayerId::new("p1"),
            player2_id: PlayerId::new("p2"),
            player1_name: "alice".into(),
            player2_name: "bob".into(),
            board,
            current_turn: PlayerId::new(turn),
            status,
            winner: winner.map(PlayerId::new),
            is_bot: false,
        }
    }

    fn me(id: &str, seat: Seat) -> LocalSessionContext {
        LocalSessionContext {
            player_id: PlayerId::new(id),
            seat,
        }
    }

    #[test]
    fn test_cells_are_seen_from_local_side() {
        let snap = snapshot(GameStatus::Active, "p1", None);

        let one = project(&snap, &me("p1", Seat::One));
        assert_eq!(one.cells[5][0], CellView::Mine);
        assert_eq!(one.cells[5][1], CellView::Opponent);

        let two = project(&snap, &me("p2", Seat::Two));
        assert_eq!(two.cells[5][0], CellView::Opponent);
        assert_eq!(two.cells[5][1], CellView::Mine);
        assert_eq!(two.cells[0][0], CellView::Empty);
    }

    #[test]
    fn test_turn_text_uses_local_identity() {
        let snap = snapshot(GameStatus::Active, "p2", None);

        let two = project(&snap, &me("p2", Seat::Two));
        assert!(two.is_my_turn);
        assert_eq!(two.turn_text, "Your Turn");

        let one = project(&snap, &me("p1", Seat::One));
        assert!(!one.is_my_turn);
        assert_eq!(one.turn_text, "Opponent's Turn");
    }

    #[test]
    fn test_win_for_local_player() {
        let snap = snapshot(GameStatus::Won, "p2", Some("p1"));
        let view = project(&snap, &me("p1", Seat::One));
        assert_eq!(view.status_text.as_deref(), Some("You Won!"));
        assert!(!view.is_my_turn);
    }

    #[test]
    fn test_loss_for_local_player() {
        let snap = snapshot(GameStatus::Won, "p2", Some("p1"));
        let view = project(&snap, &me("p2", Seat::Two));
        assert_eq!(view.status_text.as_deref(), Some("You Lost!"));
    }

    #[test]
    fn test_draw_and_waiting_text() {
        let draw = project(
            &snapshot(GameStatus::Draw, "p1", None),
            &me("p1", Seat::One),
        );
        assert_eq!(draw.status_text.as_deref(), Some("Draw!"));
        assert_eq!(draw.turn_text, "Game Over");

        let waiting = project(
            &snapshot(GameStatus::Waiting, "", None),
            &me("p1", Seat::One),
        );
        assert_eq!(waiting.status_text, None);
        assert_eq!(waiting.turn_text, "Waiting for opponent...");
    }

    #[test]
    fn test_projection_is_idempotent() {
        let snap = snapshot(GameStatus::Active, "p1", None);
        let ctx = me("p1", Seat::One);
        assert_eq!(project(&snap, &ctx), project(&snap, &ctx));
        assert_eq!(
            project(&snap, &ctx).to_string(),
            project(&snap, &ctx).to_string()
        );
    }

    #[test]
    fn test_display_layout() {
        let view = project(
            &snapshot(GameStatus::Active, "p1", None),
            &me("p1", Seat::One),
        );
        let text = view.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "alice (X) vs bob (O)");
        assert_eq!(lines[6], " X O . . . . .");
        assert_eq!(lines[7], " 0 1 2 3 4 5 6");
        assert_eq!(lines[8], "Your Turn");
    }
}

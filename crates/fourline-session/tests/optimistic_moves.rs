//! Behavioral tests for the optimistic move engine against whole sessions.

use fourline_protocol::{
    Board, COLUMNS, Cell, GameSnapshot, GameStatePayload, GameStatus,
    PlayerId, ROWS,
};
use fourline_session::{MoveError, SessionState, attempt_move};

const P1: &str = "alice_7f3a";
const P2: &str = "bob_91c2";

fn payload(me: &str, turn: &str, board: Board) -> GameStatePayload {
    GameStatePayload {
        game: GameSnapshot {
            id: "game-1".into(),
            player1_id: PlayerId::new(P1),
            player2_id: PlayerId::new(P2),
            player1_name: "alice".into(),
            player2_name: "bob".into(),
            board,
            current_turn: PlayerId::new(turn),
            status: GameStatus::Active,
            winner: None,
            is_bot: false,
        },
        player_id: PlayerId::new(me),
        message: None,
    }
}

/// A board with `height` alternating pieces stacked in `column`.
fn stacked(column: usize, height: usize) -> Board {
    let mut board = Board::new();
    for i in 0..height {
        let piece = if i % 2 == 0 { Cell::Player2 } else { Cell::Player1 };
        board.set(ROWS - 1 - i, column, piece);
    }
    board
}

#[test]
fn test_first_move_lands_on_bottom_row_and_hands_over_turn() {
    let mut session = SessionState::new(payload(P1, P1, Board::new()));

    let mv = attempt_move(Some(&mut session), true, 3).unwrap();

    assert_eq!(mv.row, 5);
    assert_eq!(mv.column, 3);
    assert_eq!(session.snapshot().board.get(5, 3), Some(Cell::Player1));
    assert_eq!(session.snapshot().current_turn, PlayerId::new(P2));
}

#[test]
fn test_landing_row_is_lowest_empty_cell_for_every_height() {
    for column in 0..COLUMNS {
        for height in 0..ROWS {
            let mut session =
                SessionState::new(payload(P1, P1, stacked(column, height)));

            let mv = attempt_move(Some(&mut session), true, column).unwrap();

            assert_eq!(mv.row, ROWS - 1 - height, "column {column}, height {height}");
            assert_eq!(session.snapshot().board.column_height(column), height + 1);
            assert_eq!(session.snapshot().board.floating_piece(), None);
        }
    }
}

#[test]
fn test_full_column_is_refused_and_board_unchanged() {
    for column in 0..COLUMNS {
        let board = stacked(column, ROWS);
        let mut session = SessionState::new(payload(P1, P1, board.clone()));

        let err = attempt_move(Some(&mut session), true, column).unwrap_err();

        assert_eq!(err, MoveError::ColumnFull(column));
        assert_eq!(session.snapshot().board, board);
        assert_eq!(session.snapshot().current_turn, PlayerId::new(P1));
        assert_eq!(session.pending_move(), None);
    }
}

#[test]
fn test_turn_always_goes_to_opponent() {
    for (me, opponent) in [(P1, P2), (P2, P1)] {
        let mut session = SessionState::new(payload(me, me, Board::new()));
        let mv = attempt_move(Some(&mut session), true, 0).unwrap();

        assert_eq!(mv.next_turn, PlayerId::new(opponent));
        assert_ne!(session.snapshot().current_turn, PlayerId::new(me));
    }
}

#[test]
fn test_out_of_turn_move_leaves_state_untouched() {
    let mut session = SessionState::new(payload(P2, P1, Board::new()));
    let before = session.clone();

    let err = attempt_move(Some(&mut session), true, 2).unwrap_err();

    assert!(matches!(err, MoveError::NotYourTurn { .. }));
    assert_eq!(session, before);
}

#[test]
fn test_second_move_before_confirmation_is_out_of_turn() {
    let mut session = SessionState::new(payload(P1, P1, Board::new()));
    attempt_move(Some(&mut session), true, 0).unwrap();

    let err = attempt_move(Some(&mut session), true, 1).unwrap_err();
    assert!(matches!(err, MoveError::NotYourTurn { .. }));
    assert_eq!(session.pending_move(), Some(0));
}

#[test]
fn test_rejected_move_is_corrected_by_next_snapshot() {
    let mut session = SessionState::new(payload(P1, P1, Board::new()));
    attempt_move(Some(&mut session), true, 6).unwrap();
    assert_eq!(session.snapshot().board.get(5, 6), Some(Cell::Player1));

    // The server never accepted it: same empty board, still our turn.
    session.replace(payload(P1, P1, Board::new()));

    assert_eq!(session.snapshot().board, Board::new());
    assert!(session.is_my_turn());
    assert_eq!(session.pending_move(), None);
}

#[test]
fn test_confirmed_move_replacement_is_invisible() {
    let mut session = SessionState::new(payload(P1, P1, Board::new()));
    attempt_move(Some(&mut session), true, 3).unwrap();
    let speculative = session.snapshot().clone();

    // The server computes the same board and turn.
    let mut board = Board::new();
    board.set(5, 3, Cell::Player1);
    session.replace(payload(P1, P2, board));

    assert_eq!(session.snapshot(), &speculative);
}

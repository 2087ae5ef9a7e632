//! Session state: the last authoritative snapshot plus who "I" am.
//!
//! A session only comes into existence with the first `game-state` event.
//! That event is also the only time identity is derived. Later events
//! replace the snapshot wholesale and never touch identity, since the
//! server doesn't re-declare "who am I" in a way the client should trust
//! over what it learned first.
//!
//! ```text
//! first game-state ──→ SessionState::new()  (identity frozen here)
//! next game-state  ──→ SessionState::replace()  (snapshot only)
//! local move       ──→ attempt_move()  (speculative mutation)
//! ```

use fourline_protocol::{GameSnapshot, GameStatePayload, PlayerId, Seat};

// ---------------------------------------------------------------------------
// LocalSessionContext
// ---------------------------------------------------------------------------

/// Locally-known identity, derived once from the first snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSessionContext {
    /// The id the server assigned to this client on join.
    pub player_id: PlayerId,

    /// Which seat this client occupies.
    pub seat: Seat,
}

impl LocalSessionContext {
    /// Derives identity from a `game-state` payload.
    ///
    /// The local player is seat one exactly when its id equals the
    /// snapshot's `player1_id`; otherwise it is seat two.
    pub fn derive(payload: &GameStatePayload) -> Self {
        let seat = if payload.player_id == payload.game.player1_id {
            Seat::One
        } else {
            Seat::Two
        };
        Self {
            player_id: payload.player_id.clone(),
            seat,
        }
    }

    /// Shorthand for `seat == Seat::One`.
    pub fn is_seat_one(&self) -> bool {
        self.seat == Seat::One
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The client's view of the game: an authoritative snapshot, possibly
/// carrying one speculative local move on top.
///
/// There are exactly two writers: [`replace`](Self::replace) on every
/// inbound snapshot and [`attempt_move`](crate::attempt_move) on a local
/// move. Full replacement is the reconciliation mechanism: whatever the
/// speculative move did, the next snapshot overwrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    context: LocalSessionContext,
    pub(crate) snapshot: GameSnapshot,
    pub(crate) pending_move: Option<usize>,
}

impl SessionState {
    /// Creates the session from its first `game-state` payload.
    pub fn new(payload: GameStatePayload) -> Self {
        let context = LocalSessionContext::derive(&payload);
        tracing::info!(
            player_id = %context.player_id,
            seat_one = context.is_seat_one(),
            game_id = %payload.game.id,
            "session identity derived"
        );
        Self {
            context,
            snapshot: payload.game,
            pending_move: None,
        }
    }

    /// Replaces the snapshot with a newer authoritative one.
    ///
    /// Last-received wins: there is no sequence check, and any
    /// unconfirmed speculative move is discarded along with the old board.
    pub fn replace(&mut self, payload: GameStatePayload) {
        if payload.player_id != self.context.player_id {
            tracing::warn!(
                expected = %self.context.player_id,
                got = %payload.player_id,
                "snapshot addressed to a different player id, keeping original identity"
            );
        }
        if let Some(column) = self.pending_move.take() {
            tracing::debug!(column, "speculative move superseded by snapshot");
        }
        self.snapshot = payload.game;
        tracing::debug!(
            status = %self.snapshot.status,
            current_turn = %self.snapshot.current_turn,
            "snapshot replaced"
        );
    }

    /// The frozen local identity.
    pub fn context(&self) -> &LocalSessionContext {
        &self.context
    }

    /// The current game state (authoritative, or speculative if a move
    /// is pending).
    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    /// The column of the unconfirmed local move, if one is in flight.
    pub fn pending_move(&self) -> Option<usize> {
        self.pending_move
    }

    /// Whether the server is waiting on the local player.
    pub fn is_my_turn(&self) -> bool {
        self.snapshot.current_turn == self.context.player_id
    }

    /// The opponent's id, as seated in the current snapshot.
    pub fn opponent_id(&self) -> &PlayerId {
        self.snapshot.player_in(self.context.seat.opponent())
    }
}

#[cfg(test)]
mod tests {
    use fourline_protocol::{Board, GameStatus};

    use super::*;

    fn payload(me: &str, turn: &str) -> GameStatePayload {
        GameStatePayload {
            game: GameSnapshot {
                id: "g-1".into(),
                player1_id: PlayerId::new("alice_1"),
                player2_id: PlayerId::new("bob_2"),
                player1_name: "alice".into(),
                player2_name: "bob".into(),
                board: Board::new(),
                current_turn: PlayerId::new(turn),
                status: GameStatus::Active,
                winner: None,
                is_bot: false,
            },
            player_id: PlayerId::new(me),
            message: None,
        }
    }

    #[test]
    fn test_identity_seat_one() {
        let state = SessionState::new(payload("alice_1", "alice_1"));
        assert!(state.context().is_seat_one());
        assert_eq!(state.opponent_id(), &PlayerId::new("bob_2"));
        assert!(state.is_my_turn());
    }

    #[test]
    fn test_identity_seat_two() {
        let state = SessionState::new(payload("bob_2", "alice_1"));
        assert_eq!(state.context().seat, Seat::Two);
        assert_eq!(state.opponent_id(), &PlayerId::new("alice_1"));
        assert!(!state.is_my_turn());
    }

    #[test]
    fn test_identity_is_never_rederived() {
        let mut state = SessionState::new(payload("alice_1", "alice_1"));
        state.replace(payload("bob_2", "bob_2"));

        assert_eq!(state.context().player_id, PlayerId::new("alice_1"));
        assert!(state.context().is_seat_one());
        // The snapshot itself was still replaced.
        assert_eq!(state.snapshot().current_turn, PlayerId::new("bob_2"));
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut state = SessionState::new(payload("alice_1", "alice_1"));
        let mut next = payload("alice_1", "bob_2");
        next.game.board.set(5, 0, fourline_protocol::Cell::Player1);
        next.game.player2_name = "robert".into();

        state.replace(next.clone());
        assert_eq!(state.snapshot(), &next.game);
    }

    #[test]
    fn test_last_received_snapshot_wins() {
        let mut state = SessionState::new(payload("alice_1", "alice_1"));
        state.replace(payload("alice_1", "bob_2"));
        state.replace(payload("alice_1", "alice_1"));
        assert!(state.is_my_turn());
    }
}

//! Session state and optimistic moves for fourline.
//!
//! This crate holds everything the client knows about its game and the
//! one piece of real logic it runs locally:
//!
//! 1. **Session state** ([`SessionState`]): the last authoritative
//!    snapshot, plus the frozen local identity ([`LocalSessionContext`]).
//! 2. **Optimistic moves** ([`attempt_move`]): apply the local player's
//!    move before the server confirms it, and let the next snapshot
//!    correct any drift.
//!
//! # How it fits in the stack
//!
//! ```text
//! Render (above)   ← projects SessionState into something drawable
//!     ↕
//! Session (this crate)  ← owns the game view and its two writers
//!     ↕
//! Protocol (below) ← provides GameSnapshot, PlayerId, Board
//! ```

mod engine;
mod error;
mod session;

pub use engine::{SpeculativeMove, attempt_move};
pub use error::MoveError;
pub use session::{LocalSessionContext, SessionState};

//! Wire protocol for fourline.
//!
//! This crate defines the "language" the client and the game server speak:
//!
//! - **Types** ([`GameSnapshot`], [`Board`], [`PlayerId`], ...): the game
//!   state the server pushes.
//! - **Messages** ([`ClientMessage`], [`ServerMessage`], [`Envelope`]):
//!   the intents the client sends and the events it receives.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   converted to and from frame bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! # Architecture
//!
//! ```text
//! Transport (frames) → Protocol (ServerMessage) → Session (state)
//! ```

mod codec;
mod error;
mod message;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use message::{ClientMessage, Envelope, GameStatePayload, ServerMessage};
pub use types::{
    Board, Cell, COLUMNS, GameSnapshot, GameStatus, PlayerId, ROWS, Seat,
};

//! # Fourline
//!
//! Real-time client for two-player Connect-Four-style games.
//!
//! The server is the authority on every game. Fourline keeps the last
//! snapshot it sent, applies the local player's moves to it before the
//! server confirms them, and lets each new snapshot overwrite whatever it
//! guessed. Everything is driven by one [`SessionController`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fourline::prelude::*;
//!
//! # async fn play() -> Result<(), FourlineError> {
//! let config = ClientConfig::from_env()?;
//! let mut controller = SessionController::connect(&config).await?;
//! controller.subscribe(|event| {
//!     if let SessionEvent::Redraw(view) = event {
//!         println!("{view}");
//!     }
//! });
//! controller.join("alice").await?;
//!
//! let (intents, rx) = tokio::sync::mpsc::channel(16);
//! intents.send(Intent::Move(3)).await.ok();
//! controller.run(rx).await;
//! # Ok(())
//! # }
//! ```

mod config;
mod controller;
mod error;

pub use config::{
    ClientConfig, ENV_BACKEND_URL, ENV_USE_WSS, ENV_USERNAME, ENV_WS_PATH,
    Endpoint, Scheme,
};
pub use controller::{Intent, Notice, SessionController, SessionEvent, SubscriptionId};
pub use error::FourlineError;

pub use fourline_protocol as protocol;
pub use fourline_render as render;
pub use fourline_session as session;
pub use fourline_transport as transport;

pub mod prelude {
    //! Everything needed to drive a session.

    pub use crate::{
        ClientConfig, FourlineError, Intent, Notice, SessionController,
        SessionEvent, SubscriptionId,
    };
    pub use fourline_protocol::{
        Board, COLUMNS, Cell, GameSnapshot, GameStatus, PlayerId, ROWS, Seat,
    };
    pub use fourline_render::{BoardView, CellView};
    pub use fourline_session::{MoveError, SessionState, SpeculativeMove};
    pub use fourline_transport::{ConnectionManager, ConnectionState};
}

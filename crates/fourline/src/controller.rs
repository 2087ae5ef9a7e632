//! The session controller: one object that owns the whole client session.
//!
//! Instead of free-floating globals (socket, snapshot, identity), every
//! piece of session state lives in a [`SessionController`] that is passed
//! explicitly to whatever drives it. The flow is:
//!
//! ```text
//! user move ─→ attempt_move ─→ speculative mutation ─→ Redraw ─→ send `move`
//! inbound   ─→ next_event   ─→ decode ─→ replace snapshot ─→ Redraw
//! ```
//!
//! Everything runs on one task. Each step (a move, an inbound frame) runs
//! to completion before the next one starts, so the two writers of the
//! session state never interleave.

use std::fmt;

use fourline_protocol::{ClientMessage, Codec, JsonCodec, ServerMessage};
use fourline_render::{BoardView, project_session};
use fourline_session::{MoveError, SessionState, SpeculativeMove, attempt_move};
use fourline_transport::{Connection, ConnectionManager, ConnectionState};
use tokio::sync::mpsc;

use crate::{ClientConfig, FourlineError};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A user-visible message. Every error class that stops short of ending
/// the process surfaces as one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NotReady,
    Disconnected,
    NotYourTurn,
    GameNotActive,
    InvalidColumn(usize),
    ColumnFull(usize),
    /// An inbound frame could not be understood and was dropped.
    Protocol(String),
    /// The server rejected something.
    Server(String),
    /// An informational note from the server ("Move accepted").
    Info(String),
    /// The channel dropped. The session is over.
    ConnectionLost,
}

impl From<&MoveError> for Notice {
    fn from(err: &MoveError) -> Self {
        match err {
            MoveError::NotReady => Self::NotReady,
            MoveError::Disconnected => Self::Disconnected,
            MoveError::NotYourTurn { .. } => Self::NotYourTurn,
            MoveError::GameNotActive(_) => Self::GameNotActive,
            MoveError::InvalidColumn(c) => Self::InvalidColumn(*c),
            MoveError::ColumnFull(c) => Self::ColumnFull(*c),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "Game not initialized!"),
            Self::Disconnected => write!(f, "Connection lost!"),
            Self::NotYourTurn => write!(f, "Not your turn!"),
            Self::GameNotActive => write!(f, "Game is not active!"),
            Self::InvalidColumn(c) => write!(f, "There is no column {c}!"),
            Self::ColumnFull(_) => write!(f, "Column is full!"),
            Self::Protocol(detail) => write!(f, "Ignored a bad message from the server: {detail}"),
            Self::Server(message) => write!(f, "Server: {message}"),
            Self::Info(message) => write!(f, "{message}"),
            Self::ConnectionLost => {
                write!(f, "Connection to the server was lost. Restart to play again.")
            }
        }
    }
}

/// Something subscribers should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session state changed; draw this.
    Redraw(BoardView),
    /// Show this to the user.
    Notice(Notice),
    /// The channel is closed for good.
    Disconnected,
}

/// Input from the user, fed to [`SessionController::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Move(usize),
    Leave,
}

/// Handle returned by [`SessionController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&SessionEvent) + Send>;

// ---------------------------------------------------------------------------
// SessionController
// ---------------------------------------------------------------------------

/// Owns the connection, the session state, and the subscriber list.
pub struct SessionController<C: Connection> {
    connection: ConnectionManager<C>,
    codec: JsonCodec,
    session: Option<SessionState>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    /// Set once the user has left or the loss has been reported.
    finished: bool,
}

impl SessionController<fourline_transport::WebSocketConnection> {
    /// Connects to the configured endpoint.
    ///
    /// A connection failure is fatal: there is no retry.
    pub async fn connect(config: &ClientConfig) -> Result<Self, FourlineError> {
        let url = config.endpoint().url();
        let connection = ConnectionManager::connect(&url).await?;
        Ok(Self::new(connection))
    }
}

impl<C: Connection> SessionController<C> {
    /// Wraps an open connection. No session exists until the first
    /// `game-state` arrives.
    pub fn new(connection: ConnectionManager<C>) -> Self {
        Self {
            connection,
            codec: JsonCodec,
            session: None,
            subscribers: Vec::new(),
            next_subscription: 1,
            finished: false,
        }
    }

    /// Registers a listener for session events.
    ///
    /// Listeners are called in registration order. Registering one never
    /// displaces another.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SessionEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// The session, once the first snapshot has arrived.
    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    /// Current state of the channel.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// The current projection, if there is anything to draw.
    pub fn view(&self) -> Option<BoardView> {
        self.session.as_ref().map(project_session)
    }

    /// Enters matchmaking under `username`.
    pub async fn join(&mut self, username: &str) -> Result<(), FourlineError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(FourlineError::EmptyUsername);
        }
        tracing::info!(username, "joining");
        self.send(&ClientMessage::Join {
            username: username.to_string(),
        })
        .await
    }

    /// Plays a move in `column`, optimistically.
    ///
    /// On success the board is redrawn with the piece already placed and
    /// the `move` intent is sent. On a precondition failure the matching
    /// notice is emitted, nothing changes, and nothing is sent.
    pub async fn attempt_move(
        &mut self,
        column: usize,
    ) -> Result<SpeculativeMove, MoveError> {
        let mv = match attempt_move(
            self.session.as_mut(),
            self.connection.is_open(),
            column,
        ) {
            Ok(mv) => mv,
            Err(e) => {
                tracing::info!(column, reason = %e, "move refused locally");
                self.emit(&SessionEvent::Notice(Notice::from(&e)));
                return Err(e);
            }
        };

        self.redraw();

        if let Err(e) = self.send(&ClientMessage::Move { column }).await {
            // The move is lost with the connection.
            tracing::warn!(column, error = %e, "move could not be sent");
            self.report_loss();
        }
        Ok(mv)
    }

    /// Abandons the game and closes the channel. Idempotent.
    pub async fn leave(&mut self) {
        if self.finished && !self.connection.is_open() {
            return;
        }
        self.finished = true;
        if self.connection.is_open() {
            if let Err(e) = self.send(&ClientMessage::Leave).await {
                tracing::debug!(error = %e, "leave not delivered");
            }
            tracing::info!("left game");
        }
        self.connection.close().await;
    }

    /// Applies one inbound frame.
    ///
    /// Decode faults are logged and shown as a notice; the frame is
    /// dropped and the session carries on untouched.
    pub fn handle_frame(&mut self, frame: &[u8]) {
        let msg = match self.codec.decode_message(frame) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(error = %e, "dropping inbound frame");
                self.emit(&SessionEvent::Notice(Notice::Protocol(e.to_string())));
                return;
            }
        };

        match msg {
            ServerMessage::GameState(payload) => {
                if let Some(note) = payload.message.clone() {
                    self.emit(&SessionEvent::Notice(Notice::Info(note)));
                }
                match self.session.as_mut() {
                    Some(session) => session.replace(payload),
                    None => self.session = Some(SessionState::new(payload)),
                }
                self.redraw();
            }
            ServerMessage::Error { message } => {
                tracing::info!(%message, "server rejected a request");
                self.emit(&SessionEvent::Notice(Notice::Server(message)));
            }
        }
    }

    /// Waits for one inbound frame and applies it.
    ///
    /// Returns `false` once the channel is closed; the loss is reported
    /// to subscribers exactly once.
    pub async fn next_event(&mut self) -> bool {
        match self.connection.recv().await {
            Some(frame) => {
                self.handle_frame(&frame);
                true
            }
            None => {
                self.report_loss();
                false
            }
        }
    }

    /// Drives the session until the user leaves or the channel drops.
    ///
    /// User intents and inbound frames are interleaved one at a time.
    /// Closing the intent channel counts as leaving.
    pub async fn run(&mut self, mut intents: mpsc::Receiver<Intent>) {
        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(Intent::Move(column)) => {
                        // Refusals were already surfaced as notices.
                        let _ = self.attempt_move(column).await;
                    }
                    Some(Intent::Leave) | None => {
                        self.leave().await;
                        break;
                    }
                },
                open = self.next_event() => {
                    if !open {
                        break;
                    }
                }
            }
        }
        tracing::debug!("session loop exited");
    }

    async fn send(&mut self, msg: &ClientMessage) -> Result<(), FourlineError> {
        let bytes = self.codec.encode_message(msg)?;
        self.connection.send(&bytes).await?;
        tracing::debug!(kind = msg.kind(), "intent sent");
        Ok(())
    }

    fn redraw(&mut self) {
        if let Some(view) = self.view() {
            self.emit(&SessionEvent::Redraw(view));
        }
    }

    fn report_loss(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        tracing::warn!("connection lost, session over");
        self.emit(&SessionEvent::Notice(Notice::ConnectionLost));
        self.emit(&SessionEvent::Disconnected);
    }

    fn emit(&mut self, event: &SessionEvent) {
        for (_, listener) in &mut self.subscribers {
            listener(event);
        }
    }
}

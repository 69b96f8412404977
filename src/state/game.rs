//! Game session state.
//!
//! Ties the board and win detection together with the turn rules of each
//! opponent mode. Every move, local or remote, goes through one transition
//! function; the mode only decides who may move and who moves next.
//!
//! # State Diagram
//!
//! ```text
//!                 accepted move, no five, board not full
//!                ┌───────────────────┐
//!                ▼                   │
//!         ┌─────────────┐────────────┘
//!         │ InProgress  │
//!         └──────┬──────┘
//!     five       │        board full
//!     ┌──────────┴──────────┐
//!     ▼                     ▼
//! ┌──────────┐        ┌──────────┐
//! │Won(color)│        │  Drawn   │
//! └──────────┘        └──────────┘
//! ```

use std::fmt;

use tracing::{debug, info, instrument, warn};

use super::board::{BoardState, Color, Grid, Move, Position};
use super::config::{GameMode, SessionConfig};
use super::error::{ConfigError, MoveError, SyncError};
use super::player::Participants;
use super::sync::{MoveEnvelope, MoveSync};
use super::win::{self, Evaluation, WinLine};

/// Game state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won(Color),
    Drawn,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Won(_) => "won",
            Self::Drawn => "drawn",
        }
    }

    /// Check if game can still receive moves.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Check if game is over.
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn winner(&self) -> Option<Color> {
        match self {
            Self::Won(color) => Some(*color),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "in progress"),
            Self::Won(color) => write!(f, "won by {}", color),
            Self::Drawn => write!(f, "drawn"),
        }
    }
}

/// Where a move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOrigin {
    Local,
    Remote,
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub placed: Move,
    pub status: GameStatus,
    pub win_line: Option<WinLine>,
    /// Envelope handed to the transport, for locally originated networked moves
    pub envelope: Option<MoveEnvelope>,
}

/// What the UI should tell the local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// A local seat is to move.
    YourTurn { color: Color, name: String },
    /// Waiting on the remote peer or the placeholder.
    OpponentTurn { color: Color, name: String },
    Won { color: Color, name: String },
    Drawn,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YourTurn { name, .. } => write!(f, "{} to move", name),
            Self::OpponentTurn { name, .. } => write!(f, "{} is thinking...", name),
            Self::Won { name, .. } => write!(f, "Game over: {} wins", name),
            Self::Drawn => write!(f, "Game over: draw"),
        }
    }
}

/// Consistent copy of everything the UI renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub grid: Grid,
    pub placed_count: usize,
    pub last_move: Option<Move>,
    pub win_line: Option<WinLine>,
    pub status: GameStatus,
    pub active_color: Color,
    pub verdict: Verdict,
}

impl BoardSnapshot {
    /// Cells to highlight: the winning line, else the last move.
    pub fn highlights(&self) -> Vec<Position> {
        match (&self.win_line, &self.last_move) {
            (Some(line), _) => line.cells.to_vec(),
            (None, Some(mv)) => vec![mv.position],
            (None, None) => Vec::new(),
        }
    }
}

/// One two-player session.
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    board: BoardState,
    status: GameStatus,
    active_color: Color,
    participants: Participants,

    /// Network adapter, required in networked mode
    sync: Option<MoveSync>,

    /// When the session was (re)started
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// When the session reached Won or Drawn
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl GameSession {
    /// Create a local session.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::build(config, None)
    }

    /// Create a session with a network adapter attached.
    pub fn with_sync(config: SessionConfig, sync: MoveSync) -> Result<Self, ConfigError> {
        Self::build(config, Some(sync))
    }

    fn build(config: SessionConfig, sync: Option<MoveSync>) -> Result<Self, ConfigError> {
        Self::check_config(&config, sync.as_ref())?;

        let session = Self {
            active_color: config.first_color(),
            participants: Participants::for_config(&config),
            board: BoardState::new(),
            status: GameStatus::InProgress,
            sync,
            config,
            created_at: chrono::Utc::now(),
            ended_at: None,
        };

        info!(
            mode = session.config.mode.as_str(),
            local_color = session.config.local_color.as_str(),
            first = session.active_color.as_str(),
            "session started"
        );
        Ok(session)
    }

    fn check_config(config: &SessionConfig, sync: Option<&MoveSync>) -> Result<(), ConfigError> {
        config.validate()?;

        if let (GameMode::Networked, Some(opponent)) = (config.mode, &config.opponent) {
            let sync = sync.ok_or(ConfigError::MissingSync)?;
            sync.resolve(opponent)
                .map_err(|_| ConfigError::UnresolvedOpponent(opponent.to_string()))?;
        }

        Ok(())
    }

    /// Throw away the board and start over under a new configuration.
    ///
    /// An attached network adapter is kept; its counters are zeroed.
    #[instrument(skip(self))]
    pub fn restart(&mut self, config: SessionConfig) -> Result<(), ConfigError> {
        Self::check_config(&config, self.sync.as_ref())?;

        self.board = BoardState::new();
        self.status = GameStatus::InProgress;
        self.active_color = config.first_color();
        self.participants = Participants::for_config(&config);
        self.config = config;
        self.created_at = chrono::Utc::now();
        self.ended_at = None;
        if let Some(sync) = self.sync.as_mut() {
            sync.reset();
        }

        info!(mode = self.config.mode.as_str(), "session restarted");
        Ok(())
    }

    /// Local move by the seat whose turn it is.
    ///
    /// Outside hot-seat mode the local seat always plays `local_color`.
    pub fn play(&mut self, row: i32, col: i32) -> Result<MoveOutcome, MoveError> {
        let color = match self.config.mode {
            GameMode::Networked | GameMode::LocalVsPlaceholder => self.config.local_color,
            GameMode::LocalVsLocal => self.active_color,
        };
        self.request_move(row, col, color)
    }

    /// Locally originated move for `acting`.
    #[instrument(skip(self))]
    pub fn request_move(
        &mut self,
        row: i32,
        col: i32,
        acting: Color,
    ) -> Result<MoveOutcome, MoveError> {
        self.transition(row, col, acting, MoveOrigin::Local)
    }

    /// Move that arrived from the remote peer. Turn ownership is not checked
    /// and the move is never re-transmitted.
    #[instrument(skip(self))]
    pub fn apply_remote_move(
        &mut self,
        row: i32,
        col: i32,
        color: Color,
    ) -> Result<MoveOutcome, MoveError> {
        self.transition(row, col, color, MoveOrigin::Remote)
    }

    /// Validate an inbound envelope and apply its move.
    #[instrument(skip(self))]
    pub fn handle_envelope(&mut self, envelope: &MoveEnvelope) -> Result<MoveOutcome, SyncError> {
        if !self.config.mode.is_networked() {
            return Err(SyncError::NotNetworked);
        }
        let local_color = self.config.local_color;
        let sync = self.sync.as_mut().ok_or(SyncError::NotNetworked)?;

        let (row, col, color) = sync.receive(envelope, local_color)?;
        let outcome = self.apply_remote_move(row, col, color)?;
        if let Some(sync) = self.sync.as_mut() {
            sync.record_received();
        }
        Ok(outcome)
    }

    /// Decode a raw outer message and apply its move.
    pub fn handle_message(&mut self, json: &str) -> Result<MoveOutcome, SyncError> {
        let envelope = MoveSync::decode(json).map_err(|err| {
            warn!(error = %err, "undecodable inbound message");
            err
        })?;
        self.handle_envelope(&envelope)
    }

    fn transition(
        &mut self,
        row: i32,
        col: i32,
        color: Color,
        origin: MoveOrigin,
    ) -> Result<MoveOutcome, MoveError> {
        let placed = self
            .check_move(color, origin)
            .and_then(|_| self.board.place(row, col, color))
            .map_err(|err| {
                warn!(row, col, color = color.as_str(), ?origin, error = %err, "move rejected");
                err
            })?;

        let win_line = match win::evaluate(&self.board, placed.position, color) {
            Evaluation::Win(line) => {
                self.finish(GameStatus::Won(color));
                Some(line)
            }
            Evaluation::Draw => {
                self.finish(GameStatus::Drawn);
                None
            }
            Evaluation::Continue => {
                self.active_color = self.next_color(color);
                None
            }
        };

        debug!(
            row,
            col,
            color = color.as_str(),
            ?origin,
            placed = self.board.placed_count(),
            "move accepted"
        );

        let envelope = match origin {
            MoveOrigin::Local => self.transmit(placed),
            MoveOrigin::Remote => None,
        };

        Ok(MoveOutcome {
            placed,
            status: self.status,
            win_line,
            envelope,
        })
    }

    fn check_move(&self, color: Color, origin: MoveOrigin) -> Result<(), MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::SessionTerminal(self.status));
        }

        if origin == MoveOrigin::Remote {
            return Ok(());
        }

        match self.config.mode {
            GameMode::LocalVsLocal => Ok(()),
            GameMode::LocalVsPlaceholder | GameMode::Networked => {
                // The opponent's color only arrives through apply_remote_move;
                // the placeholder's never arrives at all
                self.expect_turn(self.config.local_color, color)?;
                self.expect_turn(self.active_color, color)
            }
        }
    }

    fn expect_turn(&self, expected: Color, actual: Color) -> Result<(), MoveError> {
        if expected == actual {
            Ok(())
        } else {
            Err(MoveError::TurnViolation { expected, actual })
        }
    }

    /// Side to move after `mover` placed a stone and the game continues.
    fn next_color(&self, mover: Color) -> Color {
        match self.config.mode {
            GameMode::LocalVsLocal | GameMode::Networked => mover.opposite(),
            GameMode::LocalVsPlaceholder => self.active_color,
        }
    }

    fn finish(&mut self, status: GameStatus) {
        self.status = status;
        self.ended_at = Some(chrono::Utc::now());
        info!(status = %status, placed = self.board.placed_count(), "game over");
    }

    fn transmit(&mut self, placed: Move) -> Option<MoveEnvelope> {
        if !self.config.mode.is_networked() {
            return None;
        }
        let opponent = self.config.opponent.as_ref()?;
        let sync = self.sync.as_mut()?;

        match sync.transmit(placed, opponent) {
            Ok(envelope) => Some(envelope),
            Err(err) => {
                warn!(error = %err, "accepted move could not be transmitted");
                None
            }
        }
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn local_color(&self) -> Color {
        self.config.local_color
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn participants(&self) -> &Participants {
        &self.participants
    }

    pub fn sync(&self) -> Option<&MoveSync> {
        self.sync.as_ref()
    }

    /// Winning line, recomputed from the last move.
    pub fn win_line(&self) -> Option<WinLine> {
        let winner = self.status.winner()?;
        let last = self.board.last_move()?;
        if last.color != winner {
            return None;
        }
        win::find_line(&self.board, last.position, last.color)
    }

    /// Check if a local seat may move now.
    pub fn is_local_turn(&self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        match self.config.mode {
            GameMode::LocalVsLocal => true,
            GameMode::LocalVsPlaceholder | GameMode::Networked => {
                self.active_color == self.config.local_color
            }
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self.status {
            GameStatus::Won(color) => Verdict::Won {
                color,
                name: self.participants.name_of(color).to_string(),
            },
            GameStatus::Drawn => Verdict::Drawn,
            GameStatus::InProgress => {
                let color = self.active_color;
                let name = self.participants.name_of(color).to_string();
                if self.is_local_turn() {
                    Verdict::YourTurn { color, name }
                } else {
                    Verdict::OpponentTurn { color, name }
                }
            }
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            grid: *self.board.rows(),
            placed_count: self.board.placed_count(),
            last_move: self.board.last_move(),
            win_line: self.win_line(),
            status: self.status,
            active_color: self.active_color,
            verdict: self.verdict(),
        }
    }

    /// Convert full session state to JSON snapshot.
    pub fn to_json(&self) -> serde_json::Value {
        let snapshot = self.snapshot();
        let highlights: Vec<serde_json::Value> =
            snapshot.highlights().iter().map(|p| p.to_json()).collect();

        serde_json::json!({
            "mode": self.config.mode.as_str(),
            "status": self.status.as_str(),
            "winner": self.status.winner().map(|c| c.as_str()),
            "active_color": self.active_color.as_str(),
            "local_color": self.config.local_color.as_str(),
            "players": self.participants.to_json(),
            "grid": self.board.to_json(),
            "placed_count": snapshot.placed_count,
            "last_move": snapshot.last_move.map(|m| m.to_json()),
            "win_line": snapshot.win_line.map(|l| l.to_json()),
            "highlights": highlights,
            "message": snapshot.verdict.to_string(),
            "created_at": self.created_at.to_rfc3339(),
            "ended_at": self.ended_at.map(|t| t.to_rfc3339())
        })
    }
}

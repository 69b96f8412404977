//! Error types for move handling and move synchronization.
//!
//! None of these are fatal: every rejection leaves the board and the
//! session exactly as they were.

use super::board::Color;
use super::config::GameMode;
use super::game::GameStatus;

/// Why a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("cell ({row}, {col}) is outside the board")]
    CellOutOfBounds { row: i32, col: i32 },

    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: i32, col: i32 },

    #[error("it is {expected}'s turn, not {actual}'s")]
    TurnViolation { expected: Color, actual: Color },

    #[error("game is over ({0})")]
    SessionTerminal(GameStatus),
}

/// Why an outbound or inbound move envelope could not be handled.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("protocol mismatch: {0}")]
    ProtocolMismatch(String),

    #[error("no identity known for opponent {0}")]
    UnknownOpponent(String),

    #[error("session is not networked")]
    NotNetworked,

    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("remote move rejected: {0}")]
    Move(#[from] MoveError),
}

/// Invalid session configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("networked mode needs an opponent")]
    MissingOpponent,

    #[error("{0} mode does not take an opponent")]
    UnexpectedOpponent(GameMode),

    #[error("no identity known for opponent {0}")]
    UnresolvedOpponent(String),

    #[error("networked mode needs a move sync")]
    MissingSync,

    #[error("the computer placeholder never moves, so it cannot open")]
    PlaceholderOpens,
}

impl SyncError {
    pub fn is_protocol_mismatch(&self) -> bool {
        matches!(self, Self::ProtocolMismatch(_))
    }
}

//! State management module for Gobang.
//!
//! This module provides the core state types:
//!
//! - `board` - Grid of stones, the single placement entrypoint
//! - `win` - Five-in-a-row detection
//! - `game` - Session state machine and turn rules per mode
//! - `sync` - Move envelopes exchanged with a remote peer
//! - `player` - Seat names and opponent identity resolution
//! - `config` - Session configuration
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        SharedSession                             │
//! │                   Arc<RwLock<GameSession>>                       │
//! │                                                                  │
//! │  local input ──▶ request_move ──┐                                │
//! │                                 ├──▶ transition ──▶ BoardState   │
//! │  inbound ──▶ MoveSync.receive ──┘         │            │         │
//! │              (apply_remote_move)          │            ▼         │
//! │                                           │       win::evaluate  │
//! │                                           ▼                      │
//! │                              MoveSync.transmit ──▶ Transport     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use gobang_state::state::{Color, GameSession, SessionConfig, SharedSession};
//!
//! let session = GameSession::new(SessionConfig::local_vs_local("Alice", Color::Black))?;
//! let shared = SharedSession::new(session);
//!
//! shared.play(7, 7)?;
//! let snapshot = shared.snapshot();
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod player;
pub mod sync;
pub mod win;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// Re-export commonly used types
pub use board::{BoardState, Color, Grid, Move, Position, Stone, CELL_COUNT, COLS, ROWS};
pub use config::{GameMode, SessionConfig};
pub use error::{ConfigError, MoveError, SyncError};
pub use game::{BoardSnapshot, GameSession, GameStatus, MoveOrigin, MoveOutcome, Verdict};
pub use player::{DirectoryResolver, IdentityResolver, OpponentHandle, Participants};
pub use sync::{GameMessage, MoveEnvelope, MoveSync, OutboxTransport, Transport};
pub use win::{Axis, Evaluation, WinLine, WIN_LENGTH};

/// Thread-safe handle to one session.
///
/// Moves, local or remote, take the write lock, so they are applied one at a
/// time. Snapshots take the read lock and copy the grid.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<RwLock<GameSession>>,
}

impl SharedSession {
    pub fn new(session: GameSession) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    // A panic inside a move can't leave a half-applied move behind: the
    // board is only written after every check has passed.
    fn read(&self) -> RwLockReadGuard<'_, GameSession> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GameSession> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn play(&self, row: i32, col: i32) -> Result<MoveOutcome, MoveError> {
        self.write().play(row, col)
    }

    pub fn request_move(&self, row: i32, col: i32, acting: Color) -> Result<MoveOutcome, MoveError> {
        self.write().request_move(row, col, acting)
    }

    pub fn apply_remote_move(
        &self,
        row: i32,
        col: i32,
        color: Color,
    ) -> Result<MoveOutcome, MoveError> {
        self.write().apply_remote_move(row, col, color)
    }

    pub fn handle_envelope(&self, envelope: &MoveEnvelope) -> Result<MoveOutcome, SyncError> {
        self.write().handle_envelope(envelope)
    }

    pub fn handle_message(&self, json: &str) -> Result<MoveOutcome, SyncError> {
        self.write().handle_message(json)
    }

    pub fn restart(&self, config: SessionConfig) -> Result<(), ConfigError> {
        self.write().restart(config)
    }

    /// Consistent copy of the board for rendering.
    pub fn snapshot(&self) -> BoardSnapshot {
        self.read().snapshot()
    }

    pub fn status(&self) -> GameStatus {
        self.read().status()
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.read().to_json()
    }

    /// Run a closure against the session under the read lock.
    pub fn with<R>(&self, f: impl FnOnce(&GameSession) -> R) -> R {
        f(&self.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_shared_session_basic() {
        let session = GameSession::new(SessionConfig::local_vs_local("Alice", Color::Black)).unwrap();
        let shared = SharedSession::new(session);

        shared.play(7, 7).unwrap();
        assert_eq!(shared.play(7, 7), Err(MoveError::CellOccupied { row: 7, col: 7 }));

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.placed_count, 1);
        assert_eq!(snapshot.grid[7][7], Stone::Black);
        assert_eq!(shared.with(|s| s.active_color()), Color::White);
    }

    #[test]
    fn test_concurrent_moves_are_serialized() {
        let session = GameSession::new(SessionConfig::local_vs_local("Alice", Color::Black)).unwrap();
        let shared = SharedSession::new(session);

        // Every thread races for the same cells; each cell is taken once
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let mut accepted = 0;
                    for col in 0..COLS as i32 {
                        if shared.request_move(0, col, Color::White).is_ok() {
                            accepted += 1;
                        }
                        let snapshot = shared.snapshot();
                        let filled = snapshot.grid.iter().flatten().filter(|s| !s.is_empty()).count();
                        assert_eq!(filled, snapshot.placed_count);
                        if snapshot.status.is_terminal() {
                            break;
                        }
                    }
                    accepted
                })
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        let snapshot = shared.snapshot();
        assert_eq!(total, snapshot.placed_count);
        assert_eq!(snapshot.status, GameStatus::Won(Color::White));
    }
}

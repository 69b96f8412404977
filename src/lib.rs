//! Gobang State Library
//!
//! This crate provides state management for two-player Gobang
//! (five-in-a-row) on a 15x15 board.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Board State** - The grid of stones with a single validated placement
//!   entrypoint, placed-stone counting and last-move tracking.
//!
//! - **Win Detection** - Four-axis line scan from the newest stone, with a
//!   fixed axis order so the highlighted line is deterministic.
//!
//! - **Game Sessions** - One state machine for all three opponent modes
//!   (computer placeholder, hot-seat, networked) with turn discipline and
//!   win/draw verdicts.
//!
//! - **Move Sync** - Envelopes that keep two networked sessions in lock-step.
//!
//! # Design Principles
//!
//! 1. **Rejections change nothing** - A move that fails validation leaves the
//!    board and the session untouched, and is never transmitted.
//!
//! 2. **Derived views are recomputed** - Win lines, highlights and verdicts
//!    are computed from the board on demand, never stored.
//!
//! 3. **No networking** - Sending bytes is delegated to a `Transport`; who
//!    the opponent is comes from an `IdentityResolver`.
//!
//! 4. **Serialization-ready** - Wire types are serde types; sessions convert
//!    to JSON for clients.
//!
//! # Example
//!
//! ```rust
//! use gobang_state::state::{Color, GameSession, GameStatus, SessionConfig};
//!
//! let mut session = GameSession::new(SessionConfig::local_vs_local("Alice", Color::Black)).unwrap();
//!
//! for col in 0..4 {
//!     session.play(7, col).unwrap(); // black
//!     session.play(8, col).unwrap(); // white
//! }
//! let outcome = session.play(7, 4).unwrap();
//!
//! assert_eq!(outcome.status, GameStatus::Won(Color::Black));
//! assert_eq!(outcome.win_line.map(|l| l.cells.len()), Some(5));
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;

//! Move synchronization between two networked sessions.
//!
//! Every locally accepted move in a networked session is wrapped in a
//! [`MoveEnvelope`] addressed to the opponent and handed to a [`Transport`].
//! Inbound envelopes are checked for provenance before their move is handed
//! back to the session.
//!
//! # Wire format
//!
//! ```text
//! {"type": "game_move",
//!  "body": {"x": 7, "y": 8, "stoneColor": "black", "recipientIdentity": "id-bob"}}
//! ```
//!
//! `x` is the row and `y` the column.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::board::{Color, Move};
use super::error::SyncError;
use super::player::{IdentityResolver, OpponentHandle};

/// One move on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEnvelope {
    pub x: i32,
    pub y: i32,
    pub stone_color: Color,
    pub recipient_identity: String,
}

impl MoveEnvelope {
    pub fn new(x: i32, y: i32, stone_color: Color, recipient_identity: impl Into<String>) -> Self {
        Self {
            x,
            y,
            stone_color,
            recipient_identity: recipient_identity.into(),
        }
    }
}

/// Outer message, tagged so a dispatcher can route it without looking at
/// the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "snake_case")]
pub enum GameMessage {
    GameMove(MoveEnvelope),
}

impl GameMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GameMove(_) => "game_move",
        }
    }

    pub fn to_json(&self) -> Result<String, SyncError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Delivers outbound messages to the remote peer.
///
/// Sends are fire-and-forget: delivery failures are the transport's to
/// report, outside the session.
pub trait Transport: Send + Sync {
    fn send(&self, message: GameMessage);
}

/// Transport that queues messages for the host to drain and deliver.
#[derive(Debug, Clone, Default)]
pub struct OutboxTransport {
    queue: Arc<Mutex<Vec<GameMessage>>>,
}

impl OutboxTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued message, oldest first.
    pub fn drain(&self) -> Vec<GameMessage> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *queue)
    }

    pub fn len(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Transport for OutboxTransport {
    fn send(&self, message: GameMessage) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }
}

/// Network adapter for one session.
pub struct MoveSync {
    resolver: Arc<dyn IdentityResolver>,
    transport: Arc<dyn Transport>,

    /// Envelopes handed to the transport
    sent: u64,

    /// Inbound envelopes whose move was applied
    received: u64,

    /// Inbound envelopes dropped
    rejected: u64,
}

impl fmt::Debug for MoveSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveSync")
            .field("local_identity", &self.resolver.local_identity())
            .field("sent", &self.sent)
            .field("received", &self.received)
            .field("rejected", &self.rejected)
            .finish()
    }
}

impl MoveSync {
    pub fn new(resolver: Arc<dyn IdentityResolver>, transport: Arc<dyn Transport>) -> Self {
        Self {
            resolver,
            transport,
            sent: 0,
            received: 0,
            rejected: 0,
        }
    }

    /// Identity the opponent's envelopes are addressed to.
    pub fn resolve(&self, opponent: &OpponentHandle) -> Result<String, SyncError> {
        self.resolver
            .resolve(opponent)
            .ok_or_else(|| SyncError::UnknownOpponent(opponent.to_string()))
    }

    /// Build the envelope for a move without sending it.
    pub fn publish(&self, mv: Move, opponent: &OpponentHandle) -> Result<MoveEnvelope, SyncError> {
        let recipient = self.resolve(opponent)?;
        Ok(MoveEnvelope::new(
            mv.position.row as i32,
            mv.position.col as i32,
            mv.color,
            recipient,
        ))
    }

    /// Publish a move and hand it to the transport.
    pub fn transmit(
        &mut self,
        mv: Move,
        opponent: &OpponentHandle,
    ) -> Result<MoveEnvelope, SyncError> {
        let envelope = self.publish(mv, opponent)?;
        self.transport.send(GameMessage::GameMove(envelope.clone()));
        self.sent += 1;
        debug!(
            x = envelope.x,
            y = envelope.y,
            color = envelope.stone_color.as_str(),
            seq = self.sent,
            "move sent"
        );
        Ok(envelope)
    }

    /// Check an inbound envelope and extract its move as `(row, col, color)`.
    ///
    /// An envelope carrying our own color, or addressed to someone else, is
    /// dropped as a protocol mismatch.
    pub fn receive(
        &mut self,
        envelope: &MoveEnvelope,
        local_color: Color,
    ) -> Result<(i32, i32, Color), SyncError> {
        if let Err(err) = self.check(envelope, local_color) {
            self.rejected += 1;
            warn!(error = %err, "dropping inbound move");
            return Err(err);
        }

        Ok((envelope.x, envelope.y, envelope.stone_color))
    }

    /// Count an inbound move the session has applied.
    pub fn record_received(&mut self) {
        self.received += 1;
    }

    fn check(&self, envelope: &MoveEnvelope, local_color: Color) -> Result<(), SyncError> {
        if envelope.stone_color == local_color {
            return Err(SyncError::ProtocolMismatch(format!(
                "envelope declares our own color {}",
                local_color
            )));
        }

        let local_identity = self.resolver.local_identity();
        if envelope.recipient_identity != local_identity {
            return Err(SyncError::ProtocolMismatch(format!(
                "envelope addressed to {}, not {}",
                envelope.recipient_identity, local_identity
            )));
        }

        Ok(())
    }

    /// Parse an outer message and return its envelope.
    pub fn decode(json: &str) -> Result<MoveEnvelope, SyncError> {
        match serde_json::from_str::<GameMessage>(json)? {
            GameMessage::GameMove(envelope) => Ok(envelope),
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Zero the counters for a fresh game.
    pub fn reset(&mut self) {
        self.sent = 0;
        self.received = 0;
        self.rejected = 0;
    }
}

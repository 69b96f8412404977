//! Participants and identity resolution.
//!
//! A session always has exactly two seats, one per color. Each seat has a
//! display name used in verdicts. In networked sessions the opponent is also
//! addressed through an [`IdentityResolver`], which maps the opponent's handle
//! to the identity that outgoing envelopes are addressed to.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::Color;
use super::config::{GameMode, SessionConfig};

/// Display name for the computer placeholder opponent.
pub const PLACEHOLDER_NAME: &str = "Computer";

/// Display name for the second seat in a hot-seat game.
pub const GUEST_NAME: &str = "Guest";

/// Opaque handle for a remote opponent (their username).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpponentHandle(pub String);

impl OpponentHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves who we are and where the opponent's messages go.
pub trait IdentityResolver: Send + Sync {
    /// Identity that inbound envelopes must be addressed to.
    fn local_identity(&self) -> String;

    /// Identity to address envelopes for `opponent` to.
    fn resolve(&self, opponent: &OpponentHandle) -> Option<String>;
}

/// In-memory username -> identity directory.
#[derive(Debug, Clone, Default)]
pub struct DirectoryResolver {
    local_identity: String,
    users: HashMap<String, String>,
}

impl DirectoryResolver {
    pub fn new(local_identity: impl Into<String>) -> Self {
        Self {
            local_identity: local_identity.into(),
            users: HashMap::new(),
        }
    }

    /// Register a user, returning the directory for chaining.
    pub fn with_user(mut self, username: impl Into<String>, identity: impl Into<String>) -> Self {
        self.insert(username, identity);
        self
    }

    pub fn insert(&mut self, username: impl Into<String>, identity: impl Into<String>) {
        self.users.insert(username.into(), identity.into());
    }

    pub fn remove(&mut self, username: &str) -> Option<String> {
        self.users.remove(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl IdentityResolver for DirectoryResolver {
    fn local_identity(&self) -> String {
        self.local_identity.clone()
    }

    fn resolve(&self, opponent: &OpponentHandle) -> Option<String> {
        self.users.get(opponent.as_str()).cloned()
    }
}

/// Names of the two seats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participants {
    black: String,
    white: String,
}

impl Participants {
    pub fn new(black: impl Into<String>, white: impl Into<String>) -> Self {
        Self {
            black: black.into(),
            white: white.into(),
        }
    }

    /// Seat names for a configuration.
    ///
    /// The local user sits at `config.local_color`; the other seat is the
    /// placeholder, the hot-seat guest, or the remote opponent.
    pub fn for_config(config: &SessionConfig) -> Self {
        let other = match config.mode {
            GameMode::LocalVsPlaceholder => PLACEHOLDER_NAME.to_string(),
            GameMode::LocalVsLocal => GUEST_NAME.to_string(),
            GameMode::Networked => config
                .opponent
                .as_ref()
                .map(|o| o.to_string())
                .unwrap_or_else(|| GUEST_NAME.to_string()),
        };
        let local = config.local_name.clone();

        match config.local_color {
            Color::Black => Self::new(local, other),
            Color::White => Self::new(other, local),
        }
    }

    pub fn name_of(&self, color: Color) -> &str {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "black": self.black,
            "white": self.white
        })
    }
}

//! Session configuration.
//!
//! Supplied by the surrounding UI when a game starts or restarts.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::Color;
use super::error::ConfigError;
use super::player::OpponentHandle;

/// Opponent modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Local player against a computer seat that never moves.
    LocalVsPlaceholder,
    /// Hot-seat: both colors are played on this machine.
    #[default]
    LocalVsLocal,
    /// Local player against a remote peer.
    Networked,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocalVsPlaceholder => "local_vs_placeholder",
            Self::LocalVsLocal => "local_vs_local",
            Self::Networked => "networked",
        }
    }

    pub fn is_networked(&self) -> bool {
        matches!(self, Self::Networked)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_moves_first() -> bool {
    true
}

fn default_local_name() -> String {
    "Player".to_string()
}

/// Everything needed to (re)start a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub mode: GameMode,

    /// Color controlled by this process's user
    pub local_color: Color,

    /// Remote opponent (networked mode only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent: Option<OpponentHandle>,

    /// Whether the local color gets the opening move
    #[serde(default = "default_moves_first")]
    pub moves_first: bool,

    /// Display name for the local user
    #[serde(default = "default_local_name")]
    pub local_name: String,
}

impl SessionConfig {
    /// Play against the computer placeholder with the chosen color.
    pub fn local_vs_placeholder(local_name: impl Into<String>, color: Color) -> Self {
        Self {
            mode: GameMode::LocalVsPlaceholder,
            local_color: color,
            opponent: None,
            moves_first: true,
            local_name: local_name.into(),
        }
    }

    /// Hot-seat game; the chosen color opens.
    pub fn local_vs_local(local_name: impl Into<String>, color: Color) -> Self {
        Self {
            mode: GameMode::LocalVsLocal,
            local_color: color,
            opponent: None,
            moves_first: true,
            local_name: local_name.into(),
        }
    }

    /// Networked game. The side that sent the invitation (`proactive`) plays
    /// black and opens; the invited side plays white and waits.
    pub fn networked(
        local_name: impl Into<String>,
        opponent: OpponentHandle,
        proactive: bool,
    ) -> Self {
        Self {
            mode: GameMode::Networked,
            local_color: if proactive { Color::Black } else { Color::White },
            opponent: Some(opponent),
            moves_first: proactive,
            local_name: local_name.into(),
        }
    }

    /// Color that makes the opening move.
    pub fn first_color(&self) -> Color {
        if self.moves_first {
            self.local_color
        } else {
            self.local_color.opposite()
        }
    }

    /// Check the opponent handle matches the mode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The placeholder never moves, so it can't take the opening move
        if self.mode == GameMode::LocalVsPlaceholder && !self.moves_first {
            return Err(ConfigError::PlaceholderOpens);
        }

        match (self.mode, &self.opponent) {
            (GameMode::Networked, None) => Err(ConfigError::MissingOpponent),
            (GameMode::Networked, Some(_)) => Ok(()),
            (mode, Some(_)) => Err(ConfigError::UnexpectedOpponent(mode)),
            (_, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_color() {
        let config = SessionConfig::local_vs_local("Alice", Color::White);
        assert_eq!(config.first_color(), Color::White);

        let config = SessionConfig::networked("Alice", OpponentHandle::new("bob"), true);
        assert_eq!(config.local_color, Color::Black);
        assert_eq!(config.first_color(), Color::Black);

        let config = SessionConfig::networked("Alice", OpponentHandle::new("bob"), false);
        assert_eq!(config.local_color, Color::White);
        assert_eq!(config.first_color(), Color::Black);
    }

    #[test]
    fn test_validate() {
        assert!(SessionConfig::local_vs_placeholder("Alice", Color::Black)
            .validate()
            .is_ok());

        let mut config = SessionConfig::networked("Alice", OpponentHandle::new("bob"), true);
        assert!(config.validate().is_ok());

        config.opponent = None;
        assert_eq!(config.validate(), Err(ConfigError::MissingOpponent));

        let mut config = SessionConfig::local_vs_local("Alice", Color::Black);
        config.opponent = Some(OpponentHandle::new("bob"));
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnexpectedOpponent(GameMode::LocalVsLocal))
        );

        let mut config = SessionConfig::local_vs_placeholder("Alice", Color::Black);
        config.moves_first = false;
        assert_eq!(config.validate(), Err(ConfigError::PlaceholderOpens));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: SessionConfig = serde_json::from_value(serde_json::json!({
            "mode": "networked",
            "local_color": "white",
            "opponent": "bob"
        }))
        .unwrap();

        assert_eq!(config.mode, GameMode::Networked);
        assert_eq!(config.opponent, Some(OpponentHandle::new("bob")));
        assert!(config.moves_first);
        assert_eq!(config.local_name, "Player");
    }
}

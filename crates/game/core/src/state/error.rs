//! Roster construction and lookup errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::PlayerId;

/// Errors raised while dealing or querying the roster.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RosterError {
    /// The table needs exactly the configured number of seats.
    #[error("expected {expected} player names, got {actual}")]
    WrongPlayerCount { expected: usize, actual: usize },

    /// Two seats ended up with the same display name.
    #[error("player name '{name}' is used more than once")]
    DuplicateName { name: String },

    /// No seat carries the given id.
    #[error("no player with id {0}")]
    UnknownPlayer(PlayerId),

    /// No seat matches the given name or seat number.
    #[error("no player matches '{0}'")]
    UnresolvedName(String),
}

impl GameError for RosterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongPlayerCount { .. } => "ROSTER_WRONG_PLAYER_COUNT",
            Self::DuplicateName { .. } => "ROSTER_DUPLICATE_NAME",
            Self::UnknownPlayer(_) => "ROSTER_UNKNOWN_PLAYER",
            Self::UnresolvedName(_) => "ROSTER_UNRESOLVED_NAME",
        }
    }
}

//! Error types surfaced by the game engine.

use crate::action::ActionError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Phase, PlayerId, RosterError};

/// Errors surfaced while driving the session through the engine.
///
/// Every failing operation leaves the state exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The operation is not available in the current phase.
    #[error("cannot {operation} during {phase}")]
    WrongPhase {
        operation: &'static str,
        phase: Phase,
    },

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Action(#[from] ActionError),

    /// Each role card may be opened once.
    #[error("player {0} has already seen their role")]
    RoleAlreadyViewed(PlayerId),

    #[error("all {max} polls have been used")]
    PollsExhausted { max: u32 },

    #[error("no snapshot at index {index} (history holds {len})")]
    SnapshotOutOfRange { index: usize, len: usize },

    /// The state machine was asked for a move it does not allow.
    #[error("illegal phase transition from {from} to {to}")]
    IllegalTransition { from: Phase, to: Phase },
}

impl EngineError {
    pub(crate) fn wrong_phase(operation: &'static str, phase: Phase) -> Self {
        Self::WrongPhase { operation, phase }
    }
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        use EngineError::*;
        match self {
            WrongPhase { .. } => ErrorSeverity::Recoverable,
            Roster(err) => err.severity(),
            Action(err) => err.severity(),
            RoleAlreadyViewed(_) | PollsExhausted { .. } | SnapshotOutOfRange { .. } => {
                ErrorSeverity::Validation
            }
            IllegalTransition { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use EngineError::*;
        match self {
            WrongPhase { .. } => "ENGINE_WRONG_PHASE",
            Roster(err) => err.error_code(),
            Action(err) => err.error_code(),
            RoleAlreadyViewed(_) => "ENGINE_ROLE_ALREADY_VIEWED",
            PollsExhausted { .. } => "ENGINE_POLLS_EXHAUSTED",
            SnapshotOutOfRange { .. } => "ENGINE_SNAPSHOT_OUT_OF_RANGE",
            IllegalTransition { .. } => "ENGINE_ILLEGAL_TRANSITION",
        }
    }
}

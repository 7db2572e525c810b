//! Unified error type surfaced by the runtime API.
//!
//! Wraps engine rejections, repository failures and suggestion-source
//! failures so the console can report them uniformly.
use mafia_core::{EngineError, ErrorSeverity, GameError};
use thiserror::Error;

pub use crate::narration::NarrationError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Narration(#[from] NarrationError),
}

impl RuntimeError {
    /// Whether the moderator can simply try again.
    ///
    /// Engine rejections and suggestion failures never touch committed
    /// state; repository failures mean the last change may not be on disk.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RuntimeError::Engine(err) => !matches!(
                err.severity(),
                ErrorSeverity::Internal | ErrorSeverity::Fatal
            ),
            RuntimeError::Narration(_) => true,
            RuntimeError::Repository(_) => false,
        }
    }
}

//! Session runtime for the Mafia moderator.
//!
//! This crate wraps the deterministic rules in `mafia-core` with everything a
//! live table needs: saving the session after each change, turning spoken
//! narration into suggested night actions, and reading configuration from
//! the environment.
//!
//! Modules are organized by responsibility:
//! - [`moderator`] drives the engine and persists every change
//! - [`repository`] stores the session blob on disk or in memory
//! - [`narration`] produces suggested night actions from free text
//! - [`api`] exposes the error types downstream clients interact with
pub mod api;
pub mod config;
pub mod moderator;
pub mod narration;
pub mod repository;

pub use api::{Result, RuntimeError};
pub use config::{RuntimeConfig, default_save_file};
pub use moderator::{Moderator, Suggestion};
pub use narration::{
    KeywordNarrationParser, NarrationError, NarrationParser, ProposedAction, ResolvedProposals,
    decode_actions_json, resolve_proposals,
};
pub use repository::{
    FileSessionRepository, InMemorySessionRepository, RepositoryError, SessionRepository,
};

//! Deterministic rules and session state for a moderated Mafia game.
//!
//! `mafia-core` defines the canonical rules (night resolution, gun transfer,
//! day voting, win evaluation) and the phase state machine that sequences
//! them. It performs no I/O. All state mutation flows through
//! [`engine::GameEngine`], and supporting crates depend on the types
//! re-exported here.
pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;

pub use action::{
    ActionError, DayGunOutcome, DayGunReport, Elimination, EliminationCause, GunTransfer,
    MergeReport, NightActionSet, NightIntent, NightProposal, NightResult, ProposalKind,
    TransferDraft, TransferReport, Verdict, VoteTally, resolve_night, votes_needed,
};
pub use config::GameConfig;
pub use engine::{
    EngineError, GameEngine, NominationOutcome, PollReport, RoleCard, Teammate, Winner, check_win,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    Countdown, GameSnapshot, GameState, GunFlavor, History, NarrativeLog, PendingInput, Phase,
    Player, PlayerId, Role, Roster, RosterError,
};

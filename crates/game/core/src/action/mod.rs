//! Rule resolvers for everything players do.
//!
//! # Module Structure
//!
//! - `night`: night intents, proposal merging and [`resolve_night`]
//! - `guns`: gun transfer after a night and day gun use
//! - `vote`: nomination threshold and final ballot
//! - `elimination`: frozen eliminated players and their causes
//! - `error`: [`ActionError`]
//!
//! Resolvers operate on a [`Roster`](crate::state::Roster) only; phase
//! bookkeeping lives in the engine.

pub mod elimination;
pub mod error;
pub mod guns;
pub mod night;
pub mod vote;

pub use elimination::{Elimination, EliminationCause};
pub use error::ActionError;
pub use guns::{
    DayGunOutcome, DayGunReport, GunTransfer, TransferDraft, TransferReport, apply_gun_transfers,
    use_day_gun,
};
pub use night::{
    MergeReport, NightActionSet, NightIntent, NightOutcome, NightProposal, NightResult,
    ProposalKind, eligible_savers, eligible_shooters, resolve_night,
};
pub use vote::{Verdict, VoteTally, resolve_final_vote, votes_needed};

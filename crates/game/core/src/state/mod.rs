//! Authoritative session state.
//!
//! This module owns the roster, the phase, the narrative log and the
//! snapshot history. Runtime layers clone or query this state but mutate it
//! exclusively through the engine.
mod countdown;
mod error;
mod history;
mod log;
mod pending;
mod phase;
mod player;
mod roster;

pub use countdown::Countdown;
pub use error::RosterError;
pub use history::{GameSnapshot, History};
pub use log::{EMPHASIS, NarrativeLog, emphasize, strip_emphasis};
pub use pending::PendingInput;
pub use phase::Phase;
pub use player::{GunFlavor, Player, PlayerId, Role};
pub use roster::Roster;

use crate::config::GameConfig;
use crate::engine::{Winner, check_win};

/// The single owned session object for one game.
///
/// Serialized with the `serde` feature this is exactly the persisted blob:
/// `{ players, gamePhase, day, log, pollsUsed, history }`.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    #[cfg_attr(feature = "serde", serde(rename = "players"))]
    pub roster: Roster,

    #[cfg_attr(feature = "serde", serde(rename = "gamePhase"))]
    pub phase: Phase,

    /// Cycle number: Day 1, Night 2, Day 2, Night 3, ...
    pub day: u32,

    #[cfg_attr(feature = "serde", serde(default))]
    pub log: NarrativeLog,

    #[cfg_attr(feature = "serde", serde(default, rename = "pollsUsed"))]
    pub polls_used: u32,

    #[cfg_attr(feature = "serde", serde(default))]
    pub history: History,

    /// Phase the game was in when the win evaluator ended it.
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "endedIn", skip_serializing_if = "Option::is_none")
    )]
    pub ended_in: Option<Phase>,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) pending: PendingInput,
}

impl GameState {
    /// Fresh session waiting in [`Phase::Setup`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &PendingInput {
        &self.pending
    }

    /// The winner once the game has ended.
    pub fn winner(&self) -> Option<Winner> {
        match self.phase {
            Phase::End => check_win(&self.roster),
            _ => None,
        }
    }

    pub fn polls_left(&self) -> u32 {
        GameConfig::MAX_POLLS.saturating_sub(self.polls_used)
    }

    /// Structural checks applied to a loaded save before trusting it.
    pub fn is_consistent(&self) -> bool {
        if self.phase == Phase::Setup {
            return self.roster.is_empty();
        }
        let mafia = self.roster.iter().filter(|p| p.role.is_mafia()).count();
        let seated_in_order = self
            .roster
            .iter()
            .enumerate()
            .all(|(index, p)| p.id == PlayerId(index as u32));

        self.roster.len() == GameConfig::PLAYER_COUNT
            && mafia == GameConfig::MAFIA_COUNT
            && seated_in_order
            && self.history.iter().all(|s| s.players.len() == self.roster.len())
    }
}

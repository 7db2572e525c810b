use crate::state::{Player, PlayerId, Roster};

/// Why a player left the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EliminationCause {
    /// A Citizen fired at another Citizen during the night.
    Fireback { target: PlayerId },
    /// Night shots outnumbered the saves on this player.
    NightShots { shots: u32, saves: u32 },
    /// Hit by a functional day gun.
    DayGun { shooter: PlayerId },
    /// Their own sabotaged day gun backfired.
    SabotagedGun { target: Option<PlayerId> },
    /// Voted out at the end of a day.
    Vote { votes: u32 },
    /// Removed by the moderator for a rules violation.
    Kick,
}

impl EliminationCause {
    /// Human-readable reason, resolving ids to names through `roster`.
    pub fn describe(&self, roster: &Roster) -> String {
        match *self {
            Self::Fireback { target } => {
                format!("fired upon a citizen ({})", roster.name_of(target))
            }
            Self::NightShots { shots, saves } => format!(
                "night shots ({}, {})",
                count(shots, "shot", "shots"),
                count(saves, "save", "saves")
            ),
            Self::DayGun { shooter } => format!("day gun fired by {}", roster.name_of(shooter)),
            Self::SabotagedGun { .. } => "sabotaged day gun backfired".to_string(),
            Self::Vote { votes } => format!("day vote ({})", count(votes, "vote", "votes")),
            Self::Kick => "disciplinary kick".to_string(),
        }
    }
}

/// A player as they were at the moment of elimination.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Elimination {
    pub player: Player,
    pub cause: EliminationCause,
}

impl Elimination {
    pub fn new(player: Player, cause: EliminationCause) -> Self {
        Self { player, cause }
    }
}

/// `1 shot`, `0 saves`, `2 votes`.
pub(crate) fn count(n: u32, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

//! Two-stage day vote: nomination threshold, then the final ballot.

use std::collections::BTreeMap;

use crate::action::error::ActionError;
use crate::state::PlayerId;

/// Votes needed to reach trial, or to convict a lone candidate:
/// `ceil(living / 2)`.
pub fn votes_needed(living: usize) -> u32 {
    living.div_ceil(2) as u32
}

/// Moderator-entered vote counters for a fixed ballot.
///
/// Counters never drop below zero and never exceed the number of living
/// players.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteTally {
    counts: BTreeMap<PlayerId, u32>,
}

impl VoteTally {
    pub fn new(ballot: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            counts: ballot.into_iter().map(|id| (id, 0)).collect(),
        }
    }

    pub fn get(&self, player: PlayerId) -> u32 {
        self.counts.get(&player).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, u32)> + '_ {
        self.counts.iter().map(|(&id, &n)| (id, n))
    }

    pub fn ballot(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.counts.keys().copied()
    }

    pub fn set(&mut self, player: PlayerId, votes: u32, living: usize) -> Result<u32, ActionError> {
        let living = living as u32;
        if votes > living {
            return Err(ActionError::TallyAboveLiving {
                tally: votes,
                living,
            });
        }
        let slot = self
            .counts
            .get_mut(&player)
            .ok_or(ActionError::NotOnBallot(player))?;
        *slot = votes;
        Ok(votes)
    }

    /// Adds `delta` (may be negative), flooring at zero. A result above the
    /// living count is rejected like [`VoteTally::set`].
    pub fn adjust(&mut self, player: PlayerId, delta: i64, living: usize) -> Result<u32, ActionError> {
        let current = i64::from(self.get(player));
        let next = current.saturating_add(delta).max(0);
        let next = u32::try_from(next).unwrap_or(u32::MAX);
        self.set(player, next, living)
    }

    /// Drops a player from the ballot (eliminated mid-day).
    pub fn strike(&mut self, player: PlayerId) {
        self.counts.remove(&player);
    }

    /// Players whose counter reached `threshold`, in id order.
    pub fn reaching(&self, threshold: u32) -> Vec<PlayerId> {
        self.counts
            .iter()
            .filter(|&(_, &n)| n >= threshold)
            .map(|(&id, _)| id)
            .collect()
    }
}

/// Result of the final vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The candidate is voted out.
    Eliminated { player: PlayerId, votes: u32 },
    /// A lone candidate fell short of the threshold.
    Spared {
        player: PlayerId,
        votes: u32,
        needed: u32,
    },
    /// Several candidates share the highest count.
    Tie { votes: u32 },
    /// Nobody received a vote (or nobody was left on the ballot).
    NoVotes,
}

impl Verdict {
    pub fn eliminated(&self) -> Option<PlayerId> {
        match *self {
            Verdict::Eliminated { player, .. } => Some(player),
            _ => None,
        }
    }
}

/// Resolves the final ballot. At most one player is eliminated.
pub fn resolve_final_vote(tally: &VoteTally, living: usize) -> Verdict {
    let entries: Vec<(PlayerId, u32)> = tally.iter().collect();
    match entries.as_slice() {
        [] => Verdict::NoVotes,
        [(player, votes)] => {
            let needed = votes_needed(living);
            if *votes >= needed {
                Verdict::Eliminated {
                    player: *player,
                    votes: *votes,
                }
            } else {
                Verdict::Spared {
                    player: *player,
                    votes: *votes,
                    needed,
                }
            }
        }
        many => {
            let max = many.iter().map(|&(_, n)| n).max().unwrap_or(0);
            if max == 0 {
                return Verdict::NoVotes;
            }
            let mut leaders = many.iter().filter(|&&(_, n)| n == max);
            match (leaders.next(), leaders.next()) {
                (Some(&(player, votes)), None) => Verdict::Eliminated { player, votes },
                _ => Verdict::Tie { votes: max },
            }
        }
    }
}

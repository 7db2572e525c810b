//! Day phases: day guns, polls, nomination, trial and final vote.

use std::time::{Duration, Instant};

use super::{EngineError, GameEngine};
use crate::action::elimination::count;
use crate::action::{
    DayGunReport, Verdict, VoteTally, resolve_final_vote, use_day_gun, votes_needed,
};
use crate::config::GameConfig;
use crate::state::{Countdown, Phase, PlayerId, Role, Roster, emphasize};

/// Result of closing the nomination stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NominationOutcome {
    /// Nobody reached the threshold; the day is over.
    NoTrial { needed: u32 },
    /// These players go on trial.
    Trial {
        candidates: Vec<PlayerId>,
        needed: u32,
    },
}

/// Answer to a status inquiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollReport {
    pub eliminated_mafia: usize,
    pub eliminated_citizens: usize,
    pub polls_left: u32,
}

impl GameEngine<'_> {
    /// Fires a day gun. A `None` target is a warning shot.
    pub fn use_day_gun(
        &mut self,
        shooter: PlayerId,
        target: Option<PlayerId>,
        gun_index: usize,
    ) -> Result<DayGunReport, EngineError> {
        self.expect_day("fire a day gun")?;
        let report = use_day_gun(&mut self.state.roster, shooter, target, gun_index)?;
        self.state.log.push(report.log.clone());
        if let Some(eliminated) = &report.eliminated {
            self.forget_pending(eliminated.player.id);
        }
        self.settle();
        Ok(report)
    }

    /// Reveals how many of each side are out. Limited per game.
    pub fn poll(&mut self) -> Result<PollReport, EngineError> {
        self.expect_day("run a poll")?;
        if self.state.polls_used >= GameConfig::MAX_POLLS {
            return Err(EngineError::PollsExhausted {
                max: GameConfig::MAX_POLLS,
            });
        }
        self.state.polls_used += 1;

        let roster = &self.state.roster;
        let report = PollReport {
            eliminated_mafia: roster.eliminated_with_role(Role::Mafia),
            eliminated_citizens: roster.eliminated_with_role(Role::Citizen),
            polls_left: self.state.polls_left(),
        };
        self.state.log.push(format!(
            "{} {} and {} have been eliminated.",
            emphasize("Poll result:"),
            emphasize(format!("{} mafia", report.eliminated_mafia)),
            emphasize(count(
                report.eliminated_citizens as u32,
                "citizen",
                "citizens"
            ))
        ));
        Ok(report)
    }

    // ===== voting =====

    /// Sets a counter on the current ballot (nomination or final vote).
    pub fn set_votes(&mut self, player: PlayerId, votes: u32) -> Result<u32, EngineError> {
        self.expect_phase("record votes", &[Phase::DayNomination, Phase::DayFinalVote])?;
        let living = self.state.roster.living_count();
        Ok(self.ballot_mut().set(player, votes, living)?)
    }

    /// Adds `delta` (may be negative) to a counter on the current ballot.
    pub fn adjust_votes(&mut self, player: PlayerId, delta: i64) -> Result<u32, EngineError> {
        self.expect_phase("record votes", &[Phase::DayNomination, Phase::DayFinalVote])?;
        let living = self.state.roster.living_count();
        Ok(self.ballot_mut().adjust(player, delta, living)?)
    }

    /// Sends everyone at or above the threshold to trial, or ends the day if
    /// nobody made it.
    pub fn close_nomination(&mut self, now: Instant) -> Result<NominationOutcome, EngineError> {
        self.expect_phase("close the nomination", &[Phase::DayNomination])?;
        let needed = votes_needed(self.state.roster.living_count());
        let nominees: Vec<PlayerId> = self
            .state
            .pending
            .tally
            .as_ref()
            .map(|tally| tally.reaching(needed))
            .unwrap_or_default()
            .into_iter()
            .filter(|&id| self.state.roster.is_alive(id))
            .collect();

        if nominees.is_empty() {
            self.state.log.push(format!(
                "Nobody reached {}. No trial today.",
                count(needed, "vote", "votes")
            ));
            self.end_day(now)?;
            return Ok(NominationOutcome::NoTrial { needed });
        }

        self.advance(Phase::DayTrial)?;
        self.state.pending.candidates = nominees.clone();
        self.state.pending.countdown = Some(Countdown::start(self.config.defense_window, now));
        self.state.log.push(format!(
            "On trial: {} ({} needed). The defense begins.",
            names(&self.state.roster, &nominees),
            count(needed, "vote", "votes")
        ));
        Ok(NominationOutcome::Trial {
            candidates: nominees,
            needed,
        })
    }

    pub fn restart_defense(&mut self, now: Instant) -> Result<(), EngineError> {
        self.expect_phase("restart the defense timer", &[Phase::DayTrial])?;
        let window = self.config.defense_window;
        self.state
            .pending
            .countdown
            .get_or_insert_with(|| Countdown::start(window, now))
            .restart(now);
        Ok(())
    }

    /// Time left for the defense. Expiry only signals; it changes nothing.
    pub fn defense_remaining(&self, now: Instant) -> Option<Duration> {
        match self.state.phase {
            Phase::DayTrial => self.state.pending.countdown.map(|c| c.remaining(now)),
            _ => None,
        }
    }

    /// Opens a fresh ballot for the trial candidates still alive.
    pub fn open_final_vote(&mut self) -> Result<Vec<PlayerId>, EngineError> {
        self.expect_phase("open the final vote", &[Phase::DayTrial])?;
        let candidates: Vec<PlayerId> = self
            .state
            .pending
            .candidates
            .iter()
            .copied()
            .filter(|&id| self.state.roster.is_alive(id))
            .collect();

        self.advance(Phase::DayFinalVote)?;
        self.state.pending.tally = Some(VoteTally::new(candidates.iter().copied()));
        self.state.pending.candidates = candidates.clone();
        self.state.log.push(format!(
            "Final vote: {}.",
            names(&self.state.roster, &candidates)
        ));
        Ok(candidates)
    }

    /// Resolves the final ballot, closes the day and opens the next night.
    pub fn close_final_vote(&mut self, now: Instant) -> Result<Verdict, EngineError> {
        self.expect_phase("close the final vote", &[Phase::DayFinalVote])?;
        let living = self.state.roster.living_count();
        let verdict = match self.state.pending.tally.as_ref() {
            Some(tally) => resolve_final_vote(tally, living),
            None => Verdict::NoVotes,
        };

        let line = match verdict {
            Verdict::Eliminated { player, votes } => {
                self.state.roster.eliminate(player);
                format!(
                    "{} was eliminated by the day vote ({}).",
                    emphasize(self.state.roster.name_of(player)),
                    count(votes, "vote", "votes")
                )
            }
            Verdict::Spared {
                player,
                votes,
                needed,
            } => format!(
                "{} was spared with {votes} of {needed} needed votes.",
                emphasize(self.state.roster.name_of(player))
            ),
            Verdict::Tie { votes } => {
                format!("Tie at {}. Nobody is eliminated.", count(votes, "vote", "votes"))
            }
            Verdict::NoVotes => "No votes were cast. Nobody is eliminated.".to_string(),
        };
        self.state.log.push(line);
        self.end_day(now)?;
        Ok(verdict)
    }

    /// Closes the current day: win check, snapshot, then the next night.
    fn end_day(&mut self, now: Instant) -> Result<(), EngineError> {
        let day = self.state.day;
        self.state.log.push(emphasize(format!("End of day {day}.")));
        if self.settle().is_some() {
            return Ok(());
        }

        let night = day + 1;
        self.advance(Phase::NightConsult)?;
        self.record_snapshot(night, Phase::NightConsult);
        self.state.day = night;
        self.state.pending.countdown = Some(Countdown::start(self.config.consult_window, now));
        self.state
            .log
            .push(format!("Night {night} begins. The mafia may consult."));
        Ok(())
    }

    fn ballot_mut(&mut self) -> &mut VoteTally {
        let state = &mut *self.state;
        let ballot: Vec<PlayerId> = match state.phase {
            Phase::DayFinalVote => state
                .pending
                .candidates
                .iter()
                .copied()
                .filter(|&id| state.roster.is_alive(id))
                .collect(),
            _ => state.roster.living().map(|p| p.id).collect(),
        };
        state
            .pending
            .tally
            .get_or_insert_with(|| VoteTally::new(ballot))
    }
}

fn names(roster: &Roster, ids: &[PlayerId]) -> String {
    ids.iter()
        .map(|&id| emphasize(roster.name_of(id)))
        .collect::<Vec<_>>()
        .join(", ")
}

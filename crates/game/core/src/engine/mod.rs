//! Phase state machine and session reducer.
//!
//! The [`GameEngine`] is the only writer of [`GameState`]. Each public
//! operation checks the current phase, validates its input against the
//! roster, and only then mutates. After every mutation that can remove a
//! player the win evaluator runs and may end the game on the spot.

mod day;
mod errors;
mod night;
mod win;

pub use day::{NominationOutcome, PollReport};
pub use errors::EngineError;
pub use win::{Winner, check_win};

use std::collections::BTreeSet;

use rand::Rng;

use crate::action::{ActionError, Elimination, EliminationCause};
use crate::config::GameConfig;
use crate::state::{GameSnapshot, GameState, Phase, PlayerId, Role, Roster, emphasize};

/// What a player sees when they look at their role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleCard {
    pub player: PlayerId,
    pub name: String,
    pub role: Role,
    /// Other Mafia members; empty for Citizens.
    pub teammates: Vec<Teammate>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Teammate {
    pub player: PlayerId,
    pub name: String,
    pub has_viewed: bool,
}

impl RoleCard {
    fn build(roster: &Roster, viewed: &BTreeSet<PlayerId>, player: PlayerId) -> Result<Self, EngineError> {
        let me = roster.require(player)?;
        let teammates = if me.role.is_mafia() {
            roster
                .iter()
                .filter(|p| p.role.is_mafia() && p.id != player)
                .map(|p| Teammate {
                    player: p.id,
                    name: p.name.clone(),
                    has_viewed: viewed.contains(&p.id),
                })
                .collect()
        } else {
            Vec::new()
        };
        Ok(Self {
            player,
            name: me.name.clone(),
            role: me.role,
            teammates,
        })
    }
}

/// Drives one session through its phases.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
    config: &'a GameConfig,
}

impl<'a> GameEngine<'a> {
    /// Creates a new game engine over the given session.
    pub fn new(state: &'a mut GameState, config: &'a GameConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    // ===== setup =====

    /// Seats the players, deals roles and opens the role reveal.
    pub fn start_game<S, R>(&mut self, names: &[S], rng: &mut R) -> Result<(), EngineError>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        self.expect_phase("start a game", &[Phase::Setup])?;
        let roster = Roster::deal(names, rng)?;

        *self.state = GameState {
            roster,
            ..GameState::new()
        };
        self.advance(Phase::RoleReveal)?;
        self.state.log.push(format!(
            "Game started with {} players. Each player may now view their role once.",
            GameConfig::PLAYER_COUNT
        ));
        Ok(())
    }

    /// Shows a player their role. Each card can be opened once.
    pub fn reveal_role(&mut self, player: PlayerId) -> Result<RoleCard, EngineError> {
        self.expect_phase("reveal a role", &[Phase::RoleReveal])?;
        if self.state.pending.viewed.contains(&player) {
            return Err(EngineError::RoleAlreadyViewed(player));
        }
        let card = RoleCard::build(&self.state.roster, &self.state.pending.viewed, player)?;
        self.state.pending.viewed.insert(player);
        Ok(card)
    }

    /// The moderator opened the full role list; treat every card as seen.
    pub fn mark_all_viewed(&mut self) {
        if self.state.phase == Phase::RoleReveal {
            let everyone: Vec<PlayerId> = self.state.roster.iter().map(|p| p.id).collect();
            self.state.pending.viewed.extend(everyone);
        }
    }

    pub fn start_first_day(&mut self) -> Result<(), EngineError> {
        self.expect_phase("start the first day", &[Phase::RoleReveal])?;
        self.advance(Phase::DayNomination)?;
        self.record_snapshot(1, Phase::DayNomination);
        self.state.day = 1;
        self.state.log.push("Day 1 begins.");
        Ok(())
    }

    // ===== moderator tools =====

    /// Removes a living player for a rules violation. Their day guns go with
    /// them.
    pub fn kick(&mut self, player: PlayerId) -> Result<Elimination, EngineError> {
        if !self.state.phase.is_in_play() {
            return Err(EngineError::wrong_phase("kick a player", self.state.phase));
        }
        let target = self.state.roster.require_mut(player)?;
        if !target.is_alive {
            return Err(ActionError::TargetEliminated(player).into());
        }
        target.received_guns.clear();
        target.is_alive = false;
        let frozen = target.clone();

        self.forget_pending(player);
        self.state.log.push(format!(
            "{} {} was removed from the game.",
            emphasize("Disciplinary kick!"),
            emphasize(&frozen.name)
        ));
        self.settle();
        Ok(Elimination::new(frozen, EliminationCause::Kick))
    }

    /// Returns to the start of the day or night recorded at `index`.
    ///
    /// Later snapshots are discarded, the log is cut back to the recorded
    /// length and every in-flight input is dropped.
    pub fn restore(&mut self, index: usize) -> Result<GameSnapshot, EngineError> {
        if self.state.phase == Phase::Setup {
            return Err(EngineError::wrong_phase("restore a snapshot", Phase::Setup));
        }
        let len = self.state.history.len();
        let snapshot = self
            .state
            .history
            .rewind_to(index)
            .ok_or(EngineError::SnapshotOutOfRange { index, len })?;

        self.state.roster = snapshot.players.clone();
        self.state.phase = snapshot.phase;
        self.state.day = snapshot.day;
        self.state.polls_used = snapshot.polls_used;
        self.state.ended_in = None;
        self.state.log.truncate(snapshot.log_length);
        self.state.pending.clear();
        self.state.log.push(format!(
            "{} the game was restored to the start of {}.",
            emphasize("Time travel:"),
            snapshot.label()
        ));
        Ok(snapshot)
    }

    /// Discards the whole session and returns to setup.
    pub fn reset(&mut self) {
        *self.state = GameState::new();
    }

    // ===== internals =====

    fn expect_phase(&self, operation: &'static str, allowed: &[Phase]) -> Result<(), EngineError> {
        if allowed.contains(&self.state.phase) {
            Ok(())
        } else {
            Err(EngineError::wrong_phase(operation, self.state.phase))
        }
    }

    fn expect_day(&self, operation: &'static str) -> Result<(), EngineError> {
        if self.state.phase.is_day() {
            Ok(())
        } else {
            Err(EngineError::wrong_phase(operation, self.state.phase))
        }
    }

    /// Moves along one edge of the state machine and drops the previous
    /// phase's buffers.
    fn advance(&mut self, next: Phase) -> Result<(), EngineError> {
        let from = self.state.phase;
        if !from.can_advance_to(next) {
            return Err(EngineError::IllegalTransition { from, to: next });
        }
        self.state.phase = next;
        self.state.pending.clear();
        Ok(())
    }

    fn record_snapshot(&mut self, day: u32, phase: Phase) {
        let snapshot = GameSnapshot {
            players: self.state.roster.clone(),
            day,
            polls_used: self.state.polls_used,
            log_length: self.state.log.len(),
            phase,
        };
        self.state.history.record(snapshot);
    }

    /// Runs the win evaluator. On a win the game ends immediately and all
    /// pending input is dropped.
    fn settle(&mut self) -> Option<Winner> {
        if !self.state.phase.evaluates_win() {
            return None;
        }
        let winner = check_win(&self.state.roster)?;
        self.state.ended_in = Some(self.state.phase);
        self.state.phase = Phase::End;
        self.state.pending.clear();
        self.state.log.push(emphasize(winner.to_string()));
        Some(winner)
    }

    /// Removes an eliminated player from every in-flight buffer.
    fn forget_pending(&mut self, player: PlayerId) {
        let pending = &mut self.state.pending;
        if let Some(actions) = pending.night_actions.as_mut() {
            actions.forget(player);
        }
        if let Some(tally) = pending.tally.as_mut() {
            tally.strike(player);
        }
        pending.candidates.retain(|&id| id != player);
    }
}

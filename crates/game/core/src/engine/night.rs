//! Night phases: consultation, individual actions, gun transfer.

use std::time::{Duration, Instant};

use super::{EngineError, GameEngine};
use crate::action::elimination::count;
use crate::action::{
    ActionError, MergeReport, NightActionSet, NightOutcome, NightProposal, NightResult,
    TransferDraft, TransferReport, apply_gun_transfers, resolve_night,
};
use crate::state::{Countdown, GunFlavor, Phase, PlayerId, Roster, emphasize};

impl GameEngine<'_> {
    // ===== consultation =====

    /// Ends the mafia consultation and opens individual action entry.
    pub fn finish_consult(&mut self) -> Result<(), EngineError> {
        self.expect_phase("finish the consultation", &[Phase::NightConsult])?;
        self.advance(Phase::NightIndividualAction)?;
        self.state.pending.night_actions = Some(NightActionSet::for_living(&self.state.roster));
        self.state
            .log
            .push("The mafia consultation is over. Collecting night actions.");
        Ok(())
    }

    /// Cooperative timer hook. Returns true if the consultation ran out and
    /// the engine moved on to individual actions.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.state.phase != Phase::NightConsult {
            return false;
        }
        let window = self.config.consult_window;
        let expired = self
            .state
            .pending
            .countdown
            .get_or_insert_with(|| Countdown::start(window, now))
            .is_expired(now);
        expired && self.finish_consult().is_ok()
    }

    pub fn consult_remaining(&self, now: Instant) -> Option<Duration> {
        match self.state.phase {
            Phase::NightConsult => self.state.pending.countdown.map(|c| c.remaining(now)),
            _ => None,
        }
    }

    // ===== individual actions =====

    pub fn declare_shot(
        &mut self,
        actor: PlayerId,
        target: Option<PlayerId>,
    ) -> Result<(), EngineError> {
        self.expect_phase("declare a shot", &[Phase::NightIndividualAction])?;
        let (roster, actions) = self.night_actions_mut();
        actions.declare_shot(roster, actor, target)?;
        Ok(())
    }

    pub fn declare_save(
        &mut self,
        actor: PlayerId,
        target: Option<PlayerId>,
    ) -> Result<(), EngineError> {
        self.expect_phase("declare a save", &[Phase::NightIndividualAction])?;
        let (roster, actions) = self.night_actions_mut();
        actions.declare_save(roster, actor, target)?;
        Ok(())
    }

    pub fn clear_intent(&mut self, actor: PlayerId) -> Result<(), EngineError> {
        self.expect_phase("clear an action", &[Phase::NightIndividualAction])?;
        let (_, actions) = self.night_actions_mut();
        actions.clear(actor);
        Ok(())
    }

    /// Merges externally suggested actions after validating each one.
    pub fn merge_proposals(
        &mut self,
        proposals: &[NightProposal],
    ) -> Result<MergeReport, EngineError> {
        self.expect_phase("merge suggested actions", &[Phase::NightIndividualAction])?;
        let (roster, actions) = self.night_actions_mut();
        Ok(actions.merge(roster, proposals))
    }

    /// Resolves the night. If the night decides the game, the engine goes
    /// straight to [`Phase::End`] and the gun transfer step never happens.
    pub fn resolve_night(&mut self) -> Result<NightResult, EngineError> {
        self.expect_phase("resolve the night", &[Phase::NightIndividualAction])?;
        let actions = self
            .state
            .pending
            .night_actions
            .take()
            .unwrap_or_else(|| NightActionSet::for_living(&self.state.roster));

        let NightOutcome { roster, result } = resolve_night(&self.state.roster, &actions);
        self.state.roster = roster;
        self.state.log.extend(result.log.iter().cloned());

        if self.settle().is_some() {
            return Ok(result);
        }
        self.advance(Phase::NightGunTransfer)?;
        self.state.pending.night_result = Some(result.clone());
        Ok(result)
    }

    // ===== gun transfer =====

    /// Fills (or clears) the transfer slot of an eliminated player.
    pub fn draft_transfer(
        &mut self,
        from: PlayerId,
        flavor: Option<GunFlavor>,
        to: Option<PlayerId>,
    ) -> Result<(), EngineError> {
        self.expect_phase("hand down a gun", &[Phase::NightGunTransfer])?;
        if let Some(to) = to {
            if to == from {
                return Err(ActionError::SelfTransfer(from).into());
            }
            self.state.roster.require(to)?;
        }

        let slot = self
            .state
            .pending
            .night_result
            .get_or_insert_with(NightResult::default)
            .gun_transfers
            .iter_mut()
            .find(|draft| draft.from == from)
            .ok_or(ActionError::NotATransferSource(from))?;
        slot.flavor = flavor;
        slot.to = to;
        Ok(())
    }

    /// Applies every drafted transfer and opens the next day.
    ///
    /// Rejected as a whole if any slot lacks a flavor or a recipient.
    pub fn confirm_gun_transfers(&mut self) -> Result<TransferReport, EngineError> {
        self.expect_phase("confirm gun transfers", &[Phase::NightGunTransfer])?;
        let result = self.state.pending.night_result.clone().unwrap_or_default();
        let transfers = result
            .gun_transfers
            .iter()
            .map(TransferDraft::complete)
            .collect::<Result<Vec<_>, _>>()?;

        let day = self.state.day;
        self.state
            .log
            .push(emphasize(format!("End of night {day}.")));
        let report = apply_gun_transfers(&mut self.state.roster, &transfers);
        self.state.log.extend(report.log.iter().cloned());

        self.advance(Phase::DayNomination)?;
        self.record_snapshot(day, Phase::DayNomination);
        if self.settle().is_some() {
            return Ok(report);
        }

        self.state.log.push(format!(
            "Day {day} begins. Night casualties: {}.",
            casualties(&self.state.roster, &result)
        ));
        if !report.delivered.is_empty() {
            self.state.log.push(emphasize(format!(
                "{} entered the game.",
                count(report.delivered.len() as u32, "new gun", "new guns")
            )));
        }
        Ok(report)
    }

    fn night_actions_mut(&mut self) -> (&Roster, &mut NightActionSet) {
        let state = &mut *self.state;
        let roster = &state.roster;
        let actions = state
            .pending
            .night_actions
            .get_or_insert_with(|| NightActionSet::for_living(roster));
        (roster, actions)
    }
}

fn casualties(roster: &Roster, result: &NightResult) -> String {
    if result.eliminated.is_empty() {
        return "nobody".to_string();
    }
    result
        .eliminated
        .iter()
        .map(|e| {
            format!(
                "{} ({})",
                emphasize(&e.player.name),
                e.cause.describe(roster)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

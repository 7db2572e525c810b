//! Night action collection and resolution.
//!
//! Every living player may declare at most one shot and one save per night.
//! The Mafia fire a single team shot: only one of them may shoot per night.
//! Declarations are gathered in a [`NightActionSet`] and resolved all at once
//! by [`resolve_night`], which is a pure function of the roster and the set.

use std::collections::BTreeMap;

use crate::action::elimination::{Elimination, EliminationCause, count};
use crate::action::error::{ActionError, require_living_actor, require_living_target};
use crate::action::guns::TransferDraft;
use crate::state::{PlayerId, Role, Roster, emphasize};

/// What one player declared for tonight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NightIntent {
    pub shot: Option<PlayerId>,
    pub save: Option<PlayerId>,
}

impl NightIntent {
    pub fn is_empty(&self) -> bool {
        self.shot.is_none() && self.save.is_none()
    }
}

/// Kind of resource a proposed action spends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProposalKind {
    Shot,
    Save,
}

/// A suggested night action coming from outside the manual form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NightProposal {
    pub actor: PlayerId,
    pub kind: ProposalKind,
    pub target: PlayerId,
}

/// Outcome of merging proposals into a [`NightActionSet`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub accepted: Vec<NightProposal>,
    pub dropped: Vec<NightProposal>,
}

/// Intents keyed by acting player, one entry per player living when the set
/// was opened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NightActionSet {
    intents: BTreeMap<PlayerId, NightIntent>,
}

impl NightActionSet {
    /// Opens an empty intent for every living player.
    pub fn for_living(roster: &Roster) -> Self {
        Self {
            intents: roster
                .living()
                .map(|p| (p.id, NightIntent::default()))
                .collect(),
        }
    }

    pub fn intent(&self, actor: PlayerId) -> Option<&NightIntent> {
        self.intents.get(&actor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &NightIntent)> {
        self.intents.iter()
    }

    pub fn declared(&self) -> usize {
        self.intents.values().filter(|i| !i.is_empty()).count()
    }

    /// Records (or clears, with `None`) the actor's shot.
    pub fn declare_shot(
        &mut self,
        roster: &Roster,
        actor: PlayerId,
        target: Option<PlayerId>,
    ) -> Result<(), ActionError> {
        let player = require_living_actor(roster, actor)?;
        if !player.has_shot {
            return Err(ActionError::NoShotLeft(actor));
        }
        if let Some(target) = target {
            if target == actor {
                return Err(ActionError::SelfTarget(actor));
            }
            require_living_target(roster, target)?;
            if player.role.is_mafia()
                && let Some(shooter) = self.mafia_shooter(roster)
                && shooter != actor
            {
                return Err(ActionError::MafiaShotTaken { shooter });
            }
        }
        self.intents.entry(actor).or_default().shot = target;
        Ok(())
    }

    /// The Mafia member carrying tonight's team shot, if one is declared.
    pub fn mafia_shooter(&self, roster: &Roster) -> Option<PlayerId> {
        self.intents
            .iter()
            .filter(|(_, intent)| intent.shot.is_some())
            .map(|(&id, _)| id)
            .find(|&id| roster.get(id).is_some_and(|p| p.role.is_mafia()))
    }

    /// Records (or clears, with `None`) the actor's save. Self-saves are
    /// allowed.
    pub fn declare_save(
        &mut self,
        roster: &Roster,
        actor: PlayerId,
        target: Option<PlayerId>,
    ) -> Result<(), ActionError> {
        let player = require_living_actor(roster, actor)?;
        if !player.has_save {
            return Err(ActionError::NoSaveLeft(actor));
        }
        if let Some(target) = target {
            require_living_target(roster, target)?;
        }
        self.intents.entry(actor).or_default().save = target;
        Ok(())
    }

    pub fn clear(&mut self, actor: PlayerId) {
        if let Some(intent) = self.intents.get_mut(&actor) {
            *intent = NightIntent::default();
        }
    }

    /// Drops a player who left the game mid-night, along with every intent
    /// aimed at them.
    pub fn forget(&mut self, player: PlayerId) {
        self.intents.remove(&player);
        for intent in self.intents.values_mut() {
            if intent.shot == Some(player) {
                intent.shot = None;
            }
            if intent.save == Some(player) {
                intent.save = None;
            }
        }
    }

    /// Validates each proposal against the roster and merges the eligible
    /// ones. Ineligible proposals are dropped; existing intents are only
    /// overwritten by accepted proposals.
    pub fn merge(&mut self, roster: &Roster, proposals: &[NightProposal]) -> MergeReport {
        let mut report = MergeReport::default();
        for proposal in proposals {
            let outcome = match proposal.kind {
                ProposalKind::Shot => self.declare_shot(roster, proposal.actor, Some(proposal.target)),
                ProposalKind::Save => self.declare_save(roster, proposal.actor, Some(proposal.target)),
            };
            match outcome {
                Ok(()) => report.accepted.push(*proposal),
                Err(_) => report.dropped.push(*proposal),
            }
        }
        report
    }
}

/// Living players who may still declare a shot.
pub fn eligible_shooters(roster: &Roster) -> impl Iterator<Item = PlayerId> + '_ {
    roster.living().filter(|p| p.has_shot).map(|p| p.id)
}

/// Living players who may still declare a save.
pub fn eligible_savers(roster: &Roster) -> impl Iterator<Item = PlayerId> + '_ {
    roster.living().filter(|p| p.has_save).map(|p| p.id)
}

/// Everything the night produced, consumed by the gun transfer step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NightResult {
    pub eliminated: Vec<Elimination>,
    /// One empty slot per eliminated player who still held their shot.
    pub gun_transfers: Vec<TransferDraft>,
    /// Narrative lines in generation order.
    pub log: Vec<String>,
}

/// Updated roster plus the night's result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NightOutcome {
    pub roster: Roster,
    pub result: NightResult,
}

/// Resolves one night.
///
/// Order: saves, shots, fireback, then the per-target shot/save comparison.
/// Actors and targets are visited in ascending id order so the same input
/// always yields the same output.
pub fn resolve_night(roster: &Roster, actions: &NightActionSet) -> NightOutcome {
    let mut roster = roster.clone();
    let mut log = Vec::new();
    let mut saves: BTreeMap<PlayerId, u32> = BTreeMap::new();
    let mut shots: BTreeMap<PlayerId, Vec<(PlayerId, Role)>> = BTreeMap::new();

    for (&saver, intent) in actions.iter() {
        let Some(target) = intent.save else { continue };
        let Some(player) = roster.get_mut(saver) else {
            continue;
        };
        if !player.can_save() {
            continue;
        }
        player.has_save = false;
        *saves.entry(target).or_default() += 1;
        log.push(format!(
            "{} used their save on {}.",
            emphasize(roster.name_of(saver)),
            emphasize(roster.name_of(target))
        ));
    }

    for (&shooter, intent) in actions.iter() {
        let Some(target) = intent.shot else { continue };
        let Some(player) = roster.get_mut(shooter) else {
            continue;
        };
        if !player.can_shoot() {
            continue;
        }
        player.has_shot = false;
        let role = player.role;
        shots.entry(target).or_default().push((shooter, role));
        log.push(format!(
            "{} shot {}.",
            emphasize(roster.name_of(shooter)),
            emphasize(roster.name_of(target))
        ));
    }

    let mut eliminated = Vec::new();

    for (&target, shooters) in &shots {
        if roster.get(target).map(|p| p.role) != Some(Role::Citizen) {
            continue;
        }
        for &(shooter, role) in shooters {
            if role != Role::Citizen || !roster.eliminate(shooter) {
                continue;
            }
            if let Some(player) = roster.get(shooter) {
                eliminated.push(Elimination::new(
                    player.clone(),
                    EliminationCause::Fireback { target },
                ));
            }
            log.push(format!(
                "{} {} shot a citizen and was eliminated.",
                emphasize("Fireback!"),
                emphasize(roster.name_of(shooter))
            ));
        }
    }

    for (&target, shooters) in &shots {
        if !roster.is_alive(target) {
            continue;
        }
        let shot_count = shooters.len() as u32;
        let save_count = saves.get(&target).copied().unwrap_or(0);
        let tally = format!(
            "{}, {}",
            count(shot_count, "shot", "shots"),
            count(save_count, "save", "saves")
        );

        if shot_count > save_count {
            roster.eliminate(target);
            if let Some(player) = roster.get(target) {
                eliminated.push(Elimination::new(
                    player.clone(),
                    EliminationCause::NightShots {
                        shots: shot_count,
                        saves: save_count,
                    },
                ));
            }
            log.push(format!(
                "{} was eliminated ({tally}).",
                emphasize(roster.name_of(target))
            ));
        } else {
            log.push(format!(
                "{} survived ({tally}).",
                emphasize(roster.name_of(target))
            ));
        }
    }

    let gun_transfers = eliminated
        .iter()
        .filter(|e| e.player.has_shot)
        .map(|e| TransferDraft::new(e.player.id))
        .collect();

    NightOutcome {
        roster,
        result: NightResult {
            eliminated,
            gun_transfers,
            log,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Player;

    /// Seats 0-3 are Mafia, 4-11 Citizens.
    fn create_test_roster() -> Roster {
        Roster::from_players(
            (0..12)
                .map(|i| {
                    let role = if i < 4 { Role::Mafia } else { Role::Citizen };
                    Player::new(PlayerId(i), format!("P{}", i + 1), role)
                })
                .collect(),
        )
    }

    fn shoot(set: &mut NightActionSet, roster: &Roster, actor: u32, target: u32) {
        set.declare_shot(roster, PlayerId(actor), Some(PlayerId(target)))
            .unwrap();
    }

    fn save(set: &mut NightActionSet, roster: &Roster, actor: u32, target: u32) {
        set.declare_save(roster, PlayerId(actor), Some(PlayerId(target)))
            .unwrap();
    }

    #[test]
    fn single_mafia_shot_without_saves_eliminates_target() {
        let roster = create_test_roster();
        let mut set = NightActionSet::for_living(&roster);
        shoot(&mut set, &roster, 0, 6);

        let outcome = resolve_night(&roster, &set);

        assert_eq!(outcome.result.eliminated.len(), 1);
        let dead = &outcome.result.eliminated[0];
        assert_eq!(dead.player.id, PlayerId(6));
        assert_eq!(
            dead.cause.describe(&outcome.roster),
            "night shots (1 shot, 0 saves)"
        );
        assert_eq!(outcome.roster.living_with_role(Role::Mafia), 4);
        assert_eq!(outcome.roster.living_with_role(Role::Citizen), 7);
        assert!(!outcome.roster.get(PlayerId(0)).unwrap().has_shot);
    }

    #[test]
    fn citizen_shooting_citizen_triggers_fireback() {
        let roster = create_test_roster();
        let mut set = NightActionSet::for_living(&roster);
        shoot(&mut set, &roster, 0, 6);
        shoot(&mut set, &roster, 5, 6);

        let outcome = resolve_night(&roster, &set);
        let ids: Vec<_> = outcome
            .result
            .eliminated
            .iter()
            .map(|e| e.player.id)
            .collect();

        assert_eq!(ids, vec![PlayerId(5), PlayerId(6)]);
        assert_eq!(
            outcome.result.eliminated[0].cause,
            EliminationCause::Fireback {
                target: PlayerId(6)
            }
        );
        assert_eq!(
            outcome.result.eliminated[1].cause,
            EliminationCause::NightShots { shots: 2, saves: 0 }
        );
    }

    #[test]
    fn fireback_applies_even_when_target_is_saved() {
        let roster = create_test_roster();
        let mut set = NightActionSet::for_living(&roster);
        shoot(&mut set, &roster, 5, 6);
        save(&mut set, &roster, 7, 6);
        save(&mut set, &roster, 8, 6);

        let outcome = resolve_night(&roster, &set);

        assert!(!outcome.roster.is_alive(PlayerId(5)));
        assert!(outcome.roster.is_alive(PlayerId(6)));
        assert!(
            outcome
                .result
                .log
                .iter()
                .any(|line| line.contains("survived (1 shot, 2 saves)"))
        );
    }

    #[test]
    fn fireback_shooter_dies_even_if_saved_themselves() {
        let roster = create_test_roster();
        let mut set = NightActionSet::for_living(&roster);
        shoot(&mut set, &roster, 5, 6);
        save(&mut set, &roster, 5, 5);

        let outcome = resolve_night(&roster, &set);
        assert!(!outcome.roster.is_alive(PlayerId(5)));
    }

    #[test]
    fn mafia_shooters_and_mafia_targets_never_fire_back() {
        let roster = create_test_roster();
        let mut set = NightActionSet::for_living(&roster);
        shoot(&mut set, &roster, 1, 2);
        shoot(&mut set, &roster, 6, 3);

        let outcome = resolve_night(&roster, &set);

        assert!(outcome.roster.is_alive(PlayerId(1)));
        assert!(outcome.roster.is_alive(PlayerId(6)));
        assert!(!outcome.roster.is_alive(PlayerId(2)));
        assert!(!outcome.roster.is_alive(PlayerId(3)));
    }

    #[test]
    fn target_survives_iff_shots_do_not_exceed_saves() {
        for (shooters, savers) in [(1u32, 0u32), (1, 1), (2, 1), (2, 2), (3, 2)] {
            let roster = create_test_roster();
            let mut set = NightActionSet::for_living(&roster);
            // Mafia seat 0 and citizens 4.. shoot citizen 11; citizens 8.. save it.
            for s in 0..shooters {
                let actor = if s == 0 { 0 } else { 3 + s };
                shoot(&mut set, &roster, actor, 11);
            }
            for s in 0..savers {
                save(&mut set, &roster, 8 + s, 11);
            }

            let outcome = resolve_night(&roster, &set);
            assert_eq!(
                outcome.roster.is_alive(PlayerId(11)),
                shooters <= savers,
                "{shooters} shots vs {savers} saves"
            );
        }
    }

    #[test]
    fn save_on_unshot_player_is_inert_but_spent() {
        let roster = create_test_roster();
        let mut set = NightActionSet::for_living(&roster);
        save(&mut set, &roster, 4, 9);

        let outcome = resolve_night(&roster, &set);

        assert!(outcome.result.eliminated.is_empty());
        assert!(!outcome.roster.get(PlayerId(4)).unwrap().has_save);
        assert_eq!(outcome.result.log.len(), 1);
    }

    #[test]
    fn log_lines_follow_resolution_order() {
        let roster = create_test_roster();
        let mut set = NightActionSet::for_living(&roster);
        shoot(&mut set, &roster, 5, 6);
        shoot(&mut set, &roster, 0, 9);
        save(&mut set, &roster, 10, 9);

        let log = resolve_night(&roster, &set).result.log;

        assert!(log[0].contains("used their save"));
        assert!(log[1].contains("shot"));
        assert!(log[2].contains("shot"));
        assert!(log[3].contains("Fireback!"));
        assert!(log[4].contains("was eliminated (1 shot, 0 saves)"));
        assert!(log[5].contains("survived (1 shot, 1 save)"));
    }

    #[test]
    fn resolution_is_deterministic() {
        let roster = create_test_roster();
        let mut set = NightActionSet::for_living(&roster);
        shoot(&mut set, &roster, 0, 6);
        shoot(&mut set, &roster, 7, 6);
        shoot(&mut set, &roster, 8, 1);
        save(&mut set, &roster, 2, 1);

        assert_eq!(resolve_night(&roster, &set), resolve_night(&roster, &set));
    }

    #[test]
    fn transfer_slots_only_for_eliminated_players_with_unused_shot() {
        let roster = create_test_roster();
        let mut set = NightActionSet::for_living(&roster);
        shoot(&mut set, &roster, 0, 6);
        shoot(&mut set, &roster, 5, 7);

        let outcome = resolve_night(&roster, &set);
        let sources: Vec<_> = outcome
            .result
            .gun_transfers
            .iter()
            .map(|t| t.from)
            .collect();

        // 5 died by fireback after spending its shot; 6 and 7 still held theirs.
        assert_eq!(sources, vec![PlayerId(6), PlayerId(7)]);
    }

    #[test]
    fn spent_resources_are_rejected_at_input_time() {
        let mut roster = create_test_roster();
        roster.get_mut(PlayerId(4)).unwrap().has_shot = false;
        roster.get_mut(PlayerId(4)).unwrap().has_save = false;
        let mut set = NightActionSet::for_living(&roster);

        assert_eq!(
            set.declare_shot(&roster, PlayerId(4), Some(PlayerId(0))),
            Err(ActionError::NoShotLeft(PlayerId(4)))
        );
        assert_eq!(
            set.declare_save(&roster, PlayerId(4), Some(PlayerId(0))),
            Err(ActionError::NoSaveLeft(PlayerId(4)))
        );
        assert!(eligible_shooters(&roster).all(|id| id != PlayerId(4)));
        assert!(eligible_savers(&roster).all(|id| id != PlayerId(4)));
    }

    #[test]
    fn self_shot_and_dead_target_are_rejected() {
        let mut roster = create_test_roster();
        roster.eliminate(PlayerId(9));
        let mut set = NightActionSet::for_living(&roster);

        assert_eq!(
            set.declare_shot(&roster, PlayerId(4), Some(PlayerId(4))),
            Err(ActionError::SelfTarget(PlayerId(4)))
        );
        assert_eq!(
            set.declare_shot(&roster, PlayerId(4), Some(PlayerId(9))),
            Err(ActionError::TargetEliminated(PlayerId(9)))
        );
        assert_eq!(
            set.declare_save(&roster, PlayerId(9), Some(PlayerId(4))),
            Err(ActionError::ActorEliminated(PlayerId(9)))
        );
        assert!(set.intent(PlayerId(9)).is_none());
    }

    #[test]
    fn merge_keeps_manual_entries_and_drops_ineligible_proposals() {
        let mut roster = create_test_roster();
        roster.eliminate(PlayerId(10));
        let mut set = NightActionSet::for_living(&roster);
        save(&mut set, &roster, 4, 5);

        let report = set.merge(
            &roster,
            &[
                NightProposal {
                    actor: PlayerId(0),
                    kind: ProposalKind::Shot,
                    target: PlayerId(6),
                },
                NightProposal {
                    actor: PlayerId(10),
                    kind: ProposalKind::Save,
                    target: PlayerId(6),
                },
                NightProposal {
                    actor: PlayerId(1),
                    kind: ProposalKind::Shot,
                    target: PlayerId(1),
                },
            ],
        );

        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.dropped.len(), 2);
        assert_eq!(set.intent(PlayerId(0)).unwrap().shot, Some(PlayerId(6)));
        assert_eq!(set.intent(PlayerId(4)).unwrap().save, Some(PlayerId(5)));
    }

    #[test]
    fn mafia_fire_one_team_shot_per_night() {
        let roster = create_test_roster();
        let mut set = NightActionSet::for_living(&roster);
        shoot(&mut set, &roster, 0, 6);

        assert_eq!(
            set.declare_shot(&roster, PlayerId(1), Some(PlayerId(7))),
            Err(ActionError::MafiaShotTaken {
                shooter: PlayerId(0)
            })
        );
        // The shooter may retarget; citizens still shoot freely.
        shoot(&mut set, &roster, 0, 7);
        shoot(&mut set, &roster, 5, 8);
        assert_eq!(set.mafia_shooter(&roster), Some(PlayerId(0)));

        let report = set.merge(
            &roster,
            &[NightProposal {
                actor: PlayerId(2),
                kind: ProposalKind::Shot,
                target: PlayerId(9),
            }],
        );
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(set.intent(PlayerId(2)).unwrap().shot, None);

        // Clearing the team shot frees another member to carry it.
        set.declare_shot(&roster, PlayerId(0), None).unwrap();
        shoot(&mut set, &roster, 1, 9);
        assert_eq!(set.mafia_shooter(&roster), Some(PlayerId(1)));
    }

    #[test]
    fn forget_removes_intents_aimed_at_player() {
        let roster = create_test_roster();
        let mut set = NightActionSet::for_living(&roster);
        shoot(&mut set, &roster, 0, 6);
        save(&mut set, &roster, 6, 6);

        set.forget(PlayerId(6));

        assert!(set.intent(PlayerId(6)).is_none());
        assert_eq!(set.intent(PlayerId(0)).unwrap().shot, None);
    }
}

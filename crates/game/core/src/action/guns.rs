//! Day guns: handing down a dead player's shot and firing it by day.

use crate::action::elimination::{Elimination, EliminationCause};
use crate::action::error::{ActionError, require_living_actor, require_living_target};
use crate::state::{GunFlavor, PlayerId, Roster, emphasize};

/// Editable transfer slot for one eliminated player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransferDraft {
    pub from: PlayerId,
    pub flavor: Option<GunFlavor>,
    pub to: Option<PlayerId>,
}

impl TransferDraft {
    pub fn new(from: PlayerId) -> Self {
        Self {
            from,
            flavor: None,
            to: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.flavor.is_some() && self.to.is_some()
    }

    /// Converts the draft into a submittable transfer.
    pub fn complete(&self) -> Result<GunTransfer, ActionError> {
        match (self.flavor, self.to) {
            (Some(flavor), Some(to)) => Ok(GunTransfer {
                from: self.from,
                flavor,
                to,
            }),
            _ => Err(ActionError::IncompleteTransfer { from: self.from }),
        }
    }
}

/// A complete transfer: both flavor and recipient are known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GunTransfer {
    pub from: PlayerId,
    pub flavor: GunFlavor,
    pub to: PlayerId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Guns that reached a living recipient.
    pub delivered: Vec<GunTransfer>,
    /// Guns handed to an eliminated player; they leave the game.
    pub discarded: Vec<GunTransfer>,
    pub log: Vec<String>,
}

/// Applies complete transfers. Callers validate the drafts first; unknown
/// recipients are skipped.
pub fn apply_gun_transfers(roster: &mut Roster, transfers: &[GunTransfer]) -> TransferReport {
    let mut report = TransferReport::default();

    for transfer in transfers {
        let Some(recipient) = roster.get_mut(transfer.to) else {
            continue;
        };
        if recipient.is_alive {
            recipient.received_guns.push(transfer.flavor);
            report.delivered.push(*transfer);
        } else {
            report.discarded.push(*transfer);
            report.log.push(format!(
                "The gun of {} went to {} (eliminated) and left the game.",
                emphasize(roster.name_of(transfer.from)),
                emphasize(roster.name_of(transfer.to))
            ));
        }
    }

    report
}

/// What happened when a day gun was fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayGunOutcome {
    /// No target named: a warning shot into the air.
    WarningShot,
    /// Functional gun: the target is out.
    TargetEliminated(PlayerId),
    /// Sabotaged gun: the shooter is out, the target is untouched.
    ShooterEliminated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayGunReport {
    pub flavor: GunFlavor,
    pub outcome: DayGunOutcome,
    pub eliminated: Option<Elimination>,
    pub log: String,
}

/// Fires the shooter's gun at `gun_index`. The gun is consumed whatever the
/// outcome.
pub fn use_day_gun(
    roster: &mut Roster,
    shooter: PlayerId,
    target: Option<PlayerId>,
    gun_index: usize,
) -> Result<DayGunReport, ActionError> {
    let holder = require_living_actor(roster, shooter)?;
    let held = holder.received_guns.len();
    if gun_index >= held {
        return Err(ActionError::NoSuchGun {
            player: shooter,
            index: gun_index,
            held,
        });
    }
    if let Some(target) = target {
        if target == shooter {
            return Err(ActionError::SelfTarget(shooter));
        }
        require_living_target(roster, target)?;
    }

    let flavor = roster.require_mut(shooter)?.received_guns.remove(gun_index);
    let shooter_name = emphasize(roster.name_of(shooter));

    let Some(target) = target else {
        return Ok(DayGunReport {
            flavor,
            outcome: DayGunOutcome::WarningShot,
            eliminated: None,
            log: format!("{shooter_name} fired a warning shot into the air with a day gun."),
        });
    };
    let target_name = emphasize(roster.name_of(target));

    let report = match flavor {
        GunFlavor::Functional => {
            roster.eliminate(target);
            DayGunReport {
                flavor,
                outcome: DayGunOutcome::TargetEliminated(target),
                eliminated: roster
                    .get(target)
                    .cloned()
                    .map(|p| Elimination::new(p, EliminationCause::DayGun { shooter })),
                log: format!(
                    "{} {shooter_name} shot {target_name} with a day gun and eliminated them.",
                    emphasize("Successful shot!")
                ),
            }
        }
        GunFlavor::Sabotaged => {
            roster.eliminate(shooter);
            DayGunReport {
                flavor,
                outcome: DayGunOutcome::ShooterEliminated,
                eliminated: roster.get(shooter).cloned().map(|p| {
                    Elimination::new(
                        p,
                        EliminationCause::SabotagedGun {
                            target: Some(target),
                        },
                    )
                }),
                log: format!(
                    "{} {shooter_name} fired a sabotaged gun at {target_name} and was eliminated.",
                    emphasize("Failed shot!")
                ),
            }
        }
    };

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Player, Role};

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

    fn arm(roster: &mut Roster, id: u32, guns: &[GunFlavor]) {
        roster
            .get_mut(PlayerId(id))
            .unwrap()
            .received_guns
            .extend_from_slice(guns);
    }

    #[test]
    fn incomplete_draft_cannot_be_submitted() {
        let mut draft = TransferDraft::new(PlayerId(3));
        draft.flavor = Some(GunFlavor::Functional);

        assert_eq!(
            draft.complete(),
            Err(ActionError::IncompleteTransfer { from: PlayerId(3) })
        );
        draft.to = Some(PlayerId(5));
        assert!(draft.complete().is_ok());
    }

    #[test]
    fn living_recipient_gains_exactly_one_gun_per_transfer() {
        let mut roster = create_test_roster();
        roster.eliminate(PlayerId(2));
        roster.eliminate(PlayerId(3));

        let report = apply_gun_transfers(
            &mut roster,
            &[
                GunTransfer {
                    from: PlayerId(2),
                    flavor: GunFlavor::Functional,
                    to: PlayerId(5),
                },
                GunTransfer {
                    from: PlayerId(3),
                    flavor: GunFlavor::Sabotaged,
                    to: PlayerId(5),
                },
            ],
        );

        assert_eq!(report.delivered.len(), 2);
        assert_eq!(
            roster.get(PlayerId(5)).unwrap().received_guns,
            vec![GunFlavor::Functional, GunFlavor::Sabotaged]
        );
    }

    #[test]
    fn transfer_to_eliminated_player_is_discarded() {
        let mut roster = create_test_roster();
        roster.eliminate(PlayerId(2));
        roster.eliminate(PlayerId(7));
        let before = roster.clone();

        let report = apply_gun_transfers(
            &mut roster,
            &[GunTransfer {
                from: PlayerId(2),
                flavor: GunFlavor::Functional,
                to: PlayerId(7),
            }],
        );

        assert_eq!(report.discarded.len(), 1);
        assert_eq!(report.log.len(), 1);
        assert_eq!(roster, before);
    }

    #[test]
    fn functional_gun_eliminates_exactly_the_target() {
        let mut roster = create_test_roster();
        arm(&mut roster, 5, &[GunFlavor::Functional]);

        let report = use_day_gun(&mut roster, PlayerId(5), Some(PlayerId(1)), 0).unwrap();

        assert_eq!(report.outcome, DayGunOutcome::TargetEliminated(PlayerId(1)));
        assert_eq!(roster.living_count(), 11);
        assert!(!roster.is_alive(PlayerId(1)));
        assert!(roster.get(PlayerId(5)).unwrap().received_guns.is_empty());
    }

    #[test]
    fn sabotaged_gun_eliminates_exactly_the_shooter() {
        let mut roster = create_test_roster();
        arm(&mut roster, 5, &[GunFlavor::Functional, GunFlavor::Sabotaged]);

        let report = use_day_gun(&mut roster, PlayerId(5), Some(PlayerId(1)), 1).unwrap();

        assert_eq!(report.outcome, DayGunOutcome::ShooterEliminated);
        assert!(!roster.is_alive(PlayerId(5)));
        assert!(roster.is_alive(PlayerId(1)));
        assert_eq!(roster.living_count(), 11);
        assert_eq!(
            roster.get(PlayerId(5)).unwrap().received_guns,
            vec![GunFlavor::Functional]
        );
    }

    #[test]
    fn warning_shot_consumes_gun_only() {
        let mut roster = create_test_roster();
        arm(&mut roster, 8, &[GunFlavor::Sabotaged]);

        let report = use_day_gun(&mut roster, PlayerId(8), None, 0).unwrap();

        assert_eq!(report.outcome, DayGunOutcome::WarningShot);
        assert!(report.eliminated.is_none());
        assert_eq!(roster.living_count(), 12);
        assert!(roster.get(PlayerId(8)).unwrap().received_guns.is_empty());
    }

    #[test]
    fn missing_gun_index_is_rejected_without_mutation() {
        let mut roster = create_test_roster();
        arm(&mut roster, 8, &[GunFlavor::Functional]);
        let before = roster.clone();

        let err = use_day_gun(&mut roster, PlayerId(8), Some(PlayerId(0)), 3).unwrap_err();

        assert_eq!(
            err,
            ActionError::NoSuchGun {
                player: PlayerId(8),
                index: 3,
                held: 1
            }
        );
        assert_eq!(roster, before);
    }
}

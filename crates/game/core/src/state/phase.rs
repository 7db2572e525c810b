/// Phases of one game, in table order.
///
/// ```text
/// Setup → RoleReveal → DayNomination → DayTrial → DayFinalVote
///                        ▲     └──(no nominee)──┐      │
///                        │                      ▼      ▼
///         NightGunTransfer ← NightIndividualAction ← NightConsult
/// ```
///
/// Any in-play phase may jump to [`Phase::End`] when the win evaluator fires;
/// only a reset returns to [`Phase::Setup`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Phase {
    #[default]
    Setup,
    RoleReveal,
    NightConsult,
    NightIndividualAction,
    NightGunTransfer,
    DayNomination,
    DayTrial,
    DayFinalVote,
    End,
}

impl Phase {
    pub const fn is_night(self) -> bool {
        matches!(
            self,
            Phase::NightConsult | Phase::NightIndividualAction | Phase::NightGunTransfer
        )
    }

    pub const fn is_day(self) -> bool {
        matches!(
            self,
            Phase::DayNomination | Phase::DayTrial | Phase::DayFinalVote
        )
    }

    /// True while the game is running (dealt and not yet decided).
    pub const fn is_in_play(self) -> bool {
        !matches!(self, Phase::Setup | Phase::End)
    }

    /// The win evaluator is skipped before the first day and after the end.
    pub const fn evaluates_win(self) -> bool {
        !matches!(self, Phase::Setup | Phase::RoleReveal | Phase::End)
    }

    /// Word used in narrative lines ("Night 2", "Day 3").
    pub const fn cycle_label(self) -> &'static str {
        if self.is_night() { "Night" } else { "Day" }
    }

    /// Returns true if the state machine allows moving from `self` to `next`
    /// without going through the win evaluator or a reset.
    pub const fn can_advance_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Setup, RoleReveal)
                | (RoleReveal, DayNomination)
                | (NightConsult, NightIndividualAction)
                | (NightIndividualAction, NightGunTransfer)
                | (NightGunTransfer, DayNomination)
                | (DayNomination, DayTrial)
                | (DayNomination, NightConsult)
                | (DayTrial, DayFinalVote)
                | (DayFinalVote, NightConsult)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_and_day_partition_the_cycle() {
        for phase in [
            Phase::NightConsult,
            Phase::NightIndividualAction,
            Phase::NightGunTransfer,
        ] {
            assert!(phase.is_night() && !phase.is_day());
        }
        for phase in [Phase::DayNomination, Phase::DayTrial, Phase::DayFinalVote] {
            assert!(phase.is_day() && !phase.is_night());
        }
        assert!(!Phase::Setup.is_day() && !Phase::End.is_night());
    }

    #[test]
    fn end_and_setup_are_not_reachable_by_advancing() {
        let all = [
            Phase::Setup,
            Phase::RoleReveal,
            Phase::NightConsult,
            Phase::NightIndividualAction,
            Phase::NightGunTransfer,
            Phase::DayNomination,
            Phase::DayTrial,
            Phase::DayFinalVote,
            Phase::End,
        ];
        for from in all {
            assert!(!from.can_advance_to(Phase::End));
            assert!(!from.can_advance_to(Phase::Setup));
            assert!(!Phase::End.can_advance_to(from));
        }
    }

    #[test]
    fn nomination_may_shortcut_to_night() {
        assert!(Phase::DayNomination.can_advance_to(Phase::NightConsult));
        assert!(!Phase::DayTrial.can_advance_to(Phase::NightConsult));
    }

    #[test]
    fn win_evaluation_is_skipped_outside_play() {
        assert!(!Phase::Setup.evaluates_win());
        assert!(!Phase::RoleReveal.evaluates_win());
        assert!(!Phase::End.evaluates_win());
        assert!(Phase::NightIndividualAction.evaluates_win());
    }
}

use std::collections::BTreeSet;

use crate::action::{NightActionSet, NightResult, VoteTally};
use crate::state::{Countdown, PlayerId};

/// Input gathered for the current phase but not yet committed.
///
/// Nothing here is persisted. Restoring a snapshot or reloading a save
/// starts the phase with empty buffers; the engine rebuilds them on first use.
#[derive(Clone, Debug, Default)]
pub struct PendingInput {
    /// Players who have already looked at their role card.
    pub(crate) viewed: BTreeSet<PlayerId>,
    /// Consultation countdown (night) or defense countdown (trial).
    pub(crate) countdown: Option<Countdown>,
    pub(crate) night_actions: Option<NightActionSet>,
    /// Tonight's result while guns are being handed down.
    pub(crate) night_result: Option<NightResult>,
    /// Nomination counters, or final ballot counters once on trial.
    pub(crate) tally: Option<VoteTally>,
    pub(crate) candidates: Vec<PlayerId>,
}

impl PendingInput {
    pub fn viewed(&self) -> &BTreeSet<PlayerId> {
        &self.viewed
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn night_actions(&self) -> Option<&NightActionSet> {
        self.night_actions.as_ref()
    }

    pub fn night_result(&self) -> Option<&NightResult> {
        self.night_result.as_ref()
    }

    pub fn tally(&self) -> Option<&VoteTally> {
        self.tally.as_ref()
    }

    pub fn candidates(&self) -> &[PlayerId] {
        &self.candidates
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

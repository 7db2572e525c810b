//! Snapshot stack used for time travel.

use crate::state::{Phase, Roster};

/// Full-state checkpoint taken at the start of every day and night.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct GameSnapshot {
    pub players: Roster,
    pub day: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub polls_used: u32,
    pub log_length: usize,
    #[cfg_attr(feature = "serde", serde(rename = "gamePhase"))]
    pub phase: Phase,
}

impl GameSnapshot {
    /// "Night 2", "Day 3".
    pub fn label(&self) -> String {
        format!("{} {}", self.phase.cycle_label(), self.day)
    }
}

/// Ordered checkpoints, oldest first. There is no redo: restoring an entry
/// drops everything recorded after it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct History {
    snapshots: Vec<GameSnapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, snapshot: GameSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GameSnapshot> {
        self.snapshots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameSnapshot> {
        self.snapshots.iter()
    }

    /// Keeps entries `0..=index` and returns a copy of entry `index`.
    pub(crate) fn rewind_to(&mut self, index: usize) -> Option<GameSnapshot> {
        let snapshot = self.snapshots.get(index)?.clone();
        self.snapshots.truncate(index + 1);
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(day: u32, phase: Phase) -> GameSnapshot {
        GameSnapshot {
            players: Roster::default(),
            day,
            polls_used: 0,
            log_length: day as usize,
            phase,
        }
    }

    #[test]
    fn rewind_discards_later_entries() {
        let mut history = History::new();
        history.record(snapshot(1, Phase::DayNomination));
        history.record(snapshot(2, Phase::NightConsult));
        history.record(snapshot(2, Phase::DayNomination));

        let restored = history.rewind_to(1).unwrap();

        assert_eq!(restored.label(), "Night 2");
        assert_eq!(history.len(), 2);
        assert!(history.get(2).is_none());
    }

    #[test]
    fn rewind_out_of_range_is_none() {
        let mut history = History::new();
        history.record(snapshot(1, Phase::DayNomination));
        assert!(history.rewind_to(5).is_none());
        assert_eq!(history.len(), 1);
    }
}

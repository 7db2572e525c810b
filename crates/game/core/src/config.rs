use core::time::Duration;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Length of the defense window granted to trial candidates.
    pub defense_window: Duration,
    /// Length of the mafia consultation at the start of each night.
    pub consult_window: Duration,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Seats at the table.
    pub const PLAYER_COUNT: usize = 12;
    /// Mafia among the seats; everyone else is a Citizen.
    pub const MAFIA_COUNT: usize = 4;
    /// Status inquiries allowed per game.
    pub const MAX_POLLS: u32 = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DEFENSE_SECS: u64 = 60;
    pub const DEFAULT_CONSULT_SECS: u64 = 60;

    pub fn new() -> Self {
        Self {
            defense_window: Duration::from_secs(Self::DEFAULT_DEFENSE_SECS),
            consult_window: Duration::from_secs(Self::DEFAULT_CONSULT_SECS),
        }
    }

    pub fn with_windows(defense_window: Duration, consult_window: Duration) -> Self {
        Self {
            defense_window,
            consult_window,
        }
    }

    pub const fn citizen_count() -> usize {
        Self::PLAYER_COUNT - Self::MAFIA_COUNT
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

use std::fmt;

/// Stable seat identifier assigned when the roster is dealt.
///
/// Ids are 0-based seat indices and are never reused within a game. All
/// relations (shots, saves, transfers, votes) are keyed by this id; display
/// names are only resolved at the presentation boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// 1-based seat number shown to the table.
    #[inline]
    pub const fn seat(self) -> u32 {
        self.0 + 1
    }

    #[inline]
    pub const fn from_seat(seat: u32) -> Option<Self> {
        match seat {
            0 => None,
            n => Some(Self(n - 1)),
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.seat())
    }
}

/// Secret allegiance dealt at game start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Mafia,
    Citizen,
}

impl Role {
    pub const fn is_mafia(self) -> bool {
        matches!(self, Role::Mafia)
    }
}

/// Flavor chosen by the moderator when a dead player's gun is handed down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum GunFlavor {
    /// Kills the target when fired.
    Functional,
    /// Backfires and kills the holder instead.
    Sabotaged,
}

/// A seat at the table together with its per-game resources.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub is_alive: bool,
    /// The single night shot; cleared the moment it is used.
    pub has_shot: bool,
    /// The single night save; cleared the moment it is used.
    pub has_save: bool,
    /// Day guns handed down from eliminated players, in arrival order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub received_guns: Vec<GunFlavor>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            is_alive: true,
            has_shot: true,
            has_save: true,
            received_guns: Vec::new(),
        }
    }

    pub fn can_shoot(&self) -> bool {
        self.is_alive && self.has_shot
    }

    pub fn can_save(&self) -> bool {
        self.is_alive && self.has_save
    }

    pub fn holds_day_gun(&self) -> bool {
        self.is_alive && !self.received_guns.is_empty()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

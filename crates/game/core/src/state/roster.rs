use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::GameConfig;
use crate::state::{Player, PlayerId, Role, RosterError};

/// The twelve seats of one game, ordered by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Seats the given names and deals roles by shuffling the fixed
    /// Mafia/Citizen multiset.
    ///
    /// Blank names become `Player N`; the rest are prefixed with their seat
    /// number (`N. name`). Typed names must be distinct (case-insensitive)
    /// so that a bare name always resolves to one seat.
    pub fn deal<S, R>(names: &[S], rng: &mut R) -> Result<Self, RosterError>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        if names.len() != GameConfig::PLAYER_COUNT {
            return Err(RosterError::WrongPlayerCount {
                expected: GameConfig::PLAYER_COUNT,
                actual: names.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for raw in names {
            let typed = raw.as_ref().trim();
            if !typed.is_empty() && !seen.insert(typed.to_lowercase()) {
                return Err(RosterError::DuplicateName {
                    name: typed.to_string(),
                });
            }
        }

        let display_names: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(index, raw)| seat_name(index + 1, raw.as_ref()))
            .collect();

        let mut roles: Vec<Role> = core::iter::repeat_n(Role::Mafia, GameConfig::MAFIA_COUNT)
            .chain(core::iter::repeat_n(Role::Citizen, GameConfig::citizen_count()))
            .collect();
        roles.shuffle(rng);

        let players = display_names
            .into_iter()
            .zip(roles)
            .enumerate()
            .map(|(index, (name, role))| Player::new(PlayerId(index as u32), name, role))
            .collect();

        Ok(Self { players })
    }

    /// Builds a roster from already-dealt players, e.g. when loading a save.
    pub fn from_players(mut players: Vec<Player>) -> Self {
        players.sort_by_key(|p| p.id);
        Self { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn require(&self, id: PlayerId) -> Result<&Player, RosterError> {
        self.get(id).ok_or(RosterError::UnknownPlayer(id))
    }

    pub(crate) fn require_mut(&mut self, id: PlayerId) -> Result<&mut Player, RosterError> {
        self.get_mut(id).ok_or(RosterError::UnknownPlayer(id))
    }

    pub fn name_of(&self, id: PlayerId) -> &str {
        self.get(id).map_or("?", |p| p.name.as_str())
    }

    pub fn living(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive)
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    pub fn living_with_role(&self, role: Role) -> usize {
        self.living().filter(|p| p.role == role).count()
    }

    pub fn eliminated_with_role(&self, role: Role) -> usize {
        self.players
            .iter()
            .filter(|p| !p.is_alive && p.role == role)
            .count()
    }

    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.get(id).is_some_and(|p| p.is_alive)
    }

    /// Marks a living player as eliminated. Returns false if they were
    /// already out.
    pub(crate) fn eliminate(&mut self, id: PlayerId) -> bool {
        match self.get_mut(id) {
            Some(player) if player.is_alive => {
                player.is_alive = false;
                true
            }
            _ => false,
        }
    }

    /// Resolves a seat number, a full display name or the bare name typed at
    /// setup (case-insensitive) to a player id.
    pub fn resolve(&self, query: &str) -> Result<PlayerId, RosterError> {
        let query = query.trim();
        if let Ok(seat) = query.parse::<u32>()
            && let Some(id) = PlayerId::from_seat(seat)
            && self.get(id).is_some()
        {
            return Ok(id);
        }

        let wanted = query.to_lowercase();
        self.players
            .iter()
            .find(|p| {
                let name = p.name.to_lowercase();
                name == wanted || bare_name(&name) == wanted
            })
            .map(|p| p.id)
            .ok_or_else(|| RosterError::UnresolvedName(query.to_string()))
    }
}

fn seat_name(seat: usize, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("Player {seat}")
    } else {
        format!("{seat}. {trimmed}")
    }
}

/// Strips the `N. ` seat prefix added by [`Roster::deal`].
fn bare_name(name: &str) -> &str {
    match name.split_once(". ") {
        Some((seat, rest)) if seat.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => name,
    }
}

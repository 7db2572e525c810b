use crate::state::{Role, Roster};

/// Side that has won the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Winner {
    #[strum(to_string = "Citizens win!")]
    Citizens,
    #[strum(to_string = "Mafia wins!")]
    Mafia,
}

/// Citizens win once no Mafia is alive; Mafia win once they are at least as
/// many as the living Citizens.
pub fn check_win(roster: &Roster) -> Option<Winner> {
    let mafia = roster.living_with_role(Role::Mafia);
    let citizens = roster.living_with_role(Role::Citizen);

    if mafia == 0 {
        Some(Winner::Citizens)
    } else if mafia >= citizens {
        Some(Winner::Mafia)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Player, PlayerId};

    fn roster_with(mafia: u32, citizens: u32) -> Roster {
        let players = (0..mafia + citizens)
            .map(|i| {
                let role = if i < mafia { Role::Mafia } else { Role::Citizen };
                Player::new(PlayerId(i), format!("P{}", i + 1), role)
            })
            .collect();
        Roster::from_players(players)
    }

    #[test]
    fn truth_table() {
        assert_eq!(check_win(&roster_with(0, 5)), Some(Winner::Citizens));
        assert_eq!(check_win(&roster_with(0, 0)), Some(Winner::Citizens));
        assert_eq!(check_win(&roster_with(3, 3)), Some(Winner::Mafia));
        assert_eq!(check_win(&roster_with(2, 1)), Some(Winner::Mafia));
        assert_eq!(check_win(&roster_with(4, 7)), None);
        assert_eq!(check_win(&roster_with(1, 2)), None);
    }

    #[test]
    fn winner_banner() {
        assert_eq!(Winner::Citizens.to_string(), "Citizens win!");
        assert_eq!(Winner::Mafia.to_string(), "Mafia wins!");
    }
}

//! Plain-text views of the session for the console.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use mafia_core::action::{eligible_savers, eligible_shooters};
use mafia_core::state::strip_emphasis;
use mafia_core::{
    GameEngine, GameState, GunFlavor, History, NarrativeLog, NightActionSet, NightResult, Phase,
    PlayerId, RoleCard, Roster, VoteTally, votes_needed,
};

/// One-line summary plus whatever the current phase is waiting for.
pub fn status(engine: &GameEngine<'_>, now: Instant) -> String {
    let state = engine.state();
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading(state));

    match state.phase {
        Phase::Setup => {
            let _ = writeln!(out, "Enter `start` with 12 comma-separated names.");
        }
        Phase::RoleReveal => {
            let _ = writeln!(
                out,
                "{} of {} players have seen their role. `day` starts Day 1.",
                state.pending().viewed().len(),
                state.roster.len()
            );
        }
        Phase::NightConsult => {
            if let Some(left) = engine.consult_remaining(now) {
                let _ = writeln!(out, "Mafia consultation: {} left.", clock(left));
            }
        }
        Phase::NightIndividualAction => {
            let declared = state
                .pending()
                .night_actions()
                .map(NightActionSet::declared)
                .unwrap_or_default();
            let _ = writeln!(out, "{declared} players have declared actions. `resolve` when done.");
        }
        Phase::NightGunTransfer => {
            if let Some(result) = state.pending().night_result() {
                out.push_str(&transfer_slots(&state.roster, result));
            }
        }
        Phase::DayNomination | Phase::DayFinalVote => {
            let needed = votes_needed(state.roster.living_count());
            let _ = writeln!(out, "Votes needed: {needed}. Polls left: {}.", state.polls_left());
            if let Some(tally) = state.pending().tally() {
                out.push_str(&ballot(&state.roster, tally));
            }
        }
        Phase::DayTrial => {
            let _ = writeln!(
                out,
                "On trial: {}.",
                names(&state.roster, state.pending().candidates())
            );
            if let Some(left) = engine.defense_remaining(now) {
                let _ = writeln!(out, "Defense: {} left.", clock(left));
            }
        }
        Phase::End => {
            if let Some(winner) = state.winner() {
                let _ = writeln!(out, "{winner}");
            }
        }
    }
    out
}

pub fn heading(state: &GameState) -> String {
    let living = state.roster.living_count();
    match state.phase {
        Phase::Setup => "Setup".to_string(),
        Phase::RoleReveal => "Role reveal".to_string(),
        Phase::End => format!(
            "Game over after {} {}",
            state.ended_in.unwrap_or(Phase::End).cycle_label(),
            state.day
        ),
        phase => format!(
            "{} {} · {} · {living} alive",
            phase.cycle_label(),
            state.day,
            stage(phase)
        ),
    }
}

/// Short prompt such as `night 2 actions> `.
pub fn prompt(state: &GameState) -> String {
    match state.phase {
        Phase::Setup => "setup> ".to_string(),
        Phase::RoleReveal => "roles> ".to_string(),
        Phase::End => "end> ".to_string(),
        phase => format!(
            "{} {} {}> ",
            phase.cycle_label().to_lowercase(),
            state.day,
            stage(phase)
        ),
    }
}

fn stage(phase: Phase) -> &'static str {
    match phase {
        Phase::NightConsult => "consult",
        Phase::NightIndividualAction => "actions",
        Phase::NightGunTransfer => "guns",
        Phase::DayNomination => "nomination",
        Phase::DayTrial => "trial",
        Phase::DayFinalVote => "final vote",
        Phase::Setup | Phase::RoleReveal | Phase::End => "",
    }
}

/// The moderator's roster view. Roles are only shown when asked for.
pub fn roster(roster: &Roster, show_roles: bool) -> String {
    let mut out = String::new();
    for player in roster.iter() {
        let status = if player.is_alive { "alive" } else { "out" };
        let _ = write!(out, "{:<20} {:<6}", player.name, status);
        if show_roles {
            let _ = write!(out, " {:<8}", player.role);
        }
        let _ = write!(
            out,
            " shot:{} save:{}",
            flag(player.has_shot),
            flag(player.has_save)
        );
        if player.holds_day_gun() {
            let _ = write!(out, " guns: {}", guns(&player.received_guns));
        }
        out.push('\n');
    }
    out
}

pub fn role_card(card: &RoleCard) -> String {
    let mut out = format!("{} is {}.\n", card.name, card.role);
    if !card.teammates.is_empty() {
        out.push_str("Fellow mafia:\n");
        for mate in &card.teammates {
            let seen = if mate.has_viewed { "has seen their role" } else { "has not looked yet" };
            let _ = writeln!(out, "  {} ({seen})", mate.name);
        }
    }
    out
}

/// Declared intents plus who can still act.
pub fn night_actions(roster: &Roster, actions: Option<&NightActionSet>) -> String {
    let mut out = String::new();
    if let Some(actions) = actions {
        for (actor, intent) in actions.iter().filter(|(_, intent)| !intent.is_empty()) {
            let _ = write!(out, "{}:", roster.name_of(*actor));
            if let Some(target) = intent.shot {
                let _ = write!(out, " shoots {}", roster.name_of(target));
            }
            if let Some(target) = intent.save {
                let _ = write!(out, " saves {}", roster.name_of(target));
            }
            out.push('\n');
        }
    }
    if out.is_empty() {
        out.push_str("No actions declared yet.\n");
    }
    let shooters: Vec<PlayerId> = eligible_shooters(roster).collect();
    let savers: Vec<PlayerId> = eligible_savers(roster).collect();
    let _ = writeln!(out, "Can still shoot: {}", names(roster, &shooters));
    let _ = writeln!(out, "Can still save: {}", names(roster, &savers));
    out
}

/// Empty and filled transfer slots awaiting confirmation.
pub fn transfer_slots(roster: &Roster, result: &NightResult) -> String {
    if result.gun_transfers.is_empty() {
        return "No guns to hand down. `confirm` opens the day.\n".to_string();
    }
    let mut out = String::from("Guns to hand down:\n");
    for draft in &result.gun_transfers {
        let flavor = draft.flavor.map_or("?".to_string(), |f| f.to_string());
        let to = draft
            .to
            .map_or("?".to_string(), |id| roster.name_of(id).to_string());
        let _ = writeln!(out, "  {} -> {to} ({flavor})", roster.name_of(draft.from));
    }
    let open = result.gun_transfers.iter().filter(|d| !d.is_complete()).count();
    if open > 0 {
        let _ = writeln!(out, "{open} slot(s) still need a flavor and a recipient.");
    }
    out
}

pub fn ballot(roster: &Roster, tally: &VoteTally) -> String {
    let mut out = String::new();
    for (player, votes) in tally.iter().filter(|&(_, votes)| votes > 0) {
        let _ = writeln!(out, "  {:<20} {votes}", roster.name_of(player));
    }
    out
}

pub fn history(history: &History) -> String {
    if history.is_empty() {
        return "No snapshots yet.\n".to_string();
    }
    let mut out = String::new();
    for (index, snapshot) in history.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. start of {} ({} alive, {} log lines)",
            index + 1,
            snapshot.label(),
            snapshot.players.living_count(),
            snapshot.log_length
        );
    }
    out
}

/// Log entries from `from` on, emphasis removed.
pub fn log_lines(log: &NarrativeLog, from: usize) -> String {
    log.entries()
        .iter()
        .skip(from)
        .map(|line| format!("{}\n", strip_emphasis(line)))
        .collect()
}

pub fn help() -> &'static str {
    "\
Setup      start [name, name, ...]      seat 12 players (blank names allowed)
Roles      reveal <p> | roles | day
Night      proceed                      end the mafia consultation
           shot <p> <target|none>       save <p> <target|none>
           clear <p> | actions | narrate <text> | resolve
           transfer <from> <functional|sabotaged|none> <to|none> | confirm
Day        gun <p> <n> [target] | poll | vote <p> <n|+n|-n>
           close | final | defend | timer | verdict
Any time   players | kick <p> | history | restore <n> | log | export [file]
           status | reset | help | quit
Players are named by seat number or name."
}

fn names(roster: &Roster, ids: &[PlayerId]) -> String {
    if ids.is_empty() {
        return "nobody".to_string();
    }
    ids.iter()
        .map(|&id| roster.name_of(id).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn guns(guns: &[GunFlavor]) -> String {
    guns.iter()
        .enumerate()
        .map(|(index, flavor)| format!("{}:{flavor}", index + 1))
        .collect::<Vec<_>>()
        .join(" ")
}

fn flag(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mafia_core::{GameConfig, Role, TransferDraft};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn started() -> GameState {
        let mut state = GameState::new();
        let config = GameConfig::default();
        let names: Vec<String> = (1..=12).map(|i| format!("P{i}")).collect();
        let mut engine = GameEngine::new(&mut state, &config);
        engine
            .start_game(&names, &mut StdRng::seed_from_u64(4))
            .unwrap();
        engine.start_first_day().unwrap();
        state
    }

    #[test]
    fn roster_hides_roles_unless_asked() {
        let state = started();
        let hidden = roster(&state.roster, false);
        let shown = roster(&state.roster, true);
        assert!(!hidden.contains(&Role::Mafia.to_string()));
        assert_eq!(shown.matches("Mafia").count(), 4);
        assert_eq!(hidden.lines().count(), 12);
    }

    #[test]
    fn prompt_and_heading_name_the_cycle() {
        let state = started();
        assert_eq!(prompt(&state), "day 1 nomination> ");
        assert_eq!(heading(&state), "Day 1 · nomination · 12 alive");
    }

    #[test]
    fn heading_names_the_cycle_the_game_ended_in() {
        let mut state = started();
        state.phase = Phase::End;
        state.day = 3;
        state.ended_in = Some(Phase::NightIndividualAction);
        assert_eq!(heading(&state), "Game over after Night 3");

        state.ended_in = Some(Phase::DayFinalVote);
        assert_eq!(heading(&state), "Game over after Day 3");
    }

    #[test]
    fn transfer_slots_flag_missing_details() {
        let state = started();
        let mut filled = TransferDraft::new(PlayerId(1));
        filled.flavor = Some(GunFlavor::Functional);
        filled.to = Some(PlayerId(2));
        let result = NightResult {
            gun_transfers: vec![TransferDraft::new(PlayerId(0)), filled],
            ..NightResult::default()
        };

        let text = transfer_slots(&state.roster, &result);
        assert!(text.contains("1. P1 -> ? (?)"));
        assert!(text.contains("2. P2 -> 3. P3 (Functional)"));
        assert!(text.contains("1 slot(s) still need a flavor and a recipient."));
    }

    #[test]
    fn log_lines_strip_emphasis() {
        let mut log = NarrativeLog::new();
        log.push("first");
        log.push("**Mafia wins!**");
        assert_eq!(log_lines(&log, 1), "Mafia wins!\n");
    }

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(clock(Duration::from_secs(65)), "1:05");
    }
}

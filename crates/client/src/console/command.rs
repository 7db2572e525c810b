//! Parsing of console input lines.
//!
//! Players are referenced by seat number or by name; resolution against the
//! roster happens later, when the command runs.

use std::path::PathBuf;
use std::str::FromStr;

use mafia_core::GunFlavor;
use thiserror::Error;

/// Words accepted in place of a player or flavor to mean "nothing".
const NOTHING: [&str; 3] = ["none", "-", "nobody"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Seat the table; an empty list seats twelve unnamed players.
    Start(Vec<String>),
    Reveal(String),
    Roles,
    FirstDay,
    Proceed,
    Shot {
        actor: String,
        target: Option<String>,
    },
    Save {
        actor: String,
        target: Option<String>,
    },
    Clear(String),
    Actions,
    Narrate(String),
    Resolve,
    Transfer {
        from: String,
        flavor: Option<GunFlavor>,
        to: Option<String>,
    },
    Confirm,
    /// `index` is 1-based, as listed in the roster.
    Gun {
        shooter: String,
        index: usize,
        target: Option<String>,
    },
    Poll,
    Vote {
        player: String,
        change: VoteChange,
    },
    Close,
    FinalVote,
    Verdict,
    Defend,
    Timer,
    Kick(String),
    Players,
    History,
    /// 1-based, as listed by `history`.
    Restore(usize),
    Log,
    Export(Option<PathBuf>),
    Status,
    Reset,
    Help,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteChange {
    Set(u32),
    Adjust(i64),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match word.to_lowercase().as_str() {
            "start" => Command::Start(seat_names(rest)),
            "reveal" => Command::Reveal(one(&args, "reveal <player>")?),
            "roles" => Command::Roles,
            "day" => Command::FirstDay,
            "proceed" => Command::Proceed,
            "shot" | "shoot" => {
                let (actor, target) = actor_and_target(&args, "shot <player> <target|none>")?;
                Command::Shot { actor, target }
            }
            "save" => {
                let (actor, target) = actor_and_target(&args, "save <player> <target|none>")?;
                Command::Save { actor, target }
            }
            "clear" => Command::Clear(one(&args, "clear <player>")?),
            "actions" => Command::Actions,
            "narrate" if !rest.is_empty() => Command::Narrate(rest.to_string()),
            "narrate" => return Err(ParseError::Usage("narrate <what happened tonight>")),
            "resolve" => Command::Resolve,
            "transfer" => transfer(&args)?,
            "confirm" => Command::Confirm,
            "gun" => gun(&args)?,
            "poll" => Command::Poll,
            "vote" => vote(&args)?,
            "close" => Command::Close,
            "final" => Command::FinalVote,
            "verdict" => Command::Verdict,
            "defend" => Command::Defend,
            "timer" => Command::Timer,
            "kick" => Command::Kick(one(&args, "kick <player>")?),
            "players" | "roster" => Command::Players,
            "history" => Command::History,
            "restore" => {
                const USAGE: &str = "restore <snapshot number>";
                let index = one(&args, USAGE)?
                    .parse::<usize>()
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or(ParseError::Usage(USAGE))?;
                Command::Restore(index)
            }
            "log" => Command::Log,
            "export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "status" => Command::Status,
            "reset" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn seat_names(rest: &str) -> Vec<String> {
    if rest.is_empty() {
        return Vec::new();
    }
    rest.split(',').map(|name| name.trim().to_string()).collect()
}

fn one(args: &[&str], usage: &'static str) -> Result<String, ParseError> {
    match args {
        [player] => Ok(player.to_string()),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn optional(word: &str) -> Option<String> {
    if NOTHING.contains(&word.to_lowercase().as_str()) {
        None
    } else {
        Some(word.to_string())
    }
}

fn actor_and_target(
    args: &[&str],
    usage: &'static str,
) -> Result<(String, Option<String>), ParseError> {
    match args {
        [actor, target] => Ok((actor.to_string(), optional(target))),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn transfer(args: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "transfer <from> <functional|sabotaged|none> <to|none>";
    let [from, flavor, to] = args else {
        return Err(ParseError::Usage(USAGE));
    };
    let flavor = match optional(flavor) {
        Some(word) => Some(GunFlavor::from_str(&word).map_err(|_| ParseError::Usage(USAGE))?),
        None => None,
    };
    Ok(Command::Transfer {
        from: from.to_string(),
        flavor,
        to: optional(to),
    })
}

fn gun(args: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "gun <shooter> <gun number> [target]";
    let (shooter, index, target) = match args {
        [shooter, index] => (shooter, index, None),
        [shooter, index, target] => (shooter, index, optional(target)),
        _ => return Err(ParseError::Usage(USAGE)),
    };
    let index = index
        .parse::<usize>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or(ParseError::Usage(USAGE))?;
    Ok(Command::Gun {
        shooter: shooter.to_string(),
        index,
        target,
    })
}

fn vote(args: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "vote <player> <count|+n|-n>";
    let [player, amount] = args else {
        return Err(ParseError::Usage(USAGE));
    };
    let change = if amount.starts_with(['+', '-']) {
        amount.parse::<i64>().map(VoteChange::Adjust)
    } else {
        amount.parse::<u32>().map(VoteChange::Set)
    }
    .map_err(|_| ParseError::Usage(USAGE))?;
    Ok(Command::Vote {
        player: player.to_string(),
        change,
    })
}

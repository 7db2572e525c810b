//! Line-oriented moderator console.
//!
//! Each input line is parsed into a [`Command`], executed against the
//! [`Moderator`], and answered with the log lines it produced plus any
//! private information (role cards, timers, tallies). Errors are printed and
//! the loop carries on; nothing typed at the console ends the process except
//! `quit` or end of input.

pub mod command;
pub mod render;

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use mafia_core::{DayGunOutcome, GameConfig, NominationOutcome, Phase, PlayerId};
use mafia_runtime::{KeywordNarrationParser, Moderator, NarrationParser, SessionRepository};
use rand::rngs::StdRng;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

pub use command::{Command, ParseError, VoteChange};

/// Whether the loop should keep reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<R, W> {
    moderator: Moderator<R>,
    rng: StdRng,
    out: W,
    parser: Box<dyn NarrationParser>,
    /// Log entries already echoed to the moderator.
    shown: usize,
    show_roles: bool,
}

impl<R, W> Console<R, W>
where
    R: SessionRepository,
    W: Write,
{
    pub fn new(moderator: Moderator<R>, rng: StdRng, out: W) -> Self {
        let shown = moderator.state().log.len();
        Self {
            moderator,
            rng,
            out,
            parser: Box::new(KeywordNarrationParser::new()),
            shown,
            show_roles: false,
        }
    }

    /// Replace the offline narration parser.
    pub fn with_parser(mut self, parser: Box<dyn NarrationParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn moderator(&self) -> &Moderator<R> {
        &self.moderator
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Reads commands until `quit` or end of input, ticking the
    /// consultation timer once a second in between.
    pub async fn run<I>(&mut self, input: I) -> Result<()>
    where
        I: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut ticker = tokio::time::interval(Duration::from_secs(1));

        self.greet()?;
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read console input")? else {
                        break;
                    };
                    if self.handle_line(&line).await? == Flow::Quit {
                        break;
                    }
                    self.prompt()?;
                }
                _ = ticker.tick() => {
                    if self.tick(Instant::now())? {
                        self.prompt()?;
                    }
                }
            }
        }
        info!("Console closed in {}", self.moderator.state().phase);
        Ok(())
    }

    /// Executes one input line. Command errors are printed, not returned;
    /// only failures to write to the console propagate.
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        self.tick(Instant::now())?;

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(self.out, "! {err}")?;
                return Ok(Flow::Continue);
            }
        };
        debug!("Console command: {:?}", command);
        if command == Command::Quit {
            return Ok(Flow::Quit);
        }

        if let Err(err) = self.execute(command).await {
            warn!("Command rejected: {:#}", err);
            writeln!(self.out, "! {err:#}")?;
        }
        self.echo_log()?;
        Ok(Flow::Continue)
    }

    /// Lets an expired consultation move on. Returns true if it did.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        let advanced = self.moderator.tick(now)?;
        if advanced {
            writeln!(self.out, "\nThe consultation time is up.")?;
            self.echo_log()?;
        }
        Ok(advanced)
    }

    async fn execute(&mut self, command: Command) -> Result<()> {
        let now = Instant::now();
        match command {
            Command::Start(names) => {
                let names = if names.is_empty() {
                    vec![String::new(); GameConfig::PLAYER_COUNT]
                } else {
                    names
                };
                let rng = &mut self.rng;
                self.moderator.apply(|e| e.start_game(&names, rng))?;
                self.show_roles = false;
                self.print(render::roster(&self.moderator.state().roster, false))?;
            }
            Command::Reveal(player) => {
                let player = self.player(&player)?;
                let card = self.moderator.apply(|e| e.reveal_role(player))?;
                self.print(render::role_card(&card))?;
            }
            Command::Roles => {
                self.show_roles = !self.show_roles;
                if self.show_roles {
                    self.moderator.apply(|e| {
                        e.mark_all_viewed();
                        Ok(())
                    })?;
                    self.print(render::roster(&self.moderator.state().roster, true))?;
                } else {
                    writeln!(self.out, "Roles hidden.")?;
                }
            }
            Command::FirstDay => self.moderator.apply(|e| e.start_first_day())?,
            Command::Proceed => self.moderator.apply(|e| e.finish_consult())?,
            Command::Shot { actor, target } => {
                let actor = self.player(&actor)?;
                let target = self.maybe_player(target.as_deref())?;
                self.moderator.apply(|e| e.declare_shot(actor, target))?;
                self.print_actions()?;
            }
            Command::Save { actor, target } => {
                let actor = self.player(&actor)?;
                let target = self.maybe_player(target.as_deref())?;
                self.moderator.apply(|e| e.declare_save(actor, target))?;
                self.print_actions()?;
            }
            Command::Clear(actor) => {
                let actor = self.player(&actor)?;
                self.moderator.apply(|e| e.clear_intent(actor))?;
                self.print_actions()?;
            }
            Command::Actions => self.print_actions()?,
            Command::Narrate(text) => {
                let suggestion = self
                    .moderator
                    .suggest_from_narration(self.parser.as_ref(), &text)
                    .await?;
                writeln!(
                    self.out,
                    "Suggested actions: {} merged, {} ignored as ineligible, {} naming unknown players.",
                    suggestion.merge.accepted.len(),
                    suggestion.merge.dropped.len(),
                    suggestion.unresolved.len()
                )?;
                self.print_actions()?;
            }
            Command::Resolve => {
                let result = self.moderator.apply(|e| e.resolve_night())?;
                self.echo_log()?;
                if self.moderator.state().phase == Phase::NightGunTransfer {
                    self.print(render::transfer_slots(
                        &self.moderator.state().roster,
                        &result,
                    ))?;
                }
            }
            Command::Transfer { from, flavor, to } => {
                let from = self.player(&from)?;
                let to = self.maybe_player(to.as_deref())?;
                self.moderator.apply(|e| e.draft_transfer(from, flavor, to))?;
                if let Some(result) = self.moderator.state().pending().night_result() {
                    self.print(render::transfer_slots(&self.moderator.state().roster, result))?;
                }
            }
            Command::Confirm => {
                let report = self.moderator.apply(|e| e.confirm_gun_transfers())?;
                for transfer in &report.delivered {
                    let roster = &self.moderator.state().roster;
                    writeln!(
                        self.out,
                        "(secret) {} now holds a {} gun from {}.",
                        roster.name_of(transfer.to),
                        transfer.flavor,
                        roster.name_of(transfer.from)
                    )?;
                }
            }
            Command::Gun {
                shooter,
                index,
                target,
            } => {
                let shooter = self.player(&shooter)?;
                let target = self.maybe_player(target.as_deref())?;
                let report = self
                    .moderator
                    .apply(|e| e.use_day_gun(shooter, target, index - 1))?;
                if report.outcome == DayGunOutcome::WarningShot {
                    writeln!(self.out, "A warning shot; the gun is spent.")?;
                }
            }
            Command::Poll => {
                let report = self.moderator.apply(|e| e.poll())?;
                writeln!(self.out, "Polls left: {}.", report.polls_left)?;
            }
            Command::Vote { player, change } => {
                let player = self.player(&player)?;
                let votes = self.moderator.apply(|e| match change {
                    VoteChange::Set(votes) => e.set_votes(player, votes),
                    VoteChange::Adjust(delta) => e.adjust_votes(player, delta),
                })?;
                let name = self.moderator.state().roster.name_of(player).to_string();
                writeln!(self.out, "{name}: {votes}")?;
            }
            Command::Close => {
                if let NominationOutcome::Trial { needed, .. } =
                    self.moderator.apply(|e| e.close_nomination(now))?
                {
                    writeln!(
                        self.out,
                        "Defense timer started. {needed} votes needed in the final vote."
                    )?;
                }
            }
            Command::FinalVote => {
                let candidates = self.moderator.apply(|e| e.open_final_vote())?;
                if candidates.is_empty() {
                    writeln!(self.out, "No candidate is left; `verdict` ends the day.")?;
                }
            }
            Command::Verdict => {
                self.moderator.apply(|e| e.close_final_vote(now))?;
            }
            Command::Defend => {
                self.moderator.apply(|e| e.restart_defense(now))?;
                self.print_timer(now)?;
            }
            Command::Timer => self.print_timer(now)?,
            Command::Kick(player) => {
                let player = self.player(&player)?;
                self.moderator.apply(|e| e.kick(player))?;
            }
            Command::Players => {
                let show = self.show_roles;
                self.print(render::roster(&self.moderator.state().roster, show))?;
            }
            Command::History => self.print(render::history(&self.moderator.state().history))?,
            Command::Restore(number) => {
                let snapshot = self.moderator.apply(|e| e.restore(number - 1))?;
                info!("Restored snapshot {} ({})", number, snapshot.label());
                self.shown = self.moderator.state().log.len().saturating_sub(1);
            }
            Command::Log => {
                self.print(render::log_lines(&self.moderator.state().log, 0))?;
            }
            Command::Export(path) => self.export(path.as_deref())?,
            Command::Status => {
                let status = self.moderator.with_engine(|e| render::status(e, now));
                self.print(status)?;
            }
            Command::Reset => {
                self.moderator.apply(|e| {
                    e.reset();
                    Ok(())
                })?;
                self.shown = 0;
                self.show_roles = false;
                writeln!(self.out, "Session discarded. Back to setup.")?;
            }
            Command::Help => writeln!(self.out, "{}", render::help())?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn player(&self, query: &str) -> Result<PlayerId> {
        Ok(self.moderator.state().roster.resolve(query)?)
    }

    fn maybe_player(&self, query: Option<&str>) -> Result<Option<PlayerId>> {
        query.map(|q| self.player(q)).transpose()
    }

    fn export(&mut self, path: Option<&Path>) -> Result<()> {
        let text = self.moderator.export_log();
        match path {
            Some(path) => {
                std::fs::write(path, format!("{text}\n"))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Exported log to {}", path.display());
                writeln!(self.out, "Log written to {}.", path.display())?;
            }
            None => writeln!(self.out, "{text}")?,
        }
        Ok(())
    }

    fn print_actions(&mut self) -> Result<()> {
        let state = self.moderator.state();
        let text = render::night_actions(&state.roster, state.pending().night_actions());
        self.print(text)
    }

    fn print_timer(&mut self, now: Instant) -> Result<()> {
        let status = self.moderator.with_engine(|e| render::status(e, now));
        self.print(status)
    }

    fn print(&mut self, text: impl AsRef<str>) -> Result<()> {
        write!(self.out, "{}", text.as_ref())?;
        Ok(())
    }

    /// Prints log entries added since the last echo.
    fn echo_log(&mut self) -> Result<()> {
        let log = &self.moderator.state().log;
        self.shown = self.shown.min(log.len());
        let text = render::log_lines(log, self.shown);
        self.shown = log.len();
        self.print(text)
    }

    fn greet(&mut self) -> Result<()> {
        let status = self.moderator.with_engine(|e| render::status(e, Instant::now()));
        writeln!(self.out, "Mafia moderator. Type `help` for commands.")?;
        self.print(status)?;
        self.prompt()
    }

    fn prompt(&mut self) -> Result<()> {
        write!(self.out, "{}", render::prompt(self.moderator.state()))?;
        self.out.flush()?;
        Ok(())
    }
}

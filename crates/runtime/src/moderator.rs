//! The moderator's session: engine operations plus persistence.
//!
//! [`Moderator`] owns the live [`GameState`] and a [`SessionRepository`].
//! Every successful operation is followed by a save (or, back in setup, by
//! clearing the save), so closing the console at any point loses at most the
//! in-flight input of the current phase.

use std::time::Instant;

use mafia_core::{EngineError, GameConfig, GameEngine, GameState, MergeReport, Phase};
use tracing::{info, warn};

use crate::api::Result;
use crate::narration::{NarrationParser, ProposedAction, resolve_proposals};
use crate::repository::SessionRepository;

/// Outcome of merging a narration's suggestions into the night buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Suggestion {
    pub merge: MergeReport,
    /// Suggestions naming nobody at the table.
    pub unresolved: Vec<ProposedAction>,
}

pub struct Moderator<R> {
    state: GameState,
    config: GameConfig,
    repo: R,
}

impl<R: SessionRepository> Moderator<R> {
    /// Resume the saved session, or start in setup if there is none.
    pub fn open(repo: R, config: GameConfig) -> Result<Self> {
        let state = match repo.load()? {
            Some(state) => {
                info!(
                    "Resumed saved session: {} on day {} ({} log entries)",
                    state.phase,
                    state.day,
                    state.log.len()
                );
                state
            }
            None => GameState::new(),
        };
        Ok(Self {
            state,
            config,
            repo,
        })
    }

    /// Start in setup, discarding any saved session.
    pub fn fresh(repo: R, config: GameConfig) -> Result<Self> {
        repo.clear()?;
        Ok(Self {
            state: GameState::new(),
            config,
            repo,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Runs one engine operation and persists the result.
    ///
    /// A rejected operation leaves both the state and the save untouched.
    pub fn apply<T, F>(&mut self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut GameEngine<'_>) -> std::result::Result<T, EngineError>,
    {
        let before = self.state.phase;
        let output = {
            let mut engine = GameEngine::new(&mut self.state, &self.config);
            operation(&mut engine)?
        };
        self.after_change(before)?;
        Ok(output)
    }

    /// Advances the consultation if its window ran out.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        let before = self.state.phase;
        let advanced = GameEngine::new(&mut self.state, &self.config).tick(now);
        if advanced {
            self.after_change(before)?;
        }
        Ok(advanced)
    }

    /// Read-only view for queries such as timers and role cards.
    pub fn with_engine<T>(&mut self, query: impl FnOnce(&GameEngine<'_>) -> T) -> T {
        let engine = GameEngine::new(&mut self.state, &self.config);
        query(&engine)
    }

    /// Asks `parser` for night actions and merges the valid ones.
    ///
    /// Parser failures are logged and returned; the night buffer keeps
    /// whatever the moderator already entered.
    pub async fn suggest_from_narration<P>(
        &mut self,
        parser: &P,
        narration: &str,
    ) -> Result<Suggestion>
    where
        P: NarrationParser + ?Sized,
    {
        if self.state.phase != Phase::NightIndividualAction {
            return Err(EngineError::WrongPhase {
                operation: "analyse the narration",
                phase: self.state.phase,
            }
            .into());
        }

        let living: Vec<String> = self.state.roster.living().map(|p| p.name.clone()).collect();
        let proposed = match parser.propose(narration, &living).await {
            Ok(proposed) => proposed,
            Err(err) => {
                warn!("Narration analysis failed: {}", err);
                return Err(err.into());
            }
        };

        let resolved = resolve_proposals(&self.state.roster, &proposed);
        let merge = self.apply(|engine| engine.merge_proposals(&resolved.proposals))?;
        info!(
            "Merged {} suggested actions ({} dropped, {} unresolved)",
            merge.accepted.len(),
            merge.dropped.len(),
            resolved.unresolved.len()
        );
        Ok(Suggestion {
            merge,
            unresolved: resolved.unresolved,
        })
    }

    /// The narrative log as plain text.
    pub fn export_log(&self) -> String {
        self.state.log.plain_text()
    }

    fn after_change(&mut self, before: Phase) -> Result<()> {
        let after = self.state.phase;
        if before != after {
            info!("Phase {} -> {} (day {})", before, after, self.state.day);
            if let Some(winner) = self.state.winner() {
                info!("Game over: {}", winner);
            }
        }
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if self.state.phase == Phase::Setup {
            self.repo.clear()?;
        } else {
            self.repo.save(&self.state)?;
        }
        Ok(())
    }
}

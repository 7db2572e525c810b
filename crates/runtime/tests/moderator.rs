//! Moderator runtime: persistence after each operation and narration merge.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use mafia_core::{EngineError, GameConfig, Phase, ProposalKind, Role};
use mafia_runtime::{
    FileSessionRepository, InMemorySessionRepository, KeywordNarrationParser, Moderator,
    NarrationError, NarrationParser, ProposedAction, RuntimeError, SessionRepository,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

fn names() -> Vec<String> {
    [
        "Ana", "Bo", "Cy", "Di", "Ed", "Flo", "Gus", "Hal", "Ivy", "Jo", "Kim", "Lu",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// A moderator sitting in Night 2's individual action entry.
fn at_night<R: SessionRepository>(repo: R) -> Moderator<R> {
    let mut moderator = Moderator::fresh(repo, GameConfig::default()).unwrap();
    let now = Instant::now();
    moderator
        .apply(|e| e.start_game(&names(), &mut StdRng::seed_from_u64(5)))
        .unwrap();
    moderator.apply(|e| e.start_first_day()).unwrap();
    moderator.apply(|e| e.close_nomination(now)).unwrap();
    moderator.apply(|e| e.finish_consult()).unwrap();
    moderator
}

fn bare(name: &str) -> &str {
    name.split_once(". ").map_or(name, |(_, rest)| rest)
}

struct FailingParser;

#[async_trait]
impl NarrationParser for FailingParser {
    async fn propose(
        &self,
        _narration: &str,
        _living: &[String],
    ) -> Result<Vec<ProposedAction>, NarrationError> {
        Err(NarrationError::Unavailable("offline".into()))
    }
}

#[test]
fn every_operation_is_saved_and_setup_clears_the_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let mut moderator = at_night(FileSessionRepository::new(&path).unwrap());

    let reopened = Moderator::open(FileSessionRepository::new(&path).unwrap(), GameConfig::default())
        .unwrap();
    assert_eq!(reopened.state().phase, Phase::NightIndividualAction);
    assert_eq!(reopened.state().day, 2);
    assert_eq!(reopened.state().log, moderator.state().log);

    moderator
        .apply(|e| {
            e.reset();
            Ok(())
        })
        .unwrap();
    assert!(!path.exists());
}

#[test]
fn rejected_operation_changes_neither_state_nor_save() {
    let repo = InMemorySessionRepository::new();
    let mut moderator = at_night(repo);
    let saved = moderator.repository().raw().unwrap();

    let err = moderator.apply(|e| e.poll()).unwrap_err();

    assert!(matches!(
        err,
        RuntimeError::Engine(EngineError::WrongPhase { .. })
    ));
    assert!(err.is_recoverable());
    assert_eq!(moderator.repository().raw().unwrap(), saved);
}

#[test]
fn reload_mid_night_starts_with_an_empty_action_buffer() {
    let repo = InMemorySessionRepository::new();
    let mut moderator = at_night(repo);
    let shooter = moderator.state().roster.living().next().unwrap().id;
    let target = moderator.state().roster.living().nth(1).unwrap().id;
    moderator.apply(|e| e.declare_shot(shooter, Some(target))).unwrap();

    let blob = moderator.repository().raw().unwrap().unwrap();
    let reloaded = Moderator::open(
        InMemorySessionRepository::with_blob(blob),
        GameConfig::default(),
    )
    .unwrap();

    assert_eq!(reloaded.state().phase, Phase::NightIndividualAction);
    assert!(reloaded.state().pending().night_actions().is_none());
}

#[test]
fn consultation_timeout_is_persisted() {
    let repo = InMemorySessionRepository::new();
    let mut moderator = Moderator::fresh(repo, GameConfig::default()).unwrap();
    let start = Instant::now();
    moderator
        .apply(|e| e.start_game(&names(), &mut StdRng::seed_from_u64(1)))
        .unwrap();
    moderator.apply(|e| e.start_first_day()).unwrap();
    moderator.apply(|e| e.close_nomination(start)).unwrap();

    assert!(!moderator.tick(start + Duration::from_secs(1)).unwrap());
    assert!(moderator.tick(start + Duration::from_secs(61)).unwrap());

    let saved = moderator.repository().load().unwrap().unwrap();
    assert_eq!(saved.phase, Phase::NightIndividualAction);
}

#[tokio::test]
async fn narration_suggestions_are_validated_before_merging() {
    let mut moderator = at_night(InMemorySessionRepository::new());
    let roster = &moderator.state().roster;
    let mafia = roster.iter().find(|p| p.role == Role::Mafia).unwrap();
    let citizen = roster.iter().find(|p| p.role == Role::Citizen).unwrap();
    let (mafia_id, citizen_id) = (mafia.id, citizen.id);
    let narration = format!(
        "{m} shot {c}, {c} saved herself and {m} shoots {m}. Zed saved {c}.",
        m = bare(&mafia.name),
        c = bare(&citizen.name),
    );

    let suggestion = moderator
        .suggest_from_narration(&KeywordNarrationParser, &narration)
        .await
        .unwrap();

    assert_eq!(suggestion.merge.accepted.len(), 2);
    assert_eq!(suggestion.merge.dropped.len(), 1);
    assert_eq!(suggestion.merge.dropped[0].kind, ProposalKind::Shot);
    assert_eq!(suggestion.merge.dropped[0].target, mafia_id);
    assert!(suggestion.unresolved.is_empty());

    let actions = moderator.state().pending().night_actions().unwrap();
    assert_eq!(actions.intent(mafia_id).unwrap().shot, Some(citizen_id));
    assert_eq!(actions.intent(citizen_id).unwrap().save, Some(citizen_id));
}

#[tokio::test]
async fn failed_narration_keeps_manual_entries() {
    let mut moderator = at_night(InMemorySessionRepository::new());
    let shooter = moderator.state().roster.living().next().unwrap().id;
    let target = moderator.state().roster.living().nth(1).unwrap().id;
    moderator.apply(|e| e.declare_shot(shooter, Some(target))).unwrap();

    let err = moderator
        .suggest_from_narration(&FailingParser, "anything")
        .await
        .unwrap_err();

    assert!(matches!(err, RuntimeError::Narration(_)));
    assert!(err.is_recoverable());
    let actions = moderator.state().pending().night_actions().unwrap();
    assert_eq!(actions.intent(shooter).unwrap().shot, Some(target));
}

#[tokio::test]
async fn narration_outside_the_action_phase_is_rejected() {
    let mut moderator = Moderator::fresh(InMemorySessionRepository::new(), GameConfig::default())
        .unwrap();
    let err = moderator
        .suggest_from_narration(&KeywordNarrationParser, "Ana shot Bo")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Engine(EngineError::WrongPhase {
            phase: Phase::Setup,
            ..
        })
    ));
}

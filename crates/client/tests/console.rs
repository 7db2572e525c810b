//! Drives the console with scripted input, the way a moderator types it.

use async_trait::async_trait;
use mafia_client::{Console, Flow};
use mafia_core::{GameConfig, Phase};
use mafia_runtime::{
    InMemorySessionRepository, Moderator, NarrationError, NarrationParser, ProposedAction,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

const TABLE: &str = "start Ana, Bo, Cy, Di, Ed, Flo, Gus, Hal, Ivy, Jo, Kim, Lu";

fn console() -> Console<InMemorySessionRepository, Vec<u8>> {
    let moderator =
        Moderator::fresh(InMemorySessionRepository::new(), GameConfig::default()).unwrap();
    Console::new(moderator, StdRng::seed_from_u64(12), Vec::new())
}

async fn feed(console: &mut Console<InMemorySessionRepository, Vec<u8>>, lines: &[&str]) {
    for line in lines {
        assert_eq!(console.handle_line(line).await.unwrap(), Flow::Continue);
    }
}

fn output(console: Console<InMemorySessionRepository, Vec<u8>>) -> String {
    String::from_utf8(console.into_output()).unwrap()
}

#[tokio::test]
async fn scripted_session_reaches_the_first_night() {
    let mut console = console();
    let script = format!("{TABLE}\nday\nclose\nproceed\nstatus\nquit\nstatus\n");

    console.run(script.as_bytes()).await.unwrap();

    assert_eq!(
        console.moderator().state().phase,
        Phase::NightIndividualAction
    );
    let text = output(console);
    assert!(text.contains("Day 1 begins."));
    assert!(text.contains("Night 2 begins. The mafia may consult."));
    assert!(text.contains("night 2 actions> "));
    assert_eq!(text.matches("players have declared actions").count(), 1);
}

#[tokio::test]
async fn rejected_commands_are_reported_and_the_loop_continues() {
    let mut console = console();
    feed(&mut console, &["resolve", "dance", "shot 1"]).await;

    assert_eq!(console.moderator().state().phase, Phase::Setup);
    let text = output(console);
    assert!(text.contains("! cannot resolve the night during Setup"));
    assert!(text.contains("! unknown command `dance`"));
    assert!(text.contains("! usage: shot <player> <target|none>"));
}

#[tokio::test]
async fn role_cards_open_once() {
    let mut console = console();
    feed(&mut console, &[TABLE, "reveal Ana", "reveal 1"]).await;

    let text = output(console);
    assert_eq!(text.matches("1. Ana is ").count(), 1);
    assert!(text.contains("has already seen their role"));
}

#[tokio::test]
async fn narration_fills_the_night_form() {
    let mut console = console();
    feed(
        &mut console,
        &[TABLE, "day", "close", "proceed", "narrate Ana shot Bo and Cy saved herself"],
    )
    .await;

    let actions = console
        .moderator()
        .state()
        .pending()
        .night_actions()
        .unwrap()
        .declared();
    assert_eq!(actions, 2);
    let text = output(console);
    assert!(text.contains("Suggested actions: 2 merged, 0 ignored"));
    assert!(text.contains("1. Ana: shoots 2. Bo"));
}

struct OfflineParser;

#[async_trait]
impl NarrationParser for OfflineParser {
    async fn propose(
        &self,
        _narration: &str,
        _living: &[String],
    ) -> Result<Vec<ProposedAction>, NarrationError> {
        Err(NarrationError::Unavailable("offline".into()))
    }
}

#[tokio::test]
async fn unavailable_parser_keeps_the_typed_actions() {
    let mut console = console().with_parser(Box::new(OfflineParser));
    feed(
        &mut console,
        &[TABLE, "day", "close", "proceed", "shot Ana Bo", "narrate Cy saved herself"],
    )
    .await;

    let actions = console.moderator().state().pending().night_actions().unwrap();
    assert_eq!(actions.declared(), 1);
    let text = output(console);
    assert!(text.contains("! suggestion source unavailable: offline"));
}

#[tokio::test]
async fn restore_rewinds_to_the_listed_snapshot() {
    let mut console = console();
    feed(
        &mut console,
        &[TABLE, "day", "vote Bo 3", "close", "history", "restore 1"],
    )
    .await;

    let state = console.moderator().state();
    assert_eq!(state.phase, Phase::DayNomination);
    assert_eq!(state.day, 1);
    assert_eq!(state.history.len(), 1);
    let text = output(console);
    assert!(text.contains("1. start of Day 1"));
    assert!(text.contains("2. start of Night 2"));
    assert!(text.contains("Time travel: the game was restored to the start of Day 1."));
}

#[tokio::test]
async fn export_writes_plain_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game.txt");
    let mut console = console();
    feed(
        &mut console,
        &[TABLE, "day", &format!("export {}", path.display())],
    )
    .await;

    let exported = std::fs::read_to_string(&path).unwrap();
    assert!(exported.starts_with("Game started with 12 players."));
    assert!(exported.contains("Day 1 begins."));
    assert!(!exported.contains("**"));
}

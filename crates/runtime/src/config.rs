//! Runtime configuration loaded from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use mafia_core::GameConfig;

const APP_NAME: &str = "mafia-moderator";
const SAVE_FILE_NAME: &str = "session.json";

/// Settings for one moderator session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    /// Where the session blob is kept between runs.
    pub save_file: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            save_file: default_save_file(),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MAFIA_SAVE_FILE` - Path of the session blob (default: platform data dir)
    /// - `MAFIA_DEFENSE_SECONDS` - Trial defense window (default: 60)
    /// - `MAFIA_CONSULT_SECONDS` - Mafia consultation window (default: 60)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(path) = read_env::<PathBuf>("MAFIA_SAVE_FILE") {
            config.save_file = path;
        }
        if let Some(secs) = read_env::<u64>("MAFIA_DEFENSE_SECONDS") {
            config.game.defense_window = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("MAFIA_CONSULT_SECONDS") {
            config.game.consult_window = Duration::from_secs(secs.max(1));
        }

        config
    }

    pub fn with_save_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_file = path.into();
        self
    }
}

/// Platform data directory, e.g. `~/.local/share/mafia-moderator/session.json`.
///
/// Falls back to the working directory when no home directory is known.
pub fn default_save_file() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join(SAVE_FILE_NAME)
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

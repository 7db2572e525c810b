//! Client configuration: runtime settings plus where logs go.
use std::env;
use std::path::PathBuf;

use mafia_runtime::RuntimeConfig;

use crate::cli::Cli;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub runtime: RuntimeConfig,
    pub log_dir: PathBuf,
    pub seed: Option<u64>,
    pub fresh: bool,
}

impl ClientConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables (in addition to those read by [`RuntimeConfig`]):
    /// - `MAFIA_LOG_DIR` - Directory for the log file (default: platform cache dir)
    /// - `MAFIA_SEED` - Seed for dealing roles (default: random)
    pub fn from_env() -> Self {
        Self {
            runtime: RuntimeConfig::from_env(),
            log_dir: read_env::<PathBuf>("MAFIA_LOG_DIR").unwrap_or_else(default_log_dir),
            seed: read_env::<u64>("MAFIA_SEED"),
            fresh: false,
        }
    }

    /// Command-line flags take precedence over the environment.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(path) = &cli.save_file {
            self.runtime.save_file = path.clone();
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        self.fresh = cli.fresh;
        self
    }
}

/// Platform cache directory, e.g. `~/.cache/mafia-moderator/logs`.
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "mafia-moderator")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/mafia-moderator"))
        .join("logs")
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

//! Command-line arguments for the `mafia` binary.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Moderator's assistant for a 12-player game of Mafia
#[derive(Parser, Debug)]
#[command(name = "mafia")]
#[command(about = "Moderator's assistant for a 12-player game of Mafia", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Session file to resume and save to (overrides MAFIA_SAVE_FILE)
    #[arg(long, value_name = "PATH")]
    pub save_file: Option<PathBuf>,

    /// Discard any saved session and start in setup
    #[arg(long)]
    pub fresh: bool,

    /// Seed for dealing roles, for reproducible games
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Open the interactive moderator console (default)
    #[default]
    Play,

    /// Print the saved narrative log as plain text
    Export,

    /// List the saved day and night snapshots
    History,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        self.command.unwrap_or_default()
    }
}

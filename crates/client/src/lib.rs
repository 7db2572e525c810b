//! Moderator console for a 12-player game of Mafia.
//!
//! The `mafia` binary is the composition root: it reads configuration,
//! installs file logging, opens the saved session through
//! [`mafia_runtime::Moderator`] and hands control to the [`console`].
pub mod cli;
pub mod config;
pub mod console;
pub mod logging;

pub use cli::{Cli, Mode};
pub use config::ClientConfig;
pub use console::{Console, Flow};

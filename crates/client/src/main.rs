//! `mafia` binary entry point.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use mafia_client::console::render;
use mafia_client::{Cli, ClientConfig, Console, Mode, logging};
use mafia_runtime::{FileSessionRepository, Moderator};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().with_cli(&cli);

    let _guard = logging::setup_logging(&config.log_dir)?;
    tracing::info!("Starting mafia console ({:?})", cli.mode());
    tracing::info!("Save file: {}", config.runtime.save_file.display());

    let repo = FileSessionRepository::new(&config.runtime.save_file).with_context(|| {
        format!(
            "Failed to open save file {}",
            config.runtime.save_file.display()
        )
    })?;
    let game = config.runtime.game.clone();
    let moderator = if config.fresh {
        Moderator::fresh(repo, game)?
    } else {
        Moderator::open(repo, game)?
    };

    match cli.mode() {
        Mode::Play => {
            let rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut console = Console::new(moderator, rng, io::stdout());
            console.run(BufReader::new(tokio::io::stdin())).await?;
        }
        Mode::Export => {
            let mut out = io::stdout().lock();
            writeln!(out, "{}", moderator.export_log())?;
        }
        Mode::History => {
            let mut out = io::stdout().lock();
            write!(out, "{}", render::history(&moderator.state().history))?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

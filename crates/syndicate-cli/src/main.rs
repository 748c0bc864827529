//! Terminal front-end for Syndicate.
//!
//! Reads one command per line from stdin and prints the resulting notice
//! or view. Logs go to stderr so they never interleave with game output.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `syndicate-config.yaml` (or `--config <path>`)
//! 2. Initialize structured logging (tracing)
//! 3. Open the local store (credentials, and companies in local mode)
//! 4. Open the configured company backend
//! 5. Create the session and restore a saved login
//! 6. Run the command loop until `quit` or end of input

mod command;
mod error;
mod render;

use std::path::PathBuf;

use anyhow::Context as _;
use syndicate_core::{Credentials, LoggingConfig, Screen, Session, SyndicateConfig};
use syndicate_store::Backend;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::command::Command;
use crate::error::CliError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG: &str = "syndicate-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, storage, or stdin fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config_path = config_path(std::env::args().skip(1))?;
    let config = SyndicateConfig::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        config = %config_path.display(),
        backend = ?config.storage.backend,
        seeded = config.game.rng_seed.is_some(),
        "syndicate starting"
    );

    // 3-4. Open storage.
    let local = config
        .storage
        .open_local()
        .await
        .context("opening local store")?;
    let backend = config
        .storage
        .open_backend(&local)
        .await
        .context("opening company store")?;
    if matches!(backend, Backend::Local(_)) {
        warn!("No shared server configured, running in local mode");
        println!("[err] No shared server configured. Running in local mode.");
    }

    // 5. Create the session.
    let mut session = Session::new(
        backend,
        Credentials::new(local),
        syndicate_core::SystemClock,
        config.game,
    );
    if session.restore() {
        println!("Welcome back, {}.", session.user().unwrap_or_default());
    } else {
        println!("Log in with `login <user> <password>`. Type `help` for commands.");
    }

    // 6. Command loop.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(cmd)) => println!("{}", execute(&mut session, cmd).await),
            Err(e) => println!("[err] {e}"),
        }
    }

    info!("syndicate stopped");
    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Pick the config file from `--config <path>`, or the default.
fn config_path(mut args: impl Iterator<Item = String>) -> Result<PathBuf, CliError> {
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args
                .next()
                .map(PathBuf::from)
                .ok_or(CliError::MissingFlagValue { flag: "--config" });
        }
    }
    Ok(PathBuf::from(DEFAULT_CONFIG))
}

/// Run one command against the session and render the outcome.
async fn execute(session: &mut Session<Backend>, command: Command) -> String {
    match command {
        Command::Login { user, password } => session.login(&user, &password).await.to_string(),
        Command::Logout => session.logout().await.to_string(),
        Command::Play => session.enter_game().await.to_string(),
        Command::Home => {
            session.go_home();
            "Back home.".to_owned()
        }
        Command::Create { name, password } => {
            session.save_company(&name, &password).await.to_string()
        }
        Command::Act(action) => session.perform(action).await.to_string(),
        Command::Stats | Command::Board | Command::Log | Command::Targets
            if session.screen() != Screen::Game =>
        {
            "Enter the game first with `play`.".to_owned()
        }
        Command::Stats => render::stats(session.company().as_ref()),
        Command::Board => render::board(&session.leaderboard()),
        Command::Log => render::log(session.company().as_ref()),
        Command::Targets => render::targets(&session.targets()),
        Command::Help => command::HELP.to_owned(),
        Command::Quit => String::new(),
    }
}

//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler, and holds
//! the session plumbing shared by the three games.

pub mod completions;
pub mod cup_flip;
pub mod find_character;
pub mod hat_trick;
pub mod validate;
pub mod version;

use std::sync::Arc;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands, SessionArgs};
use crate::config::{ConfigLoader, GameConfig, Validator};
use crate::error::{ConfigError, ParlorError};
use crate::observability::events::{Event, EventEmitter, SessionSummary, StopReason};
use crate::observability::init_metrics;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), ParlorError> {
    match cli.command {
        Commands::HatTrick(args) => hat_trick::run(&args, cancel).await,
        Commands::CupFlip(args) => cup_flip::run(&args, cancel).await,
        Commands::FindCharacter(args) => find_character::run(&args, cancel).await,
        Commands::Validate(args) => validate::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Loads the configuration named by `--config`, or the defaults.
///
/// Validation warnings are logged.
///
/// # Errors
///
/// Returns a config error if the file is missing, malformed, or invalid.
pub fn load_config(session: &SessionArgs) -> Result<GameConfig, ParlorError> {
    let Some(path) = session.config.as_deref() else {
        return Ok(GameConfig::default());
    };

    tracing::info!(config = %path.display(), "loading configuration");
    let result = ConfigLoader::with_defaults().load(path)?;
    for warning in &result.warnings {
        tracing::warn!(location = %warning.path, "{}", warning.message);
    }
    Ok(GameConfig::clone(&result.config))
}

/// Re-validates a configuration after command-line overrides.
///
/// # Errors
///
/// Returns a validation error naming the offending settings.
pub fn revalidate(config: &GameConfig) -> Result<(), ParlorError> {
    let result = Validator::new().validate(config);
    if result.has_errors() {
        return Err(ConfigError::ValidationError {
            path: "command line".to_owned(),
            errors: result.errors,
        }
        .into());
    }
    Ok(())
}

/// Seeded when `--seed` is given, otherwise from the operating system.
#[must_use]
pub fn session_rng(session: &SessionArgs) -> StdRng {
    session
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

/// Whether `rounds` have been played under the optional `--rounds` limit.
#[must_use]
pub fn rounds_done(limit: Option<u32>, rounds: u64) -> bool {
    limit.is_some_and(|limit| rounds >= u64::from(limit))
}

/// Session-wide event bookkeeping.
#[derive(Debug)]
pub struct SessionLog {
    events: Arc<EventEmitter>,
}

impl SessionLog {
    /// Starts the metrics exporter if `--metrics-port` is set, opens the
    /// `--events` file (`-` for stderr) or discards events when none is
    /// given, and records the session start.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the exporter cannot bind or the events file
    /// cannot be created.
    pub fn open(session: &SessionArgs, game: &str) -> Result<Self, ParlorError> {
        if let Some(port) = session.metrics_port {
            init_metrics(port)?;
        }
        let events = match session.events.as_deref() {
            Some(path) if path.as_os_str() == "-" => EventEmitter::stderr(),
            Some(path) => EventEmitter::from_file(path)?,
            None => EventEmitter::noop(),
        };
        let events = Arc::new(events);
        events.emit(Event::SessionStarted {
            timestamp: Utc::now(),
            game: game.to_owned(),
            seed: session.seed,
        });
        tracing::info!(game, "session started");
        Ok(Self { events })
    }

    /// The shared emitter.
    #[must_use]
    pub fn events(&self) -> &Arc<EventEmitter> {
        &self.events
    }

    /// Records the end of the session.
    pub fn stop(&self, reason: StopReason, summary: SessionSummary) {
        tracing::info!(?reason, %summary, "session stopped");
        self.events.emit(Event::SessionStopped {
            timestamp: Utc::now(),
            reason,
            summary,
        });
    }
}

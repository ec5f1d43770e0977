//! `hat-trick` command
//!
//! Plays shell-game rounds in the terminal. The phase engine paces the
//! round; this loop only feeds it player input and restarts it.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::args::HatTrickArgs;
use crate::cli::input::{Command, InputReader, parse_line};
use crate::cli::screen::{HatTrickView, Screen};
use crate::config::schema::{HatTrickConfig, HatTrickTimings};
use crate::error::ParlorError;
use crate::game::SlotIndex;
use crate::observability::events::{SessionSummary, StopReason};
use crate::phase::{FanoutPresenter, Phase, PhaseEngine, Presenter, timer};

use super::{SessionLog, load_config, revalidate, rounds_done};

const GAME: &str = "hat_trick";

/// Runs the hat-trick command.
///
/// # Errors
///
/// Returns a config error for invalid settings, or an I/O error if the
/// events file or player input fails.
pub async fn run(args: &HatTrickArgs, cancel: CancellationToken) -> Result<(), ParlorError> {
    let mut config = load_config(&args.session)?;
    if let Some(slots) = args.slots {
        config.hat_trick.slots = slots;
    }
    if let Some(swaps) = args.swaps {
        config.hat_trick.swaps = swaps;
    }
    if args.session.instant {
        config.hat_trick.timings = HatTrickTimings::instant();
    }
    revalidate(&config)?;

    let log = SessionLog::open(&args.session, GAME)?;
    let screen = Arc::new(Screen::stdout());
    let engine = build_engine(
        config.hat_trick.clone(),
        args.session.seed,
        &screen,
        &log,
    );

    let mut input = InputReader::stdin();
    let (reason, summary) = play(
        &engine,
        args.session.rounds,
        &screen,
        &mut input,
        &cancel,
    )
    .await?;

    screen.line(format!("Thanks for playing! {summary}"));
    log.stop(reason, summary);
    Ok(())
}

fn build_engine(
    config: HatTrickConfig,
    seed: Option<u64>,
    screen: &Arc<Screen>,
    log: &SessionLog,
) -> PhaseEngine {
    let presenter = FanoutPresenter::new()
        .with(Arc::new(HatTrickView::new(Arc::clone(screen))))
        .with(Arc::clone(log.events()) as Arc<dyn Presenter>);
    let presenter = Arc::new(presenter);
    match seed {
        Some(seed) => PhaseEngine::with_seed(config, presenter, seed),
        None => PhaseEngine::new(config, presenter),
    }
}

enum Flow {
    Continue,
    Resolved,
    Restart,
    Quit,
}

/// Plays rounds until the limit, a quit, closed input, or cancellation.
///
/// A restart replays the current round number with a fresh shuffle, so it
/// does not count toward the limit.
///
/// # Errors
///
/// Returns an I/O error if reading input fails.
pub async fn play(
    engine: &PhaseEngine,
    rounds: Option<u32>,
    screen: &Screen,
    input: &mut InputReader,
    cancel: &CancellationToken,
) -> Result<(StopReason, SessionSummary), ParlorError> {
    let timings = engine.config().timings;
    let mut summary = SessionSummary::default();
    let mut delay = timings.start_delay;
    let mut restart = false;

    let reason = 'session: loop {
        if !restart {
            if rounds_done(rounds, summary.rounds) {
                break StopReason::Completed;
            }
            summary.rounds += 1;
        }
        if !timer::pause(cancel, delay).await {
            break StopReason::Interrupted;
        }
        delay = timings.restart;

        screen.line(format!("Round {}", summary.rounds));
        if engine.start_round().is_none() {
            break StopReason::Completed;
        }

        loop {
            let line = tokio::select! {
                biased;
                () = cancel.cancelled() => break 'session StopReason::Interrupted,
                line = input.next_line() => line?,
            };
            let Some(line) = line else {
                break 'session StopReason::Quit;
            };
            match handle_line(engine, screen, &line, &mut summary) {
                Flow::Continue => {}
                Flow::Resolved => {
                    restart = false;
                    break;
                }
                Flow::Restart => {
                    restart = true;
                    break;
                }
                Flow::Quit => break 'session StopReason::Quit,
            }
        }
        engine.request_reset();
    };

    engine.shutdown();
    Ok((reason, summary))
}

fn handle_line(
    engine: &PhaseEngine,
    screen: &Screen,
    line: &str,
    summary: &mut SessionSummary,
) -> Flow {
    let commands = match parse_line(line) {
        Ok(commands) => commands,
        Err(e) => {
            screen.line(e);
            return Flow::Continue;
        }
    };

    let mut commands = commands.into_iter();
    while let Some(command) = commands.next() {
        match command {
            Command::Pick(slot) => {
                if let Some(verdict) = engine.select(SlotIndex(slot)) {
                    summary.record(verdict);
                    // Later picks on the line are spent; a quit still counts
                    if commands.any(|c| c == Command::Quit) {
                        return Flow::Quit;
                    }
                    return Flow::Resolved;
                }
                let phase = engine.phase();
                if phase.is_animating() {
                    screen.line("Wait for the shuffle to finish.");
                } else if phase == Phase::Guessing {
                    screen.line(format!("Pick 1-{}.", engine.config().slots));
                }
            }
            Command::Reset => {
                screen.line("Restarting...");
                return Flow::Restart;
            }
            Command::Quit => return Flow::Quit,
        }
    }
    Flow::Continue
}

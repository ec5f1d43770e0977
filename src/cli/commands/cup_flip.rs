//! `cup-flip` command

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::cli::args::CupFlipArgs;
use crate::cli::input::{Command, InputReader, parse_line};
use crate::cli::screen::{Screen, render_labels};
use crate::error::ParlorError;
use crate::game::Verdict;
use crate::games::{CupFlip, SelectOutcome};
use crate::observability::events::{Event, EventEmitter, SessionSummary, StopReason};

use super::{SessionLog, load_config, revalidate, rounds_done};

const GAME: &str = "cup_flip";

/// Runs the cup-flip command.
///
/// # Errors
///
/// Returns a config error for invalid settings, or an I/O error if the
/// events file or player input fails.
pub async fn run(args: &CupFlipArgs, cancel: CancellationToken) -> Result<(), ParlorError> {
    let mut config = load_config(&args.session)?;
    if let Some(cups) = args.cups {
        config.cup_flip.cups = cups;
    }
    if let Some(flips) = args.flips_per_move {
        config.cup_flip.flips_per_move = flips;
    }
    revalidate(&config)?;

    let log = SessionLog::open(&args.session, GAME)?;
    let screen = Screen::stdout();
    let mut game = CupFlip::new(config.cup_flip);
    let mut input = InputReader::stdin();

    let (reason, summary) = play(
        &mut game,
        args.session.rounds,
        &screen,
        log.events(),
        &mut input,
        &cancel,
    )
    .await?;

    screen.line(format!("Thanks for playing! {summary}"));
    log.stop(reason, summary);
    Ok(())
}

/// Renders the table; `^` is face up, `v` face down, `<>` selected.
#[must_use]
pub fn render_cups(game: &CupFlip) -> String {
    (0..game.cups())
        .map(|cup| {
            let symbol = if game.is_face_down(cup) { 'v' } else { '^' };
            if game.selected().contains(&cup) {
                format!("<{symbol}>")
            } else {
                format!("[{symbol}]")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn draw(game: &CupFlip, screen: &Screen) {
    screen.line(render_cups(game));
    screen.line(render_labels(game.cups()));
}

/// Plays puzzles until the limit, a quit, closed input, or cancellation.
///
/// A solved puzzle counts as a correct round; a reset sets the current
/// puzzle up again without counting toward the limit.
///
/// # Errors
///
/// Returns an I/O error if reading input fails.
pub async fn play(
    game: &mut CupFlip,
    rounds: Option<u32>,
    screen: &Screen,
    events: &EventEmitter,
    input: &mut InputReader,
    cancel: &CancellationToken,
) -> Result<(StopReason, SessionSummary), ParlorError> {
    let mut summary = SessionSummary::default();
    let mut restart = false;

    let reason = 'session: loop {
        if !restart {
            if rounds_done(rounds, summary.rounds) {
                break StopReason::Completed;
            }
            summary.rounds += 1;
        }
        screen.line(format!(
            "Turn every cup face down, {} at a time. Pick cups by number (r to restart, q to quit)",
            game.flips_per_move()
        ));
        draw(game, screen);

        loop {
            let line = tokio::select! {
                biased;
                () = cancel.cancelled() => break 'session StopReason::Interrupted,
                line = input.next_line() => line?,
            };
            let Some(line) = line else {
                break 'session StopReason::Quit;
            };
            let commands = match parse_line(&line) {
                Ok(commands) => commands,
                Err(e) => {
                    screen.line(e);
                    continue;
                }
            };

            let mut finished = false;
            let mut commands = commands.into_iter();
            while let Some(command) = commands.next() {
                match command {
                    Command::Pick(cup) => {
                        if handle_pick(game, cup, screen, events) {
                            summary.record(Verdict::Correct);
                            if commands.any(|c| c == Command::Quit) {
                                break 'session StopReason::Quit;
                            }
                            restart = false;
                            finished = true;
                            break;
                        }
                    }
                    Command::Reset => {
                        screen.line("Restarting...");
                        restart = true;
                        finished = true;
                        break;
                    }
                    Command::Quit => break 'session StopReason::Quit,
                }
            }
            if finished {
                break;
            }
            draw(game, screen);
        }
        game.reset();
    };

    Ok((reason, summary))
}

/// Applies one pick; returns whether it solved the puzzle.
fn handle_pick(game: &mut CupFlip, cup: usize, screen: &Screen, events: &EventEmitter) -> bool {
    match game.select(cup) {
        SelectOutcome::Ignored => {
            if cup >= game.cups() {
                screen.line(format!("Pick 1-{}.", game.cups()));
            } else {
                screen.line(format!(
                    "Already {} selected; deselect one first.",
                    game.flips_per_move()
                ));
            }
            false
        }
        SelectOutcome::Selected | SelectOutcome::Deselected => false,
        SelectOutcome::Ready => {
            let Some(outcome) = game.flip_selected() else {
                return false;
            };
            events.emit(Event::CupsFlipped {
                timestamp: Utc::now(),
                cups: outcome.flipped.clone(),
                moves: outcome.moves,
                solved: outcome.solved,
            });
            if outcome.solved {
                draw(game, screen);
                screen.line(format!("Solved in {} moves!", outcome.moves));
            } else {
                screen.line(format!("Move {}.", outcome.moves));
            }
            outcome.solved
        }
    }
}

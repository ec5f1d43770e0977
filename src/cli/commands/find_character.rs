//! `find-character` command

use chrono::Utc;
use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::cli::args::FindCharacterArgs;
use crate::cli::input::{Command, InputReader, parse_line};
use crate::cli::screen::Screen;
use crate::config::schema::FindCharacterConfig;
use crate::error::ParlorError;
use crate::games::{FindCharacter, Stage};
use crate::observability::events::{Event, EventEmitter, SessionSummary, StopReason};
use crate::phase::timer;

use super::{SessionLog, load_config, revalidate, rounds_done, session_rng};

const GAME: &str = "find_character";

/// Runs the find-character command.
///
/// # Errors
///
/// Returns a config error for invalid settings, or an I/O error if the
/// events file or player input fails.
pub async fn run(args: &FindCharacterArgs, cancel: CancellationToken) -> Result<(), ParlorError> {
    let mut config = load_config(&args.session)?;
    if args.session.instant {
        config.find_character.countdown = std::time::Duration::ZERO;
        config.find_character.miss_delay = std::time::Duration::ZERO;
    }
    revalidate(&config)?;

    let log = SessionLog::open(&args.session, GAME)?;
    let screen = Screen::stdout();
    let mut rng = session_rng(&args.session);
    let mut input = InputReader::stdin();

    let (reason, summary) = play(
        &config.find_character,
        &mut rng,
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

fn draw(game: &FindCharacter, screen: &Screen) {
    for door in 0..game.doors() {
        let behind = if game.is_open(door) {
            game.character_behind(door)
                .and_then(|c| game.character_name(c))
                .unwrap_or("?")
        } else {
            "[closed]"
        };
        screen.line(format!("{}: {behind}", door + 1));
    }
}

fn target_name(game: &FindCharacter) -> &str {
    game.character_name(game.target()).unwrap_or("?")
}

enum Flow {
    Continue,
    Found,
    Restart,
    Quit,
}

/// Plays rounds until the limit, a quit, closed input, or cancellation.
///
/// Every opened door counts as a pick: the find is correct, each miss
/// incorrect. A restart reshuffles without counting toward the limit.
///
/// # Errors
///
/// Returns an I/O error if reading input fails.
pub async fn play<R: Rng + ?Sized>(
    settings: &FindCharacterConfig,
    rng: &mut R,
    rounds: Option<u32>,
    screen: &Screen,
    events: &EventEmitter,
    input: &mut InputReader,
    cancel: &CancellationToken,
) -> Result<(StopReason, SessionSummary), ParlorError> {
    let mut summary = SessionSummary::default();
    let mut game = FindCharacter::new(settings, rng);
    let mut restart = false;

    let reason = 'session: loop {
        if !restart {
            if rounds_done(rounds, summary.rounds) {
                break StopReason::Completed;
            }
            summary.rounds += 1;
        }
        if restart || summary.rounds > 1 {
            game.replay(rng);
        }

        screen.line(format!(
            "Memorize the doors! They close in {}.",
            humantime::format_duration(settings.countdown)
        ));
        draw(&game, screen);

        // Choices made while memorizing reach the game and are refused there
        let countdown = timer::pause(cancel, settings.countdown);
        tokio::pin!(countdown);
        loop {
            tokio::select! {
                biased;
                elapsed = &mut countdown => {
                    if elapsed {
                        break;
                    }
                    break 'session StopReason::Interrupted;
                }
                line = input.next_line() => {
                    let Some(line) = line? else {
                        break 'session StopReason::Quit;
                    };
                    match handle_line(&mut game, &line, screen, events, &mut summary) {
                        Flow::Quit => break 'session StopReason::Quit,
                        Flow::Restart => {
                            restart = true;
                            continue 'session;
                        }
                        Flow::Continue | Flow::Found => {}
                    }
                }
            }
        }

        game.close_doors();
        screen.line(format!(
            "Where is {}? Open a door 1-{} (r to restart, q to quit)",
            target_name(&game),
            game.doors()
        ));

        loop {
            let line = tokio::select! {
                biased;
                () = cancel.cancelled() => break 'session StopReason::Interrupted,
                line = input.next_line() => line?,
            };
            let Some(line) = line else {
                break 'session StopReason::Quit;
            };
            match handle_line(&mut game, &line, screen, events, &mut summary) {
                Flow::Continue => {}
                Flow::Found => {
                    restart = false;
                    break;
                }
                Flow::Restart => {
                    restart = true;
                    break;
                }
                Flow::Quit => break 'session StopReason::Quit,
            }

            // A missed door stays open for a moment before closing again
            let open_misses: Vec<usize> = (0..game.doors())
                .filter(|&d| game.is_open(d))
                .collect();
            if !open_misses.is_empty() {
                if !timer::pause(cancel, settings.miss_delay).await {
                    break 'session StopReason::Interrupted;
                }
                for door in open_misses {
                    game.close_door(door);
                }
                draw(&game, screen);
            }
        }
    };

    Ok((reason, summary))
}

fn handle_line(
    game: &mut FindCharacter,
    line: &str,
    screen: &Screen,
    events: &EventEmitter,
    summary: &mut SessionSummary,
) -> Flow {
    let commands = match parse_line(line) {
        Ok(commands) => commands,
        Err(e) => {
            screen.line(e);
            return Flow::Continue;
        }
    };

    let mut opened = None;
    let mut commands = commands.into_iter();
    while let Some(command) = commands.next() {
        match command {
            Command::Pick(door) => {
                if game.stage() == Stage::Memorizing {
                    screen.line("Wait until the doors close.");
                    continue;
                }
                if let Some(open) = opened {
                    screen.line(format!(
                        "One door at a time; door {} is still open.",
                        open + 1
                    ));
                    continue;
                }
                let Some(outcome) = game.choose(door) else {
                    if door >= game.doors() {
                        screen.line(format!("Open a door 1-{}.", game.doors()));
                    } else {
                        screen.line(format!("Door {} is already open.", door + 1));
                    }
                    continue;
                };

                let name = game.character_name(outcome.character).unwrap_or("?");
                events.emit(Event::DoorOpened {
                    timestamp: Utc::now(),
                    door,
                    character: name.to_owned(),
                    verdict: outcome.verdict,
                });
                summary.record(outcome.verdict);

                if outcome.verdict.is_correct() {
                    screen.line(format!("You found {name} behind door {}!", door + 1));
                    draw(game, screen);
                    if commands.any(|c| c == Command::Quit) {
                        return Flow::Quit;
                    }
                    return Flow::Found;
                }
                screen.line(format!(
                    "Door {}: {name}. Not this one! {} doors left.",
                    door + 1,
                    game.remaining_doors()
                ));
                opened = Some(door);
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

//! Metrics for `parlor` games.
//!
//! Counters are recorded through the `metrics` facade. The binary exports
//! them over HTTP in Prometheus format when `--metrics-port` is given;
//! otherwise no recorder is installed and every call is a no-op.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::ParlorError;
use crate::game::Verdict;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Guard so descriptions are registered once.
static METRICS_DESCRIBED: AtomicBool = AtomicBool::new(false);

/// Game names used as the `game` label.
pub const KNOWN_GAMES: [&str; 3] = ["hat_trick", "cup_flip", "find_character"];

/// Returns `game` when it is a known game name, or `"__unknown__"`.
#[must_use]
pub fn sanitize_game_label(game: &str) -> &str {
    if KNOWN_GAMES.contains(&game) {
        game
    } else {
        "__unknown__"
    }
}

/// Installs the Prometheus recorder and serves it on `127.0.0.1:port`.
///
/// Later calls are no-ops. Must be called inside a Tokio runtime.
///
/// # Errors
///
/// Returns an I/O error if the recorder cannot be installed or the
/// listener cannot bind.
pub fn init_metrics(port: u16) -> Result<(), ParlorError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    PrometheusBuilder::new()
        .with_http_listener(([127, 0, 0, 1], port))
        .install()
        .map_err(|e| ParlorError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    tracing::info!(port, "serving metrics");
    Ok(())
}

/// Registers metric descriptions with the installed recorder.
///
/// Safe to call more than once.
pub fn describe_metrics() {
    if METRICS_DESCRIBED.swap(true, Ordering::SeqCst) {
        return;
    }
    describe_counter!("parlor_rounds_started_total", "Rounds started per game");
    describe_counter!("parlor_verdicts_total", "Resolved guesses by verdict");
    describe_counter!("parlor_resets_total", "Rounds discarded by a reset");
    describe_counter!("parlor_swaps_committed_total", "Swaps applied to a tracked target");
    describe_counter!("parlor_moves_total", "Moves made in move-based games");
}

/// Records the start of a round.
pub fn record_round_started(game: &str) {
    counter!("parlor_rounds_started_total", "game" => sanitize_game_label(game).to_owned())
        .increment(1);
}

/// Records a resolved guess.
pub fn record_verdict(game: &str, verdict: Verdict) {
    counter!(
        "parlor_verdicts_total",
        "game" => sanitize_game_label(game).to_owned(),
        "verdict" => verdict.to_string()
    )
    .increment(1);
}

/// Records a reset that discarded a round.
pub fn record_reset(game: &str) {
    counter!("parlor_resets_total", "game" => sanitize_game_label(game).to_owned()).increment(1);
}

/// Records one committed swap.
pub fn record_swap_committed() {
    counter!("parlor_swaps_committed_total").increment(1);
}

/// Records one move in a move-based game.
pub fn record_move(game: &str) {
    counter!("parlor_moves_total", "game" => sanitize_game_label(game).to_owned()).increment(1);
}

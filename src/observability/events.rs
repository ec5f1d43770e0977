//! Structured event stream.
//!
//! Discrete, typed events emitted while a game runs. Events are serialized
//! as newline-delimited JSON (JSONL) and carry a monotonically increasing
//! sequence number for ordering.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::{SlotIndex, Verdict};
use crate::phase::{Phase, PhaseContext, Presenter, SwapStep};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The requested number of rounds was played.
    Completed,
    /// The player quit or input closed.
    Quit,
    /// Interrupted by SIGINT or SIGTERM.
    Interrupted,
}

/// Totals emitted when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Rounds played; a restart replays the same round.
    pub rounds: u64,
    /// Correct picks.
    pub correct: u64,
    /// Incorrect picks.
    pub incorrect: u64,
}

impl SessionSummary {
    /// Adds one resolved pick.
    pub const fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Correct => self.correct += 1,
            Verdict::Incorrect => self.incorrect += 1,
        }
    }
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rounds={} correct={} incorrect={}",
            self.rounds, self.correct, self.incorrect
        )
    }
}

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during play.
///
/// Each variant is tagged with `"type"` when serialized so consumers can
/// dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A game session started.
    SessionStarted {
        /// When the session started.
        timestamp: DateTime<Utc>,
        /// Game name (e.g. `"hat_trick"`).
        game: String,
        /// Seed of the session RNG, if fixed.
        seed: Option<u64>,
    },

    /// A game session ended.
    SessionStopped {
        /// When the session ended.
        timestamp: DateTime<Utc>,
        /// Why it ended.
        reason: StopReason,
        /// Session totals.
        summary: SessionSummary,
    },

    /// The hat-trick sequencer entered a phase.
    PhaseEntered {
        /// When the transition occurred.
        timestamp: DateTime<Utc>,
        /// Round counter.
        generation: u64,
        /// Phase entered.
        phase: Phase,
        /// Target slot, when visible in this phase.
        target: Option<SlotIndex>,
    },

    /// A swap is being played back.
    SwapStarted {
        /// When playback of the swap began.
        timestamp: DateTime<Utc>,
        /// Round counter.
        generation: u64,
        /// Zero-based position in the sequence.
        index: usize,
        /// Sequence length.
        total: usize,
        /// First slot.
        a: SlotIndex,
        /// Second slot.
        b: SlotIndex,
    },

    /// A hat-trick pick was resolved.
    GuessResolved {
        /// When the pick was accepted.
        timestamp: DateTime<Utc>,
        /// Round counter.
        generation: u64,
        /// Slot picked.
        slot: SlotIndex,
        /// Result of the pick.
        verdict: Verdict,
    },

    /// Cups were flipped.
    CupsFlipped {
        /// When the move was made.
        timestamp: DateTime<Utc>,
        /// Cups turned over.
        cups: Vec<usize>,
        /// Moves so far.
        moves: u32,
        /// Whether the table is solved.
        solved: bool,
    },

    /// A door was opened.
    DoorOpened {
        /// When the door was opened.
        timestamp: DateTime<Utc>,
        /// Door index.
        door: usize,
        /// Character behind it.
        character: String,
        /// Whether it was the target.
        verdict: Verdict,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) increments the sequence counter,
/// serializes the event as a single JSON line, and flushes the writer.
/// Serialization or I/O failures are dropped; events never stop a game.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stderr.
    ///
    /// Stdout belongs to the game board.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock()
            && let Ok(line) = serde_json::to_string(&envelope)
        {
            let _ = writeln!(w, "{line}");
            let _ = w.flush();
        }
    }

    /// Number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

/// Turns phase-engine notifications into events.
impl Presenter for EventEmitter {
    fn on_phase_enter(&self, phase: Phase, context: &PhaseContext) {
        let timestamp = Utc::now();
        self.emit(Event::PhaseEntered {
            timestamp,
            generation: context.generation,
            phase,
            target: context.target,
        });
        if let Some(selection) = context.selection {
            self.emit(Event::GuessResolved {
                timestamp,
                generation: context.generation,
                slot: selection.slot,
                verdict: selection.verdict,
            });
        }
    }

    fn on_swap_step(&self, step: &SwapStep) {
        self.emit(Event::SwapStarted {
            timestamp: Utc::now(),
            generation: step.generation,
            index: step.index,
            total: step.total,
            a: step.swap.first(),
            b: step.swap.second(),
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;
    use crate::game::SwapOp;
    use crate::phase::Selection;

    /// In-memory writer for capturing emitter output in tests.
    #[derive(Clone)]
    struct TestWriter(Arc<StdMutex<Vec<u8>>>);

    impl TestWriter {
        fn new() -> Self {
            Self(Arc::new(StdMutex::new(Vec::new())))
        }

        fn lines(&self) -> Vec<serde_json::Value> {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf)
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn sample_event() -> Event {
        Event::SessionStarted {
            timestamp: DateTime::parse_from_rfc3339("2026-02-04T10:15:30Z")
                .unwrap()
                .with_timezone(&Utc),
            game: "hat_trick".to_owned(),
            seed: Some(7),
        }
    }

    fn context(selection: Option<Selection>) -> PhaseContext {
        PhaseContext {
            generation: 3,
            slot_count: 3,
            swap_count: 4,
            target: Some(SlotIndex(2)),
            selection,
        }
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let parsed = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(parsed["type"], "SessionStarted");
        assert_eq!(parsed["game"], "hat_trick");
        assert_eq!(parsed["seed"], 7);
    }

    #[test]
    fn emitter_increments_sequence() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(sample_event());
        emitter.emit(Event::SessionStopped {
            timestamp: Utc::now(),
            reason: StopReason::Quit,
            summary: SessionSummary::default(),
        });

        assert_eq!(emitter.event_count(), 2);
        let lines = tw.lines();
        assert_eq!(lines[0]["sequence"], 0);
        assert_eq!(lines[1]["sequence"], 1);
        assert_eq!(lines[1]["reason"], "quit");
        assert_eq!(lines[1]["summary"]["rounds"], 0);
    }

    #[test]
    fn envelope_flattens_event_fields() {
        let envelope = EventEnvelope {
            sequence: 7,
            event: sample_event(),
        };
        let parsed = serde_json::to_value(&envelope).unwrap();
        assert_eq!(parsed["sequence"], 7);
        assert_eq!(parsed["type"], "SessionStarted");
        assert!(parsed.get("event").is_none());
    }

    #[test]
    fn presenter_emits_phase_events() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.on_phase_enter(Phase::Revealing, &context(None));

        let lines = tw.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["type"], "PhaseEntered");
        assert_eq!(lines[0]["phase"], "revealing");
        assert_eq!(lines[0]["generation"], 3);
        assert_eq!(lines[0]["target"], 2);
    }

    #[test]
    fn resolved_phase_also_emits_guess() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        let selection = Selection {
            slot: SlotIndex(1),
            verdict: Verdict::Incorrect,
        };
        emitter.on_phase_enter(Phase::Resolved, &context(Some(selection)));

        let lines = tw.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["type"], "GuessResolved");
        assert_eq!(lines[1]["slot"], 1);
        assert_eq!(lines[1]["verdict"], "incorrect");
    }

    #[test]
    fn presenter_emits_swap_steps() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.on_swap_step(&SwapStep {
            generation: 1,
            index: 0,
            total: 4,
            swap: SwapOp::new(SlotIndex(0), SlotIndex(2)).unwrap(),
        });

        let lines = tw.lines();
        assert_eq!(lines[0]["type"], "SwapStarted");
        assert_eq!(lines[0]["a"], 0);
        assert_eq!(lines[0]["b"], 2);
        assert_eq!(lines[0]["total"], 4);
    }

    #[test]
    fn summary_counts_verdicts() {
        let mut summary = SessionSummary {
            rounds: 2,
            ..SessionSummary::default()
        };
        summary.record(Verdict::Correct);
        summary.record(Verdict::Incorrect);
        assert_eq!(summary.to_string(), "rounds=2 correct=1 incorrect=1");
    }
}

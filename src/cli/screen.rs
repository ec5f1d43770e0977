//! Terminal rendering
//!
//! Every game writes plain lines to one shared [`Screen`]. The hat-trick
//! view is also a [`Presenter`], so the phase engine drives it directly.

use std::fmt::Display;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::game::SlotIndex;
use crate::phase::{Phase, PhaseContext, Presenter, SwapStep};

/// Line-oriented output sink.
pub struct Screen {
    out: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen").finish_non_exhaustive()
    }
}

impl Screen {
    /// Creates a screen over any writer.
    #[must_use]
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Writes to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Writes one line and flushes. Write failures are dropped; a closed
    /// terminal surfaces through input instead.
    pub fn line(&self, text: impl Display) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

/// Renders a row of `count` boxes; `mark` puts a symbol inside one of them.
#[must_use]
pub fn render_row(count: usize, mark: Option<(usize, char)>) -> String {
    (0..count)
        .map(|i| match mark {
            Some((at, symbol)) if at == i => format!("[{symbol}]"),
            _ => "[ ]".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders the 1-based labels under a row.
#[must_use]
pub fn render_labels(count: usize) -> String {
    (1..=count)
        .map(|n| format!("{n:^3}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hat-trick board driven by the phase engine.
#[derive(Debug)]
pub struct HatTrickView {
    screen: std::sync::Arc<Screen>,
}

impl HatTrickView {
    /// Draws on `screen`.
    #[must_use]
    pub const fn new(screen: std::sync::Arc<Screen>) -> Self {
        Self { screen }
    }

    fn board(&self, slots: usize, ball: Option<SlotIndex>) {
        self.screen.line(render_row(slots, ball.map(|s| (s.get(), 'o'))));
        self.screen.line(render_labels(slots));
    }
}

impl Presenter for HatTrickView {
    fn on_phase_enter(&self, phase: Phase, context: &PhaseContext) {
        match phase {
            Phase::Idle => {}
            Phase::Revealing => {
                self.screen.line("Watch the ball!");
                self.board(context.slot_count, context.target);
            }
            Phase::Swapping => {
                self.screen.line(format!("Shuffling {} times...", context.swap_count));
            }
            Phase::Guessing => {
                self.board(context.slot_count, None);
                self.screen.line(format!(
                    "Where is the ball? Pick 1-{} (r to restart, q to quit)",
                    context.slot_count
                ));
            }
            Phase::Resolved => {
                if let Some(selection) = context.selection {
                    let message = if selection.verdict.is_correct() {
                        "Correct!".to_owned()
                    } else {
                        context.target.map_or_else(
                            || "Wrong!".to_owned(),
                            |t| format!("Wrong! The ball was under hat {}", t.get() + 1),
                        )
                    };
                    self.screen.line(message);
                }
                self.board(context.slot_count, context.target);
            }
        }
    }

    fn on_swap_step(&self, step: &SwapStep) {
        let (a, b) = (step.swap.first().get(), step.swap.second().get());
        self.screen.line(format!(
            "swap {}/{}: {} <-> {}",
            step.index + 1,
            step.total,
            a + 1,
            b + 1
        ));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::game::{SwapOp, Verdict};
    use crate::phase::Selection;

    /// In-memory sink for capturing screen output in tests.
    #[derive(Clone, Default)]
    pub(crate) struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        pub(crate) fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }

        pub(crate) fn screen(&self) -> Arc<Screen> {
            Arc::new(Screen::new(Box::new(self.clone())))
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn context(target: Option<usize>, selection: Option<Selection>) -> PhaseContext {
        PhaseContext {
            generation: 1,
            slot_count: 3,
            swap_count: 4,
            target: target.map(SlotIndex),
            selection,
        }
    }

    #[test]
    fn row_marks_one_box() {
        assert_eq!(render_row(3, Some((1, 'o'))), "[ ] [o] [ ]");
        assert_eq!(render_row(2, None), "[ ] [ ]");
        assert_eq!(render_labels(3), " 1   2   3 ");
    }

    #[test]
    fn reveal_shows_ball() {
        let capture = Capture::default();
        let view = HatTrickView::new(capture.screen());
        view.on_phase_enter(Phase::Revealing, &context(Some(2), None));
        assert!(capture.text().contains("[ ] [ ] [o]"));
    }

    #[test]
    fn guessing_hides_ball() {
        let capture = Capture::default();
        let view = HatTrickView::new(capture.screen());
        view.on_phase_enter(Phase::Guessing, &context(None, None));
        let text = capture.text();
        assert!(text.contains("[ ] [ ] [ ]"));
        assert!(text.contains("Pick 1-3"));
    }

    #[test]
    fn wrong_pick_names_the_hat() {
        let capture = Capture::default();
        let view = HatTrickView::new(capture.screen());
        let selection = Selection {
            slot: SlotIndex(0),
            verdict: Verdict::Incorrect,
        };
        view.on_phase_enter(Phase::Resolved, &context(Some(1), Some(selection)));
        assert!(capture.text().contains("under hat 2"));
    }

    #[test]
    fn swap_steps_are_one_based() {
        let capture = Capture::default();
        let view = HatTrickView::new(capture.screen());
        view.on_swap_step(&SwapStep {
            generation: 1,
            index: 0,
            total: 4,
            swap: SwapOp::new(SlotIndex(0), SlotIndex(2)).unwrap(),
        });
        assert_eq!(capture.text().trim(), "swap 1/4: 1 <-> 3");
    }
}

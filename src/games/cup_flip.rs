//! Cup-flip puzzle.
//!
//! All cups start face up. Each move selects exactly `flips_per_move` cups
//! and turns them over together; the puzzle is solved when every cup is
//! face down.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::schema::CupFlipConfig;
use crate::observability::metrics;

const GAME: &str = "cup_flip";

/// Result of toggling a cup's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectOutcome {
    /// The cup was added; more are needed before a flip.
    Selected,
    /// The cup was added and the selection is now full.
    Ready,
    /// The cup was already selected and has been removed.
    Deselected,
    /// Out of range, selection already full, or puzzle already solved.
    Ignored,
}

/// Result of flipping the selected cups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlipOutcome {
    /// Cups that were turned over.
    pub flipped: Vec<usize>,
    /// Moves made so far, including this one.
    pub moves: u32,
    /// Whether every cup is now face down.
    pub solved: bool,
}

/// State of one cup-flip game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CupFlip {
    flips_per_move: usize,
    face_down: Vec<bool>,
    selected: Vec<usize>,
    moves: u32,
    solved: bool,
}

impl CupFlip {
    /// Sets up a fresh table.
    #[must_use]
    pub fn new(config: CupFlipConfig) -> Self {
        Self {
            flips_per_move: config.flips_per_move,
            face_down: vec![false; config.cups],
            selected: Vec::with_capacity(config.flips_per_move),
            moves: 0,
            solved: false,
        }
    }

    /// Number of cups on the table.
    #[must_use]
    pub fn cups(&self) -> usize {
        self.face_down.len()
    }

    /// Cups required per move.
    #[must_use]
    pub const fn flips_per_move(&self) -> usize {
        self.flips_per_move
    }

    /// Whether `cup` is face down.
    #[must_use]
    pub fn is_face_down(&self, cup: usize) -> bool {
        self.face_down.get(cup).copied().unwrap_or(false)
    }

    /// Face-down flags, one per cup.
    #[must_use]
    pub fn face_down(&self) -> &[bool] {
        &self.face_down
    }

    /// Currently selected cups, in selection order.
    #[must_use]
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Moves made so far.
    #[must_use]
    pub const fn moves(&self) -> u32 {
        self.moves
    }

    /// Whether every cup is face down.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.solved
    }

    /// Toggles `cup` in the selection.
    pub fn select(&mut self, cup: usize) -> SelectOutcome {
        if self.solved || cup >= self.cups() {
            debug!(cup, solved = self.solved, "cup selection ignored");
            return SelectOutcome::Ignored;
        }

        if let Some(pos) = self.selected.iter().position(|&c| c == cup) {
            self.selected.remove(pos);
            return SelectOutcome::Deselected;
        }

        if self.selected.len() >= self.flips_per_move {
            return SelectOutcome::Ignored;
        }

        self.selected.push(cup);
        if self.selected.len() == self.flips_per_move {
            SelectOutcome::Ready
        } else {
            SelectOutcome::Selected
        }
    }

    /// Flips the selected cups once the selection is full.
    ///
    /// Returns `None` if the selection is not full yet.
    pub fn flip_selected(&mut self) -> Option<FlipOutcome> {
        if self.solved || self.selected.len() != self.flips_per_move {
            return None;
        }

        let flipped = std::mem::take(&mut self.selected);
        for &cup in &flipped {
            self.face_down[cup] = !self.face_down[cup];
        }
        self.moves += 1;
        self.solved = self.face_down.iter().all(|&down| down);
        metrics::record_move(GAME);

        if self.solved {
            info!(moves = self.moves, "cup puzzle solved");
        } else {
            debug!(moves = self.moves, ?flipped, "cups flipped");
        }

        Some(FlipOutcome {
            flipped,
            moves: self.moves,
            solved: self.solved,
        })
    }

    /// Restores the starting table and zeroes the move counter.
    pub fn reset(&mut self) {
        self.face_down.fill(false);
        self.selected.clear();
        self.moves = 0;
        self.solved = false;
        metrics::record_reset(GAME);
    }
}

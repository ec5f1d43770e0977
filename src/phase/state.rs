//! Round state for the hat-trick sequencer
//!
//! A [`Round`] bundles the hidden target, the pregenerated swap sequence,
//! and a commit cursor. The cursor is the only way the target moves, so
//! every swap is applied exactly once and in order.

use rand::Rng;
use serde::Serialize;

use crate::game::Verdict;
use crate::game::slot::{self, SlotIndex, SwapOp};
use crate::game::swap;

/// Stage of a round's lifecycle; gates which inputs are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No round in progress.
    #[default]
    Idle,
    /// The target is being shown.
    Revealing,
    /// Swaps are being played back.
    Swapping,
    /// Waiting for the player's pick.
    Guessing,
    /// The pick has been evaluated.
    Resolved,
}

impl Phase {
    /// Whether the round is still being played back on timers.
    #[must_use]
    pub const fn is_animating(self) -> bool {
        matches!(self, Self::Revealing | Self::Swapping)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Revealing => "revealing",
            Self::Swapping => "swapping",
            Self::Guessing => "guessing",
            Self::Resolved => "resolved",
        };
        f.write_str(name)
    }
}

/// The player's accepted pick and its evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Slot the player picked.
    pub slot: SlotIndex,
    /// Whether it held the target.
    pub verdict: Verdict,
}

/// One play-through: target, swap sequence, and progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Round {
    generation: u64,
    initial_target: SlotIndex,
    target: SlotIndex,
    swaps: Vec<SwapOp>,
    committed: usize,
    selection: Option<Selection>,
}

impl Round {
    /// Creates a round with a given target and swap sequence.
    #[must_use]
    pub fn new(generation: u64, target: SlotIndex, swaps: Vec<SwapOp>) -> Self {
        Self {
            generation,
            initial_target: target,
            target,
            swaps,
            committed: 0,
            selection: None,
        }
    }

    /// Creates a round with a uniformly chosen target and fresh swaps.
    ///
    /// `slot_count` must be non-zero.
    pub fn random<R: Rng + ?Sized>(
        generation: u64,
        slot_count: usize,
        swap_count: usize,
        rng: &mut R,
    ) -> Self {
        let target = SlotIndex(rng.random_range(0..slot_count));
        let swaps = swap::generate(slot_count, swap_count, rng);
        Self::new(generation, target, swaps)
    }

    /// Round counter this round was created under.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Where the target started.
    #[must_use]
    pub const fn initial_target(&self) -> SlotIndex {
        self.initial_target
    }

    /// Where the target is after the swaps committed so far.
    #[must_use]
    pub const fn target(&self) -> SlotIndex {
        self.target
    }

    /// The full swap sequence.
    #[must_use]
    pub fn swaps(&self) -> &[SwapOp] {
        &self.swaps
    }

    /// Number of swaps applied to the target so far.
    #[must_use]
    pub const fn committed(&self) -> usize {
        self.committed
    }

    /// Whether every swap has been applied.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.committed >= self.swaps.len()
    }

    /// The accepted pick, once resolved.
    #[must_use]
    pub const fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// The swap that [`commit_next`](Self::commit_next) would apply.
    #[must_use]
    pub fn next_swap(&self) -> Option<SwapOp> {
        self.swaps.get(self.committed).copied()
    }

    /// Applies the next swap to the target and advances the cursor.
    ///
    /// Returns the applied swap, or `None` once the sequence is exhausted.
    pub fn commit_next(&mut self) -> Option<SwapOp> {
        let swap = self.next_swap()?;
        self.target = slot::apply_swap(self.target, swap);
        self.committed += 1;
        Some(swap)
    }

    pub(crate) const fn record_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }
}

/// Point-in-time view of the engine, for callers and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSnapshot {
    /// Current round counter; bumps on every start and reset.
    pub generation: u64,
    /// Current phase.
    pub phase: Phase,
    /// The live round, if any.
    pub round: Option<Round>,
}

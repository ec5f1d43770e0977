//! Presentation seam
//!
//! The sequencer never renders anything itself. It tells a [`Presenter`]
//! which phase was entered and which slots are being exchanged; the
//! presenter decides what that looks or sounds like. Notifications are
//! fire-and-forget.

use std::sync::Arc;

use serde::Serialize;

use crate::game::slot::{SlotIndex, SwapOp};

use super::state::{Phase, Selection};

/// What a presenter may know on entering a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseContext {
    /// Round counter the notification belongs to.
    pub generation: u64,
    /// Number of slots in play.
    pub slot_count: usize,
    /// Number of swaps in this round.
    pub swap_count: usize,
    /// Target position, only while it is meant to be visible
    /// (revealing and resolved).
    pub target: Option<SlotIndex>,
    /// The accepted pick, once resolved.
    pub selection: Option<Selection>,
}

/// One exchange about to be played back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapStep {
    /// Round counter the step belongs to.
    pub generation: u64,
    /// Zero-based position in the swap sequence.
    pub index: usize,
    /// Length of the swap sequence.
    pub total: usize,
    /// The two slots being exchanged.
    pub swap: SwapOp,
}

/// Receives sequencer notifications.
///
/// Called while the engine's round state is locked, so implementations
/// must not call back into the engine.
pub trait Presenter: Send + Sync {
    /// A phase was entered.
    fn on_phase_enter(&self, phase: Phase, context: &PhaseContext);

    /// Two slots are about to be exchanged.
    fn on_swap_step(&self, step: &SwapStep);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {
    fn on_phase_enter(&self, _phase: Phase, _context: &PhaseContext) {}

    fn on_swap_step(&self, _step: &SwapStep) {}
}

/// Forwards every notification to each inner presenter, in order.
#[derive(Default, Clone)]
pub struct FanoutPresenter {
    targets: Vec<Arc<dyn Presenter>>,
}

impl FanoutPresenter {
    /// Creates an empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a presenter to the fan-out.
    #[must_use]
    pub fn with(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.targets.push(presenter);
        self
    }

    /// Number of inner presenters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether there are no inner presenters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl std::fmt::Debug for FanoutPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutPresenter")
            .field("targets", &self.targets.len())
            .finish()
    }
}

impl Presenter for FanoutPresenter {
    fn on_phase_enter(&self, phase: Phase, context: &PhaseContext) {
        for target in &self.targets {
            target.on_phase_enter(phase, context);
        }
    }

    fn on_swap_step(&self, step: &SwapStep) {
        for target in &self.targets {
            target.on_swap_step(step);
        }
    }
}

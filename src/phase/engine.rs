//! Phase engine orchestration
//!
//! The `PhaseEngine` owns the single live hat-trick round and moves it
//! through idle → revealing → swapping → guessing → resolved. Timed steps
//! run in one sequencer task per round, awaiting each delay in turn, so a
//! swap's highlight, animation, commit, and pause can never interleave with
//! the next swap.
//!
//! Resets cancel the round's token and bump the generation counter before
//! anything new is scheduled. A step that already passed its await re-checks
//! the generation under the lock and drops itself if its round is gone.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::schema::HatTrickConfig;
use crate::game::{self, SlotIndex, Verdict};
use crate::observability::metrics;

use super::presenter::{PhaseContext, Presenter, SwapStep};
use super::state::{Phase, Round, RoundSnapshot, Selection};
use super::timer;

/// Label used for this game in metrics.
const GAME: &str = "hat_trick";

/// Latest phase published by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseUpdate {
    /// Round counter at the time of the transition.
    pub generation: u64,
    /// Phase that was entered.
    pub phase: Phase,
}

/// Hat-trick round sequencer.
///
/// Callers may only request a round start, a slot selection, or a reset;
/// the round's phase and target are never exposed for mutation.
pub struct PhaseEngine {
    inner: Arc<Inner>,
}

struct Inner {
    config: HatTrickConfig,
    presenter: Arc<dyn Presenter>,
    /// Parent of every round token; cancelled on shutdown
    shutdown: CancellationToken,
    state: Mutex<EngineState>,
    updates: watch::Sender<PhaseUpdate>,
}

struct EngineState {
    generation: u64,
    phase: Phase,
    round: Option<Round>,
    rng: StdRng,
    /// Token of the running sequencer, if any
    pending: Option<CancellationToken>,
}

impl PhaseEngine {
    /// Creates an engine seeded from the operating system.
    #[must_use]
    pub fn new(config: HatTrickConfig, presenter: Arc<dyn Presenter>) -> Self {
        Self::build(config, presenter, StdRng::from_os_rng())
    }

    /// Creates an engine whose rounds are reproducible from `seed`.
    #[must_use]
    pub fn with_seed(config: HatTrickConfig, presenter: Arc<dyn Presenter>, seed: u64) -> Self {
        Self::build(config, presenter, StdRng::seed_from_u64(seed))
    }

    fn build(config: HatTrickConfig, presenter: Arc<dyn Presenter>, rng: StdRng) -> Self {
        if config.slots < 2 {
            warn!(
                slots = config.slots,
                "fewer than two slots configured; rounds will have no swaps"
            );
        }

        let (updates, _) = watch::channel(PhaseUpdate {
            generation: 0,
            phase: Phase::Idle,
        });

        Self {
            inner: Arc::new(Inner {
                config,
                presenter,
                shutdown: CancellationToken::new(),
                state: Mutex::new(EngineState {
                    generation: 0,
                    phase: Phase::Idle,
                    round: None,
                    rng,
                    pending: None,
                }),
                updates,
            }),
        }
    }

    /// Returns the engine's settings.
    #[must_use]
    pub fn config(&self) -> &HatTrickConfig {
        &self.inner.config
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    /// Returns the current round counter.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        let state = self.inner.lock();
        RoundSnapshot {
            generation: state.generation,
            phase: state.phase,
            round: state.round.clone(),
        }
    }

    /// Subscribes to phase transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PhaseUpdate> {
        self.inner.updates.subscribe()
    }

    /// Waits until round `generation` enters `phase`.
    ///
    /// Returns `false` if the round is discarded first or the engine is
    /// dropped.
    pub async fn wait_for(&self, generation: u64, phase: Phase) -> bool {
        let mut rx = self.subscribe();
        rx.wait_for(|u| u.generation != generation || u.phase == phase)
            .await
            .is_ok_and(|u| u.generation == generation && u.phase == phase)
    }

    /// Starts a new round: picks a target, generates the swaps, enters
    /// revealing, and schedules the timed playback.
    ///
    /// Ignored unless the engine is idle. Returns the new round's
    /// generation when a round was started.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start_round(&self) -> Option<u64> {
        let inner = &self.inner;
        if inner.shutdown.is_cancelled() {
            debug!("start ignored; engine shut down");
            return None;
        }
        if inner.config.slots == 0 {
            warn!("no slots configured; cannot start a round");
            return None;
        }

        let mut guard = inner.lock();
        let state = &mut *guard;
        if state.phase != Phase::Idle {
            debug!(phase = %state.phase, "start ignored; round in progress");
            return None;
        }

        state.generation += 1;
        let generation = state.generation;
        let round = Round::random(
            generation,
            inner.config.slots,
            inner.config.swaps,
            &mut state.rng,
        );
        debug!(
            generation,
            target = %round.initial_target(),
            swaps = round.swaps().len(),
            "round generated"
        );
        state.round = Some(round);

        let token = inner.shutdown.child_token();
        state.pending = Some(token.clone());
        inner.enter(state, Phase::Revealing);
        drop(guard);

        metrics::record_round_started(GAME);
        tokio::spawn(run_round(Arc::clone(inner), generation, token));
        Some(generation)
    }

    /// Submits the player's pick.
    ///
    /// Accepted only while guessing and only for a slot in range; anything
    /// else is ignored and returns `None`. The first accepted pick resolves
    /// the round.
    pub fn select(&self, slot: SlotIndex) -> Option<Verdict> {
        let inner = &self.inner;
        let mut guard = inner.lock();
        let state = &mut *guard;

        if state.phase != Phase::Guessing {
            debug!(phase = %state.phase, %slot, "selection ignored outside guessing");
            return None;
        }
        if slot.get() >= inner.config.slots {
            debug!(%slot, slots = inner.config.slots, "selection out of range ignored");
            return None;
        }

        let round = state.round.as_mut()?;
        let verdict = game::evaluate(slot, round.target());
        round.record_selection(Selection { slot, verdict });
        info!(generation = state.generation, %slot, %verdict, "selection resolved");
        inner.enter(state, Phase::Resolved);
        drop(guard);

        metrics::record_verdict(GAME, verdict);
        Some(verdict)
    }

    /// Discards the current round and returns to idle.
    ///
    /// Valid from any phase. Pending timed steps are cancelled and the
    /// generation is bumped before returning, so nothing scheduled for the
    /// discarded round can touch the next one.
    pub fn request_reset(&self) {
        let inner = &self.inner;
        let mut guard = inner.lock();
        let state = &mut *guard;

        if state.phase == Phase::Idle && state.round.is_none() {
            debug!("reset ignored; already idle");
            return;
        }

        if let Some(token) = state.pending.take() {
            token.cancel();
        }
        let discarded = state.phase;
        state.generation += 1;
        state.round = None;
        inner.enter(state, Phase::Idle);
        drop(guard);

        debug!(from = %discarded, "round discarded");
        metrics::record_reset(GAME);
    }

    /// Cancels any running sequencer; later starts are ignored.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }
}

impl Drop for PhaseEngine {
    fn drop(&mut self) {
        self.inner.shutdown.cancel();
    }
}

impl std::fmt::Debug for PhaseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("PhaseEngine")
            .field("slots", &self.inner.config.slots)
            .field("generation", &state.generation)
            .field("phase", &state.phase)
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves to `phase`, publishes it, and notifies the presenter.
    fn enter(&self, state: &mut EngineState, phase: Phase) {
        let from = state.phase;
        state.phase = phase;
        info!(generation = state.generation, %from, to = %phase, "phase transition");

        self.updates.send_replace(PhaseUpdate {
            generation: state.generation,
            phase,
        });
        let context = self.context(state, phase);
        self.presenter.on_phase_enter(phase, &context);
    }

    /// Builds the presenter context; the target is only included in
    /// phases where it is meant to be seen.
    fn context(&self, state: &EngineState, phase: Phase) -> PhaseContext {
        let round = state.round.as_ref();
        let visible = matches!(phase, Phase::Revealing | Phase::Resolved);
        PhaseContext {
            generation: state.generation,
            slot_count: self.config.slots,
            swap_count: round.map_or(0, |r| r.swaps().len()),
            target: round.filter(|_| visible).map(Round::target),
            selection: round.and_then(Round::selection),
        }
    }

    /// Runs `f` only if `generation` is still the live round.
    fn with_live<R>(
        &self,
        generation: u64,
        f: impl FnOnce(&mut EngineState) -> Option<R>,
    ) -> Option<R> {
        let mut state = self.lock();
        if state.generation != generation {
            debug!(
                stale = generation,
                live = state.generation,
                "dropping step for discarded round"
            );
            return None;
        }
        f(&mut *state)
    }
}

/// Plays back one round: reveal delay, then each swap in order, then
/// guessing. Returns early on cancellation or staleness.
async fn run_round(inner: Arc<Inner>, generation: u64, token: CancellationToken) {
    let timings = inner.config.timings;

    if !timer::pause(&token, timings.reveal).await {
        return;
    }

    let Some(total) = inner.with_live(generation, |state| {
        inner.enter(state, Phase::Swapping);
        state.round.as_ref().map(|r| r.swaps().len())
    }) else {
        return;
    };

    for index in 0..total {
        let announced = inner.with_live(generation, |state| {
            let swap = state.round.as_ref()?.next_swap()?;
            inner.presenter.on_swap_step(&SwapStep {
                generation,
                index,
                total,
                swap,
            });
            Some(swap)
        });
        let Some(swap) = announced else {
            return;
        };
        debug!(generation, index, %swap, "swap highlighted");

        if !timer::pause(&token, timings.highlight).await {
            return;
        }
        if !timer::pause(&token, timings.swap).await {
            return;
        }

        let committed = inner.with_live(generation, |state| state.round.as_mut()?.commit_next());
        if committed.is_none() {
            return;
        }
        metrics::record_swap_committed();

        if !timer::pause(&token, timings.pause).await {
            return;
        }
    }

    inner.with_live(generation, |state| {
        state.pending = None;
        inner.enter(state, Phase::Guessing);
        Some(())
    });
}

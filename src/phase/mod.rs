//! Phase engine
//!
//! Sequences a hat-trick round through its phases with timed, cancellable
//! transitions and input gating.
//!
//! # Architecture
//!
//! - [`Round`] — target, swap sequence, and commit cursor for one play-through
//! - [`PhaseEngine`] — orchestrator (round start, selection, reset, playback)
//! - [`Presenter`] — notification seam for whatever renders the game
//! - [`timer`] — cancellable delays

pub mod engine;
pub mod presenter;
pub mod state;
pub mod timer;

pub use engine::{PhaseEngine, PhaseUpdate};
pub use presenter::{FanoutPresenter, NoopPresenter, PhaseContext, Presenter, SwapStep};
pub use state::{Phase, Round, RoundSnapshot, Selection};

//! Pure game rules shared by the round sequencer.
//!
//! - [`slot`]: slot indices, swaps, and target tracking
//! - [`swap`]: random swap sequence generation
//! - [`outcome`]: guess evaluation

pub mod outcome;
pub mod slot;
pub mod swap;

pub use outcome::{Verdict, evaluate};
pub use slot::{SlotIndex, SwapOp, apply_swap, track};

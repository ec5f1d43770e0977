//! The two move-based games that need no timed sequencing of their own.
//!
//! Hat-trick lives in [`crate::phase`]; these games are plain state
//! machines that the terminal front end paces.

pub mod cup_flip;
pub mod find_character;

pub use cup_flip::{CupFlip, FlipOutcome, SelectOutcome};
pub use find_character::{DoorOutcome, FindCharacter, Stage};

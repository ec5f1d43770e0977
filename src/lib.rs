//! `parlor` - memory and guessing mini-games
//!
//! The game cores are plain state machines; hat-trick adds a timed phase
//! engine that plays back each round and gates input to the right phase.
//! A terminal front end and a JSONL event stream sit behind the
//! [`phase::Presenter`] seam.

pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod games;
pub mod observability;
pub mod phase;

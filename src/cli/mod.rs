//! Command-line interface
//!
//! Argument parsing, terminal input and rendering, and one handler per
//! command.

pub mod args;
pub mod commands;
pub mod input;
pub mod screen;

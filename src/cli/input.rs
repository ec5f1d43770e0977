//! Player input
//!
//! Reads commands line by line. Slots, cups and doors are numbered from 1
//! on the command line and converted to zero-based indices here.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::error::{InputError, ParlorError};

/// One player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick a slot, cup, or door (zero-based).
    Pick(usize),
    /// Abandon the current round.
    Reset,
    /// Leave the game.
    Quit,
}

/// Parses one input line into commands.
///
/// Tokens are separated by whitespace or commas. Numbers are 1-based.
///
/// # Errors
///
/// Returns [`InputError::Invalid`] for the first token that is not a
/// positive number or a known keyword.
pub fn parse_line(line: &str) -> Result<Vec<Command>, InputError> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(parse_token)
        .collect()
}

fn parse_token(token: &str) -> Result<Command, InputError> {
    match token.to_ascii_lowercase().as_str() {
        "r" | "reset" => Ok(Command::Reset),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        other => match other.parse::<usize>() {
            Ok(0) => Err(InputError::Invalid {
                input: token.to_owned(),
                reason: "numbering starts at 1".to_owned(),
            }),
            Ok(n) => Ok(Command::Pick(n - 1)),
            Err(_) => Err(InputError::Invalid {
                input: token.to_owned(),
                reason: "expected a number, 'r' or 'q'".to_owned(),
            }),
        },
    }
}

/// Line reader over any buffered async source.
pub struct InputReader {
    lines: Lines<Box<dyn AsyncBufRead + Unpin + Send>>,
}

impl std::fmt::Debug for InputReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputReader").finish_non_exhaustive()
    }
}

impl InputReader {
    /// Wraps a buffered reader.
    #[must_use]
    pub fn new(reader: impl AsyncBufRead + Unpin + Send + 'static) -> Self {
        let boxed: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(reader);
        Self {
            lines: boxed.lines(),
        }
    }

    /// Reads from the process's standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }

    /// Waits for the next line. Returns `None` once input is closed.
    ///
    /// Cancel safe.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading fails.
    pub async fn next_line(&mut self) -> Result<Option<String>, ParlorError> {
        Ok(self.lines.next_line().await?)
    }
}

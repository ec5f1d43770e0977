//! Shared integration-test harness for running the `parlor` binary as a
//! child process.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Upper bound for one game session to finish.
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(20);

/// Helpers for invoking the `parlor` binary.
pub struct ParlorProcess;

impl ParlorProcess {
    fn bin() -> &'static str {
        env!("CARGO_BIN_EXE_parlor")
    }

    /// Runs a command to completion with no input.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        std::process::Command::new(Self::bin())
            .args(args)
            .env_remove("PARLOR_CONFIG")
            .env_remove("PARLOR_SEED")
            .stdin(Stdio::null())
            .output()
            .expect("failed to run parlor")
    }

    /// Runs a game, feeds `input` on stdin, and waits for it to exit.
    ///
    /// Panics if the process does not exit within [`SESSION_TIMEOUT`].
    #[allow(clippy::missing_panics_doc)]
    pub async fn play(args: &[&str], input: &str) -> Output {
        let mut child = Command::new(Self::bin())
            .args(args)
            .arg("--quiet")
            .env_remove("PARLOR_CONFIG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to spawn parlor");

        let mut stdin = child.stdin.take().expect("stdin not captured");
        stdin
            .write_all(input.as_bytes())
            .await
            .expect("failed to write to stdin");
        drop(stdin);

        tokio::time::timeout(SESSION_TIMEOUT, child.wait_with_output())
            .await
            .expect("timed out waiting for parlor to exit")
            .expect("failed to collect parlor output")
    }

    /// Path of a file under `tests/fixtures`.
    #[must_use]
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }
}

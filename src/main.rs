//! `parlor` - memory and guessing mini-games for the terminal

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use clap::Parser;
use tokio_util::sync::CancellationToken;

use parlor::cli::args::{Cli, OutputFormat};
use parlor::cli::commands;
use parlor::error::ExitCode;
use parlor::observability::{LogFormat, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        let format = match cli.log_format {
            OutputFormat::Human => LogFormat::Human,
            OutputFormat::Json => LogFormat::Json,
        };
        init_logging(format, cli.verbose, cli.color);
    }

    let cancel = CancellationToken::new();
    let signalled = Arc::new(AtomicI32::new(ExitCode::SUCCESS));
    tokio::spawn(watch_signals(cancel.clone(), Arc::clone(&signalled)));

    let result = commands::dispatch(cli, cancel).await;

    match result {
        Ok(()) => std::process::exit(signalled.load(Ordering::SeqCst)),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

/// First signal cancels the session; a second one exits immediately.
async fn watch_signals(cancel: CancellationToken, signalled: Arc<AtomicI32>) {
    let code = next_signal().await;
    signalled.store(code, Ordering::SeqCst);
    cancel.cancel();

    eprintln!("\nShutting down... (press Ctrl+C again to force)");
    std::process::exit(next_signal().await);
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn next_signal() -> i32 {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => tokio::select! {
            () = ctrl_c() => ExitCode::INTERRUPTED,
            _ = sigterm.recv() => ExitCode::TERMINATED,
        },
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable");
            ctrl_c().await;
            ExitCode::INTERRUPTED
        }
    }
}

#[cfg(not(unix))]
async fn next_signal() -> i32 {
    ctrl_c().await;
    ExitCode::INTERRUPTED
}

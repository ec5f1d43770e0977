//! Cancellable delays for timed phase steps.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Waits for `duration` unless `token` is cancelled first.
///
/// Returns `true` if the full delay elapsed, `false` if cancelled.
/// Cancellation wins when both are ready.
pub async fn pause(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        biased;
        () = token.cancelled() => false,
        () = tokio::time::sleep(duration) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn elapses_without_cancel() {
        let token = CancellationToken::new();
        let start = tokio::time::Instant::now();
        assert!(pause(&token, Duration::from_millis(500)).await);
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts() {
        let token = CancellationToken::new();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { pause(&token, Duration::from_secs(60)).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
        assert!(!waiter.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn already_cancelled_returns_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(!pause(&token, Duration::ZERO).await);
    }
}

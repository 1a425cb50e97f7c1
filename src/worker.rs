use std::time::Duration;

use tokio::sync::watch;

use crate::deletion::processor;
use crate::state::SharedState;

/// Spawn the optional internal scheduler: one processing pass every
/// `pass_interval_secs`. Returns None when the interval is 0 (an external
/// scheduler is expected to POST /api/v1/deletions/process instead).
/// Overlapping ticks are harmless; the batch claim is atomic.
pub fn spawn_ticker(
    state: SharedState,
    mut shutdown: watch::Receiver<bool>,
) -> Option<tokio::task::JoinHandle<()>> {
    let secs = state.config.pass_interval_secs;
    if secs == 0 {
        return None;
    }

    Some(tokio::spawn(async move {
        tracing::info!("Deletion pass ticker started ({secs}s interval)");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                _ = shutdown.changed() => {}
            }

            if *shutdown.borrow() {
                break;
            }

            match processor::run_pass(&state).await {
                Ok(summary) if summary.processed > 0 => {
                    tracing::info!("Scheduled pass processed {} job(s)", summary.processed);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("Scheduled pass failed: {e}");
                }
            }
        }

        tracing::info!("Deletion pass ticker stopped");
    }))
}

/// Periodically drop stale rate-limiter windows so the map stays bounded.
pub fn spawn_limiter_cleanup(
    state: SharedState,
    mut shutdown: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(600)) => {}
                _ = shutdown.changed() => {}
            }

            if *shutdown.borrow() {
                break;
            }

            state.event_limiter.cleanup(Duration::from_secs(3600));
        }
    })
}

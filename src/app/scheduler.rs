//! Cancellable periodic task scheduling.
//!
//! The loop runs its action to completion, then sleeps for the interval:
//! the next tick can never start before the previous one has finished, so
//! at most one action instance is ever in flight. Cancellation is
//! cooperative and observed between ticks; an action already running when
//! shutdown is signalled finishes its tick first.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::Result;

/// Handle to a running periodic task.
pub struct PeriodicTask {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Signal shutdown and wait for the loop to exit.
    ///
    /// Resolves before the next wake-up; an in-flight tick completes.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.handle.await;
    }
}

/// Spawn a loop that runs `action`, awaits its completion, then sleeps for
/// `interval`, until shutdown. An error from `action` is logged and the
/// loop continues to the next tick.
pub fn spawn_periodic<A, Fut>(name: &'static str, interval: Duration, mut action: A) -> PeriodicTask
where
    A: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<()>> + Send,
{
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    let handle = tokio::spawn(async move {
        info!(task = name, interval_secs = interval.as_secs(), "Periodic task started");
        loop {
            if let Err(e) = action().await {
                warn!(task = name, error = %e, "Periodic action failed");
            }
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!(task = name, "Periodic task shutting down");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    });

    PeriodicTask {
        shutdown_tx,
        handle,
    }
}

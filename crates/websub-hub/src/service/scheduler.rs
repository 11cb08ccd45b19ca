//! Periodic background tasks with explicit shutdown handles.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

/// Handle to a task started by [`spawn_periodic`].
pub struct TaskHandle {
    name: &'static str,
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop scheduling new runs and wait for a run in progress to finish.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.join.await {
            error!(task = self.name, error = %e, "Periodic task failed");
        }
    }
}

/// Run `job` every `period`, first one period after the call.
///
/// Missed ticks are skipped rather than bunched up. A shutdown signal is only
/// observed between runs, so a run in progress always completes, and no run
/// starts once the signal is set.
pub fn spawn_periodic<F, Fut>(name: &'static str, period: Duration, mut job: F) -> TaskHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let join = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!(task = name, period_ms = period.as_millis() as u64, "Periodic task started");

        loop {
            // Shutdown wins over a tick that became ready during a long run.
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    info!(task = name, "Shutdown signal received");
                    break;
                }
                _ = ticker.tick() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                    job().await;
                }
            }
        }
    });

    TaskHandle {
        name,
        shutdown_tx,
        join,
    }
}

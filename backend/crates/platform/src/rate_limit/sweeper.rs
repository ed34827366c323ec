//! Background sweep of idle keys
//!
//! Per-call pruning only touches the key being checked; keys seen once
//! (an IP that never returns) would otherwise stay in memory forever.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::clock::Clock;
use super::store::RateLimitStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    /// How often the sweep runs
    pub interval: Duration,
    /// Keys whose newest record is older than this are dropped
    pub max_age: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5 * 60),
            max_age: Duration::from_secs(60 * 60),
        }
    }
}

/// Run one sweep pass and return the number of keys removed
pub fn sweep_once(store: &dyn RateLimitStore, clock: &dyn Clock, max_age: Duration) -> usize {
    let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
    let cutoff_ms = clock.now_ms().saturating_sub(max_age_ms);
    let removed = store.sweep_expired(cutoff_ms);
    if removed > 0 {
        tracing::debug!(removed, remaining = store.len(), "Swept idle rate limit keys");
    }
    removed
}

/// Handle to the running sweep task
#[derive(Debug)]
pub struct SweepHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Stop the sweep and wait for the task to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Rate limit sweep task ended abnormally");
        }
    }
}

/// Start the periodic sweep on the current tokio runtime
///
/// The first pass runs one `interval` after startup. Dropping the handle
/// also stops the task.
pub fn spawn_sweeper(
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
    config: SweepConfig,
) -> SweepHandle {
    let (shutdown, mut shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        let start = tokio::time::Instant::now() + config.interval;
        let mut ticker = tokio::time::interval_at(start, config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            interval_secs = config.interval.as_secs(),
            max_age_secs = config.max_age.as_secs(),
            "Rate limit sweep started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {
                    sweep_once(store.as_ref(), clock.as_ref(), config.max_age);
                }
            }
        }

        tracing::info!("Rate limit sweep stopped");
    });

    SweepHandle { shutdown, task }
}

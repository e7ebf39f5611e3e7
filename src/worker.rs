// Background sampler: one pass per tick, health-cache sweep on its own tick, stops on shutdown.

use crate::service::{DiskStatsService, HEALTH_CACHE_CLEANUP_INTERVAL, SAMPLE_INTERVAL};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::{Duration, interval};
use tracing::instrument;

/// Worker timing. The sweep runs on real time, independent of the sample interval.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub sample_interval: Duration,
    pub cleanup_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            sample_interval: SAMPLE_INTERVAL,
            cleanup_interval: HEALTH_CACHE_CLEANUP_INTERVAL,
        }
    }
}

/// Spawns the sampler. The first pass runs immediately and only seeds counters,
/// so the first snapshot has no per-disk rates.
pub fn spawn(
    service: Arc<DiskStatsService>,
    config: WorkerConfig,
    shutdown_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        run(service, config, shutdown_rx).await;
    })
}

#[instrument(
    name = "worker",
    skip_all,
    fields(sample_interval_ms = config.sample_interval.as_millis() as u64)
)]
async fn run(
    service: Arc<DiskStatsService>,
    config: WorkerConfig,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut tick = interval(config.sample_interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut cleanup_tick = interval(config.cleanup_interval);
    cleanup_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // interval() fires at once; nothing can have expired yet.
    cleanup_tick.tick().await;

    let mut passes_failed_total: u64 = 0;

    loop {
        // Shutdown is only observed between passes; a running pass always completes.
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => {
                tracing::debug!("Worker shutting down");
                break;
            }
            _ = tick.tick() => {
                if let Err(e) = service.update_disk_stats().await {
                    passes_failed_total += 1;
                    tracing::warn!(
                        error = %e,
                        operation = "update_disk_stats",
                        passes_failed_total,
                        "Failed to update disk stats"
                    );
                }
            }
            _ = cleanup_tick.tick() => {
                if let Some(cache) = service.health_cache() {
                    let removed = cache.purge_expired();
                    tracing::debug!(
                        operation = "purge_health_cache",
                        removed,
                        remaining = cache.len(),
                        "Health cache swept"
                    );
                }
            }
        }
    }
}

// Error taxonomy for the sampling engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiskStatsError {
    /// No pass has completed since startup; retry later.
    #[error("disk stats not initialized")]
    NotInitialized,

    #[error("volume inventory failed: {0:#}")]
    Inventory(anyhow::Error),

    #[error("counter read failed for {device}: {error:#}")]
    CounterRead {
        device: String,
        error: anyhow::Error,
    },

    #[error("health query failed for {device}: {error:#}")]
    HealthQuery {
        device: String,
        error: anyhow::Error,
    },

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl DiskStatsError {
    /// True for errors a caller should simply retry after the next tick.
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Self::NotInitialized)
    }
}

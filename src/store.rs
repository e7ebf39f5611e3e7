// Current snapshot plus previous-sample table behind one exclusive lock.
// The sampling pass holds the lock while it builds the next snapshot, so a
// reader sees either the old snapshot or the new one, never a half-built one.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::error::DiskStatsError;
use crate::models::{DeviceSample, DiskHealthSnapshot};

#[derive(Debug, Default)]
pub struct StoreState {
    snapshot: Option<Arc<DiskHealthSnapshot>>,
    samples: HashMap<String, DeviceSample>,
}

impl StoreState {
    /// Most recent sample for a disk id, if one was recorded by a successful pass.
    pub fn previous_sample(&self, disk_id: &str) -> Option<&DeviceSample> {
        self.samples.get(disk_id)
    }

    /// Replaces the visible snapshot and the sample table as whole values.
    pub fn publish(&mut self, snapshot: DiskHealthSnapshot, samples: HashMap<String, DeviceSample>) {
        self.snapshot = Some(Arc::new(snapshot));
        self.samples = samples;
    }

    pub fn current(&self) -> Option<Arc<DiskHealthSnapshot>> {
        self.snapshot.clone()
    }
}

#[derive(Debug, Default)]
pub struct SnapshotStore {
    state: Mutex<StoreState>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access for one sampling pass.
    pub async fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().await
    }

    pub async fn query(&self) -> Result<Arc<DiskHealthSnapshot>, DiskStatsError> {
        self.state
            .lock()
            .await
            .current()
            .ok_or(DiskStatsError::NotInitialized)
    }
}

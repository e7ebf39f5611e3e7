// Disk stats service: one aggregation pass over the inventory, and the query accessor.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, trace, warn};

use crate::error::DiskStatsError;
use crate::health_cache::HealthCache;
use crate::models::{DiskHealthSnapshot, GlobalRate, HealthAttributes, PerDiskInfo, PerDiskRate};
use crate::rates;
use crate::sources::{CounterSource, HealthSource, VolumeInventory};
use crate::store::SnapshotStore;

/// How often the sampler runs a pass.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(10);
/// How long SMART attributes are served without touching the drive.
pub const HEALTH_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
/// How often expired cache entries are swept.
pub const HEALTH_CACHE_CLEANUP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Collaborators the service reads from.
pub struct ServiceDeps {
    pub inventory: Arc<dyn VolumeInventory>,
    pub counters: Arc<dyn CounterSource>,
    /// `None` disables SMART lookups entirely.
    pub health: Option<Arc<dyn HealthSource>>,
}

pub struct DiskStatsService {
    inventory: Arc<dyn VolumeInventory>,
    counters: Arc<dyn CounterSource>,
    health_cache: Option<HealthCache>,
    store: SnapshotStore,
}

impl DiskStatsService {
    pub fn new(deps: ServiceDeps) -> Self {
        Self::with_health_ttl(deps, HEALTH_CACHE_TTL)
    }

    pub fn with_health_ttl(deps: ServiceDeps, ttl: Duration) -> Self {
        let ServiceDeps {
            inventory,
            counters,
            health,
        } = deps;
        Self {
            inventory,
            counters,
            health_cache: health.map(|source| HealthCache::new(source, ttl)),
            store: SnapshotStore::new(),
        }
    }

    /// Latest published snapshot, or `NotInitialized` before the first successful pass.
    pub async fn get_disk_stats(&self) -> Result<Arc<DiskHealthSnapshot>, DiskStatsError> {
        self.store.query().await
    }

    pub fn health_cache(&self) -> Option<&HealthCache> {
        self.health_cache.as_ref()
    }

    /// Forgets cached SMART data for one device path, or for all devices.
    pub fn invalidate_health_cache(&self, device_path: Option<&str>) {
        if let Some(cache) = &self.health_cache {
            cache.invalidate(device_path);
        }
    }

    /// Runs one sampling pass and publishes its snapshot.
    /// On error nothing is published and the previous snapshot stays visible.
    #[instrument(skip(self), fields(operation = "update_disk_stats"))]
    pub async fn update_disk_stats(&self) -> Result<(), DiskStatsError> {
        let mut state = self.store.lock().await;

        let inventory = self.inventory.clone();
        let disks = tokio::task::spawn_blocking(move || inventory.list_devices())
            .await?
            .map_err(DiskStatsError::Inventory)?;

        let mut per_disk_io = Vec::new();
        let mut global = GlobalRate::default();
        let mut per_partition_info = BTreeMap::new();
        let mut per_disk_info = BTreeMap::new();
        let mut samples = HashMap::with_capacity(disks.len());

        for disk in disks {
            let Some(device_path) = disk.device_path.as_deref() else {
                debug!(disk = %disk.id, "skipping disk without device path");
                continue;
            };

            let counters = self.counters.clone();
            let device_name = disk.device_name.clone();
            let current = tokio::task::spawn_blocking(move || counters.read_counters(&device_name))
                .await?
                .map_err(|error| DiskStatsError::CounterRead {
                    device: disk.device_name.clone(),
                    error,
                })?;
            let Some(current) = current else {
                trace!(device = %disk.device_name, "device not found in sysfs, skipping");
                continue;
            };

            let health = self.lookup_health(&disk.id, device_path).await;

            if let Some(previous) = state.previous_sample(&disk.id) {
                let dt = rates::elapsed_secs(previous, &current);
                let r = rates::compute_rates(previous, &current, dt);
                let rate = PerDiskRate {
                    device_name: disk.device_name.clone(),
                    device_description: disk.id.clone(),
                    read_iops: r.read_iops,
                    write_iops: r.write_iops,
                    read_latency_ms: r.read_latency_ms,
                    write_latency_ms: r.write_latency_ms,
                    health: health.clone(),
                };
                global.accumulate(&rate);
                per_disk_io.push(rate);
            }
            per_disk_info.insert(
                disk.id.clone(),
                PerDiskInfo {
                    device_path: device_path.to_string(),
                    health,
                },
            );
            samples.insert(disk.id.clone(), current);

            if !disk.partitions.is_empty() {
                let partitions: Vec<_> = disk.partitions.iter().map(rates::partition_info).collect();
                per_partition_info.insert(disk.id.clone(), partitions);
            }
        }

        let snapshot = DiskHealthSnapshot {
            timestamp: now_millis(),
            per_disk_io,
            global,
            per_partition_info,
            per_disk_info,
        };
        debug!(
            disks = snapshot.per_disk_io.len(),
            total_iops = snapshot.global.total_iops,
            "disk stats published"
        );
        state.publish(snapshot, samples);
        Ok(())
    }

    /// Cached SMART attributes for one disk; a failed query is logged and yields `None`.
    async fn lookup_health(&self, disk_id: &str, device_path: &str) -> Option<HealthAttributes> {
        let cache = self.health_cache.as_ref()?;
        match cache.get(device_path).await {
            Ok(health) => Some(health),
            Err(e) => {
                warn!(
                    error = %e,
                    disk = disk_id,
                    operation = "health_query",
                    "Error getting SMART status"
                );
                None
            }
        }
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}

// TTL cache in front of the SMART health source.
// Hits are served from a shared read lock; misses for the same device collapse
// into a single query behind a per-device async mutex. A drive that reports SMART
// switched off keeps its entry until invalidated, so it is not queried again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use tracing::{debug, instrument, trace};

use crate::error::DiskStatsError;
use crate::models::HealthAttributes;
use crate::sources::HealthSource;

#[derive(Debug, Clone)]
struct HealthCacheEntry {
    value: HealthAttributes,
    /// `None` pins the entry until it is invalidated.
    expires_at: Option<Instant>,
}

impl HealthCacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

pub struct HealthCache {
    source: Arc<dyn HealthSource>,
    ttl: Duration,
    entries: RwLock<HashMap<String, HealthCacheEntry>>,
    /// One lock per device path with a miss in progress (or recently so).
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl HealthCache {
    pub fn new(source: Arc<dyn HealthSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, device_path: &str) -> Option<HealthAttributes> {
        let now = Instant::now();
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(device_path)
            .filter(|e| e.is_fresh(now))
            .map(|e| e.value.clone())
    }

    fn device_lock(&self, device_path: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight
            .entry(device_path.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Returns cached attributes while fresh, otherwise queries the source once.
    /// Failures are not cached. Entries for drives with SMART switched off never expire.
    #[instrument(skip(self), fields(operation = "health_cache_get"))]
    pub async fn get(&self, device_path: &str) -> Result<HealthAttributes, DiskStatsError> {
        if let Some(value) = self.lookup(device_path) {
            trace!(device = device_path, "health cache hit");
            return Ok(value);
        }

        let lock = self.device_lock(device_path);
        let _guard = lock.lock().await;

        // Another caller may have filled the entry while we waited.
        if let Some(value) = self.lookup(device_path) {
            trace!(device = device_path, "health cache filled by concurrent lookup");
            return Ok(value);
        }

        debug!(device = device_path, "health cache miss, querying device");
        let source = self.source.clone();
        let path = device_path.to_string();
        let value = tokio::task::spawn_blocking(move || source.read_health(&path))
            .await?
            .map_err(|error| DiskStatsError::HealthQuery {
                device: device_path.to_string(),
                error,
            })?;

        let expires_at = if value.smart_enabled == Some(false) {
            debug!(device = device_path, "SMART disabled, pinning health entry");
            None
        } else {
            Some(Instant::now() + self.ttl)
        };
        let entry = HealthCacheEntry {
            value: value.clone(),
            expires_at,
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(device_path.to_string(), entry);
        Ok(value)
    }

    /// Drops one device's entry, or every entry when `device_path` is `None`.
    pub fn invalidate(&self, device_path: Option<&str>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        match device_path {
            Some(path) => {
                entries.remove(path);
                debug!(device = path, "health cache entry deleted");
            }
            None => {
                entries.clear();
                debug!("health cache flushed");
            }
        }
    }

    /// Removes expired entries and idle per-device locks. Returns how many entries were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let removed = {
            let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
            let before = entries.len();
            entries.retain(|_, e| e.is_fresh(now));
            before - entries.len()
        };
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        // Only this map holds the Arc when nobody is waiting on it.
        in_flight.retain(|_, lock| Arc::strong_count(lock) > 1);
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

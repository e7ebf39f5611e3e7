// Collaborator seams: volume inventory, kernel counters, SMART health.
// All three are blocking; callers run them on the blocking pool.

use crate::models::{DeviceSample, DiskDescriptor, HealthAttributes};

pub trait VolumeInventory: Send + Sync {
    /// Lists whole disks with their partitions. Called fresh on every pass.
    fn list_devices(&self) -> anyhow::Result<Vec<DiskDescriptor>>;
}

pub trait CounterSource: Send + Sync {
    /// Reads cumulative counters for a kernel device name.
    /// `Ok(None)` means the device disappeared and should be skipped this pass.
    fn read_counters(&self, device_name: &str) -> anyhow::Result<Option<DeviceSample>>;
}

pub trait HealthSource: Send + Sync {
    /// Potentially slow hardware query.
    fn read_health(&self, device_path: &str) -> anyhow::Result<HealthAttributes>;
}

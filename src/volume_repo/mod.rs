// Volume inventory and block counters from sysfs, mount statistics from sysinfo.

mod linux;

pub use linux::parse_block_stat;

use crate::models::{DeviceSample, DiskDescriptor, MountInfo, PartitionDescriptor};
use crate::sources::{CounterSource, VolumeInventory};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use sysinfo::Disks;
use tracing::instrument;

pub struct VolumeRepo {
    sysfs: PathBuf,
    disks: Mutex<Disks>,
}

impl VolumeRepo {
    pub fn new(sysfs: impl Into<PathBuf>) -> Self {
        Self {
            sysfs: sysfs.into(),
            disks: Mutex::new(Disks::new_with_refreshed_list()),
        }
    }

    /// Mounted filesystems keyed by kernel device name ("sda1").
    fn mounts(&self) -> anyhow::Result<HashMap<String, (MountInfo, String)>> {
        let mut disks = self
            .disks
            .lock()
            .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
        disks.refresh(true);
        let mut mounts = HashMap::new();
        for d in disks.list() {
            let name = d.name().to_string_lossy();
            let Some(device) = name.strip_prefix("/dev/") else {
                continue;
            };
            let info = MountInfo {
                path: d.mount_point().to_string_lossy().into_owned(),
                total_space: d.total_space(),
                free_space: d.available_space(),
            };
            let fs_type = d.file_system().to_string_lossy().into_owned();
            // First mount wins when a device is mounted more than once.
            mounts.entry(device.to_string()).or_insert((info, fs_type));
        }
        Ok(mounts)
    }
}

impl VolumeInventory for VolumeRepo {
    #[instrument(skip(self), fields(repo = "volume", operation = "list_devices"))]
    fn list_devices(&self) -> anyhow::Result<Vec<DiskDescriptor>> {
        let mut mounts = self.mounts()?;
        let devices = linux::list_block_devices(&self.sysfs)?
            .into_iter()
            .map(|name| {
                let partitions = linux::list_partitions(&self.sysfs, &name)
                    .into_iter()
                    .map(|(part, size)| {
                        let (mount, fs_type) = match mounts.remove(&part) {
                            Some((m, fs)) => (Some(m), Some(fs)),
                            None => (None, None),
                        };
                        PartitionDescriptor {
                            device: part,
                            name: None,
                            fs_type,
                            size,
                            mount,
                        }
                    })
                    .collect();
                DiskDescriptor {
                    id: linux::disk_id(&self.sysfs, &name),
                    device_path: Some(format!("/dev/{}", name)),
                    device_name: name,
                    partitions,
                }
            })
            .collect();
        Ok(devices)
    }
}

/// Reads `<sysfs>/block/<dev>/stat`.
pub struct SysfsCounters {
    sysfs: PathBuf,
}

impl SysfsCounters {
    pub fn new(sysfs: impl Into<PathBuf>) -> Self {
        Self {
            sysfs: sysfs.into(),
        }
    }
}

impl CounterSource for SysfsCounters {
    fn read_counters(&self, device_name: &str) -> anyhow::Result<Option<DeviceSample>> {
        let path = self.sysfs.join("block").join(device_name).join("stat");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(anyhow::anyhow!("read {}: {}", path.display(), e)),
        };
        let (read_ios, write_ios, read_ticks, write_ticks) = parse_block_stat(&content)?;
        Ok(Some(DeviceSample {
            read_ios,
            write_ios,
            read_ticks,
            write_ticks,
            captured_at: Instant::now(),
        }))
    }
}

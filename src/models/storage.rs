// Storage inventory models: what the volume inventory hands us, and what we publish per partition

use serde::{Deserialize, Serialize};

/// Mount statistics for a mounted partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountInfo {
    pub path: String,
    pub total_space: u64,
    pub free_space: u64,
}

/// One partition as reported by the volume inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDescriptor {
    /// Kernel name of the partition, e.g. "sda1".
    pub device: String,
    /// Label or friendly name, when known.
    pub name: Option<String>,
    pub fs_type: Option<String>,
    /// Raw partition size in bytes.
    pub size: Option<u64>,
    pub mount: Option<MountInfo>,
}

/// One whole block device as reported by the volume inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskDescriptor {
    /// Stable display id; keys the sample table and the partition map.
    pub id: String,
    /// Kernel name used to read counters, e.g. "sda" or "nvme0n1".
    pub device_name: String,
    /// Device node used for SMART queries. Disks without one are not sampled.
    pub device_path: Option<String>,
    pub partitions: Vec<PartitionDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionInfo {
    pub name: String,
    pub mount_point: String,
    pub device: String,
    pub fs_type: String,
    pub total_space: u64,
    pub free_space: u64,
    pub fsck_needed: bool,
    pub fsck_supported: bool,
}

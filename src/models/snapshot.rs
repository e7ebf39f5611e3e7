// Published result of one sampling pass

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{GlobalRate, PartitionInfo, PerDiskInfo, PerDiskRate};

/// Immutable once published; readers get it behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskHealthSnapshot {
    /// Unix milliseconds when the pass finished.
    pub timestamp: u64,
    #[serde(rename = "perDiskIO")]
    pub per_disk_io: Vec<PerDiskRate>,
    pub global: GlobalRate,
    /// Partitions keyed by owning disk id.
    pub per_partition_info: BTreeMap<String, Vec<PartitionInfo>>,
    /// Device path and cached health keyed by disk id.
    pub per_disk_info: BTreeMap<String, PerDiskInfo>,
}

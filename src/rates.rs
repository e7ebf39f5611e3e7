// Counter-to-rate conversion, global folding, partition metadata merge.

use crate::models::{DeviceSample, GlobalRate, PartitionDescriptor, PartitionInfo, PerDiskRate};

/// Filesystems we know how to check.
const FSCK_SUPPORTED: &[&str] = &[
    "ext2", "ext3", "ext4", "xfs", "btrfs", "f2fs", "vfat", "exfat", "ntfs", "ntfs3",
];

/// Rates for one device over one interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiskRates {
    pub read_iops: f64,
    pub write_iops: f64,
    pub read_latency_ms: f64,
    pub write_latency_ms: f64,
}

/// Negative (counter reset or wrap), NaN (0/0) and infinite (dt of zero) all become 0.
fn clamp_rate(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

fn delta(now: u64, prev: u64) -> f64 {
    now as f64 - prev as f64
}

/// Converts two successive samples into IOPS and per-operation latency.
/// After a full counter reset both latency deltas are negative, so their ratio is positive and passes the clamp.
pub fn compute_rates(prev: &DeviceSample, cur: &DeviceSample, dt_secs: f64) -> DiskRates {
    let read_ops = delta(cur.read_ios, prev.read_ios);
    let write_ops = delta(cur.write_ios, prev.write_ios);

    DiskRates {
        read_iops: clamp_rate(read_ops / dt_secs),
        write_iops: clamp_rate(write_ops / dt_secs),
        read_latency_ms: clamp_rate(delta(cur.read_ticks, prev.read_ticks) / read_ops),
        write_latency_ms: clamp_rate(delta(cur.write_ticks, prev.write_ticks) / write_ops),
    }
}

/// Seconds between two samples; zero when the clock did not move forward.
pub fn elapsed_secs(prev: &DeviceSample, cur: &DeviceSample) -> f64 {
    cur.captured_at
        .saturating_duration_since(prev.captured_at)
        .as_secs_f64()
}

impl GlobalRate {
    /// Folds one device into the totals. Idle devices add nothing to the latency sums.
    pub fn accumulate(&mut self, rate: &PerDiskRate) {
        let iops = rate.read_iops + rate.write_iops;
        self.total_iops += iops;
        if iops > 0.0 {
            self.total_read_latency += rate.read_latency_ms;
        }
        if rate.write_iops > 0.0 {
            self.total_write_latency += rate.write_latency_ms;
        }
    }
}

pub fn is_fsck_supported(fs_type: &str) -> bool {
    let fs_type = fs_type.to_ascii_lowercase();
    FSCK_SUPPORTED.contains(&fs_type.as_str())
}

/// Builds the published view of one partition.
/// `fsck_needed` is always false: no dirty-bit check is performed.
pub fn partition_info(part: &PartitionDescriptor) -> PartitionInfo {
    let fs_type = part.fs_type.clone().unwrap_or_default();
    let name = part
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .or_else(|| Some(part.device.clone()).filter(|d| !d.is_empty()))
        .unwrap_or_else(|| "unknown".into());

    let (mount_point, total_space, free_space) = match &part.mount {
        Some(m) if !m.path.is_empty() => (m.path.clone(), m.total_space, m.free_space),
        _ => (String::new(), part.size.unwrap_or(0), 0),
    };

    PartitionInfo {
        name,
        mount_point,
        device: part.device.clone(),
        fsck_supported: is_fsck_supported(&fs_type),
        fs_type,
        total_space,
        free_space,
        fsck_needed: false,
    }
}

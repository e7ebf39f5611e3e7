// Block I/O counter samples and the rates derived from them

use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::HealthAttributes;

/// Raw cumulative counters for one block device at one point in time.
/// Ticks are milliseconds spent servicing requests, as the kernel reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSample {
    pub read_ios: u64,
    pub write_ios: u64,
    pub read_ticks: u64,
    pub write_ticks: u64,
    pub captured_at: Instant,
}

/// Per-device rates for one sampling interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerDiskRate {
    pub device_name: String,
    pub device_description: String,
    #[serde(rename = "readIOPS")]
    pub read_iops: f64,
    #[serde(rename = "writeIOPS")]
    pub write_iops: f64,
    pub read_latency_ms: f64,
    pub write_latency_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthAttributes>,
}

/// Totals across all devices. The latency fields are sums, not averages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalRate {
    #[serde(rename = "totalIOPS")]
    pub total_iops: f64,
    pub total_read_latency: f64,
    pub total_write_latency: f64,
}

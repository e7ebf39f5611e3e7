// SMART-derived health attributes

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAttributes {
    pub temperature_celsius: Option<i64>,
    pub power_on_hours: Option<u64>,
    pub power_cycle_count: Option<u64>,
    /// SMART support switched on in the drive firmware.
    pub smart_enabled: Option<bool>,
    /// Overall SMART self-assessment.
    pub smart_passed: Option<bool>,
}

/// Per-disk entry published on every pass, including a disk's first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerDiskInfo {
    pub device_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthAttributes>,
}

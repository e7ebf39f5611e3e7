// SMART health attributes via `smartctl --json`.

use crate::models::HealthAttributes;
use crate::sources::HealthSource;
use anyhow::Context;
use serde::Deserialize;
use std::process::Command;
use tracing::instrument;

/// smartctl exit status bits that mean no data was read at all:
/// bit 0 command line did not parse, bit 1 device open failed.
const SMARTCTL_FATAL_MASK: i32 = 0b11;

#[derive(Debug, Default, Deserialize)]
struct SmartctlOutput {
    temperature: Option<Temperature>,
    power_on_time: Option<PowerOnTime>,
    power_cycle_count: Option<u64>,
    smart_support: Option<SmartSupport>,
    smart_status: Option<SmartStatus>,
    nvme_smart_health_information_log: Option<NvmeHealthLog>,
}

#[derive(Debug, Deserialize)]
struct Temperature {
    current: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct PowerOnTime {
    hours: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SmartSupport {
    enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SmartStatus {
    passed: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct NvmeHealthLog {
    temperature: Option<i64>,
    power_on_hours: Option<u64>,
    power_cycles: Option<u64>,
}

/// Maps smartctl JSON into health attributes. ATA top-level fields win over the NVMe log.
pub fn parse_smartctl_json(json: &str) -> anyhow::Result<HealthAttributes> {
    let out: SmartctlOutput = serde_json::from_str(json).context("parse smartctl json")?;
    let nvme = out.nvme_smart_health_information_log.as_ref();
    Ok(HealthAttributes {
        temperature_celsius: out
            .temperature
            .and_then(|t| t.current)
            .or_else(|| nvme.and_then(|n| n.temperature)),
        power_on_hours: out
            .power_on_time
            .and_then(|p| p.hours)
            .or_else(|| nvme.and_then(|n| n.power_on_hours)),
        power_cycle_count: out
            .power_cycle_count
            .or_else(|| nvme.and_then(|n| n.power_cycles)),
        smart_enabled: out.smart_support.and_then(|s| s.enabled),
        smart_passed: out.smart_status.and_then(|s| s.passed),
    })
}

pub struct SmartctlRepo {
    binary: String,
}

impl SmartctlRepo {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl HealthSource for SmartctlRepo {
    #[instrument(skip(self), fields(repo = "smartctl", operation = "read_health"))]
    fn read_health(&self, device_path: &str) -> anyhow::Result<HealthAttributes> {
        let output = Command::new(&self.binary)
            .args(["--json", "-i", "-A", "-H", device_path])
            .output()
            .with_context(|| format!("run {}", self.binary))?;
        let status = output.status.code().unwrap_or(-1);
        anyhow::ensure!(
            status >= 0 && (status & SMARTCTL_FATAL_MASK) == 0,
            "smartctl failed for {} with status {}",
            device_path,
            status
        );
        parse_smartctl_json(&String::from_utf8_lossy(&output.stdout))
    }
}

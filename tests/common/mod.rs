// Shared test helpers: scripted collaborators for the disk stats service

#![allow(dead_code)]

use diskpulse::models::*;
use diskpulse::service::{DiskStatsService, ServiceDeps};
use diskpulse::sources::{CounterSource, HealthSource, VolumeInventory};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub fn disk(id: &str, device_name: &str) -> DiskDescriptor {
    DiskDescriptor {
        id: id.into(),
        device_name: device_name.into(),
        device_path: Some(format!("/dev/{}", device_name)),
        partitions: vec![],
    }
}

#[derive(Default)]
pub struct FakeInventory {
    pub disks: Mutex<Vec<DiskDescriptor>>,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl FakeInventory {
    pub fn new(disks: Vec<DiskDescriptor>) -> Self {
        Self {
            disks: Mutex::new(disks),
            ..Default::default()
        }
    }
}

impl VolumeInventory for FakeInventory {
    fn list_devices(&self) -> anyhow::Result<Vec<DiskDescriptor>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("udev unavailable");
        }
        Ok(self.disks.lock().unwrap().clone())
    }
}

/// Counters set per device, stamped at `base + at_secs` so elapsed time is exact.
pub struct FakeCounters {
    base: Instant,
    samples: Mutex<HashMap<String, DeviceSample>>,
    pub failing: Mutex<HashSet<String>>,
}

impl Default for FakeCounters {
    fn default() -> Self {
        Self {
            base: Instant::now(),
            samples: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }
}

impl FakeCounters {
    pub fn set(
        &self,
        device: &str,
        read_ios: u64,
        read_ticks: u64,
        write_ios: u64,
        write_ticks: u64,
        at_secs: u64,
    ) {
        self.samples.lock().unwrap().insert(
            device.into(),
            DeviceSample {
                read_ios,
                write_ios,
                read_ticks,
                write_ticks,
                captured_at: self.base + Duration::from_secs(at_secs),
            },
        );
    }

    pub fn remove(&self, device: &str) {
        self.samples.lock().unwrap().remove(device);
    }

    pub fn fail(&self, device: &str) {
        self.failing.lock().unwrap().insert(device.into());
    }
}

impl CounterSource for FakeCounters {
    fn read_counters(&self, device_name: &str) -> anyhow::Result<Option<DeviceSample>> {
        if self.failing.lock().unwrap().contains(device_name) {
            anyhow::bail!("permission denied reading {}", device_name);
        }
        Ok(self.samples.lock().unwrap().get(device_name).copied())
    }
}

pub struct FakeHealth {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    /// Report SMART as switched off in the drive firmware.
    pub smart_off: AtomicBool,
    pub delay: Duration,
}

impl FakeHealth {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            smart_off: AtomicBool::new(false),
            delay,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HealthSource for FakeHealth {
    fn read_health(&self, device_path: &str) -> anyhow::Result<HealthAttributes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("SMART command failed on {}", device_path);
        }
        Ok(HealthAttributes {
            temperature_celsius: Some(38),
            power_on_hours: Some(1_000),
            power_cycle_count: Some(42),
            smart_enabled: Some(!self.smart_off.load(Ordering::SeqCst)),
            smart_passed: Some(true),
        })
    }
}

pub struct Harness {
    pub inventory: Arc<FakeInventory>,
    pub counters: Arc<FakeCounters>,
    pub health: Arc<FakeHealth>,
    pub service: Arc<DiskStatsService>,
}

pub fn harness(disks: Vec<DiskDescriptor>, health: FakeHealth) -> Harness {
    let inventory = Arc::new(FakeInventory::new(disks));
    let counters = Arc::new(FakeCounters::default());
    let health = Arc::new(health);
    let service = Arc::new(DiskStatsService::new(ServiceDeps {
        inventory: inventory.clone(),
        counters: counters.clone(),
        health: Some(health.clone()),
    }));
    Harness {
        inventory,
        counters,
        health,
        service,
    }
}

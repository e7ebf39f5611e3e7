// Counter-to-rate math and global totals

use diskpulse::models::{DeviceSample, GlobalRate, PerDiskRate};
use diskpulse::rates::{compute_rates, is_fsck_supported};
use std::time::Instant;

fn sample(read_ios: u64, read_ticks: u64, write_ios: u64, write_ticks: u64) -> DeviceSample {
    DeviceSample {
        read_ios,
        write_ios,
        read_ticks,
        write_ticks,
        captured_at: Instant::now(),
    }
}

fn rate(read_iops: f64, write_iops: f64, read_latency_ms: f64, write_latency_ms: f64) -> PerDiskRate {
    PerDiskRate {
        device_name: "sda".into(),
        device_description: "disk-a".into(),
        read_iops,
        write_iops,
        read_latency_ms,
        write_latency_ms,
        health: None,
    }
}

#[test]
fn read_iops_and_latency_over_ten_seconds() {
    let prev = sample(1000, 500, 0, 0);
    let cur = sample(1200, 560, 0, 0);
    let r = compute_rates(&prev, &cur, 10.0);
    assert_eq!(r.read_iops, 20.0);
    assert!((r.read_latency_ms - 0.3).abs() < 1e-12);
}

#[test]
fn write_rates_follow_the_same_formula() {
    let prev = sample(0, 0, 400, 1000);
    let cur = sample(0, 0, 450, 1250);
    let r = compute_rates(&prev, &cur, 5.0);
    assert_eq!(r.write_iops, 10.0);
    assert_eq!(r.write_latency_ms, 5.0);
}

#[test]
fn counter_reset_clamps_iops_to_zero() {
    let prev = sample(5000, 9000, 3000, 7000);
    let cur = sample(10, 20, 5, 8);
    let r = compute_rates(&prev, &cur, 10.0);
    assert_eq!(r.read_iops, 0.0);
    assert_eq!(r.write_iops, 0.0);
    // Both deltas went negative: -8980 / -4990 and -6992 / -2995.
    assert!((r.read_latency_ms - 8980.0 / 4990.0).abs() < 1e-12);
    assert!((r.write_latency_ms - 6992.0 / 2995.0).abs() < 1e-12);
}

#[test]
fn ticks_reset_with_ops_growing_clamps_latency_to_zero() {
    let prev = sample(100, 9000, 0, 0);
    let cur = sample(150, 20, 0, 0);
    let r = compute_rates(&prev, &cur, 10.0);
    assert_eq!(r.read_iops, 5.0);
    assert_eq!(r.read_latency_ms, 0.0);
}

#[test]
fn idle_interval_yields_zero_latency_not_nan() {
    let prev = sample(1000, 500, 200, 300);
    let cur = sample(1000, 500, 200, 300);
    let r = compute_rates(&prev, &cur, 10.0);
    assert_eq!(r.read_latency_ms, 0.0);
    assert_eq!(r.write_latency_ms, 0.0);
    assert_eq!(r.read_iops, 0.0);
    assert_eq!(r.write_iops, 0.0);
}

#[test]
fn ticks_without_ops_are_not_infinite() {
    let prev = sample(1000, 500, 0, 0);
    let cur = sample(1000, 900, 0, 0);
    let r = compute_rates(&prev, &cur, 10.0);
    assert_eq!(r.read_latency_ms, 0.0);
}

#[test]
fn global_totals_skip_idle_device_latency() {
    let mut global = GlobalRate::default();
    global.accumulate(&rate(20.0, 5.0, 0.3, 2.0));
    // Idle device carrying a stale latency value must not count.
    global.accumulate(&rate(0.0, 0.0, 9.0, 9.0));
    assert_eq!(global.total_iops, 25.0);
    assert_eq!(global.total_read_latency, 0.3);
    assert_eq!(global.total_write_latency, 2.0);
}

#[test]
fn global_write_latency_needs_write_iops() {
    let mut global = GlobalRate::default();
    global.accumulate(&rate(10.0, 0.0, 1.5, 4.0));
    global.accumulate(&rate(2.0, 3.0, 0.5, 1.0));
    assert_eq!(global.total_iops, 15.0);
    // Plain sum across devices, not an average.
    assert_eq!(global.total_read_latency, 2.0);
    assert_eq!(global.total_write_latency, 1.0);
}

#[test]
fn fsck_allow_list_is_case_insensitive() {
    for fs in ["ext4", "EXT4", "xfs", "btrfs", "vfat", "exfat", "ntfs3", "f2fs"] {
        assert!(is_fsck_supported(fs), "{fs} should be supported");
    }
    for fs in ["zfs", "squashfs", "tmpfs", ""] {
        assert!(!is_fsck_supported(fs), "{fs} should not be supported");
    }
}

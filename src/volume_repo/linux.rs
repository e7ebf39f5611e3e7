// Linux sysfs helpers: block device listing, partition discovery, /sys/block/<dev>/stat parsing.

use std::path::Path;

use anyhow::Context;

/// Kernel sector size used by sysfs `size` files, regardless of the device's logical block size.
const SYSFS_SECTOR_BYTES: u64 = 512;

/// Virtual devices with no physical media behind them.
const IGNORED_PREFIXES: &[&str] = &["loop", "ram", "zram", "fd", "sr"];

/// Reads a sysfs attribute, trimmed. `None` when missing or empty.
pub(super) fn read_trimmed(path: &Path) -> Option<String> {
    let v = std::fs::read_to_string(path).ok()?;
    let v = v.trim();
    if v.is_empty() {
        return None;
    }
    Some(v.to_string())
}

/// Whole-disk names under `<sysfs>/block`, sorted, virtual devices dropped.
pub(super) fn list_block_devices(sysfs: &Path) -> anyhow::Result<Vec<String>> {
    let dir = sysfs.join("block");
    let mut names = Vec::new();
    for entry in std::fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if IGNORED_PREFIXES.iter().any(|p| name.starts_with(p)) {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Partitions of a disk: child directories carrying a `partition` attribute.
/// Returns (name, size in bytes).
pub(super) fn list_partitions(sysfs: &Path, disk: &str) -> Vec<(String, Option<u64>)> {
    let dir = sysfs.join("block").join(disk);
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return vec![];
    };
    let mut parts: Vec<(String, Option<u64>)> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().join("partition").exists())
        .map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            let size = read_trimmed(&e.path().join("size"))
                .and_then(|s| s.parse::<u64>().ok())
                .map(|sectors| sectors * SYSFS_SECTOR_BYTES);
            (name, size)
        })
        .collect();
    parts.sort();
    parts
}

/// Stable display id built from model and serial, falling back to the kernel name.
pub(super) fn disk_id(sysfs: &Path, disk: &str) -> String {
    let device = sysfs.join("block").join(disk).join("device");
    let model = read_trimmed(&device.join("model"));
    let serial = read_trimmed(&device.join("serial"));
    match (model, serial) {
        (Some(m), Some(s)) => format!("{}_{}", m, s).replace(char::is_whitespace, "_"),
        (Some(m), None) => format!("{}-{}", m.replace(char::is_whitespace, "_"), disk),
        _ => disk.to_string(),
    }
}

/// Counters from a `/sys/block/<dev>/stat` line:
/// read_ios, write_ios, read_ticks, write_ticks.
pub fn parse_block_stat(content: &str) -> anyhow::Result<(u64, u64, u64, u64)> {
    let fields: Vec<u64> = content
        .split_whitespace()
        .map(|f| f.parse::<u64>())
        .collect::<Result<_, _>>()
        .context("non-numeric field in block stat")?;
    anyhow::ensure!(
        fields.len() >= 8,
        "block stat has {} fields, expected at least 8",
        fields.len()
    );
    Ok((fields[0], fields[4], fields[3], fields[7]))
}

// Domain models: raw counter samples, derived rates, partition metadata, snapshot

mod health;
mod io;
mod snapshot;
mod storage;

pub use health::{HealthAttributes, PerDiskInfo};
pub use io::{DeviceSample, GlobalRate, PerDiskRate};
pub use snapshot::DiskHealthSnapshot;
pub use storage::{DiskDescriptor, MountInfo, PartitionDescriptor, PartitionInfo};

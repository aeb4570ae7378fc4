// Host identity, CPU, load, memory and the per-cycle snapshot

use chrono::{DateTime, Local};

use super::{DiskIoRate, FsUsage, InterfaceRate, ProcessCount, ProcessInfo};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostInfo {
    pub hostname: String,
    pub os_name: String,
    pub platform: String,
    pub os_version: String,
}

/// CPU time split in percent of the last sample interval.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuPercents {
    pub user: f64,
    pub kernel: f64,
    pub nice: f64,
    pub idle: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadAverages {
    pub min1: f64,
    pub min5: f64,
    pub min15: f64,
}

/// Physical memory in bytes. `used` includes `cache`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub cache: u64,
}

impl MemoryStats {
    /// Used memory without page cache.
    pub fn real_used(&self) -> u64 {
        self.used.saturating_sub(self.cache)
    }

    /// Free memory including reclaimable cache.
    pub fn real_free(&self) -> u64 {
        self.free + self.cache
    }

    /// `real_used` as a percentage of total, 0 when total is unknown.
    pub fn real_used_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.real_used() as f64 * 100.0 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapStats {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

/// Everything read in one refresh cycle. A `None` group could not be
/// obtained this cycle and its panel renders blank.
#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub timestamp: DateTime<Local>,
    pub host: Option<HostInfo>,
    pub cpu: Option<CpuPercents>,
    pub load: Option<LoadAverages>,
    /// Logical core count, `None` when unknown (load thresholds then assume 1).
    pub core_count: Option<u32>,
    pub mem: Option<MemoryStats>,
    pub swap: Option<SwapStats>,
    pub network: Option<Vec<InterfaceRate>>,
    pub disk_io: Option<Vec<DiskIoRate>>,
    pub filesystems: Option<Vec<FsUsage>>,
    pub process_count: Option<ProcessCount>,
    pub processes: Option<Vec<ProcessInfo>>,
}

impl MetricSnapshot {
    /// Snapshot with no data at all, stamped `timestamp`.
    pub fn empty(timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            host: None,
            cpu: None,
            load: None,
            core_count: None,
            mem: None,
            swap: None,
            network: None,
            disk_io: None,
            filesystems: None,
            process_count: None,
            processes: None,
        }
    }
}

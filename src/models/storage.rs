// Disk I/O and filesystem models

#[derive(Debug, Clone, PartialEq)]
pub struct DiskIoRate {
    pub name: String,
    pub read_bytes: u64,
    pub written_bytes: u64,
    pub elapsed_secs: f64,
}

impl DiskIoRate {
    pub fn read_per_sec(&self) -> f64 {
        self.read_bytes as f64 / self.elapsed_secs.max(1.0)
    }

    pub fn write_per_sec(&self) -> f64 {
        self.written_bytes as f64 / self.elapsed_secs.max(1.0)
    }
}

/// Usage of one mounted filesystem, sizes in bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct FsUsage {
    pub device: String,
    pub fs_type: String,
    pub mount_point: String,
    pub size: u64,
    pub used: u64,
    pub avail: u64,
}

impl FsUsage {
    /// Label under which threshold crossings for this mount are logged.
    pub fn alert_label(&self) -> String {
        format!("FS {}", self.mount_point)
    }

    pub fn used_percent(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.used as f64 * 100.0 / self.size as f64
        }
    }
}

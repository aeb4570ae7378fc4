// Process summary and per-process models

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessCount {
    pub total: u32,
    pub running: u32,
    pub sleeping: u32,
    pub stopped: u32,
    pub zombie: u32,
}

impl ProcessCount {
    /// Stopped plus zombie, shown in the "Other" column.
    pub fn other(&self) -> u32 {
        self.stopped + self.zombie
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    /// Full command line; may be empty for kernel threads.
    pub title: String,
    pub cpu_percent: f64,
    /// Resident set size in bytes.
    pub resident: u64,
    /// Virtual size in bytes.
    pub virtual_size: u64,
}

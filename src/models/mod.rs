// Snapshot models consumed by the dashboard core

mod network;
mod process;
mod storage;
mod system;

pub use network::InterfaceRate;
pub use process::{ProcessCount, ProcessInfo};
pub use storage::{DiskIoRate, FsUsage};
pub use system::{CpuPercents, HostInfo, LoadAverages, MemoryStats, MetricSnapshot, SwapStats};

// Shared test helpers

#![allow(dead_code)]

use chrono::{DateTime, Local, TimeZone};
use glances::models::*;

pub const GIB: u64 = 1024 * 1024 * 1024;

pub fn at(secs: i64) -> DateTime<Local> {
    Local.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub fn host() -> HostInfo {
    HostInfo {
        hostname: "testhost".into(),
        os_name: "Linux".into(),
        platform: "x86_64".into(),
        os_version: "6.1".into(),
    }
}

pub fn process(pid: u32, name: &str, cpu_percent: f64, virtual_size: u64) -> ProcessInfo {
    ProcessInfo {
        pid,
        name: name.into(),
        title: format!("/usr/bin/{}", name),
        cpu_percent,
        resident: virtual_size / 2,
        virtual_size,
    }
}

pub fn filesystem(mount_point: &str, size: u64, used: u64) -> FsUsage {
    FsUsage {
        device: "/dev/sda1".into(),
        fs_type: "ext4".into(),
        mount_point: mount_point.into(),
        size,
        used,
        avail: size - used,
    }
}

/// Quiet machine: every metric well below the careful threshold.
pub fn idle_snapshot(timestamp: DateTime<Local>) -> MetricSnapshot {
    MetricSnapshot {
        timestamp,
        host: Some(host()),
        cpu: Some(CpuPercents {
            user: 2.0,
            kernel: 1.0,
            nice: 0.0,
            idle: 97.0,
        }),
        load: Some(LoadAverages {
            min1: 0.1,
            min5: 0.1,
            min15: 0.1,
        }),
        core_count: Some(4),
        mem: Some(MemoryStats {
            total: 8 * GIB,
            used: 2 * GIB,
            free: 6 * GIB,
            cache: GIB,
        }),
        swap: Some(SwapStats {
            total: 2 * GIB,
            used: 0,
            free: 2 * GIB,
        }),
        network: Some(vec![InterfaceRate {
            name: "eth0".into(),
            rx_bytes: 1000,
            tx_bytes: 500,
            elapsed_secs: 1.0,
            speed_bits: 0,
        }]),
        disk_io: Some(vec![DiskIoRate {
            name: "sda".into(),
            read_bytes: 4096,
            written_bytes: 8192,
            elapsed_secs: 1.0,
        }]),
        filesystems: Some(vec![filesystem("/", 100 * GIB, 10 * GIB)]),
        process_count: Some(ProcessCount {
            total: 3,
            running: 1,
            sleeping: 2,
            stopped: 0,
            zombie: 0,
        }),
        processes: Some(vec![
            process(1, "init", 0.1, 100),
            process(42, "editor", 12.5, 300),
            process(77, "browser", 3.0, 900),
        ]),
    }
}

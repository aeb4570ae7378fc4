// Derived values on the metric models

mod common;

use common::*;
use glances::models::*;

#[test]
fn real_memory_excludes_cache() {
    let mem = MemoryStats {
        total: 8 * GIB,
        used: 6 * GIB,
        free: 2 * GIB,
        cache: 2 * GIB,
    };
    assert_eq!(mem.real_used(), 4 * GIB);
    assert_eq!(mem.real_free(), 4 * GIB);
    assert_eq!(mem.real_used_percent(), 50.0);
}

#[test]
fn real_memory_percent_with_unknown_total_is_zero() {
    assert_eq!(MemoryStats::default().real_used_percent(), 0.0);
}

#[test]
fn interface_rates_are_bits_per_second() {
    let iface = InterfaceRate {
        name: "eth0".into(),
        rx_bytes: 2000,
        tx_bytes: 500,
        elapsed_secs: 2.0,
        speed_bits: 1_000_000_000,
    };
    assert_eq!(iface.rx_bits_per_sec(), 8000.0);
    assert_eq!(iface.tx_bits_per_sec(), 2000.0);
}

#[test]
fn short_intervals_count_as_one_second() {
    let disk = DiskIoRate {
        name: "sda".into(),
        read_bytes: 4096,
        written_bytes: 1024,
        elapsed_secs: 0.2,
    };
    assert_eq!(disk.read_per_sec(), 4096.0);
    assert_eq!(disk.write_per_sec(), 1024.0);
}

#[test]
fn filesystem_label_and_percent() {
    let fs = filesystem("/home", 200, 50);
    assert_eq!(fs.alert_label(), "FS /home");
    assert_eq!(fs.used_percent(), 25.0);
    assert_eq!(filesystem("/empty", 0, 0).used_percent(), 0.0);
}

#[test]
fn other_processes_are_stopped_plus_zombie() {
    let count = ProcessCount {
        total: 10,
        running: 2,
        sleeping: 5,
        stopped: 2,
        zombie: 1,
    };
    assert_eq!(count.other(), 3);
}

#[test]
fn empty_snapshot_has_no_groups() {
    let snapshot = MetricSnapshot::empty(at(0));
    assert!(snapshot.cpu.is_none());
    assert!(snapshot.processes.is_none());
    assert_eq!(snapshot.timestamp, at(0));
}

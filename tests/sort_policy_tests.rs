// Process sort mode resolution and ordering

mod common;

use common::process;
use glances::sort_policy::*;

#[test]
fn automatic_switches_to_size_under_memory_pressure() {
    let policy = ProcessSortPolicy::new(70.0);
    assert_eq!(policy.mode(), SortMode::Automatic);
    assert_eq!(policy.resolve(75.0), SortKey::Size);
    assert_eq!(policy.resolve(40.0), SortKey::Cpu);
    // strictly greater than the warning threshold
    assert_eq!(policy.resolve(70.0), SortKey::Cpu);
}

#[test]
fn manual_modes_ignore_memory_pressure() {
    let mut policy = ProcessSortPolicy::new(70.0);
    policy.set_mode(SortMode::ByCpu);
    assert_eq!(policy.resolve(99.0), SortKey::Cpu);
    policy.set_mode(SortMode::BySize);
    assert_eq!(policy.resolve(1.0), SortKey::Size);
    policy.set_mode(SortMode::Automatic);
    assert_eq!(policy.resolve(1.0), SortKey::Cpu);
}

#[test]
fn free_resolve_matches_policy() {
    assert_eq!(resolve(SortMode::Automatic, 90.0, 70.0), SortKey::Size);
    assert_eq!(resolve(SortMode::ByCpu, 90.0, 70.0), SortKey::Cpu);
}

#[test]
fn sorts_descending_by_cpu() {
    let list = vec![
        process(1, "a", 1.0, 500),
        process(2, "b", 30.0, 100),
        process(3, "c", 10.0, 900),
    ];
    let sorted = sort_processes(&list, SortKey::Cpu);
    let pids: Vec<u32> = sorted.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![2, 3, 1]);
}

#[test]
fn sorts_descending_by_virtual_size() {
    let list = vec![
        process(1, "a", 1.0, 500),
        process(2, "b", 30.0, 100),
        process(3, "c", 10.0, 900),
    ];
    let sorted = sort_processes(&list, SortKey::Size);
    let pids: Vec<u32> = sorted.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![3, 1, 2]);
}

#[test]
fn equal_keys_keep_snapshot_order() {
    let list = vec![
        process(9, "x", 5.0, 100),
        process(4, "y", 5.0, 100),
        process(7, "z", 5.0, 100),
    ];
    for key in [SortKey::Cpu, SortKey::Size] {
        let pids: Vec<u32> = sort_processes(&list, key).iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![9, 4, 7]);
    }
}

#[test]
fn empty_list_sorts_to_empty() {
    assert!(sort_processes(&[], SortKey::Cpu).is_empty());
}

// Process list ordering: manual or memory-pressure driven.

use crate::models::ProcessInfo;

/// User-selected sort mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Automatic,
    ByCpu,
    BySize,
}

/// The field the process list is actually ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Cpu,
    Size,
}

/// Holds the sticky sort mode and resolves it against memory pressure.
#[derive(Debug, Clone, Copy)]
pub struct ProcessSortPolicy {
    mode: SortMode,
    warning_threshold: f64,
}

impl ProcessSortPolicy {
    /// `warning_threshold` is the STD warning cut point, in percent.
    pub fn new(warning_threshold: f64) -> Self {
        Self {
            mode: SortMode::Automatic,
            warning_threshold,
        }
    }

    pub fn mode(&self) -> SortMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SortMode) {
        self.mode = mode;
    }

    /// Effective key for `memory_used_ratio` (real used memory, percent of total).
    pub fn resolve(&self, memory_used_ratio: f64) -> SortKey {
        resolve(self.mode, memory_used_ratio, self.warning_threshold)
    }
}

/// Automatic sorts by size once memory use passes the warning threshold,
/// by CPU otherwise; manual modes ignore the ratio.
pub fn resolve(mode: SortMode, memory_used_ratio: f64, warning_threshold: f64) -> SortKey {
    match mode {
        SortMode::ByCpu => SortKey::Cpu,
        SortMode::BySize => SortKey::Size,
        SortMode::Automatic if memory_used_ratio > warning_threshold => SortKey::Size,
        SortMode::Automatic => SortKey::Cpu,
    }
}

/// Descending by the chosen field. Stable: equal keys keep snapshot order.
pub fn sort_processes(list: &[ProcessInfo], key: SortKey) -> Vec<ProcessInfo> {
    let mut sorted = list.to_vec();
    match key {
        SortKey::Cpu => sorted.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent)),
        SortKey::Size => sorted.sort_by(|a, b| b.virtual_size.cmp(&a.virtual_size)),
    }
    sorted
}

// Linux-specific helpers: /proc/stat, /proc/diskstats, /etc/os-release, interface speed.

/// Cumulative CPU jiffies from the aggregate "cpu" line of /proc/stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    /// (user, kernel, nice, idle) percentages of the interval since `prev`.
    pub fn percents_since(&self, prev: &CpuTimes) -> (f64, f64, f64, f64) {
        let total = self.total().saturating_sub(prev.total());
        if total == 0 {
            return (0.0, 0.0, 0.0, 100.0);
        }
        let pct = |now: u64, then: u64| now.saturating_sub(then) as f64 * 100.0 / total as f64;
        let kernel = pct(self.system, prev.system)
            + pct(self.irq, prev.irq)
            + pct(self.softirq, prev.softirq);
        let idle = pct(self.idle, prev.idle) + pct(self.iowait, prev.iowait);
        (
            pct(self.user, prev.user),
            kernel,
            pct(self.nice, prev.nice),
            idle,
        )
    }
}

pub(super) fn parse_cpu_times(stat: &str) -> Option<CpuTimes> {
    let line = stat.lines().find(|l| l.starts_with("cpu "))?;
    let v: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|f| f.parse().unwrap_or(0))
        .collect();
    let field = |i: usize| v.get(i).copied().unwrap_or(0);
    if v.len() < 4 {
        return None;
    }
    Some(CpuTimes {
        user: field(0),
        nice: field(1),
        system: field(2),
        idle: field(3),
        iowait: field(4),
        irq: field(5),
        softirq: field(6),
        steal: field(7),
    })
}

pub(super) fn read_cpu_times_linux() -> Option<CpuTimes> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/stat").ok()?;
        return parse_cpu_times(&content);
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// Cumulative bytes read/written per block device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct DiskCounters {
    pub name: String,
    pub read_bytes: u64,
    pub written_bytes: u64,
}

const SECTOR_SIZE: u64 = 512;

/// Parse /proc/diskstats, skipping devices that never did any I/O.
pub(super) fn parse_diskstats(content: &str) -> Vec<DiskCounters> {
    content
        .lines()
        .filter_map(|line| {
            let f: Vec<&str> = line.split_whitespace().collect();
            if f.len() < 10 {
                return None;
            }
            let read: u64 = f[5].parse().ok()?;
            let written: u64 = f[9].parse().ok()?;
            if read == 0 && written == 0 {
                return None;
            }
            Some(DiskCounters {
                name: f[2].to_string(),
                read_bytes: read * SECTOR_SIZE,
                written_bytes: written * SECTOR_SIZE,
            })
        })
        .collect()
}

pub(super) fn read_disk_counters_linux() -> Option<Vec<DiskCounters>> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/diskstats").ok()?;
        return Some(parse_diskstats(&content));
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// Read OS/distro name from /etc/os-release (Linux).
pub(super) fn read_os_name_linux() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/etc/os-release").ok()?;
        for key in ["PRETTY_NAME=", "NAME="] {
            if let Some(line) = content.lines().find(|l| l.starts_with(key)) {
                let v = line.strip_prefix(key)?.trim_matches('"');
                if !v.is_empty() {
                    return Some(v.to_string());
                }
            }
        }
    }
    None
}

/// Read network interface link speed from /sys/class/net/<interface>/speed (Linux).
/// Returns speed in bits per second, or 0 if unavailable. Some drivers report
/// 65535 Mb/s for "unknown".
pub(super) fn get_interface_speed(interface_name: &str) -> u64 {
    #[cfg(target_os = "linux")]
    {
        let path = format!("/sys/class/net/{}/speed", interface_name);
        if let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(mbps) = content.trim().parse::<i64>()
            && mbps > 0
            && mbps != 65535
        {
            return (mbps as u64) * 1_000_000;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_percents_from_two_stat_samples() {
        let a = parse_cpu_times("cpu  100 0 50 850 0 0 0 0 0 0\ncpu0 1 2 3 4\n").unwrap();
        let b = parse_cpu_times("cpu  150 10 80 940 10 5 5 0 0 0\n").unwrap();
        let (user, kernel, nice, idle) = b.percents_since(&a);
        // 200 jiffies elapsed
        assert_eq!(user, 25.0);
        assert_eq!(nice, 5.0);
        assert_eq!(kernel, 20.0);
        assert_eq!(idle, 50.0);
    }

    #[test]
    fn cpu_percents_with_no_elapsed_time_are_idle() {
        let a = CpuTimes::default();
        assert_eq!(a.percents_since(&a), (0.0, 0.0, 0.0, 100.0));
    }

    #[test]
    fn diskstats_skips_idle_devices() {
        let content = "\
   7       0 loop0 0 0 0 0 0 0 0 0 0 0 0
   8       0 sda 100 0 2048 10 50 0 4096 20 0 30 30
";
        let disks = parse_diskstats(content);
        assert_eq!(disks.len(), 1);
        assert_eq!(disks[0].name, "sda");
        assert_eq!(disks[0].read_bytes, 2048 * 512);
        assert_eq!(disks[0].written_bytes, 4096 * 512);
    }
}

// Host metrics via sysinfo (plus /proc on Linux)

mod linux;

use crate::config::FilesystemConfig;
use crate::models::*;
use chrono::Local;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{Disks, Networks, ProcessStatus, ProcessesToUpdate, System};
use tracing::instrument;

/// Source of one [`MetricSnapshot`] per refresh cycle.
pub trait MetricsProvider {
    /// Read every metric group. Groups that cannot be read are `None`;
    /// this never fails as a whole.
    fn snapshot(&self) -> impl Future<Output = MetricSnapshot> + Send;
}

pub struct SysinfoRepo {
    sys: Arc<std::sync::Mutex<System>>,
    disks: Arc<std::sync::Mutex<Disks>>,
    networks: Arc<std::sync::Mutex<Networks>>,
    last_network: Arc<std::sync::Mutex<Option<Instant>>>,
    last_cpu_times: Arc<std::sync::Mutex<Option<linux::CpuTimes>>>,
    last_disk_io: Arc<std::sync::Mutex<Option<(Vec<linux::DiskCounters>, Instant)>>>,
    fs_filter: Arc<FilesystemConfig>,
    host: Option<HostInfo>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new(FilesystemConfig::default())
    }
}

impl SysinfoRepo {
    pub fn new(fs_filter: FilesystemConfig) -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
            disks: Arc::new(std::sync::Mutex::new(disks)),
            networks: Arc::new(std::sync::Mutex::new(networks)),
            last_network: Arc::new(std::sync::Mutex::new(None)),
            last_cpu_times: Arc::new(std::sync::Mutex::new(linux::read_cpu_times_linux())),
            last_disk_io: Arc::new(std::sync::Mutex::new(None)),
            fs_filter: Arc::new(fs_filter),
            host: None,
        }
    }

    /// Read the static host identity once; later snapshots reuse it.
    pub async fn init(mut self) -> anyhow::Result<Self> {
        self.host = Some(self.get_host_info().await?);
        Ok(self)
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_host_info"))]
    pub async fn get_host_info(&self) -> anyhow::Result<HostInfo> {
        tokio::task::spawn_blocking(move || {
            let os_name = linux::read_os_name_linux()
                .or_else(System::name)
                .unwrap_or_else(|| std::env::consts::OS.into());
            Ok(HostInfo {
                hostname: System::host_name().unwrap_or_default(),
                os_name,
                platform: std::env::consts::ARCH.into(),
                os_version: System::os_version().unwrap_or_default(),
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_cpu"))]
    pub async fn get_cpu(&self) -> anyhow::Result<CpuPercents> {
        let sys = self.sys.clone();
        let last_cpu_times = self.last_cpu_times.clone();
        tokio::task::spawn_blocking(move || {
            let mut last = last_cpu_times
                .lock()
                .map_err(|e| anyhow::anyhow!("cpu times lock poisoned: {}", e))?;
            if let Some(now) = linux::read_cpu_times_linux() {
                let prev = last.unwrap_or_default();
                let (user, kernel, nice, idle) = now.percents_since(&prev);
                *last = Some(now);
                return Ok(CpuPercents {
                    user,
                    kernel,
                    nice,
                    idle,
                });
            }
            // No per-mode split outside Linux: report global usage as user time.
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_cpu_all();
            let usage = (sys.global_cpu_usage() as f64).clamp(0.0, 100.0);
            Ok(CpuPercents {
                user: usage,
                kernel: 0.0,
                nice: 0.0,
                idle: 100.0 - usage,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_load"))]
    pub async fn get_load(&self) -> anyhow::Result<(LoadAverages, Option<u32>)> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            let avg = System::load_average();
            let cores = match sys.cpus().len() {
                0 => None,
                n => Some(n as u32),
            };
            Ok((
                LoadAverages {
                    min1: avg.one,
                    min5: avg.five,
                    min15: avg.fifteen,
                },
                cores,
            ))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_memory"))]
    pub async fn get_memory(&self) -> anyhow::Result<(MemoryStats, SwapStats)> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_memory();

            let total = sys.total_memory();
            anyhow::ensure!(total > 0, "total memory reported as zero");
            let free = sys.free_memory();
            let available = sys.available_memory();
            let mem = MemoryStats {
                total,
                used: total.saturating_sub(free),
                free,
                cache: available.saturating_sub(free),
            };
            let swap = SwapStats {
                total: sys.total_swap(),
                used: sys.used_swap(),
                free: sys.free_swap(),
            };
            Ok((mem, swap))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_network"))]
    pub async fn get_network(&self) -> anyhow::Result<Vec<InterfaceRate>> {
        let networks = self.networks.clone();
        let last_network = self.last_network.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks_guard = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            let mut last = last_network
                .lock()
                .map_err(|e| anyhow::anyhow!("network timestamp lock poisoned: {}", e))?;
            networks_guard.refresh(true);
            let now = Instant::now();
            let elapsed_secs = last.map_or(0.0, |t| now.duration_since(t).as_secs_f64());
            *last = Some(now);

            let mut interfaces: Vec<InterfaceRate> = networks_guard
                .list()
                .iter()
                .map(|(name, data)| InterfaceRate {
                    name: name.clone(),
                    rx_bytes: data.received(),
                    tx_bytes: data.transmitted(),
                    elapsed_secs,
                    speed_bits: linux::get_interface_speed(name),
                })
                .collect();
            interfaces.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(interfaces)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_disk_io"))]
    pub async fn get_disk_io(&self) -> anyhow::Result<Vec<DiskIoRate>> {
        let last_disk_io = self.last_disk_io.clone();
        tokio::task::spawn_blocking(move || {
            let counters = linux::read_disk_counters_linux()
                .ok_or_else(|| anyhow::anyhow!("disk I/O counters unavailable"))?;
            let mut last = last_disk_io
                .lock()
                .map_err(|e| anyhow::anyhow!("disk io lock poisoned: {}", e))?;
            let now = Instant::now();
            let rates = counters
                .iter()
                .map(|c| {
                    let prev = last
                        .as_ref()
                        .and_then(|(p, t)| p.iter().find(|d| d.name == c.name).map(|d| (d, *t)));
                    match prev {
                        Some((p, t)) => DiskIoRate {
                            name: c.name.clone(),
                            read_bytes: c.read_bytes.saturating_sub(p.read_bytes),
                            written_bytes: c.written_bytes.saturating_sub(p.written_bytes),
                            elapsed_secs: now.duration_since(t).as_secs_f64(),
                        },
                        None => DiskIoRate {
                            name: c.name.clone(),
                            read_bytes: 0,
                            written_bytes: 0,
                            elapsed_secs: 0.0,
                        },
                    }
                })
                .collect();
            *last = Some((counters, now));
            Ok(rates)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_filesystems"))]
    pub async fn get_filesystems(&self) -> anyhow::Result<Vec<FsUsage>> {
        let disks = self.disks.clone();
        let fs_filter = self.fs_filter.clone();
        tokio::task::spawn_blocking(move || {
            let mut disks_guard = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            disks_guard.refresh(true);
            let filesystems = disks_guard
                .list()
                .iter()
                .filter_map(|d| {
                    let device = d.name().to_string_lossy().into_owned();
                    let fs_type = d.file_system().to_string_lossy().into_owned();
                    if fs_filter.is_ignored(&device, &fs_type) {
                        return None;
                    }
                    let size = d.total_space();
                    let avail = d.available_space();
                    Some(FsUsage {
                        device,
                        fs_type,
                        mount_point: d.mount_point().to_string_lossy().into_owned(),
                        size,
                        used: size.saturating_sub(avail),
                        avail,
                    })
                })
                .collect();
            Ok(filesystems)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_processes"))]
    pub async fn get_processes(&self) -> anyhow::Result<(ProcessCount, Vec<ProcessInfo>)> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_processes(ProcessesToUpdate::All, true);

            let mut count = ProcessCount::default();
            let mut list = Vec::with_capacity(sys.processes().len());
            for (pid, p) in sys.processes() {
                if p.thread_kind().is_some() {
                    continue;
                }
                count.total += 1;
                match p.status() {
                    ProcessStatus::Run => count.running += 1,
                    ProcessStatus::Sleep | ProcessStatus::Idle => count.sleeping += 1,
                    ProcessStatus::Stop | ProcessStatus::Tracing => count.stopped += 1,
                    ProcessStatus::Zombie | ProcessStatus::Dead => count.zombie += 1,
                    _ => {}
                }
                let title = p
                    .cmd()
                    .iter()
                    .map(|a| a.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(" ");
                list.push(ProcessInfo {
                    pid: pid.as_u32(),
                    name: p.name().to_string_lossy().into_owned(),
                    title,
                    cpu_percent: p.cpu_usage() as f64,
                    resident: p.memory(),
                    virtual_size: p.virtual_memory(),
                });
            }
            // Stable base order so equal sort keys render deterministically.
            list.sort_by_key(|p| p.pid);
            Ok((count, list))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}

/// Keep a group's value, or log why it is missing this cycle.
fn ok_or_warn<T>(result: anyhow::Result<T>, operation: &'static str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(error = %e, operation, "metrics group unavailable");
            None
        }
    }
}

impl MetricsProvider for SysinfoRepo {
    async fn snapshot(&self) -> MetricSnapshot {
        let mut snapshot = MetricSnapshot::empty(Local::now());
        snapshot.host = self.host.clone();
        snapshot.cpu = ok_or_warn(self.get_cpu().await, "get_cpu");
        if let Some((load, cores)) = ok_or_warn(self.get_load().await, "get_load") {
            snapshot.load = Some(load);
            snapshot.core_count = cores;
        }
        if let Some((mem, swap)) = ok_or_warn(self.get_memory().await, "get_memory") {
            snapshot.mem = Some(mem);
            snapshot.swap = Some(swap);
        }
        snapshot.network = ok_or_warn(self.get_network().await, "get_network");
        snapshot.disk_io = ok_or_warn(self.get_disk_io().await, "get_disk_io");
        snapshot.filesystems = ok_or_warn(self.get_filesystems().await, "get_filesystems");
        if let Some((count, list)) = ok_or_warn(self.get_processes().await, "get_processes") {
            snapshot.process_count = Some(count);
            snapshot.processes = Some(list);
        }
        snapshot
    }
}

use serde::Deserialize;

use crate::thresholds::{ThresholdSet, ThresholdTable};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_ENV: &str = "GLANCES_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub monitoring: MonitoringConfig,
    pub thresholds: ThresholdTable,
    pub alerts: AlertsConfig,
    pub filesystem: FilesystemConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Seconds between full refreshes.
    pub refresh_secs: u64,
    /// Sleep slice between key polls while waiting for the next refresh.
    pub poll_interval_ms: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            refresh_secs: 1,
            poll_interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Maximum number of episodes kept in the alert log.
    pub logs_max: usize,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            logs_max: crate::alert_log::DEFAULT_LOGS_MAX,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesystemConfig {
    /// Device names never listed (pseudo filesystems).
    pub ignore_names: Vec<String>,
    /// Filesystem types never listed.
    pub ignore_types: Vec<String>,
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            ignore_names: ["none", "gvfs-fuse-daemon", "fusectl", "cgroup"]
                .map(String::from)
                .to_vec(),
            ignore_types: [
                "binfmt_misc",
                "devpts",
                "iso9660",
                "none",
                "proc",
                "sysfs",
                "usbfs",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl FilesystemConfig {
    pub fn is_ignored(&self, device: &str, fs_type: &str) -> bool {
        self.ignore_names.iter().any(|n| n == device)
            || self.ignore_types.iter().any(|t| t == fs_type)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Attribute-only styles (bold/underline/reverse) instead of colours.
    pub monochrome: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Trace output file; logging is discarded when unset since the
    /// terminal belongs to the dashboard.
    pub file: Option<String>,
}

impl AppConfig {
    /// Load from the file named by `GLANCES_CONFIG`, or built-in defaults
    /// when the variable is unset.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let s = std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
                Self::load_from_str(&s)
            }
            Err(_) => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the refresh interval, e.g. from the command line.
    pub fn with_refresh_secs(mut self, refresh_secs: u64) -> anyhow::Result<Self> {
        self.monitoring.refresh_secs = refresh_secs;
        self.validate()?;
        Ok(self)
    }

    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.monitoring.refresh_secs)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.monitoring.poll_interval_ms)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.monitoring.refresh_secs > 0,
            "monitoring.refresh_secs must be > 0, got {}",
            self.monitoring.refresh_secs
        );
        anyhow::ensure!(
            self.monitoring.poll_interval_ms > 0,
            "monitoring.poll_interval_ms must be > 0, got {}",
            self.monitoring.poll_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.poll_interval_ms <= self.monitoring.refresh_secs.saturating_mul(1000),
            "monitoring.poll_interval_ms must not exceed the refresh interval, got {}",
            self.monitoring.poll_interval_ms
        );
        validate_thresholds("thresholds.std", &self.thresholds.std)?;
        validate_thresholds("thresholds.load", &self.thresholds.load)?;
        anyhow::ensure!(
            self.alerts.logs_max > 0,
            "alerts.logs_max must be > 0, got {}",
            self.alerts.logs_max
        );
        if let Some(file) = &self.logging.file {
            anyhow::ensure!(!file.is_empty(), "logging.file must be non-empty when set");
        }
        Ok(())
    }
}

fn validate_thresholds(name: &str, set: &ThresholdSet) -> anyhow::Result<()> {
    for (key, v) in [
        ("careful", set.careful),
        ("warning", set.warning),
        ("critical", set.critical),
    ] {
        anyhow::ensure!(
            v.is_finite() && v >= 0.0,
            "{}.{} must be a finite non-negative number, got {}",
            name,
            key,
            v
        );
    }
    anyhow::ensure!(
        set.careful < set.warning && set.warning < set.critical,
        "{} must satisfy careful < warning < critical, got {} / {} / {}",
        name,
        set.careful,
        set.warning,
        set.critical
    );
    Ok(())
}

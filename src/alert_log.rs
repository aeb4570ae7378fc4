// Bounded, most-recent-first history of WARNING/CRITICAL episodes.

use chrono::{DateTime, Local};

use crate::thresholds::Severity;

pub const DEFAULT_LOGS_MAX: usize = 10;

/// A contiguous run of WARNING-or-worse samples for one metric label.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEpisode {
    pub start: DateTime<Local>,
    /// `None` while the episode is still open.
    pub end: Option<DateTime<Local>>,
    pub peak_severity: Severity,
    pub label: String,
    pub max: f64,
    pub min: f64,
    pub sum: f64,
    pub count: u64,
}

impl AlertEpisode {
    fn open(now: DateTime<Local>, severity: Severity, label: &str, value: f64) -> Self {
        Self {
            start: now,
            end: None,
            peak_severity: severity,
            label: label.to_string(),
            max: value,
            min: value,
            sum: value,
            count: 1,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn avg(&self) -> f64 {
        self.sum / self.count as f64
    }

    fn update(&mut self, severity: Severity, value: f64) {
        self.peak_severity = self.peak_severity.max(severity);
        self.max = self.max.max(value);
        self.min = self.min.min(value);
        self.sum += value;
        self.count += 1;
    }
}

/// Episode history capped at `logs_max` entries; the oldest entry is evicted
/// first regardless of severity or whether it is still open.
#[derive(Debug, Clone)]
pub struct AlertEpisodeLog {
    episodes: Vec<AlertEpisode>,
    logs_max: usize,
}

impl Default for AlertEpisodeLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOGS_MAX)
    }
}

impl AlertEpisodeLog {
    pub fn new(logs_max: usize) -> Self {
        Self {
            episodes: Vec::with_capacity(logs_max + 1),
            logs_max,
        }
    }

    /// Feed one classified sample, stamped with the current local time.
    pub fn record(&mut self, severity: Severity, label: &str, value: f64) -> usize {
        self.record_at(Local::now(), severity, label, value)
    }

    /// Feed one classified sample observed at `now`. Returns the number of
    /// episodes held afterwards.
    pub fn record_at(
        &mut self,
        now: DateTime<Local>,
        severity: Severity,
        label: &str,
        value: f64,
    ) -> usize {
        match self.open_index(label) {
            None if severity.is_alert() => {
                self.episodes
                    .insert(0, AlertEpisode::open(now, severity, label, value));
                if self.episodes.len() > self.logs_max {
                    if let Some(evicted) = self.episodes.pop() {
                        tracing::debug!(label = %evicted.label, "alert episode evicted");
                    }
                }
                tracing::debug!(label, %severity, value, "alert episode opened");
            }
            None => {}
            Some(i) if severity.is_alert() => self.episodes[i].update(severity, value),
            Some(i) => {
                let episode = &mut self.episodes[i];
                episode.end = Some(now);
                tracing::debug!(
                    label,
                    peak = %episode.peak_severity,
                    count = episode.count,
                    "alert episode closed"
                );
            }
        }
        self.episodes.len()
    }

    /// Episodes, most recent first.
    pub fn all_episodes(&self) -> &[AlertEpisode] {
        &self.episodes
    }

    pub fn count(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// The open episode for `label`, if any.
    pub fn open_episode(&self, label: &str) -> Option<&AlertEpisode> {
        self.open_index(label).map(|i| &self.episodes[i])
    }

    fn open_index(&self, label: &str) -> Option<usize> {
        self.episodes
            .iter()
            .position(|e| e.is_open() && e.label == label)
    }
}

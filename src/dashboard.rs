// Owned dashboard state: evaluator, alert log, sort policy, layout toggles.
// Built once at startup and driven by the refresh worker.

use ratatui::Frame;

use crate::alert_log::AlertEpisodeLog;
use crate::config::AppConfig;
use crate::input::Action;
use crate::layout::{LayoutEngine, LayoutPlan, PanelEntries, PanelToggleState};
use crate::models::MetricSnapshot;
use crate::sort_policy::{self, ProcessSortPolicy, SortKey, SortMode};
use crate::thresholds::{MetricClass, ThresholdEvaluator};
use crate::ui::{self, Palette, RenderContext};

const MB: f64 = 1_048_576.0;

pub struct Dashboard {
    evaluator: ThresholdEvaluator,
    alerts: AlertEpisodeLog,
    sort_policy: ProcessSortPolicy,
    layout: LayoutEngine,
    palette: Palette,
    show_help: bool,
    /// Real memory use (percent) seen by the last evaluation.
    memory_ratio: f64,
}

impl Dashboard {
    pub fn new(config: &AppConfig) -> Self {
        let evaluator = ThresholdEvaluator::new(config.thresholds);
        Self {
            evaluator,
            alerts: AlertEpisodeLog::new(config.alerts.logs_max),
            sort_policy: ProcessSortPolicy::new(evaluator.table().std.warning),
            layout: LayoutEngine::new(PanelToggleState::default()),
            palette: Palette::new(config.display.monochrome),
            show_help: false,
            memory_ratio: 0.0,
        }
    }

    pub fn alerts(&self) -> &AlertEpisodeLog {
        &self.alerts
    }

    pub fn toggles(&self) -> &PanelToggleState {
        self.layout.toggles()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_policy.mode()
    }

    /// Sort key in effect for the memory pressure seen last cycle.
    pub fn sort_key(&self) -> SortKey {
        self.sort_policy.resolve(self.memory_ratio)
    }

    /// Classify every alerted metric in `snapshot` and feed the alert log.
    /// Absent groups are skipped.
    pub fn evaluate(&mut self, snapshot: &MetricSnapshot) {
        let now = snapshot.timestamp;
        let ev = self.evaluator;

        if let Some(cpu) = &snapshot.cpu {
            for (label, value) in [
                ("CPU user", cpu.user),
                ("CPU kernel", cpu.kernel),
                ("CPU nice", cpu.nice),
            ] {
                self.alerts
                    .record_at(now, ev.classify_percent(value), label, value);
            }
        }

        if let Some(load) = &snapshot.load {
            for (label, value) in [("LOAD 5-mins", load.min5), ("LOAD 15-mins", load.min15)] {
                let severity = ev.classify_load(value, snapshot.core_count);
                self.alerts.record_at(now, severity, label, value);
            }
        }

        if let Some(swap) = &snapshot.swap {
            let severity = ev.classify(swap.used as f64, swap.total as f64, MetricClass::Std);
            self.alerts
                .record_at(now, severity, "MEM swap", swap.used as f64 / MB);
        }

        match &snapshot.mem {
            Some(mem) => {
                let real = mem.real_used() as f64;
                let severity = ev.classify(real, mem.total as f64, MetricClass::Std);
                self.alerts.record_at(now, severity, "MEM real", real / MB);
                self.memory_ratio = mem.real_used_percent();
            }
            None => self.memory_ratio = 0.0,
        }

        if let Some(filesystems) = &snapshot.filesystems {
            for fs in filesystems {
                let severity = ev.classify(fs.used as f64, fs.size as f64, MetricClass::Std);
                self.alerts
                    .record_at(now, severity, &fs.alert_label(), fs.used_percent());
            }
        }

        tracing::debug!(
            episodes = self.alerts.count(),
            memory_ratio = self.memory_ratio,
            sort_key = ?self.sort_key(),
            "snapshot evaluated"
        );
    }

    /// Apply a user action. Quit is handled by the caller.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Sort(mode) => self.sort_policy.set_mode(mode),
            Action::Toggle(kind) => self.layout.toggle(kind),
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Quit => {}
        }
    }

    pub fn layout(&self, width: u16, height: u16, snapshot: &MetricSnapshot) -> LayoutPlan {
        let entries = PanelEntries {
            network: snapshot.network.as_ref().map_or(0, Vec::len),
            disk_io: snapshot.disk_io.as_ref().map_or(0, Vec::len),
            filesystem: snapshot.filesystems.as_ref().map_or(0, Vec::len),
            log: self.alerts.count(),
        };
        self.layout.compute(width, height, &entries)
    }

    /// Lay out for the frame's current size and render everything.
    pub fn draw(&self, frame: &mut Frame, snapshot: &MetricSnapshot) {
        let area = frame.area();
        let plan = self.layout(area.width, area.height, snapshot);
        let key = self.sort_key();
        let processes = sort_policy::sort_processes(snapshot.processes.as_deref().unwrap_or(&[]), key);
        let ctx = RenderContext {
            snapshot,
            plan: &plan,
            evaluator: &self.evaluator,
            palette: &self.palette,
            episodes: self.alerts.all_episodes(),
            processes: &processes,
            sort_key: key,
            show_help: self.show_help,
        };
        ui::render(frame, &ctx);
    }
}

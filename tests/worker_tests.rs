// Refresh loop: scripted keys and a fake provider on paused time

mod common;

use common::*;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use glances::config::AppConfig;
use glances::dashboard::Dashboard;
use glances::layout::PanelKind;
use glances::models::{CpuPercents, MetricSnapshot};
use glances::sysinfo_repo::MetricsProvider;
use glances::worker::{KeySource, Stop, WorkerConfig, run};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::Duration;

struct FakeProvider {
    snapshot: MetricSnapshot,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn new(snapshot: MetricSnapshot) -> Self {
        Self {
            snapshot,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetricsProvider for FakeProvider {
    async fn snapshot(&self) -> MetricSnapshot {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot.clone()
    }
}

/// One entry per poll; `None` is a poll with no key pending.
struct ScriptedKeys(VecDeque<Option<KeyEvent>>);

impl ScriptedKeys {
    fn new(script: impl IntoIterator<Item = Option<KeyEvent>>) -> Self {
        Self(script.into_iter().collect())
    }
}

impl KeySource for ScriptedKeys {
    fn poll_key(&mut self) -> std::io::Result<Option<KeyEvent>> {
        Ok(self.0.pop_front().flatten())
    }
}

fn key(c: char) -> Option<KeyEvent> {
    Some(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn config() -> WorkerConfig {
    WorkerConfig {
        refresh_interval: Duration::from_secs(1),
        poll_interval: Duration::from_millis(100),
    }
}

fn never() -> std::future::Pending<()> {
    std::future::pending()
}

#[tokio::test(start_paused = true)]
async fn quit_key_ends_loop_after_first_draw() {
    let provider = FakeProvider::new(idle_snapshot(at(0)));
    let mut dashboard = Dashboard::new(&AppConfig::default());
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut keys = ScriptedKeys::new([key('q')]);

    let stop = run(&provider, &mut dashboard, &mut terminal, &mut keys, config(), never())
        .await
        .unwrap();
    assert_eq!(stop, Stop::Quit);
    assert_eq!(provider.calls(), 1);
    let first_row: String = (0..80)
        .map(|x| terminal.backend().buffer()[(x, 0)].symbol())
        .collect();
    assert!(first_row.contains("testhost"));
}

#[tokio::test(start_paused = true)]
async fn escape_and_ctrl_c_quit() {
    for event in [
        KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
    ] {
        let provider = FakeProvider::new(idle_snapshot(at(0)));
        let mut dashboard = Dashboard::new(&AppConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut keys = ScriptedKeys::new([Some(event)]);
        let stop = run(&provider, &mut dashboard, &mut terminal, &mut keys, config(), never())
            .await
            .unwrap();
        assert_eq!(stop, Stop::Quit);
    }
}

#[tokio::test(start_paused = true)]
async fn toggle_applies_and_loop_keeps_sampling() {
    let provider = FakeProvider::new(idle_snapshot(at(0)));
    let mut dashboard = Dashboard::new(&AppConfig::default());
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    // one toggle, then 25 idle poll rounds (about two and a half cycles)
    let script = std::iter::once(key('n'))
        .chain(std::iter::repeat_n(None, 25))
        .chain(std::iter::once(key('q')));
    let mut keys = ScriptedKeys::new(script);

    let stop = run(&provider, &mut dashboard, &mut terminal, &mut keys, config(), never())
        .await
        .unwrap();
    assert_eq!(stop, Stop::Quit);
    assert_eq!(provider.calls(), 3);
    assert!(!dashboard.toggles().is_enabled(PanelKind::Network));
}

#[tokio::test(start_paused = true)]
async fn unbound_keys_are_ignored() {
    let provider = FakeProvider::new(idle_snapshot(at(0)));
    let mut dashboard = Dashboard::new(&AppConfig::default());
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut keys = ScriptedKeys::new([key('x'), key('z'), key('q')]);

    let stop = run(&provider, &mut dashboard, &mut terminal, &mut keys, config(), never())
        .await
        .unwrap();
    assert_eq!(stop, Stop::Quit);
    assert!(!dashboard.show_help());
    assert!(dashboard.toggles().is_enabled(PanelKind::Network));
}

#[tokio::test(start_paused = true)]
async fn shutdown_signal_stops_loop() {
    let provider = FakeProvider::new(idle_snapshot(at(0)));
    let mut dashboard = Dashboard::new(&AppConfig::default());
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut keys = ScriptedKeys(VecDeque::new());
    let shutdown = tokio::time::sleep(Duration::from_millis(2500));

    let stop = run(&provider, &mut dashboard, &mut terminal, &mut keys, config(), shutdown)
        .await
        .unwrap();
    assert_eq!(stop, Stop::Signal);
    assert_eq!(provider.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn small_terminal_still_feeds_alert_log() {
    let mut snapshot = idle_snapshot(at(0));
    snapshot.cpu = Some(CpuPercents {
        user: 99.0,
        kernel: 0.5,
        nice: 0.0,
        idle: 0.5,
    });
    let provider = FakeProvider::new(snapshot);
    let mut dashboard = Dashboard::new(&AppConfig::default());
    let mut terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
    let mut keys = ScriptedKeys::new([key('q')]);

    run(&provider, &mut dashboard, &mut terminal, &mut keys, config(), never())
        .await
        .unwrap();
    assert!(dashboard.alerts().open_episode("CPU user").is_some());
}

/// Remembers when each key was handed out.
struct TimedKeys {
    script: VecDeque<KeyEvent>,
    handed_out: Vec<tokio::time::Instant>,
}

impl KeySource for TimedKeys {
    fn poll_key(&mut self) -> std::io::Result<Option<KeyEvent>> {
        let key = self.script.pop_front();
        if key.is_some() {
            self.handed_out.push(tokio::time::Instant::now());
        }
        Ok(key)
    }
}

#[tokio::test(start_paused = true)]
async fn queued_keys_are_read_one_per_poll_slice() {
    let provider = FakeProvider::new(idle_snapshot(at(0)));
    let mut dashboard = Dashboard::new(&AppConfig::default());
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut keys = TimedKeys {
        script: [key('n'), key('d'), key('q')].into_iter().flatten().collect(),
        handed_out: Vec::new(),
    };

    let stop = run(&provider, &mut dashboard, &mut terminal, &mut keys, config(), never())
        .await
        .unwrap();
    assert_eq!(stop, Stop::Quit);
    assert_eq!(keys.handed_out.len(), 3);
    for pair in keys.handed_out.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::from_millis(100));
    }
    assert!(!dashboard.toggles().is_enabled(PanelKind::Network));
    assert!(!dashboard.toggles().is_enabled(PanelKind::DiskIo));
}

// Refresh loop: sample, evaluate, render, then wait for the next cycle while
// polling the keyboard. Runs on the caller's task; nothing is spawned.

use std::future::Future;
use std::io::{self, Stdout};

use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tokio::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::input::{self, Action};
use crate::models::MetricSnapshot;
use crate::sysinfo_repo::MetricsProvider;

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Time between two samples.
    pub refresh_interval: Duration,
    /// Sleep slice between keyboard polls while waiting.
    pub poll_interval: Duration,
}

impl From<&AppConfig> for WorkerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            poll_interval: config.poll_interval(),
        }
    }
}

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// The user pressed a quit key.
    Quit,
    /// SIGINT or SIGTERM arrived.
    Signal,
}

/// Non-blocking keyboard source.
pub trait KeySource {
    /// Next pending key event, if any. Must not block.
    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>>;
}

/// Reads keys from the controlling terminal through crossterm.
#[derive(Debug, Default)]
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}

/// Raw mode plus alternate screen for the lifetime of the value.
/// Dropping it restores the terminal, including on early error or panic.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn start() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
            restore_terminal();
            return Err(e.into());
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                restore_terminal();
                Err(e.into())
            }
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
        tracing::debug!("terminal restored");
    }
}

fn restore_terminal() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// Resolves on SIGINT or SIGTERM (Ctrl-C only on non-unix).
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn draw<B: Backend>(
    terminal: &mut Terminal<B>,
    dashboard: &Dashboard,
    snapshot: &MetricSnapshot,
) -> io::Result<()> {
    terminal.draw(|frame| dashboard.draw(frame, snapshot))?;
    Ok(())
}

/// Drive the dashboard until a quit key or `shutdown` resolves.
///
/// Every cycle samples once, evaluates every cycle (also when the terminal
/// is too small to show anything), and redraws the whole screen. While
/// waiting for the next cycle, recognized keys are applied and trigger an
/// immediate redraw from the same snapshot.
#[tracing::instrument(
    skip_all,
    fields(refresh_ms = config.refresh_interval.as_millis() as u64)
)]
pub async fn run<P, B, K, S>(
    provider: &P,
    dashboard: &mut Dashboard,
    terminal: &mut Terminal<B>,
    keys: &mut K,
    config: WorkerConfig,
    shutdown: S,
) -> anyhow::Result<Stop>
where
    P: MetricsProvider,
    B: Backend,
    K: KeySource,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut cycles: u64 = 0;

    loop {
        let snapshot = tokio::select! {
            snapshot = provider.snapshot() => snapshot,
            _ = &mut shutdown => {
                tracing::info!(cycles, "received shutdown signal");
                return Ok(Stop::Signal);
            }
        };
        cycles += 1;

        dashboard.evaluate(&snapshot);
        draw(terminal, dashboard, &snapshot)?;

        let deadline = Instant::now() + config.refresh_interval;
        loop {
            // At most one key per slice; later keys wait for the next poll.
            if let Some(key) = keys.poll_key()?
                && let Some(action) = input::action_for(&key)
            {
                if action == Action::Quit {
                    tracing::info!(cycles, "quit requested");
                    return Ok(Stop::Quit);
                }
                tracing::debug!(?action, "key action");
                dashboard.apply(action);
                draw(terminal, dashboard, &snapshot)?;
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let slice = config.poll_interval.min(deadline - now);
            tokio::select! {
                _ = tokio::time::sleep(slice) => {}
                _ = &mut shutdown => {
                    tracing::info!(cycles, "received shutdown signal");
                    return Ok(Stop::Signal);
                }
            }
        }
    }
}

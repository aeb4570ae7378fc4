use anyhow::{Context, Result};
use glances::*;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// The screen belongs to the dashboard, so logs go to `logging.file` or nowhere.
fn init_tracing(logging: &config::LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_ansi(false);
    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = cli::parse();

    let mut app_config = config::AppConfig::load()?;
    if let Some(secs) = args.time {
        app_config = app_config.with_refresh_secs(secs)?;
    }
    init_tracing(&app_config.logging)?;
    tracing::info!(
        name = version::NAME,
        version = version::VERSION,
        refresh_secs = app_config.monitoring.refresh_secs,
        "starting"
    );

    let provider = sysinfo_repo::SysinfoRepo::new(app_config.filesystem.clone())
        .init()
        .await
        .context("metrics provider init")?;
    let mut dashboard = dashboard::Dashboard::new(&app_config);

    let mut session = worker::TerminalSession::start().context("terminal setup")?;
    let result = worker::run(
        &provider,
        &mut dashboard,
        session.terminal_mut(),
        &mut worker::CrosstermKeys,
        worker::WorkerConfig::from(&app_config),
        worker::shutdown_signal(),
    )
    .await;
    drop(session);

    let stop = result?;
    tracing::info!(?stop, "stopped");
    Ok(())
}

// One full render pass: every section is written at the coordinates the
// layout plan chose, clipped to the frame.

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear};

use crate::alert_log::AlertEpisode;
use crate::input::KEY_HELP;
use crate::layout::*;
use crate::models::*;
use crate::sort_policy::SortKey;
use crate::thresholds::{MetricClass, Severity, ThresholdEvaluator};
use crate::version;

const MB: u64 = 1_048_576;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Styles for titles and severities, fixed for the session.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    severity: [Style; 4],
    title: Style,
    help: Style,
}

impl Palette {
    pub fn new(monochrome: bool) -> Self {
        let title = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        let help = Style::default().add_modifier(Modifier::BOLD);
        let severity = if monochrome {
            [
                Style::default(),
                Style::default().add_modifier(Modifier::UNDERLINED),
                Style::default().add_modifier(Modifier::BOLD),
                Style::default().add_modifier(Modifier::REVERSED),
            ]
        } else {
            let pair = |bg| {
                Style::default()
                    .fg(Color::White)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD)
            };
            [
                pair(Color::Green),
                pair(Color::Blue),
                pair(Color::Magenta),
                pair(Color::Red),
            ]
        };
        Self {
            severity,
            title,
            help,
        }
    }

    pub fn severity(&self, severity: Severity) -> Style {
        self.severity[severity as usize]
    }

    pub fn title(&self) -> Style {
        self.title
    }
}

/// Scale a byte (or bit) count with a K/M/G suffix.
pub fn auto_unit(val: f64) -> String {
    const K: f64 = 1024.0;
    if val >= K * K * K {
        format!("{:.1}G", val / (K * K * K))
    } else if val >= K * K {
        format!("{:.1}M", val / (K * K))
    } else if val >= K {
        format!("{:.1}K", val / K)
    } else {
        format!("{}", val as u64)
    }
}

/// One line of the alert log panel, without the leading marker.
pub fn format_episode(episode: &AlertEpisode) -> String {
    let end = match episode.end {
        Some(end) => end.format(TIME_FORMAT).to_string(),
        None => "_".repeat(19),
    };
    format!(
        "  {} > {} {} ({:.1}/{:.1}/{:.1})",
        episode.start.format(TIME_FORMAT),
        end,
        episode.label,
        episode.min,
        episode.avg(),
        episode.max
    )
}

pub fn log_title(shown: usize) -> String {
    let mut title = String::from("Warning and Critical logs for CPU|LOAD|MEM|FS");
    if shown > 1 {
        title.push_str(&format!(" (lasts {} entries)", shown));
    } else {
        title.push_str(" (one entry)");
    }
    title
}

/// Everything a render pass reads.
pub struct RenderContext<'a> {
    pub snapshot: &'a MetricSnapshot,
    pub plan: &'a LayoutPlan,
    pub evaluator: &'a ThresholdEvaluator,
    pub palette: &'a Palette,
    pub episodes: &'a [AlertEpisode],
    /// Process list already ordered by `sort_key`.
    pub processes: &'a [ProcessInfo],
    pub sort_key: SortKey,
    pub show_help: bool,
}

/// Bounded-width write at (x, y); anything outside the frame is dropped.
fn put(frame: &mut Frame, x: u16, y: u16, text: &str, max_width: u16, style: Style) {
    let area = frame.area();
    if x >= area.right() || y >= area.bottom() {
        return;
    }
    let width = max_width.min(area.right() - x);
    frame
        .buffer_mut()
        .set_stringn(x, y, text, usize::from(width), style);
}

fn centred_x(width: u16, text: &str) -> u16 {
    (width / 2).saturating_sub(text.chars().count() as u16 / 2)
}

pub fn render(frame: &mut Frame, ctx: &RenderContext<'_>) {
    let plan = ctx.plan;
    if plan.fixed.host {
        render_host(frame, ctx);
    }
    if plan.fixed.system {
        render_system(frame, ctx);
    }
    if plan.fixed.cpu {
        render_cpu(frame, ctx);
    }
    if plan.fixed.load {
        render_load(frame, ctx);
    }
    if plan.fixed.mem {
        render_mem(frame, ctx);
    }
    for placement in &plan.panels {
        match placement.kind {
            PanelKind::Network => render_network(frame, ctx, placement),
            PanelKind::DiskIo => render_disk_io(frame, ctx, placement),
            PanelKind::FileSystem => render_fs(frame, ctx, placement),
            PanelKind::Log => render_log(frame, ctx, placement),
        }
    }
    render_process(frame, ctx);
    if plan.fixed.caption {
        render_caption(frame, ctx);
    }
    if plan.fixed.now {
        render_now(frame, ctx.plan, ctx.snapshot.timestamp);
    }
    if ctx.show_help
        && let Some(area) = plan.help_area()
    {
        render_help(frame, ctx.palette, area);
    }
}

fn render_host(frame: &mut Frame, ctx: &RenderContext<'_>) {
    let Some(host) = &ctx.snapshot.host else {
        return;
    };
    let msg = version::banner(&host.hostname);
    let x = centred_x(ctx.plan.width, &msg);
    put(frame, x, HOST_Y, &msg, NOMINAL_WIDTH, ctx.palette.title());
}

fn render_system(frame: &mut Frame, ctx: &RenderContext<'_>) {
    let Some(host) = &ctx.snapshot.host else {
        return;
    };
    let msg = format!("{} {} {}", host.os_name, host.platform, host.os_version);
    let x = centred_x(ctx.plan.width, &msg);
    put(frame, x, SYSTEM_Y, &msg, NOMINAL_WIDTH, Style::default());
}

fn render_cpu(frame: &mut Frame, ctx: &RenderContext<'_>) {
    let Some(cpu) = &ctx.snapshot.cpu else {
        return;
    };
    let (x, y) = (CPU_X, STATS_Y);
    put(frame, x, y, "Cpu", 8, ctx.palette.title());
    put(frame, x + 10, y, "%", 8, Style::default());
    let rows = [
        ("User:", cpu.user, true),
        ("Kernel:", cpu.kernel, true),
        ("Nice:", cpu.nice, true),
        ("Idle:", cpu.idle, false),
    ];
    for (i, (label, value, styled)) in rows.into_iter().enumerate() {
        let row = y + 1 + i as u16;
        let style = if styled {
            ctx.palette.severity(ctx.evaluator.classify_percent(value))
        } else {
            Style::default()
        };
        put(frame, x, row, label, 8, Style::default());
        put(frame, x + 10, row, &format!("{:.1}", value), 8, style);
    }
}

fn render_load(frame: &mut Frame, ctx: &RenderContext<'_>) {
    let Some(load) = &ctx.snapshot.load else {
        return;
    };
    let (x, y) = (LOAD_X, STATS_Y);
    let cores = ctx.snapshot.core_count;
    put(frame, x, y, "Load", 8, ctx.palette.title());
    put(
        frame,
        x + 10,
        y,
        &format!("{}-Core", cores.unwrap_or(1)),
        8,
        Style::default(),
    );
    let rows = [
        ("1 min:", load.min1, false),
        ("5 mins:", load.min5, true),
        ("15 mins:", load.min15, true),
    ];
    for (i, (label, value, styled)) in rows.into_iter().enumerate() {
        let row = y + 1 + i as u16;
        let style = if styled {
            ctx.palette
                .severity(ctx.evaluator.classify_load(value, cores))
        } else {
            Style::default()
        };
        put(frame, x, row, label, 8, Style::default());
        put(frame, x + 10, row, &format!("{:.2}", value), 8, style);
    }
}

fn render_mem(frame: &mut Frame, ctx: &RenderContext<'_>) {
    let (Some(mem), Some(swap)) = (&ctx.snapshot.mem, &ctx.snapshot.swap) else {
        return;
    };
    let (x, y) = (MEM_X, STATS_Y);
    let plain = Style::default();
    put(frame, x, y, "Mem MB", 8, ctx.palette.title());
    put(frame, x + 10, y, "Mem", 8, plain);
    put(frame, x + 20, y, "Swap", 8, plain);
    put(frame, x + 30, y, "Real", 8, plain);
    put(frame, x, y + 1, "Total:", 8, plain);
    put(frame, x, y + 2, "Used:", 8, plain);
    put(frame, x, y + 3, "Free:", 8, plain);

    let mb = |v: u64| (v / MB).to_string();
    put(frame, x + 10, y + 1, &mb(mem.total), 8, plain);
    put(frame, x + 10, y + 2, &mb(mem.used), 8, plain);
    put(frame, x + 10, y + 3, &mb(mem.free), 8, plain);

    let swap_style = ctx.palette.severity(ctx.evaluator.classify(
        swap.used as f64,
        swap.total as f64,
        MetricClass::Std,
    ));
    put(frame, x + 20, y + 1, &mb(swap.total), 8, plain);
    put(frame, x + 20, y + 2, &mb(swap.used), 8, swap_style);
    put(frame, x + 20, y + 3, &mb(swap.free), 8, plain);

    let real_style = ctx.palette.severity(ctx.evaluator.classify(
        mem.real_used() as f64,
        mem.total as f64,
        MetricClass::Std,
    ));
    put(frame, x + 30, y + 1, "-", 8, plain);
    put(frame, x + 30, y + 2, &mb(mem.real_used()), 8, real_style);
    put(frame, x + 30, y + 3, &mb(mem.real_free()), 8, plain);
}

fn render_panel_header(
    frame: &mut Frame,
    ctx: &RenderContext<'_>,
    p: &PanelPlacement,
    columns: [&str; 3],
) {
    put(frame, p.x, p.y, columns[0], 8, ctx.palette.title());
    put(frame, p.x + 10, p.y, columns[1], 8, Style::default());
    put(frame, p.x + 20, p.y, columns[2], 8, Style::default());
}

fn render_network(frame: &mut Frame, ctx: &RenderContext<'_>, p: &PanelPlacement) {
    let Some(interfaces) = &ctx.snapshot.network else {
        return;
    };
    render_panel_header(frame, ctx, p, ["Net rate", "Rx/ps", "Tx/ps"]);
    for (i, iface) in interfaces.iter().take(p.rows).enumerate() {
        let row = p.y + 1 + i as u16;
        let speed = iface.speed_bits as f64;
        let rx = iface.rx_bits_per_sec();
        let tx = iface.tx_bits_per_sec();
        let style = |v| {
            ctx.palette
                .severity(ctx.evaluator.classify(v, speed, MetricClass::Std))
        };
        put(frame, p.x, row, &format!("{}:", iface.name), 8, Style::default());
        put(frame, p.x + 10, row, &format!("{}b", auto_unit(rx)), 8, style(rx));
        put(frame, p.x + 20, row, &format!("{}b", auto_unit(tx)), 8, style(tx));
    }
}

fn render_disk_io(frame: &mut Frame, ctx: &RenderContext<'_>, p: &PanelPlacement) {
    let Some(disks) = &ctx.snapshot.disk_io else {
        return;
    };
    render_panel_header(frame, ctx, p, ["Disk I/O", "In/ps", "Out/ps"]);
    for (i, disk) in disks.iter().take(p.rows).enumerate() {
        let row = p.y + 1 + i as u16;
        let plain = Style::default();
        put(frame, p.x, row, &format!("{}:", disk.name), 8, plain);
        put(
            frame,
            p.x + 10,
            row,
            &format!("{}B", auto_unit(disk.read_per_sec())),
            8,
            plain,
        );
        put(
            frame,
            p.x + 20,
            row,
            &format!("{}B", auto_unit(disk.write_per_sec())),
            8,
            plain,
        );
    }
}

fn render_fs(frame: &mut Frame, ctx: &RenderContext<'_>, p: &PanelPlacement) {
    let Some(filesystems) = &ctx.snapshot.filesystems else {
        return;
    };
    render_panel_header(frame, ctx, p, ["Mount", "Total", "Used"]);
    for (i, fs) in filesystems.iter().take(p.rows).enumerate() {
        let row = p.y + 1 + i as u16;
        let style = ctx.palette.severity(ctx.evaluator.classify(
            fs.used as f64,
            fs.size as f64,
            MetricClass::Std,
        ));
        put(frame, p.x, row, &fs.mount_point, 8, Style::default());
        put(
            frame,
            p.x + 10,
            row,
            &auto_unit(fs.size as f64),
            8,
            Style::default(),
        );
        put(frame, p.x + 20, row, &auto_unit(fs.used as f64), 8, style);
    }
}

fn render_log(frame: &mut Frame, ctx: &RenderContext<'_>, p: &PanelPlacement) {
    put(frame, p.x, p.y, &log_title(p.rows), 79, ctx.palette.title());
    for (i, episode) in ctx.episodes.iter().take(p.rows).enumerate() {
        let row = p.y + 1 + i as u16;
        put(frame, p.x, row, &format_episode(episode), 79, Style::default());
        let mark = if episode.is_open() { "~" } else { " " };
        put(
            frame,
            p.x,
            row,
            mark,
            1,
            ctx.palette.severity(episode.peak_severity),
        );
    }
}

fn render_process(frame: &mut Frame, ctx: &RenderContext<'_>) {
    let place = &ctx.plan.process;
    let (x, y) = (place.x, place.y);
    let plain = Style::default();
    if place.show_summary
        && let Some(count) = &ctx.snapshot.process_count
    {
        put(frame, x, y, "Process", 8, ctx.palette.title());
        put(frame, x + 10, y, "Total", 8, plain);
        put(frame, x + 20, y, "Running", 8, plain);
        put(frame, x + 30, y, "Sleeping", 8, plain);
        put(frame, x + 40, y, "Other", 8, plain);
        put(frame, x, y + 1, "Number:", 8, plain);
        put(frame, x + 10, y + 1, &count.total.to_string(), 8, plain);
        put(frame, x + 20, y + 1, &count.running.to_string(), 8, plain);
        put(frame, x + 30, y + 1, &count.sleeping.to_string(), 8, plain);
        put(frame, x + 40, y + 1, &count.other().to_string(), 8, plain);
    }
    if !place.show_detail || ctx.snapshot.processes.is_none() {
        return;
    }
    let marker = |key| if ctx.sort_key == key { "^" } else { " " };
    put(frame, x, y + 3, &format!("Cpu %{}", marker(SortKey::Cpu)), 8, plain);
    put(
        frame,
        x + 10,
        y + 3,
        &format!("Size MB{}", marker(SortKey::Size)),
        8,
        plain,
    );
    put(frame, x + 20, y + 3, "Res MB", 8, plain);
    put(frame, x + 30, y + 3, "Name", 8, plain);

    let max_name = ctx.plan.width.saturating_sub(x + 30);
    for (i, proc_) in ctx.processes.iter().take(place.rows).enumerate() {
        let row = y + 4 + i as u16;
        let cpu_style = ctx
            .palette
            .severity(ctx.evaluator.classify_percent(proc_.cpu_percent));
        put(frame, x, row, &format!("{:.1}", proc_.cpu_percent), 8, cpu_style);
        put(frame, x + 10, row, &(proc_.virtual_size / MB).to_string(), 8, plain);
        put(frame, x + 20, row, &(proc_.resident / MB).to_string(), 8, plain);
        let title_len = proc_.title.chars().count();
        let name = if title_len == 0 || title_len > usize::from(max_name) {
            &proc_.name
        } else {
            &proc_.title
        };
        put(frame, x + 30, row, name, max_name, plain);
    }
}

fn render_caption(frame: &mut Frame, ctx: &RenderContext<'_>) {
    let y = ctx.plan.height.saturating_sub(1).max(STATS_Y);
    let labels = ["   OK   ", "CAREFUL ", "WARNING ", "CRITICAL"];
    for (i, (label, severity)) in labels.iter().zip(Severity::ALL).enumerate() {
        put(
            frame,
            i as u16 * 8,
            y,
            label,
            8,
            ctx.palette.severity(severity),
        );
    }
}

fn render_now(frame: &mut Frame, plan: &LayoutPlan, now: DateTime<Local>) {
    let msg = now.format(TIME_FORMAT).to_string();
    let y = plan.height.saturating_sub(1).max(STATS_Y);
    let len = msg.chars().count() as u16;
    let x = plan.width.saturating_sub(1).saturating_sub(len);
    put(frame, x, y, &msg, len, Style::default());
}

fn render_help(frame: &mut Frame, palette: &Palette, area: Rect) {
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title("Glances help (press 'h' to hide)"),
        area,
    );
    let width = area.width.saturating_sub(4);
    for (i, (key, what)) in KEY_HELP.iter().enumerate() {
        let row = area.y + 1 + i as u16;
        if row >= area.bottom().saturating_sub(1) {
            break;
        }
        put(
            frame,
            area.x + 2,
            row,
            &format!("'{}'  {}", key, what),
            width,
            palette.help,
        );
    }
}

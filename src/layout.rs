// Panel placement as a function of terminal size and toggle state.
//
// Optional panels have no fixed coordinates: they are placed top to bottom
// in a fixed order starting at OPTIONAL_PANELS_Y, each one starting where
// the previous one ended. A panel that is switched off, has nothing to show
// or does not fit takes no rows and the next panel moves up.

use ratatui::layout::Rect;

pub const HOST_Y: u16 = 0;
pub const SYSTEM_Y: u16 = 1;
pub const CPU_X: u16 = 0;
pub const LOAD_X: u16 = 20;
pub const MEM_X: u16 = 41;
pub const STATS_Y: u16 = 3;
pub const OPTIONAL_PANELS_X: u16 = 0;
pub const OPTIONAL_PANELS_Y: u16 = 9;
pub const PROCESS_X: u16 = 30;
pub const PROCESS_Y: u16 = 9;
pub const HELP_X: u16 = 30;
pub const HELP_Y: u16 = 12;
/// Nominal terminal size the fixed geometry was drawn for.
pub const NOMINAL_WIDTH: u16 = 80;
pub const NOMINAL_HEIGHT: u16 = 24;

/// Rows a panel needs below its offset: title, one entry, spacer and the
/// caption row at the bottom of the screen.
const PANEL_MIN_HEIGHT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Network,
    DiskIo,
    FileSystem,
    Log,
}

impl PanelKind {
    /// Placement order.
    pub const ORDER: [PanelKind; 4] = [
        PanelKind::Network,
        PanelKind::DiskIo,
        PanelKind::FileSystem,
        PanelKind::Log,
    ];

    pub fn min_width(self) -> u16 {
        match self {
            PanelKind::Network | PanelKind::DiskIo | PanelKind::FileSystem => 29,
            PanelKind::Log => NOMINAL_WIDTH,
        }
    }

    pub fn min_height(self) -> u16 {
        PANEL_MIN_HEIGHT
    }
}

/// Session-long visibility switches for the optional panels; all on at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelToggleState {
    pub network: bool,
    pub disk_io: bool,
    pub filesystem: bool,
    pub log: bool,
}

impl Default for PanelToggleState {
    fn default() -> Self {
        Self {
            network: true,
            disk_io: true,
            filesystem: true,
            log: true,
        }
    }
}

impl PanelToggleState {
    pub fn is_enabled(&self, kind: PanelKind) -> bool {
        match kind {
            PanelKind::Network => self.network,
            PanelKind::DiskIo => self.disk_io,
            PanelKind::FileSystem => self.filesystem,
            PanelKind::Log => self.log,
        }
    }

    pub fn toggle(&mut self, kind: PanelKind) {
        let flag = match kind {
            PanelKind::Network => &mut self.network,
            PanelKind::DiskIo => &mut self.disk_io,
            PanelKind::FileSystem => &mut self.filesystem,
            PanelKind::Log => &mut self.log,
        };
        *flag = !*flag;
    }
}

/// What a panel asks for this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRequest {
    pub kind: PanelKind,
    pub min_width: u16,
    pub min_height: u16,
    /// Entries the panel would like to list; 0 means no data.
    pub entries: usize,
    pub enabled: bool,
}

impl PanelRequest {
    pub fn new(kind: PanelKind, entries: usize, enabled: bool) -> Self {
        Self {
            kind,
            min_width: kind.min_width(),
            min_height: kind.min_height(),
            entries,
            enabled,
        }
    }
}

/// Where a panel landed and how many of its entries fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelPlacement {
    pub kind: PanelKind,
    pub x: u16,
    pub y: u16,
    pub height: u16,
    pub rows: usize,
}

/// Place `requests` in order starting at row `start_y`. Returns the placed
/// panels and the total rows they consume.
pub fn place_panels(
    requests: &[PanelRequest],
    width: u16,
    height: u16,
    start_y: u16,
) -> (Vec<PanelPlacement>, u16) {
    let mut placements = Vec::with_capacity(requests.len());
    let mut offset = start_y;
    let mut consumed: u16 = 0;
    for req in requests {
        let Some(placement) = place_one(req, width, height, offset) else {
            continue;
        };
        offset = offset.saturating_add(placement.height);
        consumed = consumed.saturating_add(placement.height);
        placements.push(placement);
    }
    (placements, consumed)
}

fn place_one(req: &PanelRequest, width: u16, height: u16, offset: u16) -> Option<PanelPlacement> {
    if !req.enabled || req.entries == 0 {
        return None;
    }
    let min_height = req.min_height.max(1);
    if width < req.min_width || u32::from(height) < u32::from(offset) + u32::from(min_height) {
        return None;
    }
    let room = usize::from(height - offset - (min_height - 1));
    let rows = req.entries.min(room);
    let panel_height = rows as u16 + 2;
    let y = match req.kind {
        // The log hugs the caption row when there is slack below it.
        PanelKind::Log => offset.max(height.saturating_sub(1 + panel_height)),
        _ => offset,
    };
    Some(PanelPlacement {
        kind: req.kind,
        x: OPTIONAL_PANELS_X,
        y,
        height: panel_height,
        rows,
    })
}

/// Fixed-position sections that are drawn when the terminal is large enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPanels {
    pub host: bool,
    pub system: bool,
    pub cpu: bool,
    pub load: bool,
    pub mem: bool,
    pub caption: bool,
    pub now: bool,
    pub help: bool,
}

impl FixedPanels {
    pub fn for_size(width: u16, height: u16) -> Self {
        Self {
            host: height > HOST_Y && width >= NOMINAL_WIDTH,
            system: height > SYSTEM_Y && width >= NOMINAL_WIDTH,
            cpu: height > STATS_Y + 6 && width > CPU_X + 18,
            load: height > STATS_Y + 5 && width > LOAD_X + 18,
            mem: height > STATS_Y + 5 && width > MEM_X + 38,
            caption: height > STATS_Y && width > 32,
            now: height > STATS_Y && width >= NOMINAL_WIDTH,
            help: height >= NOMINAL_HEIGHT && width >= NOMINAL_WIDTH,
        }
    }
}

/// Placement of the process panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessPlacement {
    pub x: u16,
    pub y: u16,
    pub show_summary: bool,
    pub show_detail: bool,
    /// Process rows that fit under the detail header.
    pub rows: usize,
}

impl ProcessPlacement {
    fn compute(width: u16, height: u16, column_used: bool, log: Option<&PanelPlacement>) -> Self {
        let x = if column_used { PROCESS_X } else { 0 };
        let y = PROCESS_Y;
        let caption_row = height.saturating_sub(1);
        let bottom = log.map_or(caption_row, |l| l.y.min(caption_row));
        let show_summary = u32::from(bottom) > u32::from(y) + 1 && u32::from(width) > u32::from(x) + 48;
        let show_detail = u32::from(bottom) > u32::from(y) + 4 && u32::from(width) > u32::from(x) + 49;
        let rows = if show_detail {
            usize::from(bottom - (y + 4))
        } else {
            0
        };
        Self {
            x,
            y,
            show_summary,
            show_detail,
            rows,
        }
    }
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    pub width: u16,
    pub height: u16,
    pub fixed: FixedPanels,
    pub panels: Vec<PanelPlacement>,
    /// Rows consumed by the optional panels.
    pub consumed: u16,
    pub process: ProcessPlacement,
}

impl LayoutPlan {
    pub fn panel(&self, kind: PanelKind) -> Option<&PanelPlacement> {
        self.panels.iter().find(|p| p.kind == kind)
    }

    pub fn help_area(&self) -> Option<Rect> {
        self.fixed.help.then(|| {
            Rect::new(
                HELP_X,
                HELP_Y,
                NOMINAL_WIDTH - HELP_X,
                NOMINAL_HEIGHT - HELP_Y - 2,
            )
        })
    }
}

/// Entry counts available for each optional panel this cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelEntries {
    pub network: usize,
    pub disk_io: usize,
    pub filesystem: usize,
    pub log: usize,
}

impl PanelEntries {
    fn get(&self, kind: PanelKind) -> usize {
        match kind {
            PanelKind::Network => self.network,
            PanelKind::DiskIo => self.disk_io,
            PanelKind::FileSystem => self.filesystem,
            PanelKind::Log => self.log,
        }
    }
}

/// Owns the toggle state and turns terminal size + entry counts into a plan.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    toggles: PanelToggleState,
}

impl LayoutEngine {
    pub fn new(toggles: PanelToggleState) -> Self {
        Self { toggles }
    }

    pub fn toggles(&self) -> &PanelToggleState {
        &self.toggles
    }

    pub fn toggle(&mut self, kind: PanelKind) {
        self.toggles.toggle(kind);
        tracing::debug!(?kind, enabled = self.toggles.is_enabled(kind), "panel toggled");
    }

    pub fn compute(&self, width: u16, height: u16, entries: &PanelEntries) -> LayoutPlan {
        let requests: Vec<PanelRequest> = PanelKind::ORDER
            .iter()
            .map(|&kind| PanelRequest::new(kind, entries.get(kind), self.toggles.is_enabled(kind)))
            .collect();
        let (panels, consumed) = place_panels(&requests, width, height, OPTIONAL_PANELS_Y);
        let column_used = panels.iter().any(|p| p.kind != PanelKind::Log);
        let log = panels.iter().find(|p| p.kind == PanelKind::Log);
        let process = ProcessPlacement::compute(width, height, column_used, log);
        LayoutPlan {
            width,
            height,
            fixed: FixedPanels::for_size(width, height),
            panels,
            consumed,
            process,
        }
    }
}

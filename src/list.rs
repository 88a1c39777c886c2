//! Virtualized list layout and view building.
//!
//! The expanded window is a fixed 280x320 surface: a header strip with the
//! status line and controls, then a scrollable list viewport. Only the rows
//! intersecting the viewport (plus overscan) are materialized, each at an
//! absolute offset inside the virtual extent so scrolling never re-lays-out
//! settled rows. The same pass that builds the [`ViewModel`] also builds
//! the [`RegionSnapshot`] the hover simulator and click routing consume, so
//! paint and hit-testing can never disagree.

use crate::geometry::LogicalRect;
use crate::host::{RowView, ViewModel};
use crate::hover::{RegionKind, RegionSnapshot};
use crate::item::ReviewItem;
use crate::placement::SnapSide;
use crate::queue::QueueModel;
use crate::window::{COLLAPSED_HEIGHT, EXPANDED_HEIGHT, EXPANDED_WIDTH, collapsed_width};
use std::ops::Range;
use unicode_width::UnicodeWidthChar;

pub const ROW_HEIGHT: f64 = 56.0;
pub const OVERSCAN: usize = 5;
/// Scrolling within this distance of the end requests the next page.
pub const LOAD_MORE_MARGIN: f64 = 100.0;
pub const LIST_MAX_HEIGHT: f64 = 200.0;

pub const HEADER_HEIGHT: f64 = 40.0;
const CONTROL_SIZE: f64 = 20.0;
const CONTROL_Y: f64 = 10.0;
const DISMISS_SIZE: f64 = 24.0;

const TITLE_MAX_COLS: usize = 28;

// ---------------------------------------------------------------------------
// Virtualization
// ---------------------------------------------------------------------------

/// Window into a fixed-row-height virtual list.
#[derive(Debug, Clone, Copy)]
pub struct Virtualizer {
    count: usize,
    scroll_top: f64,
    viewport: f64,
}

impl Virtualizer {
    pub fn new(count: usize, scroll_top: f64) -> Self {
        Self {
            count,
            scroll_top,
            viewport: LIST_MAX_HEIGHT,
        }
    }

    pub fn total_size(&self) -> f64 {
        self.count as f64 * ROW_HEIGHT
    }

    pub fn offset(&self, index: usize) -> f64 {
        index as f64 * ROW_HEIGHT
    }

    /// Indices to materialize: the rows crossing the viewport widened by
    /// [`OVERSCAN`] on both sides.
    pub fn visible_range(&self) -> Range<usize> {
        if self.count == 0 {
            return 0..0;
        }
        let first = (self.scroll_top / ROW_HEIGHT).floor() as usize;
        let last = ((self.scroll_top + self.viewport) / ROW_HEIGHT).ceil() as usize;
        first.saturating_sub(OVERSCAN)..(last + OVERSCAN).min(self.count)
    }

    /// True once the remaining distance to the bottom drops strictly under
    /// [`LOAD_MORE_MARGIN`].
    pub fn should_load_more(&self, has_more: bool) -> bool {
        has_more && self.total_size() - (self.scroll_top + self.viewport) < LOAD_MORE_MARGIN
    }

    /// Clamp a reported scroll offset to the valid range.
    pub fn clamp_scroll(&self, top: f64) -> f64 {
        top.clamp(0.0, (self.total_size() - self.viewport).max(0.0))
    }
}

// ---------------------------------------------------------------------------
// Row text
// ---------------------------------------------------------------------------

/// Column-aware truncation with a trailing ellipsis.
pub fn truncate_title(title: &str, max_cols: usize) -> String {
    let total: usize = title.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_cols {
        return title.to_string();
    }
    let mut out = String::new();
    let mut cols = 0;
    for ch in title.chars() {
        let w = ch.width().unwrap_or(0);
        if cols + w > max_cols.saturating_sub(1) {
            break;
        }
        cols += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Row title: the item title, suffixed with its tmux window and pane when
/// the item carries that context.
pub fn row_title(item: &ReviewItem) -> String {
    let full = match (&item.tmux_window, &item.tmux_pane) {
        (Some(window), Some(pane)) => format!("{} ({window}, {pane})", item.title),
        _ => item.title.clone(),
    };
    truncate_title(&full, TITLE_MAX_COLS)
}

/// Coarse wall-clock age. Timestamps are seconds since the epoch.
pub fn format_relative_time(timestamp: u64, now: u64) -> String {
    let elapsed = now.saturating_sub(timestamp);
    if elapsed < 60 {
        "Just now".to_string()
    } else if elapsed < 3600 {
        format!("{}m ago", elapsed / 60)
    } else if elapsed < 86_400 {
        format!("{}h ago", elapsed / 3600)
    } else {
        format!("{}d ago", elapsed / 86_400)
    }
}

pub fn row_subtitle(item: &ReviewItem, now: u64) -> String {
    format!("#{} · {}", item.seq, format_relative_time(item.timestamp, now))
}

/// Header status line.
pub fn status_line(queue: &QueueModel) -> String {
    let pending = queue.pending_len();
    if queue.show_only_pending() {
        format!("{pending} pending")
    } else {
        let more = if queue.has_more_completed() { "+" } else { "" };
        format!("{pending} pending · {}{more} done", queue.completed_len())
    }
}

// ---------------------------------------------------------------------------
// View building
// ---------------------------------------------------------------------------

fn intersect(a: LogicalRect, b: LogicalRect) -> Option<LogicalRect> {
    let x = a.x.max(b.x);
    let y = a.y.max(b.y);
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    (right > x && bottom > y).then(|| LogicalRect::new(x, y, right - x, bottom - y))
}

/// Build the collapsed badge view and its single clickable region.
pub fn build_collapsed(
    queue: &QueueModel,
    shake: bool,
    rounding: SnapSide,
) -> (ViewModel, RegionSnapshot) {
    let view = ViewModel::Collapsed {
        badge_count: queue.pending_len(),
        shake,
        rounding,
    };
    let mut regions = RegionSnapshot::new();
    regions.push(
        LogicalRect::new(0.0, 0.0, collapsed_width(), COLLAPSED_HEIGHT),
        RegionKind::Chrome,
        None,
    );
    (view, regions)
}

/// Build the expanded view: header with controls, then the materialized
/// slice of the virtual list. Region rects are clipped to the viewport so
/// half-scrolled rows are only clickable where they are visible.
pub fn build_expanded(
    queue: &QueueModel,
    scroll_top: f64,
    hovered_row: Option<&str>,
    now: u64,
) -> (ViewModel, RegionSnapshot) {
    let display = queue.display_items();
    let virt = Virtualizer::new(display.len(), scroll_top);
    let show_clear = !queue.show_only_pending() && queue.completed_len() > 0;

    let mut regions = RegionSnapshot::new();
    let root = regions.push(
        LogicalRect::new(0.0, 0.0, EXPANDED_WIDTH, EXPANDED_HEIGHT),
        RegionKind::Surface,
        None,
    );
    let header = regions.push(
        LogicalRect::new(0.0, 0.0, EXPANDED_WIDTH, HEADER_HEIGHT),
        RegionKind::Chrome,
        Some(root),
    );
    regions.push(
        LogicalRect::new(200.0, CONTROL_Y, CONTROL_SIZE, CONTROL_SIZE),
        RegionKind::FilterToggle,
        Some(header),
    );
    if show_clear {
        regions.push(
            LogicalRect::new(226.0, CONTROL_Y, CONTROL_SIZE, CONTROL_SIZE),
            RegionKind::ClearButton,
            Some(header),
        );
    }
    regions.push(
        LogicalRect::new(252.0, CONTROL_Y, CONTROL_SIZE, CONTROL_SIZE),
        RegionKind::CloseControl,
        Some(header),
    );

    let viewport = LogicalRect::new(0.0, HEADER_HEIGHT, EXPANDED_WIDTH, LIST_MAX_HEIGHT);
    regions.push(viewport, RegionKind::Surface, Some(root));

    let mut rows = Vec::new();
    for index in virt.visible_range() {
        let entry = &display[index];
        let offset = virt.offset(index);
        let hovered = hovered_row == Some(entry.item.id.as_str());
        let show_dismiss = hovered && !entry.completed;

        rows.push(RowView {
            id: entry.item.id.clone(),
            offset,
            height: ROW_HEIGHT,
            title: row_title(entry.item),
            subtitle: row_subtitle(entry.item, now),
            completed: entry.completed,
            hovered,
            show_dismiss,
        });

        let row_y = viewport.y + offset - scroll_top;
        let row_rect = LogicalRect::new(0.0, row_y, EXPANDED_WIDTH, ROW_HEIGHT);
        let Some(clipped) = intersect(row_rect, viewport) else {
            continue;
        };
        let row_region = regions.push(
            clipped,
            RegionKind::Row {
                id: entry.item.id.clone(),
            },
            Some(root),
        );
        if show_dismiss {
            let dismiss = LogicalRect::new(
                EXPANDED_WIDTH - 36.0,
                row_y + (ROW_HEIGHT - DISMISS_SIZE) / 2.0,
                DISMISS_SIZE,
                DISMISS_SIZE,
            );
            if let Some(clipped) = intersect(dismiss, viewport) {
                regions.push(
                    clipped,
                    RegionKind::Dismiss {
                        id: entry.item.id.clone(),
                    },
                    Some(row_region),
                );
            }
        }
    }

    let empty = display.is_empty().then(|| {
        if queue.show_only_pending() {
            "No pending reviews".to_string()
        } else {
            "No messages".to_string()
        }
    });

    let view = ViewModel::Expanded {
        status: status_line(queue),
        show_clear,
        show_only_pending: queue.show_only_pending(),
        total_height: virt.total_size(),
        empty,
        rows,
    };
    (view, regions)
}

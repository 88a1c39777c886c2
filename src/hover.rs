//! Hover simulation over a flat region snapshot.
//!
//! The overlay window never has keyboard focus and the OS will not deliver
//! enter/leave events to it, so hover is synthesized: every locator tick the
//! current cursor point is hit-tested against a snapshot of the rendered
//! regions, and the differences drive row highlighting and the cursor
//! glyph. All updates are idempotent so a cursor parked on one spot costs
//! nothing after the first tick.

use crate::geometry::{LogicalPoint, LogicalRect};
use crate::host::CursorGlyph;

/// What a region means to input routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionKind {
    /// Inert container, neither clickable nor hoverable.
    Surface,
    /// Header / collapsed badge area. Clicks here toggle or consume;
    /// presses here may start a drag.
    Chrome,
    CloseControl,
    FilterToggle,
    ClearButton,
    Row { id: String },
    Dismiss { id: String },
}

impl RegionKind {
    fn interactive(&self) -> bool {
        !matches!(self, RegionKind::Surface)
    }

    /// Group regions are coarse hover targets: hovering any descendant
    /// highlights the whole row.
    fn group(&self) -> bool {
        matches!(self, RegionKind::Row { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Region {
    pub rect: LogicalRect,
    pub kind: RegionKind,
    pub parent: Option<usize>,
}

/// Snapshot of rendered regions in paint order: later entries are on top.
#[derive(Debug, Clone, Default)]
pub struct RegionSnapshot {
    regions: Vec<Region>,
}

impl RegionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a region, returning its index for use as a parent link.
    pub fn push(&mut self, rect: LogicalRect, kind: RegionKind, parent: Option<usize>) -> usize {
        self.regions.push(Region { rect, kind, parent });
        self.regions.len() - 1
    }

    /// Topmost region containing the point.
    fn hit(&self, point: LogicalPoint) -> Option<usize> {
        self.regions
            .iter()
            .enumerate()
            .rev()
            .find(|(_, region)| region.rect.contains(point.x, point.y))
            .map(|(idx, _)| idx)
    }

    fn ancestors(&self, idx: usize) -> impl Iterator<Item = &Region> {
        let mut current = Some(idx);
        std::iter::from_fn(move || {
            let region = &self.regions[current?];
            current = region.parent;
            Some(region)
        })
    }

    /// The clickable target under the point: the hit region itself or its
    /// nearest interactive ancestor.
    pub fn interactive_at(&self, point: LogicalPoint) -> Option<&RegionKind> {
        let idx = self.hit(point)?;
        self.ancestors(idx)
            .map(|region| &region.kind)
            .find(|kind| kind.interactive())
    }

    /// The row under the point. When the topmost hit belongs to no row
    /// (overlay decorations painted above the list), the rows themselves
    /// are scanned directly so hover does not flicker off.
    pub fn row_at(&self, point: LogicalPoint) -> Option<&str> {
        if let Some(idx) = self.hit(point)
            && let Some(RegionKind::Row { id }) =
                self.ancestors(idx).map(|r| &r.kind).find(|k| k.group())
        {
            return Some(id.as_str());
        }
        self.regions
            .iter()
            .rev()
            .filter(|region| region.kind.group())
            .find(|region| region.rect.contains(point.x, point.y))
            .and_then(|region| match &region.kind {
                RegionKind::Row { id } => Some(id.as_str()),
                _ => None,
            })
    }
}

/// Result of one hover tick.
#[derive(Debug, PartialEq)]
pub struct HoverOutcome {
    /// The highlighted row changed; the view needs repainting.
    pub row_changed: bool,
    /// Glyph to push to the host, only present on a clickability flip.
    pub glyph: Option<CursorGlyph>,
}

/// Tracks the synthesized hover state across ticks.
#[derive(Debug, Default)]
pub struct HoverSim {
    hovered_row: Option<String>,
    clickable: bool,
}

impl HoverSim {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered_row(&self) -> Option<&str> {
        self.hovered_row.as_deref()
    }

    /// Re-evaluate hover for the current cursor point (`None` = outside the
    /// window, which clears everything).
    pub fn tick(&mut self, cursor: Option<LogicalPoint>, regions: &RegionSnapshot) -> HoverOutcome {
        let (row, clickable) = match cursor {
            Some(point) => (
                regions.row_at(point).map(str::to_string),
                regions.interactive_at(point).is_some(),
            ),
            None => (None, false),
        };

        let row_changed = row != self.hovered_row;
        self.hovered_row = row;

        let glyph = (clickable != self.clickable).then(|| {
            self.clickable = clickable;
            if clickable {
                CursorGlyph::Pointer
            } else {
                CursorGlyph::Default
            }
        });

        HoverOutcome { row_changed, glyph }
    }
}

//! Window state machine: collapse/expand geometry, drag discrimination,
//! and snap resolution.
//!
//! The transition logic is kept as pure planning functions over logical
//! geometry — the controller reads current bounds from the host, asks a
//! planner for the target, applies move/resize commands, and persists the
//! settled result. Expansion and collapse are exact inverses as long as no
//! drag happens in between.

use crate::geometry::{LogicalPoint, LogicalRect, LogicalSize};
use crate::host::MouseButton;
use crate::placement::{ExpandDirection, Placement, SnapSide};
use std::time::{Duration, Instant};

/// Expanded window size, logical units.
pub const EXPANDED_WIDTH: f64 = 280.0;
pub const EXPANDED_HEIGHT: f64 = 320.0;

/// Collapsed badge geometry: the window is exactly wide enough for the
/// count badge plus horizontal padding.
pub const COLLAPSED_HEIGHT: f64 = 48.0;
const PADDING_X: f64 = 6.0;
const BADGE_DIAMETER: f64 = 24.0;

/// Movement beyond this (either axis) turns a press into a drag.
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Edge distance within which a drag release snaps flush.
pub const SNAP_THRESHOLD: f64 = 240.0;

/// Shake feedback duration for a no-op badge click.
pub const SHAKE_DURATION: Duration = Duration::from_millis(300);

/// Delay between drag release and snap resolution, letting the host's
/// native drag settle before geometry is read back.
pub const DRAG_SETTLE: Duration = Duration::from_millis(50);

pub fn collapsed_width() -> f64 {
    PADDING_X * 2.0 + BADGE_DIAMETER
}

pub fn collapsed_size() -> LogicalSize {
    LogicalSize::new(collapsed_width(), COLLAPSED_HEIGHT)
}

pub fn expanded_size() -> LogicalSize {
    LogicalSize::new(EXPANDED_WIDTH, EXPANDED_HEIGHT)
}

// ---------------------------------------------------------------------------
// Expansion planning
// ---------------------------------------------------------------------------

/// Target geometry for an expand transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandPlan {
    pub position: LogicalPoint,
    /// Whether `position` differs from the collapsed position (apply a move
    /// before or together with the resize).
    pub moved: bool,
    pub direction: ExpandDirection,
}

/// Compute where the expanded window lands, flipping direction and clamping
/// so it stays inside the work area.
pub fn plan_expand(current: LogicalPoint, work_area: LogicalRect) -> ExpandPlan {
    let mut x = current.x;
    let mut y = current.y;
    let mut direction = ExpandDirection::Right;

    if current.x + EXPANDED_WIDTH > work_area.right() {
        direction = ExpandDirection::Left;
        x = current.x - (EXPANDED_WIDTH - collapsed_width());
        x = x.max(work_area.x);
    }

    if current.y + EXPANDED_HEIGHT > work_area.bottom() {
        y = work_area.bottom() - EXPANDED_HEIGHT;
        y = y.max(work_area.y);
    }

    ExpandPlan {
        position: LogicalPoint::new(x, y),
        moved: x != current.x || y != current.y,
        direction,
    }
}

/// Target geometry for a collapse transition: a left-expanded window shifts
/// back right so the badge re-anchors where the expanded near edge was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollapsePlan {
    pub position: LogicalPoint,
    pub moved: bool,
}

pub fn plan_collapse(current: LogicalPoint, direction: ExpandDirection) -> CollapsePlan {
    match direction {
        ExpandDirection::Left => CollapsePlan {
            position: LogicalPoint::new(current.x + (EXPANDED_WIDTH - collapsed_width()), current.y),
            moved: true,
        },
        ExpandDirection::Right => CollapsePlan {
            position: current,
            moved: false,
        },
    }
}

// ---------------------------------------------------------------------------
// Snap resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResolution {
    pub side: SnapSide,
    /// X after snapping; unchanged when `side` is `None`.
    pub x: f64,
}

/// Resolve the snap side after a drag release. Left is evaluated first and
/// wins when both edges are within threshold.
pub fn resolve_snap(window: LogicalRect, work_area: LogicalRect) -> SnapResolution {
    if window.x - work_area.x < SNAP_THRESHOLD {
        SnapResolution {
            side: SnapSide::Left,
            x: work_area.x,
        }
    } else if work_area.right() - window.right() < SNAP_THRESHOLD {
        SnapResolution {
            side: SnapSide::Right,
            x: work_area.right() - window.width,
        }
    } else {
        SnapResolution {
            side: SnapSide::None,
            x: window.x,
        }
    }
}

// ---------------------------------------------------------------------------
// Press tracking
// ---------------------------------------------------------------------------

/// An in-progress header press, not yet classified as click or drag.
#[derive(Debug, Clone, Copy)]
pub struct PressTracker {
    button: MouseButton,
    start: LogicalPoint,
}

impl PressTracker {
    pub fn new(button: MouseButton, x: f64, y: f64) -> Self {
        Self {
            button,
            start: LogicalPoint::new(x, y),
        }
    }

    pub fn button(&self) -> MouseButton {
        self.button
    }

    /// True once pointer movement exceeds the drag threshold on either axis.
    pub fn is_drag(&self, x: f64, y: f64) -> bool {
        (x - self.start.x).abs() > DRAG_THRESHOLD || (y - self.start.y).abs() > DRAG_THRESHOLD
    }
}

// ---------------------------------------------------------------------------
// Overlay state
// ---------------------------------------------------------------------------

/// Settled window state plus the transient drag flag.
#[derive(Debug, Clone, Copy)]
pub struct OverlayState {
    pub expanded: bool,
    pub dragging: bool,
    pub snap_side: SnapSide,
    pub expand_direction: ExpandDirection,
    shake_until: Option<Instant>,
}

impl OverlayState {
    pub fn from_placement(placement: &Placement) -> Self {
        Self {
            expanded: placement.is_expanded,
            dragging: false,
            snap_side: placement.snap_side,
            expand_direction: placement.expand_direction,
            shake_until: None,
        }
    }

    pub fn trigger_shake(&mut self, now: Instant) {
        self.shake_until = Some(now + SHAKE_DURATION);
    }

    pub fn shaking(&self, now: Instant) -> bool {
        self.shake_until.is_some_and(|until| now < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> LogicalRect {
        LogicalRect::new(0.0, 0.0, 1440.0, 900.0)
    }

    // -- Expand planning --

    #[test]
    fn expand_fits_rightward_keeps_position() {
        let plan = plan_expand(LogicalPoint::new(100.0, 100.0), area());
        assert_eq!(plan.direction, ExpandDirection::Right);
        assert!(!plan.moved);
        assert_eq!(plan.position, LogicalPoint::new(100.0, 100.0));
    }

    #[test]
    fn expand_near_right_edge_flips_left() {
        let x = 1440.0 - 100.0; // expanded right edge would overflow
        let plan = plan_expand(LogicalPoint::new(x, 100.0), area());
        assert_eq!(plan.direction, ExpandDirection::Left);
        assert!(plan.moved);
        assert_eq!(plan.position.x, x - (EXPANDED_WIDTH - collapsed_width()));
    }

    #[test]
    fn expand_left_shift_clamps_to_work_area_left() {
        // Narrow work area: the leftward shift would push past the left edge.
        let narrow = LogicalRect::new(0.0, 0.0, 300.0, 900.0);
        let plan = plan_expand(LogicalPoint::new(100.0, 100.0), narrow);
        assert_eq!(plan.direction, ExpandDirection::Left);
        assert_eq!(plan.position.x, 0.0);
    }

    #[test]
    fn expand_near_bottom_shifts_up() {
        let plan = plan_expand(LogicalPoint::new(100.0, 880.0), area());
        assert_eq!(plan.position.y, 900.0 - EXPANDED_HEIGHT);
        assert!(plan.moved);
    }

    #[test]
    fn expand_bottom_shift_clamps_to_work_area_top() {
        let short = LogicalRect::new(0.0, 0.0, 1440.0, 200.0);
        let plan = plan_expand(LogicalPoint::new(100.0, 150.0), short);
        assert_eq!(plan.position.y, 0.0);
    }

    // -- Collapse planning --

    #[test]
    fn collapse_right_direction_stays_put() {
        let plan = plan_collapse(LogicalPoint::new(100.0, 100.0), ExpandDirection::Right);
        assert!(!plan.moved);
        assert_eq!(plan.position, LogicalPoint::new(100.0, 100.0));
    }

    #[test]
    fn collapse_undoes_left_expand_offset() {
        let start = LogicalPoint::new(1340.0, 100.0);
        let expand = plan_expand(start, area());
        assert_eq!(expand.direction, ExpandDirection::Left);

        let collapse = plan_collapse(expand.position, expand.direction);
        assert_eq!(collapse.position, start);
    }

    #[test]
    fn expand_collapse_expand_is_idempotent() {
        let start = LogicalPoint::new(1340.0, 100.0);
        let first = plan_expand(start, area());
        let collapsed = plan_collapse(first.position, first.direction);
        let second = plan_expand(collapsed.position, area());

        assert_eq!(second.direction, first.direction);
        assert_eq!(second.position, first.position);
    }

    // -- Snap resolution --

    #[test]
    fn snap_left_iff_within_threshold() {
        let window = LogicalRect::new(239.9, 50.0, 36.0, 48.0);
        let snap = resolve_snap(window, area());
        assert_eq!(snap.side, SnapSide::Left);
        assert_eq!(snap.x, 0.0);

        let window = LogicalRect::new(240.0, 50.0, 36.0, 48.0);
        let snap = resolve_snap(window, area());
        assert_ne!(snap.side, SnapSide::Left);
    }

    #[test]
    fn snap_right_moves_flush() {
        let window = LogicalRect::new(1300.0, 50.0, 36.0, 48.0);
        let snap = resolve_snap(window, area());
        assert_eq!(snap.side, SnapSide::Right);
        assert_eq!(snap.x, 1440.0 - 36.0);
    }

    #[test]
    fn snap_none_in_the_middle() {
        let window = LogicalRect::new(600.0, 50.0, 36.0, 48.0);
        let snap = resolve_snap(window, area());
        assert_eq!(snap.side, SnapSide::None);
        assert_eq!(snap.x, 600.0);
    }

    #[test]
    fn left_wins_when_both_edges_qualify() {
        // Monitor narrow enough that both conditions hold.
        let narrow = LogicalRect::new(0.0, 0.0, 400.0, 900.0);
        let window = LogicalRect::new(200.0, 50.0, 36.0, 48.0);
        let snap = resolve_snap(window, narrow);
        assert_eq!(snap.side, SnapSide::Left);
        assert_eq!(snap.x, 0.0);
    }

    #[test]
    fn snap_respects_monitor_origin() {
        // Secondary monitor offset to the right.
        let second = LogicalRect::new(1440.0, 0.0, 1440.0, 900.0);
        let window = LogicalRect::new(1500.0, 50.0, 36.0, 48.0);
        let snap = resolve_snap(window, second);
        assert_eq!(snap.side, SnapSide::Left);
        assert_eq!(snap.x, 1440.0);
    }

    // -- Press tracking --

    #[test]
    fn press_within_threshold_is_click() {
        let press = PressTracker::new(MouseButton::Left, 10.0, 10.0);
        assert!(!press.is_drag(14.0, 10.0));
        assert!(!press.is_drag(10.0, 15.0));
    }

    #[test]
    fn press_beyond_threshold_is_drag() {
        let press = PressTracker::new(MouseButton::Left, 10.0, 10.0);
        assert!(press.is_drag(15.1, 10.0));
        assert!(press.is_drag(10.0, 4.0));
    }

    // -- Overlay state --

    #[test]
    fn state_from_placement() {
        let placement = Placement {
            x: Some(10.0),
            y: Some(20.0),
            is_expanded: true,
            snap_side: SnapSide::Right,
            expand_direction: ExpandDirection::Left,
        };
        let state = OverlayState::from_placement(&placement);
        assert!(state.expanded);
        assert!(!state.dragging);
        assert_eq!(state.snap_side, SnapSide::Right);
        assert_eq!(state.expand_direction, ExpandDirection::Left);
    }

    #[test]
    fn shake_expires() {
        let mut state = OverlayState::from_placement(&Placement::default());
        let now = Instant::now();
        assert!(!state.shaking(now));

        state.trigger_shake(now);
        assert!(state.shaking(now + Duration::from_millis(100)));
        assert!(!state.shaking(now + Duration::from_millis(301)));
    }

    #[test]
    fn collapsed_width_matches_badge_plus_padding() {
        assert_eq!(collapsed_width(), 36.0);
        assert_eq!(collapsed_size(), LogicalSize::new(36.0, 48.0));
        assert_eq!(expanded_size(), LogicalSize::new(280.0, 320.0));
    }
}

//! Cursor locator: figures out where the pointer is relative to the
//! overlay window even while another application holds focus.
//!
//! The privileged per-window query is tried first. When the host lacks that
//! capability (or the call fails), the locator falls back to the global
//! cursor position matched combinatorially against several readings of the
//! window bounds, since hosts disagree on whether positions and sizes come
//! back in physical or logical pixels. Every failure along the way
//! degrades to "cursor is outside"; a locator error must never take the
//! overlay down.

use crate::geometry::{LogicalPoint, LogicalRect};
use crate::host::Host;
use std::time::Duration;

/// Polling cadence for the hover loop.
pub const LOCATOR_INTERVAL: Duration = Duration::from_millis(50);

/// Locate the cursor in window-local logical coordinates, or `None` when it
/// is outside the window (or cannot be determined).
///
/// `tracked` is the controller's own record of the window bounds, kept
/// current through moves and resizes; it anchors the fallback when the
/// host-reported geometry is stale mid-transition.
pub async fn locate<H: Host>(host: &H, label: &str, tracked: LogicalRect) -> Option<LogicalPoint> {
    match host.cursor_position_in_window(label).await {
        Ok(probe) if probe.supported => probe
            .in_window
            .then(|| LogicalPoint::new(probe.x, probe.y)),
        _ => fallback(host, label, tracked).await,
    }
}

async fn fallback<H: Host>(host: &H, label: &str, tracked: LogicalRect) -> Option<LogicalPoint> {
    let (raw_x, raw_y) = host.get_cursor_position().await.ok()?;
    let raw = LogicalPoint::new(raw_x, raw_y);
    let scale = host
        .scale_factor(label)
        .await
        .ok()
        .filter(|s| *s > 0.0)
        .unwrap_or(1.0);

    let mut bounds = vec![tracked];
    if let (Ok(outer), Ok(inner)) = (
        host.outer_position(label).await,
        host.inner_size(label).await,
    ) {
        let reported = LogicalRect::from_origin_size(outer, inner);
        bounds.push(reported.to_logical(scale));
        bounds.push(reported);
    }

    let scaled = LogicalPoint::new(raw.x / scale, raw.y / scale);
    fallback_hit(&bounds, &[raw, scaled])
}

/// First containment hit over bounds candidates crossed with cursor
/// candidates, in that nesting order (the raw cursor is tried against each
/// rect before its scale-corrected reading). Containment is inclusive; the
/// returned point is local to the matching rect.
fn fallback_hit(bounds: &[LogicalRect], cursors: &[LogicalPoint]) -> Option<LogicalPoint> {
    for rect in bounds {
        for cursor in cursors {
            if rect.contains(cursor.x, cursor.y) {
                return Some(LogicalPoint::new(cursor.x - rect.x, cursor.y - rect.y));
            }
        }
    }
    None
}

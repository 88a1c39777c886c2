//! Logical-coordinate primitives shared by the window state machine,
//! cursor locator, and hover simulator.
//!
//! The host reports window and monitor geometry in physical pixels plus a
//! scale factor; everything inside the controller works in logical units.
//! Containment tests are inclusive on all edges: a cursor resting exactly on
//! a boundary counts as inside.

use serde::{Deserialize, Serialize};

/// A point in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalPoint {
    pub x: f64,
    pub y: f64,
}

impl LogicalPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A size in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

impl LogicalSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LogicalRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: LogicalPoint, size: LogicalSize) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> LogicalPoint {
        LogicalPoint::new(self.x, self.y)
    }

    pub fn size(&self) -> LogicalSize {
        LogicalSize::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment: boundary points count as inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Scale a physical-pixel rect down to logical units.
    pub fn to_logical(&self, scale: f64) -> Self {
        if scale <= 0.0 {
            return *self;
        }
        Self::new(
            self.x / scale,
            self.y / scale,
            self.width / scale,
            self.height / scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let rect = LogicalRect::new(100.0, 100.0, 40.0, 48.0);
        assert!(rect.contains(100.0, 100.0));
        assert!(rect.contains(140.0, 148.0));
        assert!(rect.contains(120.0, 124.0));
        assert!(!rect.contains(140.1, 124.0));
        assert!(!rect.contains(120.0, 148.1));
        assert!(!rect.contains(99.9, 124.0));
    }

    #[test]
    fn to_logical_divides_by_scale() {
        let rect = LogicalRect::new(200.0, 300.0, 80.0, 96.0).to_logical(2.0);
        assert_eq!(rect, LogicalRect::new(100.0, 150.0, 40.0, 48.0));
    }

    #[test]
    fn to_logical_ignores_bad_scale() {
        let rect = LogicalRect::new(200.0, 300.0, 80.0, 96.0);
        assert_eq!(rect.to_logical(0.0), rect);
    }

    #[test]
    fn edges() {
        let rect = LogicalRect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.origin(), LogicalPoint::new(10.0, 20.0));
        assert_eq!(rect.size(), LogicalSize::new(30.0, 40.0));
    }
}

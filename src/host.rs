//! The host command surface.
//!
//! The host process owns the OS window (geometry primitives, painting,
//! focus-less always-on-top behavior) and the review data. The controller
//! talks to it exclusively through [`Host`]: asynchronous request/response
//! calls that may each fail independently. Nothing here is fatal — callers
//! log transient failures and keep the overlay interactive.

use crate::geometry::{LogicalPoint, LogicalRect, LogicalSize};
use crate::item::{NotifierSettings, ReviewItem};
use crate::placement::SnapSide;
use serde::{Deserialize, Serialize};

/// Error from a host round-trip.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("host rejected request: {0}")]
    Remote(String),
    #[error("protocol error: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error("host connection closed")]
    Closed,
}

/// Result of the privileged cursor query.
///
/// `supported = false` means the capability probe failed and the caller must
/// use the fallback path; coordinates are only meaningful when `in_window`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CursorProbe {
    pub supported: bool,
    pub in_window: bool,
    pub x: f64,
    pub y: f64,
}

/// Cursor glyph hint sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorGlyph {
    #[default]
    Default,
    Pointer,
}

/// Mouse button in forwarded pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// One virtual row handed to the host for painting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowView {
    pub id: String,
    /// Absolute offset from the top of the virtual list, logical units.
    pub offset: f64,
    pub height: f64,
    pub title: String,
    pub subtitle: String,
    /// Completed rows render read-only, struck through, with a check mark.
    pub completed: bool,
    pub hovered: bool,
    /// Dismiss affordance, shown on hovered pending rows.
    pub show_dismiss: bool,
}

/// Render state pushed to the host after every visible change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ViewModel {
    Collapsed {
        badge_count: usize,
        shake: bool,
        /// Collapsed shape rounds away from the snapped edge.
        rounding: SnapSide,
    },
    Expanded {
        status: String,
        show_clear: bool,
        show_only_pending: bool,
        total_height: f64,
        /// Placeholder copy shown instead of the list when `rows` is empty.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        empty: Option<String>,
        rows: Vec<RowView>,
    },
}

/// Asynchronous host command surface.
///
/// All methods are plain round-trips; ordering between independent calls is
/// not guaranteed by the host.
#[allow(async_fn_in_trait)]
pub trait Host {
    // -- review data --
    async fn get_review_queue(&self) -> Result<Vec<ReviewItem>, HostError>;
    async fn get_completed_queue(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ReviewItem>, HostError>;
    async fn dismiss_review_item(&self, id: &str) -> Result<(), HostError>;
    async fn clear_completed_queue(&self) -> Result<(), HostError>;
    async fn navigate_to_tmux_pane(
        &self,
        session: &str,
        window: &str,
        pane: &str,
    ) -> Result<(), HostError>;

    // -- cursor --
    async fn get_cursor_position(&self) -> Result<(f64, f64), HostError>;
    async fn cursor_position_in_window(&self, label: &str) -> Result<CursorProbe, HostError>;
    async fn set_cursor(&self, glyph: CursorGlyph) -> Result<(), HostError>;

    // -- settings --
    async fn get_settings(&self) -> Result<NotifierSettings, HostError>;
    async fn save_settings(&self, settings: &NotifierSettings) -> Result<(), HostError>;

    // -- window geometry primitives --
    async fn outer_position(&self, label: &str) -> Result<LogicalPoint, HostError>;
    async fn inner_size(&self, label: &str) -> Result<LogicalSize, HostError>;
    async fn scale_factor(&self, label: &str) -> Result<f64, HostError>;
    /// Work area of the monitor currently owning the window, logical units.
    async fn work_area(&self, label: &str) -> Result<LogicalRect, HostError>;
    async fn set_position(&self, label: &str, position: LogicalPoint) -> Result<(), HostError>;
    async fn set_size(&self, label: &str, size: LogicalSize) -> Result<(), HostError>;
    /// Hand window movement to the host's native drag primitive.
    async fn start_window_drag(&self, label: &str) -> Result<(), HostError>;
    async fn hide_window(&self, label: &str) -> Result<(), HostError>;

    // -- rendering --
    async fn update_view(&self, label: &str, view: &ViewModel) -> Result<(), HostError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_serialization() {
        assert_eq!(
            serde_json::to_string(&CursorGlyph::Pointer).unwrap(),
            "\"pointer\""
        );
        assert_eq!(
            serde_json::to_string(&CursorGlyph::Default).unwrap(),
            "\"default\""
        );
    }

    #[test]
    fn view_model_wire_shape() {
        let view = ViewModel::Collapsed {
            badge_count: 3,
            shake: false,
            rounding: SnapSide::Left,
        };
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"mode\":\"collapsed\""));
        assert!(json.contains("\"rounding\":\"left\""));

        let parsed: ViewModel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, view);
    }

    #[tokio::test]
    async fn mock_settings_roundtrip() {
        let host = mock::MockHost::new();
        let mut settings = host.get_settings().await.unwrap();
        settings.float_window = false;
        host.save_settings(&settings).await.unwrap();
        assert!(!host.get_settings().await.unwrap().float_window);
    }
}

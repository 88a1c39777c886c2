//! Review item and settings wire types.

use serde::{Deserialize, Serialize};

/// A single review notification, as produced by the host.
///
/// Immutable once received; the queue model owns it until it is dismissed or
/// scrolled out of the loaded completed-page window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: String,
    /// Monotonic display ordinal assigned by the host.
    pub seq: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Seconds since the epoch.
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmux_session: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmux_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmux_pane: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
}

impl ReviewItem {
    /// The tmux addressing triple, when all three parts are present.
    pub fn tmux_target(&self) -> Option<(&str, &str, &str)> {
        match (&self.tmux_session, &self.tmux_window, &self.tmux_pane) {
            (Some(s), Some(w), Some(p)) => Some((s, w, p)),
            _ => None,
        }
    }
}

/// User preferences owned by the host (simple CRUD passthrough).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierSettings {
    pub notify: bool,
    pub float_window: bool,
    pub menu_bar: bool,
    pub shortcut: String,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            notify: true,
            float_window: true,
            menu_bar: true,
            shortcut: "F4".to_string(),
        }
    }
}

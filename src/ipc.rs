//! IPC wire format for the host socket.
//!
//! The controller connects to the host over a Unix domain socket carrying
//! newline-delimited JSON. Outgoing lines are [`RequestFrame`]s; incoming
//! lines are [`Incoming`] — either a response correlated by frame id or a
//! pushed [`HostEvent`] (queue replacement, forwarded pointer input).

use crate::host::{CursorGlyph, MouseButton, ViewModel};
use crate::item::{NotifierSettings, ReviewItem};
use serde::{Deserialize, Serialize};

/// Default socket path for the host.
pub fn socket_path() -> std::path::PathBuf {
    std::env::temp_dir().join("revtray.sock")
}

/// A host command, one per request line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum HostRequest {
    GetReviewQueue,
    GetCompletedQueue {
        limit: usize,
        offset: usize,
    },
    DismissReviewItem {
        id: String,
    },
    ClearCompletedQueue,
    NavigateToTmuxPane {
        session: String,
        window: String,
        pane: String,
    },
    GetCursorPosition,
    GetCursorPositionInWindow {
        label: String,
    },
    SetCursor {
        cursor: CursorGlyph,
    },
    GetSettings,
    SaveSettings {
        settings: NotifierSettings,
    },
    OuterPosition {
        label: String,
    },
    InnerSize {
        label: String,
    },
    ScaleFactor {
        label: String,
    },
    WorkArea {
        label: String,
    },
    SetPosition {
        label: String,
        x: f64,
        y: f64,
    },
    SetSize {
        label: String,
        width: f64,
        height: f64,
    },
    StartWindowDrag {
        label: String,
    },
    HideWindow {
        label: String,
    },
    UpdateView {
        label: String,
        view: ViewModel,
    },
}

/// Outgoing request envelope. The command nests under its own key so its
/// fields can never collide with the correlation id (dismiss carries an
/// item `id` of its own).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestFrame {
    pub id: u64,
    #[serde(rename = "req")]
    pub request: HostRequest,
}

/// Event pushed by the host without a preceding request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// Wholesale replacement of the pending set.
    #[serde(rename = "review-queue-update")]
    ReviewQueueUpdate { items: Vec<ReviewItem> },
    /// Pointer input forwarded from the overlay window, window-local
    /// logical coordinates.
    PointerDown { button: MouseButton, x: f64, y: f64 },
    PointerMoved { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    /// List scroll offset changed.
    Scroll { top: f64 },
}

/// Any incoming line from the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Incoming {
    Response {
        id: u64,
        #[serde(default)]
        ok: Option<serde_json::Value>,
        #[serde(default)]
        err: Option<String>,
    },
    Event {
        #[serde(flatten)]
        event: HostEvent,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_frame_roundtrip() {
        let frame = RequestFrame {
            id: 7,
            request: HostRequest::GetCompletedQueue {
                limit: 20,
                offset: 40,
            },
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"cmd\":\"get_completed_queue\""));
        assert!(json.contains("\"id\":7"));
        assert!(json.contains("\"req\":{"));

        let parsed: RequestFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, 7);
        match parsed.request {
            HostRequest::GetCompletedQueue { limit, offset } => {
                assert_eq!(limit, 20);
                assert_eq!(offset, 40);
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn dismiss_frame_keeps_item_id_separate_from_correlation_id() {
        let frame = RequestFrame {
            id: 9,
            request: HostRequest::DismissReviewItem { id: "i1".into() },
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"id\":9"));
        assert!(json.contains("\"id\":\"i1\""));

        let parsed: RequestFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, 9);
        match parsed.request {
            HostRequest::DismissReviewItem { id } => assert_eq!(id, "i1"),
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn response_frame_ok() {
        let json =
            r#"{"type":"response","id":3,"ok":[{"id":"i1","seq":1,"title":"t","timestamp":9}]}"#;
        let incoming: Incoming = serde_json::from_str(json).unwrap();
        match incoming {
            Incoming::Response { id, ok, err } => {
                assert_eq!(id, 3);
                assert!(err.is_none());
                let items: Vec<ReviewItem> = serde_json::from_value(ok.unwrap()).unwrap();
                assert_eq!(items[0].id, "i1");
            }
            Incoming::Event { .. } => panic!("expected response"),
        }
    }

    #[test]
    fn response_frame_err() {
        let json = r#"{"type":"response","id":4,"err":"no such window"}"#;
        let incoming: Incoming = serde_json::from_str(json).unwrap();
        match incoming {
            Incoming::Response { id, ok, err } => {
                assert_eq!(id, 4);
                assert!(ok.is_none());
                assert_eq!(err.as_deref(), Some("no such window"));
            }
            Incoming::Event { .. } => panic!("expected response"),
        }
    }

    #[test]
    fn queue_update_event_uses_kebab_name() {
        let json = r#"{"type":"event","event":"review-queue-update","items":[]}"#;
        let incoming: Incoming = serde_json::from_str(json).unwrap();
        match incoming {
            Incoming::Event {
                event: HostEvent::ReviewQueueUpdate { items },
            } => assert!(items.is_empty()),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn pointer_event_variants() {
        let lines = [
            r#"{"type":"event","event":"pointer_down","button":"left","x":10.0,"y":12.0}"#,
            r#"{"type":"event","event":"pointer_moved","x":11.0,"y":12.0}"#,
            r#"{"type":"event","event":"pointer_up","x":11.0,"y":12.0}"#,
            r#"{"type":"event","event":"scroll","top":140.0}"#,
        ];
        for line in lines {
            let _incoming: Incoming = serde_json::from_str(line).unwrap();
        }
    }

    #[test]
    fn all_commands_serialize() {
        let requests = vec![
            HostRequest::GetReviewQueue,
            HostRequest::DismissReviewItem { id: "i1".into() },
            HostRequest::ClearCompletedQueue,
            HostRequest::NavigateToTmuxPane {
                session: "work".into(),
                window: "2".into(),
                pane: "1".into(),
            },
            HostRequest::GetCursorPosition,
            HostRequest::GetCursorPositionInWindow {
                label: "float".into(),
            },
            HostRequest::SetCursor {
                cursor: CursorGlyph::Pointer,
            },
            HostRequest::GetSettings,
            HostRequest::StartWindowDrag {
                label: "float".into(),
            },
            HostRequest::HideWindow {
                label: "float".into(),
            },
        ];
        for (idx, request) in requests.into_iter().enumerate() {
            let frame = RequestFrame {
                id: idx as u64,
                request,
            };
            let json = serde_json::to_string(&frame).unwrap();
            let _parsed: RequestFrame = serde_json::from_str(&json).unwrap();
        }
    }
}

//! Unix socket client for the host surface.
//!
//! One connection carries both directions: requests go out as
//! newline-delimited [`RequestFrame`]s, and a single reader task sorts
//! incoming lines into responses (correlated by frame id through a oneshot
//! map) and pushed events (forwarded on an unbounded channel to the
//! controller loop). Malformed lines are logged and skipped.

use crate::geometry::{LogicalPoint, LogicalRect, LogicalSize};
use crate::host::{CursorGlyph, CursorProbe, Host, HostError, ViewModel};
use crate::ipc::{HostEvent, HostRequest, Incoming, RequestFrame};
use crate::item::{NotifierSettings, ReviewItem};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{trace, warn};

type PendingMap = Mutex<HashMap<u64, oneshot::Sender<Result<serde_json::Value, HostError>>>>;

struct Shared {
    next_id: AtomicU64,
    outgoing: mpsc::UnboundedSender<String>,
    pending: PendingMap,
}

/// Socket-backed [`Host`] implementation.
#[derive(Clone)]
pub struct IpcHost {
    shared: Arc<Shared>,
}

impl IpcHost {
    /// Connect to the host socket. Returns the host handle plus the stream
    /// of pushed events.
    pub async fn connect(
        path: &Path,
    ) -> Result<(Self, mpsc::UnboundedReceiver<HostEvent>), HostError> {
        let stream = UnixStream::connect(path).await?;
        let (read_half, mut write_half) = stream.into_split();

        let (outgoing, mut outgoing_rx) = mpsc::unbounded_channel::<String>();
        let (events_tx, events_rx) = mpsc::unbounded_channel::<HostEvent>();

        let shared = Arc::new(Shared {
            next_id: AtomicU64::new(1),
            outgoing,
            pending: Mutex::new(HashMap::new()),
        });

        // Writer task: serialize ordering of request lines.
        tokio::spawn(async move {
            while let Some(line) = outgoing_rx.recv().await {
                if write_half.write_all(line.as_bytes()).await.is_err()
                    || write_half.write_all(b"\n").await.is_err()
                {
                    break;
                }
            }
        });

        // Reader task: one line at a time, responses and events interleaved.
        let reader_shared = Arc::clone(&shared);
        tokio::spawn(async move {
            let reader = BufReader::new(read_half);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<Incoming>(&line) {
                    Ok(Incoming::Response { id, ok, err }) => {
                        let waiter = reader_shared.pending.lock().unwrap().remove(&id);
                        let Some(waiter) = waiter else {
                            trace!(id, "response for unknown request id");
                            continue;
                        };
                        let result = match err {
                            Some(message) => Err(HostError::Remote(message)),
                            None => Ok(ok.unwrap_or(serde_json::Value::Null)),
                        };
                        let _ = waiter.send(result);
                    }
                    Ok(Incoming::Event { event }) => {
                        if events_tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        trace!("failed to parse host line: {} (line: {})", e, line);
                    }
                }
            }

            // Connection gone: fail every in-flight request.
            let waiters: Vec<_> = reader_shared
                .pending
                .lock()
                .unwrap()
                .drain()
                .map(|(_, tx)| tx)
                .collect();
            for waiter in waiters {
                let _ = waiter.send(Err(HostError::Closed));
            }
            warn!("host connection closed");
        });

        Ok((Self { shared }, events_rx))
    }

    async fn call(&self, request: HostRequest) -> Result<serde_json::Value, HostError> {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.shared.pending.lock().unwrap().insert(id, tx);

        let line = serde_json::to_string(&RequestFrame { id, request })?;
        if self.shared.outgoing.send(line).is_err() {
            self.shared.pending.lock().unwrap().remove(&id);
            return Err(HostError::Closed);
        }

        rx.await.map_err(|_| HostError::Closed)?
    }

    async fn call_typed<T: DeserializeOwned>(&self, request: HostRequest) -> Result<T, HostError> {
        let value = self.call(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn call_unit(&self, request: HostRequest) -> Result<(), HostError> {
        self.call(request).await.map(|_| ())
    }
}

impl Host for IpcHost {
    async fn get_review_queue(&self) -> Result<Vec<ReviewItem>, HostError> {
        self.call_typed(HostRequest::GetReviewQueue).await
    }

    async fn get_completed_queue(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ReviewItem>, HostError> {
        self.call_typed(HostRequest::GetCompletedQueue { limit, offset })
            .await
    }

    async fn dismiss_review_item(&self, id: &str) -> Result<(), HostError> {
        self.call_unit(HostRequest::DismissReviewItem { id: id.to_string() })
            .await
    }

    async fn clear_completed_queue(&self) -> Result<(), HostError> {
        self.call_unit(HostRequest::ClearCompletedQueue).await
    }

    async fn navigate_to_tmux_pane(
        &self,
        session: &str,
        window: &str,
        pane: &str,
    ) -> Result<(), HostError> {
        self.call_unit(HostRequest::NavigateToTmuxPane {
            session: session.to_string(),
            window: window.to_string(),
            pane: pane.to_string(),
        })
        .await
    }

    async fn get_cursor_position(&self) -> Result<(f64, f64), HostError> {
        self.call_typed(HostRequest::GetCursorPosition).await
    }

    async fn cursor_position_in_window(&self, label: &str) -> Result<CursorProbe, HostError> {
        self.call_typed(HostRequest::GetCursorPositionInWindow {
            label: label.to_string(),
        })
        .await
    }

    async fn set_cursor(&self, glyph: CursorGlyph) -> Result<(), HostError> {
        self.call_unit(HostRequest::SetCursor { cursor: glyph }).await
    }

    async fn get_settings(&self) -> Result<NotifierSettings, HostError> {
        self.call_typed(HostRequest::GetSettings).await
    }

    async fn save_settings(&self, settings: &NotifierSettings) -> Result<(), HostError> {
        self.call_unit(HostRequest::SaveSettings {
            settings: settings.clone(),
        })
        .await
    }

    async fn outer_position(&self, label: &str) -> Result<LogicalPoint, HostError> {
        self.call_typed(HostRequest::OuterPosition {
            label: label.to_string(),
        })
        .await
    }

    async fn inner_size(&self, label: &str) -> Result<LogicalSize, HostError> {
        self.call_typed(HostRequest::InnerSize {
            label: label.to_string(),
        })
        .await
    }

    async fn scale_factor(&self, label: &str) -> Result<f64, HostError> {
        self.call_typed(HostRequest::ScaleFactor {
            label: label.to_string(),
        })
        .await
    }

    async fn work_area(&self, label: &str) -> Result<LogicalRect, HostError> {
        self.call_typed(HostRequest::WorkArea {
            label: label.to_string(),
        })
        .await
    }

    async fn set_position(&self, label: &str, position: LogicalPoint) -> Result<(), HostError> {
        self.call_unit(HostRequest::SetPosition {
            label: label.to_string(),
            x: position.x,
            y: position.y,
        })
        .await
    }

    async fn set_size(&self, label: &str, size: LogicalSize) -> Result<(), HostError> {
        self.call_unit(HostRequest::SetSize {
            label: label.to_string(),
            width: size.width,
            height: size.height,
        })
        .await
    }

    async fn start_window_drag(&self, label: &str) -> Result<(), HostError> {
        self.call_unit(HostRequest::StartWindowDrag {
            label: label.to_string(),
        })
        .await
    }

    async fn hide_window(&self, label: &str) -> Result<(), HostError> {
        self.call_unit(HostRequest::HideWindow {
            label: label.to_string(),
        })
        .await
    }

    async fn update_view(&self, label: &str, view: &ViewModel) -> Result<(), HostError> {
        self.call_unit(HostRequest::UpdateView {
            label: label.to_string(),
            view: view.clone(),
        })
        .await
    }
}

//! Queue model: live-pushed pending items merged with lazily-paginated
//! completed history.
//!
//! The host is authoritative for both collections. `pending` is replaced
//! wholesale by every push event; `completed` grows page by page (newest
//! first) and is reset-reloaded whenever it may have changed under us
//! (after a successful dismiss, or when the filter reveals it again).
//! Host failures are logged and the local state keeps its last-known-good
//! optimistic value — dismissals are never rolled back.

use crate::host::Host;
use crate::item::ReviewItem;
use tracing::{debug, warn};

/// Completed-history page size. A short page marks the end of data.
pub const PAGE_SIZE: usize = 20;

/// One entry of the merged display sequence.
#[derive(Debug, Clone, Copy)]
pub struct DisplayItem<'a> {
    pub item: &'a ReviewItem,
    pub completed: bool,
}

#[derive(Debug)]
pub struct QueueModel {
    pending: Vec<ReviewItem>,
    completed: Vec<ReviewItem>,
    completed_offset: usize,
    completed_has_more: bool,
    show_only_pending: bool,
}

impl Default for QueueModel {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            completed: Vec::new(),
            completed_offset: 0,
            completed_has_more: true,
            show_only_pending: true,
        }
    }
}

impl QueueModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[ReviewItem] {
        &self.pending
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn completed_len(&self) -> usize {
        self.completed.len()
    }

    pub fn has_more_completed(&self) -> bool {
        self.completed_has_more
    }

    pub fn show_only_pending(&self) -> bool {
        self.show_only_pending
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|item| item.id == id)
    }

    /// Wholesale replacement of the pending set (host push).
    pub fn apply_push(&mut self, items: Vec<ReviewItem>) {
        debug!("pending set replaced: {} item(s)", items.len());
        self.pending = items;
    }

    /// Merged display sequence: pending only (host order) when filtered,
    /// otherwise pending plus loaded completed sorted newest first.
    pub fn display_items(&self) -> Vec<DisplayItem<'_>> {
        if self.show_only_pending {
            return self
                .pending
                .iter()
                .map(|item| DisplayItem {
                    item,
                    completed: false,
                })
                .collect();
        }

        let mut rows: Vec<DisplayItem<'_>> = self
            .pending
            .iter()
            .map(|item| DisplayItem {
                item,
                completed: false,
            })
            .chain(self.completed.iter().map(|item| DisplayItem {
                item,
                completed: true,
            }))
            .collect();
        rows.sort_by(|a, b| b.item.timestamp.cmp(&a.item.timestamp));
        rows
    }

    /// The pending item with the smallest timestamp, independent of the
    /// host-provided array order.
    pub fn oldest_pending(&self) -> Option<&ReviewItem> {
        self.pending.iter().min_by_key(|item| item.timestamp)
    }

    fn remove_pending(&mut self, id: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|item| item.id != id);
        self.pending.len() != before
    }

    /// Load one completed page. `reset` discards loaded history and starts
    /// over from offset 0.
    pub async fn load_completed<H: Host>(&mut self, host: &H, reset: bool) {
        let offset = if reset { 0 } else { self.completed_offset };
        let items = match host.get_completed_queue(PAGE_SIZE, offset).await {
            Ok(items) => items,
            Err(e) => {
                warn!("failed to load completed queue: {e}");
                return;
            }
        };

        let received = items.len();
        if reset {
            self.completed = items;
            self.completed_offset = PAGE_SIZE;
        } else {
            self.completed.extend(items);
            self.completed_offset = offset + PAGE_SIZE;
        }
        self.completed_has_more = received == PAGE_SIZE;
    }

    /// Optimistically drop the id from the pending display set, then tell
    /// the host. A successful host dismissal moves the item into completed
    /// history, so the completed pages are reset-reloaded to converge. On
    /// failure the optimistic removal stands.
    pub async fn dismiss<H: Host>(&mut self, host: &H, id: &str) {
        self.remove_pending(id);
        match host.dismiss_review_item(id).await {
            Ok(()) => self.load_completed(host, true).await,
            Err(e) => warn!("failed to dismiss {id}: {e}"),
        }
    }

    /// Navigate to the item's tmux context (best effort), then dismiss it.
    pub async fn consume<H: Host>(&mut self, host: &H, id: &str) {
        let Some(item) = self.pending.iter().find(|item| item.id == id).cloned() else {
            return;
        };
        if let Some((session, window, pane)) = item.tmux_target()
            && let Err(e) = host.navigate_to_tmux_pane(session, window, pane).await
        {
            warn!("navigate_to_tmux_pane failed: {e}");
        }
        self.dismiss(host, &item.id).await;
    }

    /// Purge completed history on the host, then locally.
    pub async fn clear_completed<H: Host>(&mut self, host: &H) {
        match host.clear_completed_queue().await {
            Ok(()) => {
                self.completed.clear();
                self.completed_offset = 0;
                self.completed_has_more = false;
            }
            Err(e) => warn!("failed to clear completed queue: {e}"),
        }
    }

    /// Toggle the pending-only filter. Revealing completed items triggers a
    /// reset reload — they are not kept warm while hidden.
    pub async fn set_filter<H: Host>(&mut self, host: &H, show_only_pending: bool) {
        if self.show_only_pending == show_only_pending {
            return;
        }
        self.show_only_pending = show_only_pending;
        if !show_only_pending {
            self.load_completed(host, true).await;
        }
    }
}

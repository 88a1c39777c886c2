//! Overlay controller: owns the window state machine and drives the host.
//!
//! Single-task event loop. Input arrives as pushed host events (pointer,
//! scroll, queue replacement) interleaved with a 50ms locator tick; every
//! handler runs to completion before the next event is looked at, so state
//! transitions never race. A slow host round-trip simply delays the next
//! tick — the interval skips missed ticks rather than queueing them.

use crate::cursor::{self, LOCATOR_INTERVAL};
use crate::geometry::{LogicalPoint, LogicalRect};
use crate::host::{Host, MouseButton};
use crate::hover::{HoverSim, RegionKind, RegionSnapshot};
use crate::ipc::HostEvent;
use crate::list::{self, Virtualizer};
use crate::placement::{Placement, PlacementPatch, PlacementStore, SnapSide};
use crate::queue::QueueModel;
use crate::window::{
    DRAG_SETTLE, OverlayState, PressTracker, SnapResolution, collapsed_size, expanded_size,
    plan_collapse, plan_expand, resolve_snap,
};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// A pointer press awaiting classification on release.
struct Press {
    tracker: PressTracker,
    /// Whether the press landed on chrome and may become a window drag.
    draggable: bool,
}

pub struct Overlay<H: Host> {
    host: H,
    label: String,
    store: Option<PlacementStore>,
    queue: QueueModel,
    state: OverlayState,
    hover: HoverSim,
    regions: RegionSnapshot,
    /// Local record of the window bounds, kept current through every move
    /// and resize this controller issues.
    tracked: LogicalRect,
    scroll_top: f64,
    press: Option<Press>,
    visible: bool,
    /// Whether the last collapsed paint had the shake flag set.
    shake_shown: bool,
}

impl<H: Host> Overlay<H> {
    pub fn new(host: H, label: impl Into<String>, store: Option<PlacementStore>) -> Self {
        Self {
            host,
            label: label.into(),
            store,
            queue: QueueModel::new(),
            state: OverlayState::from_placement(&Placement::default()),
            hover: HoverSim::new(),
            regions: RegionSnapshot::new(),
            tracked: LogicalRect::default(),
            scroll_top: 0.0,
            press: None,
            visible: true,
            shake_shown: false,
        }
    }

    /// Restore persisted placement, honor the float-window setting, and do
    /// the initial data loads. Nothing here is fatal; partial failures leave
    /// the overlay at defaults.
    pub async fn startup(&mut self) {
        match self.host.get_settings().await {
            Ok(settings) if !settings.float_window => {
                info!("float window disabled in settings, hiding");
                self.visible = false;
                if let Err(e) = self.host.hide_window(&self.label).await {
                    warn!("hide_window failed: {e}");
                }
            }
            Ok(_) => {}
            Err(e) => warn!("failed to read settings: {e}"),
        }

        let placement = self
            .store
            .as_ref()
            .map(|store| store.load())
            .unwrap_or_default();
        self.state = OverlayState::from_placement(&placement);

        let size = if self.state.expanded {
            expanded_size()
        } else {
            collapsed_size()
        };
        if let Err(e) = self.host.set_size(&self.label, size).await {
            warn!("set_size failed: {e}");
        }

        let origin = match (placement.x, placement.y) {
            (Some(x), Some(y)) => {
                let point = LogicalPoint::new(x, y);
                if let Err(e) = self.host.set_position(&self.label, point).await {
                    warn!("set_position failed: {e}");
                }
                point
            }
            _ => self
                .host
                .outer_position(&self.label)
                .await
                .unwrap_or_default(),
        };
        self.tracked = LogicalRect::from_origin_size(origin, size);

        match self.host.get_review_queue().await {
            Ok(items) => self.queue.apply_push(items),
            Err(e) => warn!("failed to load review queue: {e}"),
        }
        self.queue.load_completed(&self.host, true).await;

        self.repaint().await;
    }

    /// Drive the overlay until the host connection closes.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<HostEvent>) {
        let mut ticker = tokio::time::interval(LOCATOR_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.on_tick().await,
                event = events.recv() => match event {
                    Some(event) => self.on_event(event).await,
                    None => {
                        info!("host event stream closed, shutting down");
                        break;
                    }
                },
            }
        }
    }

    async fn on_tick(&mut self) {
        if !self.visible || self.state.dragging {
            return;
        }

        if !self.state.expanded && self.shake_shown && !self.state.shaking(Instant::now()) {
            self.repaint().await;
        }

        let point = cursor::locate(&self.host, &self.label, self.tracked).await;
        let outcome = self.hover.tick(point, &self.regions);
        if let Some(glyph) = outcome.glyph
            && let Err(e) = self.host.set_cursor(glyph).await
        {
            warn!("set_cursor failed: {e}");
        }
        if outcome.row_changed {
            self.repaint().await;
        }
    }

    async fn on_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::ReviewQueueUpdate { items } => {
                self.queue.apply_push(items);
                self.repaint().await;
            }
            HostEvent::PointerDown { button, x, y } => {
                if !self.visible {
                    return;
                }
                let point = LogicalPoint::new(x, y);
                let draggable = matches!(
                    self.regions.interactive_at(point),
                    Some(RegionKind::Chrome)
                );
                self.press = Some(Press {
                    tracker: PressTracker::new(button, x, y),
                    draggable,
                });
            }
            HostEvent::PointerMoved { x, y } => {
                if self.state.dragging {
                    return;
                }
                if let Some(press) = &self.press
                    && press.draggable
                    && press.tracker.is_drag(x, y)
                {
                    debug!("press exceeded drag threshold, handing off to host drag");
                    self.state.dragging = true;
                    if let Err(e) = self.host.start_window_drag(&self.label).await {
                        warn!("start_window_drag failed: {e}");
                        self.state.dragging = false;
                    }
                }
            }
            HostEvent::PointerUp { x, y } => {
                let Some(press) = self.press.take() else {
                    return;
                };
                if self.state.dragging {
                    self.settle_drag().await;
                } else {
                    self.on_click(press.tracker.button(), LogicalPoint::new(x, y))
                        .await;
                }
            }
            HostEvent::Scroll { top } => {
                if !self.state.expanded {
                    return;
                }
                let count = self.queue.display_items().len();
                self.scroll_top = Virtualizer::new(count, 0.0).clamp_scroll(top);
                let virt = Virtualizer::new(count, self.scroll_top);
                if !self.queue.show_only_pending()
                    && virt.should_load_more(self.queue.has_more_completed())
                {
                    self.queue.load_completed(&self.host, false).await;
                }
                self.repaint().await;
            }
        }
    }

    async fn on_click(&mut self, button: MouseButton, point: LogicalPoint) {
        if !self.state.expanded {
            match button {
                MouseButton::Left => {
                    let oldest = self.queue.oldest_pending().map(|item| item.id.clone());
                    match oldest {
                        Some(id) => self.queue.consume(&self.host, &id).await,
                        None => self.state.trigger_shake(Instant::now()),
                    }
                }
                MouseButton::Right => self.expand().await,
                MouseButton::Middle => {}
            }
            self.repaint().await;
            return;
        }

        // Topmost-first hit plus the ancestor walk give controls precedence
        // over the chrome they sit on.
        let target = self.regions.interactive_at(point).cloned();
        match (button, target) {
            (_, Some(RegionKind::Chrome)) => self.collapse().await,
            (MouseButton::Left, Some(RegionKind::CloseControl)) => {
                // Hides without touching the expansion flag: reopening from
                // the host comes back in the same mode.
                self.visible = false;
                if let Err(e) = self.host.hide_window(&self.label).await {
                    warn!("hide_window failed: {e}");
                }
            }
            (MouseButton::Left, Some(RegionKind::FilterToggle)) => {
                let next = !self.queue.show_only_pending();
                self.queue.set_filter(&self.host, next).await;
                self.scroll_top = 0.0;
            }
            (MouseButton::Left, Some(RegionKind::ClearButton)) => {
                self.queue.clear_completed(&self.host).await;
            }
            (MouseButton::Left, Some(RegionKind::Dismiss { id })) => {
                self.queue.dismiss(&self.host, &id).await;
            }
            (MouseButton::Left, Some(RegionKind::Row { id })) => {
                if !self.queue.is_completed(&id) {
                    self.queue.consume(&self.host, &id).await;
                }
            }
            _ => {}
        }
        self.repaint().await;
    }

    async fn expand(&mut self) {
        let area = match self.host.work_area(&self.label).await {
            Ok(area) => area,
            Err(e) => {
                warn!("work_area failed, staying collapsed: {e}");
                return;
            }
        };
        let plan = plan_expand(self.tracked.origin(), area);

        if plan.moved
            && let Err(e) = self.host.set_position(&self.label, plan.position).await
        {
            warn!("set_position failed: {e}");
        }
        if let Err(e) = self.host.set_size(&self.label, expanded_size()).await {
            warn!("set_size failed: {e}");
        }

        self.tracked = LogicalRect::from_origin_size(plan.position, expanded_size());
        self.state.expanded = true;
        self.state.expand_direction = plan.direction;
        self.scroll_top = 0.0;
        self.persist(PlacementPatch {
            x: Some(plan.position.x),
            y: Some(plan.position.y),
            is_expanded: Some(true),
            expand_direction: Some(plan.direction),
            ..Default::default()
        });
    }

    async fn collapse(&mut self) {
        let plan = plan_collapse(self.tracked.origin(), self.state.expand_direction);

        if let Err(e) = self.host.set_size(&self.label, collapsed_size()).await {
            warn!("set_size failed: {e}");
        }
        if plan.moved
            && let Err(e) = self.host.set_position(&self.label, plan.position).await
        {
            warn!("set_position failed: {e}");
        }

        self.tracked = LogicalRect::from_origin_size(plan.position, collapsed_size());
        self.state.expanded = false;
        self.scroll_top = 0.0;
        self.persist(PlacementPatch {
            x: Some(plan.position.x),
            y: Some(plan.position.y),
            is_expanded: Some(false),
            ..Default::default()
        });
    }

    /// After a native drag ends the host needs a moment before the final
    /// geometry reads back consistently; wait it out, then resolve snapping
    /// against the monitor that now owns the window.
    async fn settle_drag(&mut self) {
        self.state.dragging = false;
        tokio::time::sleep(DRAG_SETTLE).await;

        let origin = match self.host.outer_position(&self.label).await {
            Ok(origin) => origin,
            Err(e) => {
                warn!("outer_position failed after drag: {e}");
                return;
            }
        };
        self.tracked = LogicalRect::from_origin_size(origin, self.tracked.size());

        let snap = match self.host.work_area(&self.label).await {
            Ok(area) => resolve_snap(self.tracked, area),
            Err(e) => {
                warn!("work_area failed after drag: {e}");
                SnapResolution {
                    side: SnapSide::None,
                    x: origin.x,
                }
            }
        };
        if snap.x != self.tracked.x {
            let snapped = LogicalPoint::new(snap.x, origin.y);
            if self.host.set_position(&self.label, snapped).await.is_ok() {
                self.tracked.x = snap.x;
            }
        }
        self.state.snap_side = snap.side;

        self.persist(PlacementPatch {
            x: Some(self.tracked.x),
            y: Some(self.tracked.y),
            snap_side: Some(snap.side),
            ..Default::default()
        });
        self.repaint().await;
    }

    async fn repaint(&mut self) {
        if !self.visible {
            return;
        }
        let (view, regions) = if self.state.expanded {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            list::build_expanded(&self.queue, self.scroll_top, self.hover.hovered_row(), now)
        } else {
            let shake = self.state.shaking(Instant::now());
            self.shake_shown = shake;
            list::build_collapsed(&self.queue, shake, self.state.snap_side)
        };
        self.regions = regions;
        if let Err(e) = self.host.update_view(&self.label, &view).await {
            warn!("update_view failed: {e}");
        }
    }

    fn persist(&self, patch: PlacementPatch) {
        if let Some(store) = &self.store
            && let Err(e) = store.update(patch)
        {
            warn!("failed to persist placement: {e}");
        }
    }
}

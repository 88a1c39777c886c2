//! revtray — floating review-tray overlay controller.
//!
//! Drives a small always-on-top tray window owned by a host process: a
//! collapsed count badge that expands into a virtualized list of review
//! notifications. The host paints and owns the OS window; this crate holds
//! all the behavior — the collapse/expand state machine, drag and edge
//! snapping, cursor location and hover simulation for a focus-less window,
//! and the dual-source queue model (live pending pushes plus paginated
//! completed history).

pub mod app;
pub mod client;
pub mod cursor;
pub mod geometry;
pub mod host;
pub mod hover;
pub mod ipc;
pub mod item;
pub mod list;
pub mod placement;
pub mod queue;
pub mod window;

pub use app::Overlay;
pub use client::IpcHost;
pub use host::Host;

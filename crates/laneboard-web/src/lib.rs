#![forbid(unsafe_code)]

//! Host-driven interaction layer for the lane board.
//!
//! The host owns the event loop and the display surface. It forwards native
//! drag events, raw touch events and animation frames to a [`LaneBoard`],
//! which reports what each one did and queues move requests for the data
//! layer. Nothing here schedules work by itself: the auto-scroll loop
//! continues only while the host keeps delivering the [`FrameToken`]s it is
//! given.
//!
//! - [`surface`]: hit-testing and scroll-container access ([`BoardSurface`]),
//!   plus the in-memory [`SceneTree`].
//! - [`pointer`] / [`touch`]: the two input adapters.
//! - [`auto_scroll`]: the edge scroll loop.
//! - [`board`]: the mountable component tying them together.

pub mod auto_scroll;
pub mod board;
pub mod live_pointer;
pub mod pointer;
pub mod surface;
pub mod touch;

pub use auto_scroll::{AutoScroller, FrameOutcome, FrameToken, edge_scroll_step, edge_speed};
pub use board::{BoardEvent, BoardView, LaneBoard, LaneView, MoveSettled};
pub use live_pointer::LivePointer;
pub use pointer::{DropEffect, PointerDragAdapter};
pub use surface::{
    BoardSurface, ElementId, LaneStrip, PageInteraction, SceneTree, ScrollDirection, ScrollMetrics,
    resolve_lane_at, resolve_scroll_target, scroll_containers,
};
pub use touch::{
    PreviewFrame, TouchDispatch, TouchDragAdapter, TouchIgnoredReason, TouchOutcome, TouchPhase,
};

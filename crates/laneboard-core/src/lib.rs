#![forbid(unsafe_code)]

//! `laneboard-core` holds the host-independent half of the lane board
//! reordering engine.
//!
//! - [`model`]: lanes, cards and the validated [`LaneModel`](model::LaneModel).
//! - [`drag`]: the single active drag session.
//! - [`drop_resolver`]: release → append-to-lane move plan.
//! - [`wip`]: derived work-in-progress loads.
//! - [`store`]: external data layer and error channel interfaces.
//! - [`config`]: auto-scroll and preview tuning.
//!
//! Nothing here touches a display surface; see `laneboard-web` for the input
//! adapters and the auto-scroll loop.

pub mod config;
pub mod drag;
pub mod drop_resolver;
pub mod error;
pub mod geometry;
pub mod model;
pub mod store;
pub mod wip;

pub use config::{AutoScrollConfig, BoardConfig, PreviewConfig};
pub use drag::{BeginDrag, DragController, DragSession, DragSource, DragState};
pub use drop_resolver::{DropDecision, DropResolver, MovePlan, next_order_in};
pub use error::{BoardError, ConfigError, MoveRejected};
pub use geometry::{Point, Rect};
pub use model::{Card, CardId, CardMeta, Lane, LaneId, LaneModel, Placement};
pub use store::{
    BoardSeed, BoardSource, CardMover, ErrorLog, ErrorSink, InMemoryStore, MoveId, MoveRequest,
    TracingErrorSink,
};
pub use wip::{LaneLoad, WipMonitor, WipReport};

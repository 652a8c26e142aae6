#![forbid(unsafe_code)]

//! Drag session ownership.
//!
//! [`DragController`] is the single source of truth for what is being dragged
//! and from which lane. Both input adapters go through it, which is what keeps
//! a board to one drag at a time.
//!
//! ```text
//! Idle -> Dragging -> Idle
//! ```
//!
//! There is no `Dragging -> Dragging` edge: a begin request while a session is
//! active is ignored and the existing session is left untouched.

use serde::Serialize;

use crate::geometry::Point;
use crate::model::{Card, CardId, LaneId};

/// Which adapter started a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DragSource {
    Pointer,
    Touch,
}

/// Transient record of an in-progress drag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragSession {
    pub card_id: CardId,
    pub origin_lane_id: LaneId,
    pub source: DragSource,
    pub is_active: bool,
    pub last_known_pointer: Option<Point>,
}

/// Coarse controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DragState {
    Idle,
    Dragging,
}

/// Result of [`DragController::begin_drag`].
#[derive(Debug, Clone, PartialEq)]
pub enum BeginDrag {
    Started(DragSession),
    /// A session was already active; nothing changed.
    Ignored,
}

impl BeginDrag {
    #[must_use]
    pub const fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }
}

/// Owns the at-most-one active [`DragSession`].
#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
    sessions_started: u64,
}

impl DragController {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session: None,
            sessions_started: 0,
        }
    }

    /// Start dragging `card`, unless a drag is already active.
    pub fn begin_drag(&mut self, card: &Card, source: DragSource) -> BeginDrag {
        if let Some(active) = &self.session {
            tracing::debug!(
                target: "laneboard.drag",
                active = %active.card_id,
                requested = %card.id,
                "begin_drag ignored: drag already active"
            );
            return BeginDrag::Ignored;
        }
        let session = DragSession {
            card_id: card.id.clone(),
            origin_lane_id: card.lane_id.clone(),
            source,
            is_active: true,
            last_known_pointer: None,
        };
        self.sessions_started = self.sessions_started.saturating_add(1);
        tracing::debug!(
            target: "laneboard.drag",
            card = %card.id,
            origin = %card.lane_id,
            ?source,
            "drag started"
        );
        self.session = Some(session.clone());
        BeginDrag::Started(session)
    }

    /// The active session, if any.
    #[must_use]
    pub fn current_drag(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// End the active session and return it. No-op when idle.
    pub fn end_drag(&mut self) -> Option<DragSession> {
        let mut session = self.session.take()?;
        session.is_active = false;
        tracing::debug!(
            target: "laneboard.drag",
            card = %session.card_id,
            "drag ended"
        );
        Some(session)
    }

    /// Record the latest known pointer position on the active session.
    pub fn update_pointer(&mut self, position: Point) {
        if let Some(session) = &mut self.session {
            session.last_known_pointer = Some(position);
        }
    }

    /// Lane drop targets accept a release only while a drag is active.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub const fn state(&self) -> DragState {
        if self.session.is_some() {
            DragState::Dragging
        } else {
            DragState::Idle
        }
    }

    /// Total sessions started over the controller's lifetime.
    #[must_use]
    pub const fn sessions_started(&self) -> u64 {
        self.sessions_started
    }
}

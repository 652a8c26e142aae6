#![forbid(unsafe_code)]

//! Touch drag adapter.
//!
//! Touch surfaces have no native drag gesture on cards, so a drag is rebuilt
//! from raw touch events, one touch identifier at a time:
//!
//! ```text
//! Idle --touch_start--> Armed --touch_move--> Dragging
//!   ^                     |                      |
//!   +---- touch_end / touch_cancel (teardown) ---+
//! ```
//!
//! Every move writes the position twice: into the shared [`LivePointer`] read
//! by the auto-scroll tick, and into the render-facing preview anchor used for
//! the floating card. Both writes happen in the same call.
//!
//! The adapter never touches the host surface. The board suppresses page
//! interaction when a touch arms, resolves the release lane, and runs the
//! shared teardown, which calls [`TouchDragAdapter::reset`].

use laneboard_core::{
    BeginDrag, Card, CardId, DragController, DragSource, DropDecision, Point, PreviewConfig, Rect,
};
use serde::Serialize;

use crate::auto_scroll::FrameToken;
use crate::live_pointer::LivePointer;

/// Per-gesture phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    #[default]
    Idle,
    /// Finger down on a card handle, not moved yet.
    Armed,
    Dragging,
}

/// Why a touch event did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchIgnoredReason {
    ActiveTouchInProgress,
    DragAlreadyActive,
    NoActiveTouch,
    TouchMismatch,
    UnknownCard,
}

/// What a touch event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum TouchOutcome {
    Armed,
    /// First move after arming; the preview appears.
    DragStarted,
    Moved,
    Released,
    Cancelled,
    Ignored(TouchIgnoredReason),
}

impl TouchOutcome {
    #[must_use]
    pub const fn is_ignored(self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

/// Result of one touch event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TouchDispatch {
    /// Phase after the event.
    pub phase: TouchPhase,
    pub touch_id: u64,
    pub position: Option<Point>,
    pub outcome: TouchOutcome,
    /// Filled by the board for releases.
    pub drop: Option<DropDecision>,
    /// Filled by the board when this event started the auto-scroll loop.
    pub schedule_frame: Option<FrameToken>,
}

/// Floating card preview: fixed size, centered on the live touch point,
/// above all content and never hit-tested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewFrame {
    pub card_id: CardId,
    pub rect: Rect,
}

#[derive(Debug, Clone)]
pub struct TouchDragAdapter {
    phase: TouchPhase,
    touch_id: Option<u64>,
    card_id: Option<CardId>,
    start: Option<Point>,
    live: LivePointer,
    preview_anchor: Option<Point>,
    preview_size: PreviewConfig,
}

impl TouchDragAdapter {
    #[must_use]
    pub fn new(live: LivePointer, preview_size: PreviewConfig) -> Self {
        Self {
            phase: TouchPhase::Idle,
            touch_id: None,
            card_id: None,
            start: None,
            live,
            preview_anchor: None,
            preview_size,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> TouchPhase {
        self.phase
    }

    #[must_use]
    pub const fn active_touch(&self) -> Option<u64> {
        self.touch_id
    }

    /// Where the active touch first landed.
    #[must_use]
    pub const fn start_position(&self) -> Option<Point> {
        self.start
    }

    pub fn touch_start(
        &mut self,
        controller: &mut DragController,
        card: Option<&Card>,
        touch_id: u64,
        point: Point,
    ) -> TouchDispatch {
        if self.phase != TouchPhase::Idle {
            return self.ignored(touch_id, point, TouchIgnoredReason::ActiveTouchInProgress);
        }
        let Some(card) = card else {
            return self.ignored(touch_id, point, TouchIgnoredReason::UnknownCard);
        };
        if let BeginDrag::Ignored = controller.begin_drag(card, DragSource::Touch) {
            return self.ignored(touch_id, point, TouchIgnoredReason::DragAlreadyActive);
        }
        controller.update_pointer(point);
        self.phase = TouchPhase::Armed;
        self.touch_id = Some(touch_id);
        self.card_id = Some(card.id.clone());
        self.start = Some(point);
        self.write_position(point);
        tracing::debug!(target: "laneboard.touch", touch_id, card = %card.id, "touch armed");
        self.dispatch(touch_id, point, TouchOutcome::Armed)
    }

    pub fn touch_move(
        &mut self,
        controller: &mut DragController,
        touch_id: u64,
        point: Point,
    ) -> TouchDispatch {
        if let Err(reason) = self.check_touch(touch_id) {
            return self.ignored(touch_id, point, reason);
        }
        self.write_position(point);
        controller.update_pointer(point);
        let outcome = if self.phase == TouchPhase::Armed {
            self.phase = TouchPhase::Dragging;
            tracing::debug!(target: "laneboard.touch", touch_id, "touch drag started");
            TouchOutcome::DragStarted
        } else {
            TouchOutcome::Moved
        };
        self.dispatch(touch_id, point, outcome)
    }

    /// Accept the release of the active touch. The adapter stays in its
    /// current phase until the board's teardown resets it.
    pub fn touch_end(
        &mut self,
        controller: &mut DragController,
        touch_id: u64,
        point: Point,
    ) -> TouchDispatch {
        if let Err(reason) = self.check_touch(touch_id) {
            return self.ignored(touch_id, point, reason);
        }
        self.write_position(point);
        controller.update_pointer(point);
        tracing::debug!(target: "laneboard.touch", touch_id, "touch released");
        self.dispatch(touch_id, point, TouchOutcome::Released)
    }

    pub fn touch_cancel(&mut self, touch_id: u64) -> TouchDispatch {
        let position = self.live.get();
        if let Err(reason) = self.check_touch(touch_id) {
            return TouchDispatch {
                phase: self.phase,
                touch_id,
                position,
                outcome: TouchOutcome::Ignored(reason),
                drop: None,
                schedule_frame: None,
            };
        }
        tracing::debug!(target: "laneboard.touch", touch_id, "touch cancelled");
        TouchDispatch {
            phase: self.phase,
            touch_id,
            position,
            outcome: TouchOutcome::Cancelled,
            drop: None,
            schedule_frame: None,
        }
    }

    /// Back to `Idle`, clearing both position representations.
    pub fn reset(&mut self) {
        self.phase = TouchPhase::Idle;
        self.touch_id = None;
        self.card_id = None;
        self.start = None;
        self.preview_anchor = None;
        self.live.clear();
    }

    /// Render-facing preview, shown only while dragging.
    #[must_use]
    pub fn preview(&self) -> Option<PreviewFrame> {
        if self.phase != TouchPhase::Dragging {
            return None;
        }
        let anchor = self.preview_anchor?;
        Some(PreviewFrame {
            card_id: self.card_id.clone()?,
            rect: Rect::centered_at(anchor, self.preview_size.width, self.preview_size.height),
        })
    }

    fn write_position(&mut self, point: Point) {
        self.live.set(point);
        self.preview_anchor = Some(point);
    }

    fn check_touch(&self, touch_id: u64) -> Result<(), TouchIgnoredReason> {
        match self.touch_id {
            None => Err(TouchIgnoredReason::NoActiveTouch),
            Some(active) if active != touch_id => Err(TouchIgnoredReason::TouchMismatch),
            Some(_) => Ok(()),
        }
    }

    fn dispatch(&self, touch_id: u64, point: Point, outcome: TouchOutcome) -> TouchDispatch {
        TouchDispatch {
            phase: self.phase,
            touch_id,
            position: Some(point),
            outcome,
            drop: None,
            schedule_frame: None,
        }
    }

    fn ignored(&self, touch_id: u64, point: Point, reason: TouchIgnoredReason) -> TouchDispatch {
        tracing::trace!(target: "laneboard.touch", touch_id, ?reason, "touch event ignored");
        self.dispatch(touch_id, point, TouchOutcome::Ignored(reason))
    }
}

#![forbid(unsafe_code)]

//! Native drag-and-drop adapter.
//!
//! Maps the host's `dragstart` / `dragover` / `drop` / `dragend` sequence onto
//! the [`DragController`]. No auto-scroll runs on this path; the host's native
//! drag scrolling, if any, applies. Terminal events hand control back to the
//! board, which runs the shared teardown.

use laneboard_core::{
    BeginDrag, Card, DragController, DragSource, DropDecision, DropResolver, LaneId, LaneModel,
};
use serde::Serialize;

/// Answer to a drag-over event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropEffect {
    /// The host should cancel its default rejection so a drop can follow.
    Move,
    None,
}

/// Pointer-side drag state: only the lane currently hovered.
#[derive(Debug, Clone, Default)]
pub struct PointerDragAdapter {
    hover_lane: Option<LaneId>,
}

impl PointerDragAdapter {
    #[must_use]
    pub const fn new() -> Self {
        Self { hover_lane: None }
    }

    pub fn drag_start(&mut self, controller: &mut DragController, card: &Card) -> BeginDrag {
        let begin = controller.begin_drag(card, DragSource::Pointer);
        if begin.is_started() {
            self.hover_lane = None;
        }
        begin
    }

    /// Permit a drop over `lane` while a pointer drag is active.
    pub fn drag_over(&mut self, controller: &DragController, lane: Option<&LaneId>) -> DropEffect {
        if !is_pointer_drag(controller) {
            return DropEffect::None;
        }
        self.hover_lane = lane.cloned();
        if lane.is_some() {
            DropEffect::Move
        } else {
            DropEffect::None
        }
    }

    /// Resolve a drop over `lane`. `None` when no pointer drag is active.
    #[must_use]
    pub fn drop(
        &self,
        controller: &DragController,
        model: &LaneModel,
        lane: Option<&LaneId>,
    ) -> Option<DropDecision> {
        let session = controller.current_drag().filter(|s| s.source == DragSource::Pointer)?;
        Some(DropResolver::resolve(model, session, lane))
    }

    /// Whether a `dragend` with no preceding drop leaves a session to cancel.
    #[must_use]
    pub fn drag_end(&self, controller: &DragController) -> bool {
        is_pointer_drag(controller)
    }

    #[must_use]
    pub fn hover_lane(&self) -> Option<&LaneId> {
        self.hover_lane.as_ref()
    }

    pub fn reset(&mut self) {
        self.hover_lane = None;
    }
}

fn is_pointer_drag(controller: &DragController) -> bool {
    controller
        .current_drag()
        .is_some_and(|session| session.source == DragSource::Pointer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use laneboard_core::{CardId, Lane};

    fn model() -> LaneModel {
        LaneModel::new(
            vec![Lane::new("todo", "Todo", 0), Lane::new("done", "Done", 1)],
            vec![Card::new("c1", "One", "todo", 2.0), Card::new("d1", "D", "done", 4.0)],
        )
        .unwrap()
    }

    #[test]
    fn drag_over_requires_active_pointer_drag() {
        let mut adapter = PointerDragAdapter::new();
        let controller = DragController::new();
        assert_eq!(adapter.drag_over(&controller, Some(&LaneId::new("done"))), DropEffect::None);
        assert_eq!(adapter.hover_lane(), None);
    }

    #[test]
    fn drag_over_tracks_hovered_lane() {
        let model = model();
        let mut adapter = PointerDragAdapter::new();
        let mut controller = DragController::new();
        let card = model.card(&CardId::new("c1")).unwrap();
        assert!(adapter.drag_start(&mut controller, card).is_started());
        assert_eq!(adapter.drag_over(&controller, Some(&LaneId::new("done"))), DropEffect::Move);
        assert_eq!(adapter.hover_lane(), Some(&LaneId::new("done")));
        assert_eq!(adapter.drag_over(&controller, None), DropEffect::None);
        assert_eq!(adapter.hover_lane(), None);
    }

    #[test]
    fn drop_resolves_against_model() {
        let model = model();
        let mut adapter = PointerDragAdapter::new();
        let mut controller = DragController::new();
        adapter.drag_start(&mut controller, model.card(&CardId::new("c1")).unwrap());

        let decision = adapter.drop(&controller, &model, Some(&LaneId::new("done"))).unwrap();
        assert_eq!(decision.plan().map(|p| p.new_order), Some(5.0));
        assert_eq!(
            adapter.drop(&controller, &model, Some(&LaneId::new("todo"))),
            Some(DropDecision::SameLane)
        );
        assert!(adapter.drag_end(&controller));
    }

    #[test]
    fn touch_sessions_are_not_pointer_drops() {
        let model = model();
        let adapter = PointerDragAdapter::new();
        let mut controller = DragController::new();
        controller.begin_drag(model.card(&CardId::new("c1")).unwrap(), DragSource::Touch);
        assert_eq!(adapter.drop(&controller, &model, Some(&LaneId::new("done"))), None);
        assert!(!adapter.drag_end(&controller));
    }
}

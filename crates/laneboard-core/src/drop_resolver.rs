#![forbid(unsafe_code)]

//! Drop resolution: turn a release into a lane/order change.
//!
//! Moves always append: the card lands after every card already in the
//! destination lane (`max(order) + 1`, or `1` for an empty lane). Dropping on
//! the origin lane, on no lane, or for a card that no longer exists resolves
//! to a no-op decision rather than an error.

use serde::Serialize;

use crate::drag::DragSession;
use crate::model::{CardId, LaneId, LaneModel};

/// A committed lane change, ready to become a move mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovePlan {
    pub card_id: CardId,
    pub from_lane: LaneId,
    pub to_lane: LaneId,
    pub new_order: f64,
    pub previous_order: f64,
}

/// Outcome of resolving a drop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum DropDecision {
    Move(MovePlan),
    /// Released over the lane the card already belongs to.
    SameLane,
    /// Released over nothing that carries a known lane id.
    NoTarget,
    /// The dragged card is no longer on the board.
    UnknownCard,
}

impl DropDecision {
    #[must_use]
    pub fn plan(&self) -> Option<&MovePlan> {
        match self {
            Self::Move(plan) => Some(plan),
            _ => None,
        }
    }
}

/// Order value a card receives when appended to `lane`.
#[must_use]
pub fn next_order_in(model: &LaneModel, lane: &LaneId) -> f64 {
    model.max_order_in(lane).unwrap_or(0.0) + 1.0
}

/// Stateless drop resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropResolver;

impl DropResolver {
    /// Decide what a release over `target` means for `session`.
    #[must_use]
    pub fn resolve(
        model: &LaneModel,
        session: &DragSession,
        target: Option<&LaneId>,
    ) -> DropDecision {
        let Some(card) = model.card(&session.card_id) else {
            return DropDecision::UnknownCard;
        };
        let Some(target) = target.filter(|lane| model.lane(lane).is_some()) else {
            return DropDecision::NoTarget;
        };
        if *target == card.lane_id || *target == session.origin_lane_id {
            return DropDecision::SameLane;
        }
        DropDecision::Move(MovePlan {
            card_id: card.id.clone(),
            from_lane: card.lane_id.clone(),
            to_lane: target.clone(),
            new_order: next_order_in(model, target),
            previous_order: card.order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::{DragController, DragSource};
    use crate::model::{Card, Lane};

    fn model() -> LaneModel {
        let lanes = vec![
            Lane::new("backlog", "Backlog", 0),
            Lane::new("todo", "Todo", 1),
            Lane::new("done", "Done", 2),
        ];
        let cards = vec![
            Card::new("c1", "One", "backlog", 5.0),
            Card::new("t1", "T1", "todo", 3.0),
            Card::new("t2", "T2", "todo", 7.5),
        ];
        LaneModel::new(lanes, cards).unwrap()
    }

    fn session_for(model: &LaneModel, id: &str) -> DragSession {
        let mut controller = DragController::new();
        let card = model.card(&CardId::new(id)).unwrap();
        controller.begin_drag(card, DragSource::Pointer);
        controller.current_drag().unwrap().clone()
    }

    #[test]
    fn move_to_populated_lane_appends_after_max() {
        let model = model();
        let session = session_for(&model, "c1");
        let decision = DropResolver::resolve(&model, &session, Some(&LaneId::new("todo")));
        let plan = decision.plan().expect("should move");
        assert_eq!(plan.new_order, 8.5);
        assert_eq!(plan.previous_order, 5.0);
        assert_eq!(plan.from_lane, LaneId::new("backlog"));
    }

    #[test]
    fn move_to_empty_lane_gets_order_one() {
        let model = model();
        let session = session_for(&model, "c1");
        let decision = DropResolver::resolve(&model, &session, Some(&LaneId::new("done")));
        assert_eq!(decision.plan().unwrap().new_order, 1.0);
    }

    #[test]
    fn same_lane_is_noop() {
        let model = model();
        let session = session_for(&model, "t1");
        assert_eq!(
            DropResolver::resolve(&model, &session, Some(&LaneId::new("todo"))),
            DropDecision::SameLane
        );
    }

    #[test]
    fn missing_or_unknown_target_is_no_target() {
        let model = model();
        let session = session_for(&model, "c1");
        assert_eq!(
            DropResolver::resolve(&model, &session, None),
            DropDecision::NoTarget
        );
        assert_eq!(
            DropResolver::resolve(&model, &session, Some(&LaneId::new("archive"))),
            DropDecision::NoTarget
        );
    }

    #[test]
    fn vanished_card_is_unknown() {
        let model = model();
        let mut session = session_for(&model, "c1");
        session.card_id = CardId::new("gone");
        assert_eq!(
            DropResolver::resolve(&model, &session, Some(&LaneId::new("done"))),
            DropDecision::UnknownCard
        );
    }
}

#![forbid(unsafe_code)]

//! Work-in-progress evaluation.
//!
//! [`WipMonitor`] is a pure projection of a [`LaneModel`]: it counts cards per
//! lane and compares the count with the effective limit. It holds no state and
//! is recomputed whenever cards or lanes change.

use serde::Serialize;

use crate::model::{LaneId, LaneModel};

/// Load of a single lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaneLoad {
    pub lane_id: LaneId,
    pub count: usize,
    pub limit: Option<u32>,
    pub over_limit: bool,
}

/// Per-lane loads in board order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WipReport {
    loads: Vec<LaneLoad>,
}

impl WipReport {
    #[must_use]
    pub fn loads(&self) -> &[LaneLoad] {
        &self.loads
    }

    #[must_use]
    pub fn lane(&self, id: &LaneId) -> Option<&LaneLoad> {
        self.loads.iter().find(|load| &load.lane_id == id)
    }

    /// Whether `id` holds more cards than its limit. Unknown lanes are never
    /// over limit.
    #[must_use]
    pub fn is_over_limit(&self, id: &LaneId) -> bool {
        self.lane(id).is_some_and(|load| load.over_limit)
    }

    pub fn over_limit_lanes(&self) -> impl Iterator<Item = &LaneId> {
        self.loads
            .iter()
            .filter(|load| load.over_limit)
            .map(|load| &load.lane_id)
    }
}

/// Derives [`WipReport`]s from lane models.
#[derive(Debug, Clone, Copy, Default)]
pub struct WipMonitor;

impl WipMonitor {
    #[must_use]
    pub fn evaluate(model: &LaneModel) -> WipReport {
        let loads = model
            .lanes()
            .iter()
            .map(|lane| {
                let count = model.count_in(&lane.id);
                let limit = model.wip_limit(&lane.id);
                LaneLoad {
                    lane_id: lane.id.clone(),
                    count,
                    limit,
                    over_limit: limit.is_some_and(|limit| count > limit as usize),
                }
            })
            .collect();
        WipReport { loads }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::model::{Card, Lane};

    fn model(todo_cards: usize, limit: Option<u32>) -> LaneModel {
        let mut todo = Lane::new("todo", "Todo", 0);
        todo.wip_limit = limit;
        let lanes = vec![todo, Lane::new("done", "Done", 1)];
        let cards = (0..todo_cards)
            .map(|i| Card::new(format!("c{i}"), "card", "todo", i as f64))
            .collect();
        LaneModel::new(lanes, cards).unwrap()
    }

    #[test]
    fn at_limit_is_not_over() {
        let report = WipMonitor::evaluate(&model(2, Some(2)));
        assert!(!report.is_over_limit(&LaneId::new("todo")));
        assert_eq!(report.lane(&LaneId::new("todo")).unwrap().count, 2);
    }

    #[test]
    fn above_limit_is_over() {
        let report = WipMonitor::evaluate(&model(3, Some(2)));
        assert!(report.is_over_limit(&LaneId::new("todo")));
        let over: Vec<&LaneId> = report.over_limit_lanes().collect();
        assert_eq!(over, vec![&LaneId::new("todo")]);
    }

    #[test]
    fn unlimited_lane_is_never_over() {
        let report = WipMonitor::evaluate(&model(50, None));
        assert!(!report.is_over_limit(&LaneId::new("todo")));
        assert_eq!(report.lane(&LaneId::new("todo")).unwrap().limit, None);
    }

    #[test]
    fn external_limit_applies() {
        let mut limits = HashMap::new();
        limits.insert(LaneId::new("todo"), 1);
        let report = WipMonitor::evaluate(&model(2, None).with_wip_limits(limits));
        assert!(report.is_over_limit(&LaneId::new("todo")));
        assert!(!report.is_over_limit(&LaneId::new("missing")));
    }
}

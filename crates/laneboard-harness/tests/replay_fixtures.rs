//! Replays the checked-in scenarios end to end.

use std::path::PathBuf;

use laneboard_core::{CardId, LaneId};
use laneboard_harness::{Scenario, StepResult, replay};
use laneboard_web::MoveSettled;
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> Scenario {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name);
    Scenario::from_file(path).unwrap()
}

#[test]
fn touch_drag_scrolls_to_done_then_pointer_overfills_todo() {
    let report = replay(&fixture("touch_autoscroll_to_done.json"), None).unwrap();

    // 15 frames at 20px bring "done" under x=690.
    assert_eq!(
        report.steps[2].result,
        StepResult::Frames {
            delivered: 15,
            scrolled: 300.0
        }
    );
    assert_eq!(report.strip_scroll_left, 300.0);

    let done = report.view.lanes.iter().find(|l| l.lane_id == LaneId::new("done")).unwrap();
    assert_eq!(done.cards, vec![CardId::new("C1")]);

    let todo = report.view.lanes.iter().find(|l| l.lane_id == LaneId::new("todo")).unwrap();
    assert_eq!(todo.count, 3);
    assert!(todo.over_limit);
    assert!(report.wip.is_over_limit(&LaneId::new("todo")));

    let orders: Vec<(String, f64)> = report
        .applied_moves
        .iter()
        .map(|m| (m.card_id.to_string(), m.new_order))
        .collect();
    assert_eq!(orders, vec![("C1".to_string(), 1.0), ("C2".to_string(), 3.0)]);
    match &report.steps[7].result {
        StepResult::Flushed { moves } => {
            assert!(moves.iter().all(|(_, settled)| *settled == MoveSettled::Confirmed));
        }
        other => panic!("expected flush result, got {other:?}"),
    }
}

#[test]
fn cancelled_touch_leaves_card_and_loop_stopped() {
    let report = replay(&fixture("touch_cancel.json"), None).unwrap();

    assert_eq!(
        report.steps[4].result,
        StepResult::Frames {
            delivered: 0,
            scrolled: 0.0
        }
    );
    assert_eq!(report.frames_ticked, 3);
    assert_eq!(report.view.lanes[0].cards, vec![CardId::new("C1")]);
    assert!(report.applied_moves.is_empty());
    assert!(report.pending_moves.is_empty());
    assert!(report.view.preview.is_none());
    assert_eq!(report.view.dragging, None);
}

#[test]
fn report_serializes_to_json() {
    let report = replay(&fixture("touch_cancel.json"), None).unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["steps"][3]["result"]["kind"], "touch");
    assert_eq!(value["steps"][3]["result"]["dispatch"]["outcome"]["outcome"], "cancelled");
}

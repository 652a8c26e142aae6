//! Drives a [`LaneBoard`] through a [`Scenario`] and records what each step
//! did.

use laneboard_core::{
    BoardConfig, BoardSource, Card, ConfigError, DropDecision, ErrorLog, InMemoryStore, LaneId,
    MoveId, MoveRequest, Point, WipReport,
};
use laneboard_web::{
    BoardEvent, BoardView, DropEffect, FrameOutcome, LaneBoard, MoveSettled, SceneTree,
    TouchDispatch,
};
use serde::Serialize;

use crate::error::{HarnessError, Result};
use crate::scenario::{Scenario, Step};

/// What one step did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepResult {
    DragStart { started: bool },
    DragOver { effect: DropEffect },
    Drop { decision: Option<DropDecision> },
    DragEnd { cancelled: bool },
    Touch { dispatch: TouchDispatch },
    Frames { delivered: u32, scrolled: f64 },
    Flushed { moves: Vec<(MoveId, MoveSettled)> },
    StoreUpdated,
    Refreshed,
    Cancelled { was_dragging: bool },
    Affordance { accepted: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub step: Step,
    pub result: StepResult,
}

/// Full replay output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepRecord>,
    pub view: BoardView,
    pub wip: WipReport,
    pub errors: Vec<String>,
    pub events: Vec<BoardEvent>,
    /// Moves the store accepted.
    pub applied_moves: Vec<MoveRequest>,
    /// Moves still queued or awaiting completion.
    pub pending_moves: Vec<MoveRequest>,
    pub frames_ticked: u64,
    pub strip_scroll_left: f64,
}

impl ReplayReport {
    /// One line per lane, then errors and pending moves.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for lane in &self.view.lanes {
            let limit = lane
                .limit
                .map_or_else(|| lane.count.to_string(), |limit| format!("{}/{limit}", lane.count));
            let flag = if lane.over_limit { " OVER" } else { "" };
            let cards: Vec<&str> = lane.cards.iter().map(|id| id.as_str()).collect();
            out.push_str(&format!(
                "{:<12} [{limit}]{flag}  {}\n",
                lane.lane_id.as_str(),
                cards.join(" ")
            ));
        }
        for error in &self.errors {
            out.push_str(&format!("error: {error}\n"));
        }
        for pending in &self.pending_moves {
            out.push_str(&format!(
                "pending: {} {} -> {} @ {}\n",
                pending.id, pending.card_id, pending.to_lane, pending.new_order
            ));
        }
        out
    }
}

/// Replay `scenario`. `config` overrides the scenario's own config.
pub fn replay(scenario: &Scenario, config: Option<BoardConfig>) -> Result<ReplayReport> {
    let config = config.or(scenario.config).unwrap_or_default();
    let problems = config.validate();
    if !problems.is_empty() {
        return Err(ConfigError::Validation(problems).into());
    }

    let mut store = InMemoryStore::from_seed(scenario.board.clone());
    let errors = ErrorLog::new();
    let filter: Option<Vec<Card>> = scenario.filter.as_ref().map(|ids| {
        store
            .list_cards()
            .into_iter()
            .filter(|card| ids.contains(&card.id))
            .collect()
    });
    let mut board = LaneBoard::mount(&store, filter, config, Box::new(errors.clone()))?;

    let lanes: Vec<LaneId> = board.model().lanes().iter().map(|l| l.id.clone()).collect();
    let (mut scene, strip) = SceneTree::lane_strip(
        scenario.scene.viewport,
        &lanes,
        scenario.scene.lane_width,
        scenario.scene.gap,
    );

    let mut records = Vec::with_capacity(scenario.steps.len());
    let mut events = Vec::new();
    for (index, step) in scenario.steps.iter().enumerate() {
        let result = match step {
            Step::PointerStart { card } => StepResult::DragStart {
                started: board.pointer_drag_start(card).is_started(),
            },
            Step::PointerOver { lane } => StepResult::DragOver {
                effect: board.pointer_drag_over(lane.as_ref()),
            },
            Step::PointerDrop { lane } => StepResult::Drop {
                decision: board.pointer_drop(&mut scene, lane.as_ref()),
            },
            Step::PointerEnd => StepResult::DragEnd {
                cancelled: board.pointer_drag_end(&mut scene),
            },
            Step::TouchStart { card, touch, x, y } => StepResult::Touch {
                dispatch: board.touch_start(&mut scene, card, *touch, Point::new(*x, *y)),
            },
            Step::TouchMove { touch, x, y } => StepResult::Touch {
                dispatch: board.touch_move(&mut scene, *touch, Point::new(*x, *y)),
            },
            Step::TouchEnd { touch, x, y } => StepResult::Touch {
                dispatch: board.touch_end(&mut scene, *touch, Point::new(*x, *y)),
            },
            Step::TouchCancel { touch } => StepResult::Touch {
                dispatch: board.touch_cancel(&mut scene, *touch),
            },
            Step::Frames { count } => {
                let mut delivered = 0;
                let mut scrolled = 0.0;
                while delivered < *count {
                    let Some(token) = board.pending_frame() else {
                        break;
                    };
                    if let FrameOutcome::Scrolled { delta, .. } =
                        board.animation_frame(&mut scene, token)
                    {
                        scrolled += delta;
                    }
                    delivered += 1;
                }
                StepResult::Frames {
                    delivered,
                    scrolled,
                }
            }
            Step::Flush => StepResult::Flushed {
                moves: board.flush_moves(&mut store),
            },
            Step::Reject { reason } => {
                store.reject_moves(reason.clone());
                StepResult::StoreUpdated
            }
            Step::Accept => {
                store.accept_moves();
                StepResult::StoreUpdated
            }
            Step::Refresh => {
                board
                    .refresh(&store, &mut scene)
                    .map_err(|error| HarnessError::Step {
                        index,
                        message: error.to_string(),
                    })?;
                StepResult::Refreshed
            }
            Step::Cancel => StepResult::Cancelled {
                was_dragging: board.cancel_drag(&mut scene),
            },
            Step::CreateCard { lane } => StepResult::Affordance {
                accepted: board.request_create_card(lane),
            },
            Step::OpenCard { card } => StepResult::Affordance {
                accepted: board.open_card(card),
            },
        };
        tracing::debug!(target: "laneboard.harness", index, ?result, "step replayed");
        events.extend(board.take_events());
        records.push(StepRecord {
            index,
            step: step.clone(),
            result,
        });
    }

    let report = ReplayReport {
        steps: records,
        view: board.view(),
        wip: board.wip(),
        errors: errors.entries().iter().map(ToString::to_string).collect(),
        events,
        applied_moves: store.applied_moves().to_vec(),
        pending_moves: board.in_flight_moves().into_iter().cloned().collect(),
        frames_ticked: board.auto_scroller().frames_ticked(),
        strip_scroll_left: scene.scroll_left(strip.strip),
    };
    tracing::info!(
        target: "laneboard.harness",
        steps = report.steps.len(),
        errors = report.errors.len(),
        applied = report.applied_moves.len(),
        "replay finished"
    );
    Ok(report)
}

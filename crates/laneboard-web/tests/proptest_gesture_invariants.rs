//! Property-based tests for auto-scroll speed and arbitrary gesture streams.
//!
//! 1. Edge speed is non-decreasing as the distance to the edge shrinks, zero
//!    from the threshold outward, and bounded by the max speed.
//! 2. A scroll step never leaves the scroll range.
//! 3. After any interleaving of pointer, touch and frame events:
//!    - no scroll loop runs and the page is not suppressed without a drag,
//!    - page suppression and restoration strictly alternate,
//!    - every card is owned by exactly one lane,
//!    - every queued move targets a known lane and appends at order 1 or
//!      above.

use laneboard_core::{
    AutoScrollConfig, BoardConfig, Card, CardId, ErrorLog, InMemoryStore, Lane, LaneId, Point, Rect,
};
use laneboard_web::{
    BoardSurface, LaneBoard, PageInteraction, SceneTree, ScrollMetrics, edge_scroll_step,
    edge_speed,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

const LANES: [&str; 5] = ["backlog", "todo", "doing", "review", "done"];
const CARDS: usize = 6;

fn scroll_config() -> impl Strategy<Value = AutoScrollConfig> {
    (1.0f64..400.0, 0.0f64..10.0, 0.0f64..60.0).prop_map(|(threshold, min, extra)| {
        AutoScrollConfig {
            threshold_px: threshold,
            min_speed_px: min,
            max_speed_px: min + extra,
        }
    })
}

fn store() -> InMemoryStore {
    let lanes = LANES
        .iter()
        .enumerate()
        .map(|(i, id)| Lane::new(*id, id.to_uppercase(), i as u32))
        .collect();
    let cards = (0..CARDS)
        .map(|i| Card::new(format!("c{i}"), format!("Card {i}"), LANES[i % LANES.len()], i as f64))
        .collect();
    InMemoryStore::new(lanes, cards).with_wip_limit("todo", 1)
}

#[derive(Debug, Clone)]
enum Op {
    PointerStart(usize),
    PointerOver(Option<usize>),
    PointerDrop(Option<usize>),
    PointerEnd,
    TouchStart(usize, u64, f64, f64),
    TouchMove(u64, f64, f64),
    TouchEnd(u64, f64, f64),
    TouchCancel(u64),
    Frame,
    Cancel,
}

fn op() -> impl Strategy<Value = Op> {
    let x = -50.0f64..1200.0;
    let y = -20.0f64..520.0;
    let touch = 0u64..3;
    prop_oneof![
        (0..CARDS).prop_map(Op::PointerStart),
        proptest::option::of(0..LANES.len()).prop_map(Op::PointerOver),
        proptest::option::of(0..LANES.len()).prop_map(Op::PointerDrop),
        Just(Op::PointerEnd),
        (0..CARDS, touch.clone(), x.clone(), y.clone())
            .prop_map(|(c, t, x, y)| Op::TouchStart(c, t, x, y)),
        (touch.clone(), x.clone(), y.clone()).prop_map(|(t, x, y)| Op::TouchMove(t, x, y)),
        (touch.clone(), x, y).prop_map(|(t, x, y)| Op::TouchEnd(t, x, y)),
        touch.prop_map(Op::TouchCancel),
        Just(Op::Frame),
        Just(Op::Cancel),
    ]
}

fn apply(board: &mut LaneBoard, scene: &mut SceneTree, op: &Op) {
    let card = |i: usize| CardId::new(format!("c{i}"));
    let lane = |i: usize| LaneId::new(LANES[i]);
    match *op {
        Op::PointerStart(c) => {
            board.pointer_drag_start(&card(c));
        }
        Op::PointerOver(l) => {
            board.pointer_drag_over(l.map(lane).as_ref());
        }
        Op::PointerDrop(l) => {
            board.pointer_drop(scene, l.map(lane).as_ref());
        }
        Op::PointerEnd => {
            board.pointer_drag_end(scene);
        }
        Op::TouchStart(c, t, x, y) => {
            board.touch_start(scene, &card(c), t, Point::new(x, y));
        }
        Op::TouchMove(t, x, y) => {
            board.touch_move(scene, t, Point::new(x, y));
        }
        Op::TouchEnd(t, x, y) => {
            board.touch_end(scene, t, Point::new(x, y));
        }
        Op::TouchCancel(t) => {
            board.touch_cancel(scene, t);
        }
        Op::Frame => {
            if let Some(token) = board.pending_frame() {
                board.animation_frame(scene, token);
            }
        }
        Op::Cancel => {
            board.cancel_drag(scene);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Edge speed
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn speed_is_monotone_in_distance(
        config in scroll_config(),
        a in -100.0f64..600.0,
        b in -100.0f64..600.0,
    ) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(edge_speed(near, &config) >= edge_speed(far, &config));
    }

    #[test]
    fn speed_is_zero_beyond_threshold(config in scroll_config(), extra in 0.0f64..1000.0) {
        prop_assert_eq!(edge_speed(config.threshold_px + extra, &config), 0.0);
    }

    #[test]
    fn speed_stays_within_bounds(config in scroll_config(), d in -500.0f64..500.0) {
        let speed = edge_speed(d, &config);
        if d < config.threshold_px {
            prop_assert!(speed >= config.min_speed_px);
            prop_assert!(speed <= config.max_speed_px + 1e-9);
        } else {
            prop_assert_eq!(speed, 0.0);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Scroll step range
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn step_stays_in_scroll_range(
        config in scroll_config(),
        px in -200.0f64..1200.0,
        scroll_left in 0.0f64..1000.0,
    ) {
        let metrics = ScrollMetrics {
            viewport: Rect::new(0.0, 0.0, 1000.0, 400.0),
            scroll_left,
            scroll_width: 2000.0,
            client_width: 1000.0,
            overflow_x_scrollable: true,
        };
        let preview = Rect::centered_at(Point::new(px, 200.0), 280.0, 96.0);
        if let Some(step) = edge_scroll_step(&preview, &metrics, &config) {
            let after = scroll_left + step;
            prop_assert!(step != 0.0);
            prop_assert!(after >= 0.0);
            prop_assert!(after <= metrics.max_scroll_left() + 1e-9);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Gesture streams
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn arbitrary_gestures_keep_board_consistent(ops in proptest::collection::vec(op(), 1..60)) {
        let store = store();
        let sink = Box::new(ErrorLog::new());
        let mut board = LaneBoard::mount(&store, None, BoardConfig::default(), sink).unwrap();
        let lanes: Vec<LaneId> = LANES.iter().map(|id| LaneId::new(*id)).collect();
        let (mut scene, strip) =
            SceneTree::lane_strip(Rect::new(0.0, 0.0, 700.0, 500.0), &lanes, 300.0, 20.0);
        let max_scroll = scene
            .scroll_metrics(strip.strip)
            .map_or(0.0, |metrics| metrics.max_scroll_left());

        for op in &ops {
            apply(&mut board, &mut scene, op);

            let dragging = board.controller().current_drag().is_some();
            if !dragging {
                prop_assert!(!board.is_auto_scrolling(), "orphaned scroll loop after {:?}", op);
                prop_assert!(!board.is_page_suppressed());
                prop_assert_eq!(scene.page_interaction(), PageInteraction::Normal);
                prop_assert!(board.view().preview.is_none());
            }
            prop_assert!(board.model().ownership_violations().is_empty());
            prop_assert_eq!(board.model().cards().len(), CARDS);
            let scroll = scene.scroll_left(strip.strip);
            prop_assert!((0.0..=max_scroll).contains(&scroll));
        }

        let history = scene.page_interaction_history();
        for (i, mode) in history.iter().enumerate() {
            let expected = if i % 2 == 0 {
                PageInteraction::Suppressed
            } else {
                PageInteraction::Normal
            };
            prop_assert_eq!(*mode, expected);
        }

        for request in board.take_move_requests() {
            prop_assert!(board.model().lane(&request.to_lane).is_some());
        }
        prop_assert!(board.in_flight_moves().iter().all(|r| r.new_order >= 1.0));
    }
}

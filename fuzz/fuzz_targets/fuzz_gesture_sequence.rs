#![no_main]

use arbitrary::Arbitrary;
use laneboard_core::{
    BoardConfig, Card, CardId, ErrorLog, InMemoryStore, Lane, LaneId, MoveRejected, Point, Rect,
};
use laneboard_web::{LaneBoard, PageInteraction, SceneTree};
use libfuzzer_sys::fuzz_target;

const LANES: [&str; 4] = ["backlog", "todo", "doing", "done"];

#[derive(Debug, Arbitrary)]
enum Event {
    PointerStart(u8),
    PointerOver(Option<u8>),
    PointerDrop(Option<u8>),
    PointerEnd,
    TouchStart { card: u8, touch: u8, x: i16, y: i16 },
    TouchMove { touch: u8, x: i16, y: i16 },
    TouchEnd { touch: u8, x: i16, y: i16 },
    TouchCancel(u8),
    Frame,
    Complete { reject: bool },
    Cancel,
}

fuzz_target!(|events: Vec<Event>| {
    let lanes = LANES
        .iter()
        .enumerate()
        .map(|(i, id)| Lane::new(*id, *id, i as u32))
        .collect();
    let cards = (0..6)
        .map(|i| Card::new(format!("c{i}"), "card", LANES[i % LANES.len()], i as f64))
        .collect();
    let store = InMemoryStore::new(lanes, cards).with_wip_limit("todo", 1);
    let sink = Box::new(ErrorLog::new());
    let Ok(mut board) = LaneBoard::mount(&store, None, BoardConfig::default(), sink) else {
        return;
    };
    let lane_ids: Vec<LaneId> = LANES.iter().map(|id| LaneId::new(*id)).collect();
    let (mut scene, _) =
        SceneTree::lane_strip(Rect::new(0.0, 0.0, 700.0, 500.0), &lane_ids, 300.0, 20.0);

    let card = |i: u8| CardId::new(format!("c{}", i % 7));
    let lane = |i: u8| LaneId::new(LANES[usize::from(i) % LANES.len()]);
    let point = |x: i16, y: i16| Point::new(f64::from(x) / 16.0, f64::from(y) / 32.0);

    for event in events.iter().take(256) {
        match *event {
            Event::PointerStart(c) => {
                board.pointer_drag_start(&card(c));
            }
            Event::PointerOver(l) => {
                board.pointer_drag_over(l.map(lane).as_ref());
            }
            Event::PointerDrop(l) => {
                board.pointer_drop(&mut scene, l.map(lane).as_ref());
            }
            Event::PointerEnd => {
                board.pointer_drag_end(&mut scene);
            }
            Event::TouchStart { card: c, touch, x, y } => {
                board.touch_start(&mut scene, &card(c), u64::from(touch % 3), point(x, y));
            }
            Event::TouchMove { touch, x, y } => {
                board.touch_move(&mut scene, u64::from(touch % 3), point(x, y));
            }
            Event::TouchEnd { touch, x, y } => {
                board.touch_end(&mut scene, u64::from(touch % 3), point(x, y));
            }
            Event::TouchCancel(touch) => {
                board.touch_cancel(&mut scene, u64::from(touch % 3));
            }
            Event::Frame => {
                if let Some(token) = board.pending_frame() {
                    board.animation_frame(&mut scene, token);
                }
            }
            Event::Complete { reject } => {
                for request in board.take_move_requests() {
                    let result = if reject { Err(MoveRejected::new("fuzz")) } else { Ok(()) };
                    board.complete_move(request.id, result);
                }
            }
            Event::Cancel => {
                board.cancel_drag(&mut scene);
            }
        }

        if board.controller().current_drag().is_none() {
            assert!(!board.is_auto_scrolling(), "scroll loop outlived the drag");
            assert_eq!(scene.page_interaction(), PageInteraction::Normal);
        }
        assert!(board.model().ownership_violations().is_empty());
        assert_eq!(board.model().cards().len(), 6);
    }
});

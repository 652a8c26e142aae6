#![forbid(unsafe_code)]

//! The authoritative drag position.
//!
//! Touch-move events arrive many times per frame; the auto-scroll tick runs
//! once per frame. Both hold a clone of the same [`LivePointer`], so the tick
//! always reads the position written by the most recent event rather than a
//! render-state copy that may not have been refreshed yet.

use std::cell::Cell;
use std::rc::Rc;

use laneboard_core::Point;

/// Shared, synchronously-updated pointer cell. Clones observe the same value.
#[derive(Debug, Clone, Default)]
pub struct LivePointer(Rc<Cell<Option<Point>>>);

impl LivePointer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, point: Point) {
        self.0.set(Some(point));
    }

    #[must_use]
    pub fn get(&self) -> Option<Point> {
        self.0.get()
    }

    pub fn clear(&self) {
        self.0.set(None);
    }
}

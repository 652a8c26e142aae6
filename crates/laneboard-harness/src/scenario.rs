//! Replay scenario format.
//!
//! ```json
//! {
//!   "board": { "lanes": [...], "cards": [...], "wip_limits": { "todo": 2 } },
//!   "scene": { "viewport": { "x": 0, "y": 0, "width": 700, "height": 500 },
//!              "lane_width": 300, "gap": 20 },
//!   "steps": [
//!     { "op": "touch_start", "card": "C1", "touch": 1, "x": 100, "y": 100 },
//!     { "op": "touch_move", "touch": 1, "x": 690, "y": 100 },
//!     { "op": "frames", "count": 20 },
//!     { "op": "touch_end", "touch": 1, "x": 690, "y": 100 },
//!     { "op": "flush" }
//!   ]
//! }
//! ```

use std::path::Path;

use laneboard_core::{BoardConfig, BoardSeed, CardId, LaneId, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: Option<BoardConfig>,
    pub board: BoardSeed,
    #[serde(default)]
    pub scene: SceneSpec,
    /// Card ids passed to the board as its pre-filtered list.
    #[serde(default)]
    pub filter: Option<Vec<CardId>>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Self::from_json_str(&content)
    }
}

/// Geometry of the generated lane strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSpec {
    pub viewport: Rect,
    pub lane_width: f64,
    pub gap: f64,
}

impl Default for SceneSpec {
    fn default() -> Self {
        Self {
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
            lane_width: 300.0,
            gap: 16.0,
        }
    }
}

/// One scripted host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    PointerStart { card: CardId },
    PointerOver { lane: Option<LaneId> },
    PointerDrop { lane: Option<LaneId> },
    PointerEnd,
    TouchStart { card: CardId, touch: u64, x: f64, y: f64 },
    TouchMove { touch: u64, x: f64, y: f64 },
    TouchEnd { touch: u64, x: f64, y: f64 },
    TouchCancel { touch: u64 },
    /// Deliver up to `count` pending animation frames.
    Frames { count: u32 },
    /// Send queued moves to the store and complete them.
    Flush,
    /// Make the store reject following moves.
    Reject { reason: String },
    Accept,
    Refresh,
    Cancel,
    CreateCard { lane: LaneId },
    OpenCard { card: CardId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_scenario_with_defaults() {
        let scenario = Scenario::from_json_str(
            r#"{
                "board": {
                    "lanes": [{ "id": "todo", "title": "Todo", "position": 0 }],
                    "cards": []
                },
                "steps": [{ "op": "pointer_end" }, { "op": "frames", "count": 3 }]
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.scene, SceneSpec::default());
        assert_eq!(scenario.config, None);
        assert_eq!(scenario.steps, vec![Step::PointerEnd, Step::Frames { count: 3 }]);
    }

    #[test]
    fn unknown_op_is_rejected() {
        let error = Scenario::from_json_str(r#"{ "board": {}, "steps": [{ "op": "teleport" }] }"#)
            .unwrap_err();
        assert!(matches!(error, HarnessError::Json(_)));
    }
}

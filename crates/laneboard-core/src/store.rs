#![forbid(unsafe_code)]

//! Interfaces to the external data layer and the user-facing error channel.
//!
//! The board only reads through [`BoardSource`] and writes through the one
//! move mutation. Hosts with an asynchronous data layer drain
//! [`MoveRequest`]s and report completion back to the board; [`CardMover`] is
//! the synchronous form of the same call, used by [`InMemoryStore`] and the
//! replay harness.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::drop_resolver::MovePlan;
use crate::error::{BoardError, MoveRejected, Result};
use crate::model::{Card, CardId, Lane, LaneId, LaneModel};

// ---------------------------------------------------------------------------
// Move mutation
// ---------------------------------------------------------------------------

/// Correlates a move request with its later completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveId(u64);

impl MoveId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "move#{}", self.0)
    }
}

/// The sole mutation: `(card, destination lane, new order)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub id: MoveId,
    pub card_id: CardId,
    pub to_lane: LaneId,
    pub new_order: f64,
}

impl MoveRequest {
    #[must_use]
    pub fn from_plan(id: MoveId, plan: &MovePlan) -> Self {
        Self {
            id,
            card_id: plan.card_id.clone(),
            to_lane: plan.to_lane.clone(),
            new_order: plan.new_order,
        }
    }
}

// ---------------------------------------------------------------------------
// External collaborators
// ---------------------------------------------------------------------------

/// Read accessors of the external data layer.
pub trait BoardSource {
    fn list_cards(&self) -> Vec<Card>;

    fn list_lanes(&self) -> Vec<Lane>;

    fn wip_limits(&self) -> HashMap<LaneId, u32>;

    /// Read everything into a validated [`LaneModel`].
    fn load_model(&self) -> Result<LaneModel> {
        Ok(LaneModel::new(self.list_lanes(), self.list_cards())?.with_wip_limits(self.wip_limits()))
    }
}

/// Synchronous form of the move mutation.
pub trait CardMover {
    fn move_card(&mut self, request: &MoveRequest) -> std::result::Result<(), MoveRejected>;
}

/// User-facing error channel.
pub trait ErrorSink {
    fn report(&mut self, error: &BoardError);
}

/// Reports errors through `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&mut self, error: &BoardError) {
        tracing::error!(target: "laneboard.errors", %error, "board error");
    }
}

/// Shared in-process error collector. Clones observe the same entries.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Rc<RefCell<Vec<BoardError>>>,
}

impl ErrorLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<BoardError> {
        self.entries.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl ErrorSink for ErrorLog {
    fn report(&mut self, error: &BoardError) {
        self.entries.borrow_mut().push(error.clone());
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Serializable board contents used to seed an [`InMemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSeed {
    pub lanes: Vec<Lane>,
    pub cards: Vec<Card>,
    pub wip_limits: HashMap<LaneId, u32>,
}

/// A data layer held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    seed: BoardSeed,
    rejection: Option<String>,
    applied: Vec<MoveRequest>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new(lanes: Vec<Lane>, cards: Vec<Card>) -> Self {
        Self::from_seed(BoardSeed {
            lanes,
            cards,
            wip_limits: HashMap::new(),
        })
    }

    #[must_use]
    pub fn from_seed(seed: BoardSeed) -> Self {
        Self {
            seed,
            rejection: None,
            applied: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_wip_limit(mut self, lane: impl Into<String>, limit: u32) -> Self {
        self.seed.wip_limits.insert(LaneId::new(lane), limit);
        self
    }

    /// Reject every following move with `reason`.
    pub fn reject_moves(&mut self, reason: impl Into<String>) {
        self.rejection = Some(reason.into());
    }

    /// Accept moves again.
    pub fn accept_moves(&mut self) {
        self.rejection = None;
    }

    /// Moves accepted so far, in order.
    #[must_use]
    pub fn applied_moves(&self) -> &[MoveRequest] {
        &self.applied
    }

    #[must_use]
    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.seed.cards.iter().find(|card| &card.id == id)
    }
}

impl BoardSource for InMemoryStore {
    fn list_cards(&self) -> Vec<Card> {
        self.seed.cards.clone()
    }

    fn list_lanes(&self) -> Vec<Lane> {
        self.seed.lanes.clone()
    }

    fn wip_limits(&self) -> HashMap<LaneId, u32> {
        self.seed.wip_limits.clone()
    }
}

impl CardMover for InMemoryStore {
    fn move_card(&mut self, request: &MoveRequest) -> std::result::Result<(), MoveRejected> {
        if let Some(reason) = &self.rejection {
            return Err(MoveRejected::new(reason.clone()));
        }
        if !self.seed.lanes.iter().any(|lane| lane.id == request.to_lane) {
            return Err(MoveRejected::new(format!("unknown lane {}", request.to_lane)));
        }
        let Some(card) = self.seed.cards.iter_mut().find(|card| card.id == request.card_id) else {
            return Err(MoveRejected::new(format!("unknown card {}", request.card_id)));
        };
        card.lane_id = request.to_lane.clone();
        card.order = request.new_order;
        self.applied.push(request.clone());
        Ok(())
    }
}

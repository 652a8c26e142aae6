#![forbid(unsafe_code)]

//! Lane model: ordered lanes and the cards assigned to them.
//!
//! Every card names its owning lane through `lane_id`; the model validates
//! that the lane exists and that ids are unique, so a card always belongs to
//! exactly one lane. [`LaneModel::apply_move`] is the only mutation.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Lane identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaneId(String);

impl LaneId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LaneId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Card identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Card metadata carried for display only; the drag engine never reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardMeta {
    pub assignee: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

/// A single work item on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub lane_id: LaneId,
    pub order: f64,
    #[serde(default)]
    pub meta: CardMeta,
}

impl Card {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        lane_id: impl Into<String>,
        order: f64,
    ) -> Self {
        Self {
            id: CardId::new(id),
            title: title.into(),
            lane_id: LaneId::new(lane_id),
            order,
            meta: CardMeta::default(),
        }
    }
}

/// An ordered column that owns a set of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub id: LaneId,
    pub title: String,
    pub position: u32,
    #[serde(default)]
    pub wip_limit: Option<u32>,
}

impl Lane {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, position: u32) -> Self {
        Self {
            id: LaneId::new(id),
            title: title.into(),
            position,
            wip_limit: None,
        }
    }

    #[must_use]
    pub fn with_wip_limit(mut self, limit: u32) -> Self {
        self.wip_limit = Some(limit);
        self
    }
}

/// Where a card sits: its lane and order value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub lane_id: LaneId,
    pub order: f64,
}

// ---------------------------------------------------------------------------
// LaneModel
// ---------------------------------------------------------------------------

/// Validated snapshot of lanes and cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneModel {
    lanes: Vec<Lane>,
    cards: Vec<Card>,
    card_index: HashMap<CardId, usize>,
    wip_limits: HashMap<LaneId, u32>,
}

impl LaneModel {
    /// Build a model, rejecting duplicate ids and cards in unknown lanes.
    ///
    /// Lanes are ordered by `position`; ties keep their given order.
    pub fn new(lanes: Vec<Lane>, cards: Vec<Card>) -> Result<Self> {
        let mut lanes = lanes;
        lanes.sort_by_key(|lane| lane.position);
        for (i, lane) in lanes.iter().enumerate() {
            if lanes[..i].iter().any(|other| other.id == lane.id) {
                return Err(BoardError::DuplicateLane {
                    lane_id: lane.id.clone(),
                });
            }
        }

        let mut card_index = HashMap::with_capacity(cards.len());
        for (i, card) in cards.iter().enumerate() {
            if !lanes.iter().any(|lane| lane.id == card.lane_id) {
                return Err(BoardError::UnknownLane {
                    card_id: card.id.clone(),
                    lane_id: card.lane_id.clone(),
                });
            }
            if card_index.insert(card.id.clone(), i).is_some() {
                return Err(BoardError::DuplicateCard {
                    card_id: card.id.clone(),
                });
            }
        }

        Ok(Self {
            lanes,
            cards,
            card_index,
            wip_limits: HashMap::new(),
        })
    }

    /// Attach externally configured WIP limits.
    #[must_use]
    pub fn with_wip_limits(mut self, limits: HashMap<LaneId, u32>) -> Self {
        self.wip_limits = limits;
        self
    }

    /// Replace externally configured WIP limits.
    pub fn set_wip_limits(&mut self, limits: HashMap<LaneId, u32>) {
        self.wip_limits = limits;
    }

    /// Lanes in board order.
    #[must_use]
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// All cards in insertion order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn lane(&self, id: &LaneId) -> Option<&Lane> {
        self.lanes.iter().find(|lane| &lane.id == id)
    }

    #[must_use]
    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.card_index.get(id).map(|&i| &self.cards[i])
    }

    /// Cards in `lane`, sorted by `order`. Equal orders keep insertion order.
    #[must_use]
    pub fn cards_in(&self, lane: &LaneId) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self.cards.iter().filter(|c| &c.lane_id == lane).collect();
        cards.sort_by(|a, b| a.order.total_cmp(&b.order));
        cards
    }

    #[must_use]
    pub fn count_in(&self, lane: &LaneId) -> usize {
        self.cards.iter().filter(|c| &c.lane_id == lane).count()
    }

    /// Largest order value in `lane`, or `None` when the lane is empty.
    #[must_use]
    pub fn max_order_in(&self, lane: &LaneId) -> Option<f64> {
        self.cards
            .iter()
            .filter(|c| &c.lane_id == lane)
            .map(|c| c.order)
            .reduce(f64::max)
    }

    /// Effective WIP limit for `lane`.
    ///
    /// External limits take precedence over the lane's own; zero means
    /// unlimited.
    #[must_use]
    pub fn wip_limit(&self, lane: &LaneId) -> Option<u32> {
        self.wip_limits
            .get(lane)
            .copied()
            .or_else(|| self.lane(lane).and_then(|l| l.wip_limit))
            .filter(|&limit| limit > 0)
    }

    /// Reassign a card, returning its previous placement.
    pub fn apply_move(
        &mut self,
        card_id: &CardId,
        to_lane: &LaneId,
        order: f64,
    ) -> Result<Placement> {
        if self.lane(to_lane).is_none() {
            return Err(BoardError::UnknownLane {
                card_id: card_id.clone(),
                lane_id: to_lane.clone(),
            });
        }
        let Some(&i) = self.card_index.get(card_id) else {
            return Err(BoardError::UnknownCard {
                card_id: card_id.clone(),
            });
        };
        let card = &mut self.cards[i];
        let previous = Placement {
            lane_id: std::mem::replace(&mut card.lane_id, to_lane.clone()),
            order: std::mem::replace(&mut card.order, order),
        };
        tracing::trace!(
            target: "laneboard.model",
            card = %card_id,
            from = %previous.lane_id,
            to = %to_lane,
            order,
            "card placement changed"
        );
        Ok(previous)
    }

    /// Cards that are not owned by exactly one known lane.
    ///
    /// Empty for any model built through [`LaneModel::new`] and mutated only
    /// through [`LaneModel::apply_move`].
    #[must_use]
    pub fn ownership_violations(&self) -> Vec<CardId> {
        let mut seen: HashMap<&CardId, usize> = HashMap::new();
        for card in &self.cards {
            *seen.entry(&card.id).or_default() += 1;
        }
        self.cards
            .iter()
            .filter(|card| seen[&card.id] > 1 || self.lane(&card.lane_id).is_none())
            .map(|card| card.id.clone())
            .collect()
    }
}

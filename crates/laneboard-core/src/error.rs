#![forbid(unsafe_code)]

//! Error taxonomy for board data and configuration.
//!
//! Gesture-level problems (a second drag, a release over nothing) are not
//! errors; adapters report them as ignored outcomes. Only data problems and
//! rejected mutations surface here.

use thiserror::Error;

use crate::model::{CardId, LaneId};

pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors raised while building or mutating the lane model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("duplicate lane id: {lane_id}")]
    DuplicateLane { lane_id: LaneId },

    #[error("duplicate card id: {card_id}")]
    DuplicateCard { card_id: CardId },

    #[error("card {card_id} references unknown lane {lane_id}")]
    UnknownLane { card_id: CardId, lane_id: LaneId },

    #[error("unknown card: {card_id}")]
    UnknownCard { card_id: CardId },

    #[error("moving card {card_id} to {to_lane} was rejected: {reason}")]
    MoveRejected {
        card_id: CardId,
        to_lane: LaneId,
        reason: String,
    },
}

/// Rejection returned by the external data layer for a move mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct MoveRejected {
    pub reason: String,
}

impl MoveRejected {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading a [`BoardConfig`](crate::config::BoardConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid board config: {}", .0.join("; "))]
    Validation(Vec<String>),
}

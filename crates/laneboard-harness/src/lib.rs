#![forbid(unsafe_code)]

//! Scenario replay for the lane board.
//!
//! A scenario is a board seed plus a list of host events (pointer, touch,
//! animation frames, store behaviour). [`replay`] runs them against an
//! in-memory store and a generated lane strip and returns a serializable
//! [`ReplayReport`].

pub mod cli;
pub mod error;
pub mod replay;
pub mod scenario;

pub use cli::run_from_env;
pub use error::{HarnessError, Result};
pub use replay::{ReplayReport, StepRecord, StepResult, replay};
pub use scenario::{SceneSpec, Scenario, Step};

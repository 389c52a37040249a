//! Deterministic game module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - One event processed at a time, in arrival order
//! - No DOM, timer or storage dependencies

pub mod answer;
pub mod problem;
pub mod state;
pub mod tick;

pub use answer::{evaluate, matches_problem, parse_answer};
pub use problem::{Problem, arithmetic_problem, generate, times_table_problem};
pub use state::{GamePhase, GameSession, GameState, Snapshot};
pub use tick::{DrillEvent, Effect, request_start, step, tick};

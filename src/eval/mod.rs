//! Position evaluation.
//!
//! Scores a state from a given player's perspective on `[0, 1]`, with 1.0
//! reserved for a win and 0.0 for a loss.

pub mod heuristic;
pub mod table;

pub use heuristic::{evaluate, player_score, squash, ScoreBreakdown};
pub use table::{TableError, WeightTable};

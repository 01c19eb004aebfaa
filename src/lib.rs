//! Formic engine library.
//!
//! A move-selection engine for a two-player ant colony game on a 10x10
//! grid: the state model, move application and combat, a heuristic
//! evaluator, legal move generation, and a depth-bounded self lookahead.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod search;
pub mod setup;

pub use engine::{choose_move, EngineError};

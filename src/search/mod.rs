//! Move search.
//!
//! A depth-bounded lookahead over the controlled player's own moves, scored
//! by the heuristic evaluator at the frontier.

pub mod lookahead;
pub mod score;

pub use lookahead::{search, SearchError, SearchResult, SelfLookahead};
pub use score::Score;

//! Line protocol handling.
//!
//! Parses driver commands and converts moves, placements and positions to
//! and from their text forms.

pub mod notation;
pub mod parser;

pub use notation::{format_move, format_placement, parse_move, parse_position, NotationError};
pub use parser::{parse_command, Command, GoParams};

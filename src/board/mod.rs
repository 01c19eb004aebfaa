//! Board representation and game-state types.
//!
//! Contains the core data structures for coordinates, units, structures,
//! moves, and the overall game state.

pub mod coord;
pub mod moves;
pub mod state;
pub mod structure;
pub mod unit;

pub use coord::{Coord, Owner, Player, ALL_PLAYERS, BOARD_SIZE, CELL_COUNT, TERRITORY_DEPTH};
pub use moves::{BuildTarget, Move};
pub use state::{Board, Cell, GameState, Inventory, Phase, StateError};
pub use structure::{Structure, StructureKind};
pub use unit::{Caste, CasteStats, Unit, BUILDABLE_CASTES, NON_ROYAL_CASTES};

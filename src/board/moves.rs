//! Move types.
//!
//! A move is one action within a turn: ending the turn, walking a unit
//! along a path, or building a unit or structure. Moves are produced by a
//! move generator and consumed by the transition function.

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::structure::StructureKind;
use super::unit::Caste;

/// What a build move creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildTarget {
    Unit(Caste),
    Structure(StructureKind),
}

impl BuildTarget {
    /// Resource cost of the target, or `None` if it cannot be built.
    pub const fn cost(self) -> Option<i32> {
        match self {
            BuildTarget::Unit(c) => c.stats().cost,
            BuildTarget::Structure(k) => k.build_cost(),
        }
    }
}

/// A single action within a turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// End the turn: `end`
    End,

    /// Walk a unit: `move 0,0-0,1-0,2`. The first coordinate is the unit's
    /// current cell, the last its destination.
    Move { path: Vec<Coord> },

    /// Build at a cell: `build 3,3 worker`
    Build { at: Coord, target: BuildTarget },
}

impl Move {
    /// Convenience constructor for a move along `path`.
    pub fn walk(path: impl Into<Vec<Coord>>) -> Self {
        Move::Move { path: path.into() }
    }

    pub fn build_unit(at: Coord, caste: Caste) -> Self {
        Move::Build {
            at,
            target: BuildTarget::Unit(caste),
        }
    }

    pub fn build_structure(at: Coord, kind: StructureKind) -> Self {
        Move::Build {
            at,
            target: BuildTarget::Structure(kind),
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Move::End)
    }
}

//! Structures: bases, resource nodes, and obstacles.

use serde::{Deserialize, Serialize};

use super::coord::{Coord, Owner};

/// The kind of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    HomeBase,
    FallbackBase,
    ResourceNode,
    Obstacle,
}

impl StructureKind {
    /// Resource cost to build; `None` if players cannot build this kind.
    pub const fn build_cost(self) -> Option<i32> {
        match self {
            StructureKind::FallbackBase => Some(3),
            _ => None,
        }
    }

    /// Starting capture health. Each turn of enemy occupation wears off one
    /// point, and the structure falls once it is down to 1.
    pub const fn capture_health(self) -> u8 {
        match self {
            StructureKind::HomeBase => 3,
            StructureKind::FallbackBase => 1,
            StructureKind::ResourceNode | StructureKind::Obstacle => 0,
        }
    }

    /// Bases accept resource deposits from friendly workers.
    pub const fn is_deposit(self) -> bool {
        matches!(self, StructureKind::HomeBase | StructureKind::FallbackBase)
    }

    pub const fn notation(self) -> &'static str {
        match self {
            StructureKind::HomeBase => "home",
            StructureKind::FallbackBase => "fallback",
            StructureKind::ResourceNode => "resource",
            StructureKind::Obstacle => "obstacle",
        }
    }

    pub fn from_notation(s: &str) -> Option<StructureKind> {
        match s {
            "home" => Some(StructureKind::HomeBase),
            "fallback" => Some(StructureKind::FallbackBase),
            "resource" => Some(StructureKind::ResourceNode),
            "obstacle" => Some(StructureKind::Obstacle),
            _ => None,
        }
    }
}

/// A structure placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Structure {
    pub owner: Owner,
    pub kind: StructureKind,
    pub coord: Coord,
    /// Turns of enemy occupation accumulated so far.
    #[serde(default)]
    pub capture_progress: u8,
}

impl Structure {
    pub fn new(owner: Owner, kind: StructureKind, coord: Coord) -> Self {
        Structure {
            owner,
            kind,
            coord,
            capture_progress: 0,
        }
    }
}

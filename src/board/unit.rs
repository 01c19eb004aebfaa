//! Unit castes, their stat table, and unit instances.

use serde::{Deserialize, Serialize};

use super::coord::{Coord, Player};

/// The role of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Caste {
    Queen,
    Worker,
    Drone,
    MeleeSoldier,
    RangedSoldier,
}

/// Castes a player can build, in move-generation order.
pub const BUILDABLE_CASTES: [Caste; 4] = [
    Caste::Worker,
    Caste::Drone,
    Caste::MeleeSoldier,
    Caste::RangedSoldier,
];

/// Castes scored by the composition term of the evaluator.
pub const NON_ROYAL_CASTES: [Caste; 4] = BUILDABLE_CASTES;

/// Static stats for a caste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CasteStats {
    pub movement: u8,
    pub max_health: u8,
    pub attack: u8,
    pub range: u8,
    /// Resource cost to build; `None` for castes that cannot be built.
    pub cost: Option<i32>,
    pub ignores_obstacles: bool,
}

impl Caste {
    pub const fn stats(self) -> CasteStats {
        match self {
            Caste::Queen => CasteStats {
                movement: 2,
                max_health: 10,
                attack: 2,
                range: 1,
                cost: None,
                ignores_obstacles: false,
            },
            Caste::Worker => CasteStats {
                movement: 2,
                max_health: 4,
                attack: 1,
                range: 1,
                cost: Some(1),
                ignores_obstacles: false,
            },
            Caste::Drone => CasteStats {
                movement: 3,
                max_health: 5,
                attack: 1,
                range: 1,
                cost: Some(1),
                ignores_obstacles: true,
            },
            Caste::MeleeSoldier => CasteStats {
                movement: 2,
                max_health: 10,
                attack: 2,
                range: 1,
                cost: Some(2),
                ignores_obstacles: false,
            },
            Caste::RangedSoldier => CasteStats {
                movement: 1,
                max_health: 5,
                attack: 1,
                range: 3,
                cost: Some(2),
                ignores_obstacles: false,
            },
        }
    }

    /// Castes that fight for ground rather than gather.
    pub const fn is_military(self) -> bool {
        matches!(
            self,
            Caste::Drone | Caste::MeleeSoldier | Caste::RangedSoldier
        )
    }

    /// Protocol name used in build notation.
    pub const fn notation(self) -> &'static str {
        match self {
            Caste::Queen => "queen",
            Caste::Worker => "worker",
            Caste::Drone => "drone",
            Caste::MeleeSoldier => "soldier",
            Caste::RangedSoldier => "ranged",
        }
    }

    pub fn from_notation(s: &str) -> Option<Caste> {
        match s {
            "queen" => Some(Caste::Queen),
            "worker" => Some(Caste::Worker),
            "drone" => Some(Caste::Drone),
            "soldier" => Some(Caste::MeleeSoldier),
            "ranged" => Some(Caste::RangedSoldier),
            _ => None,
        }
    }
}

/// A unit on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub owner: Player,
    pub caste: Caste,
    pub coord: Coord,
    pub health: u8,
    /// Only meaningful for workers.
    pub carrying: bool,
    pub has_acted: bool,
}

impl Unit {
    /// Creates a full-health unit that has not acted yet.
    pub fn new(owner: Player, caste: Caste, coord: Coord) -> Self {
        Unit {
            owner,
            caste,
            coord,
            health: caste.stats().max_health,
            carrying: false,
            has_acted: false,
        }
    }

    /// Remaining health as a fraction of the caste maximum.
    pub fn health_fraction(&self) -> f64 {
        self.health as f64 / self.caste.stats().max_health as f64
    }

    /// Returns true if `target` is within this unit's attack range.
    pub fn in_range(&self, target: Coord) -> bool {
        let range = self.caste.stats().range as u32;
        self.coord.distance_sq(target) <= range * range
    }
}

//! Game state representation.
//!
//! Holds the complete snapshot of a game at a given point in time: the
//! board occupancy arena, the three inventories (one per player plus the
//! neutral one), whose turn it is, and the game phase.
//!
//! Units and structures live in the inventories. The board only records
//! which owner occupies each cell, so cloning is a flat copy and every
//! lookup goes through a coordinate.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::coord::{Coord, Owner, Player, CELL_COUNT};
use super::structure::{Structure, StructureKind};
use super::unit::{Caste, Unit};

/// Errors raised when a state would violate its occupancy invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("coordinate {0} is off the board")]
    OffBoard(Coord),

    #[error("cell {0} already holds a unit")]
    UnitOccupied(Coord),

    #[error("cell {0} already holds a structure")]
    StructureOccupied(Coord),

    #[error("no unit at {0}")]
    NoUnit(Coord),

    #[error("inventory slot {slot} holds the inventory of {found:?}")]
    MisplacedInventory { slot: usize, found: Owner },

    #[error("unit at {coord} is listed in the inventory of {inventory:?}")]
    ForeignUnit { coord: Coord, inventory: Owner },

    #[error("structure at {coord} is listed in the inventory of {inventory:?}")]
    ForeignStructure { coord: Coord, inventory: Owner },

    #[error("unit at {coord} has health {health} above its maximum {max}")]
    OverHealth { coord: Coord, health: u8, max: u8 },

    #[error("board cell {0} disagrees with the inventories")]
    BoardMismatch(Coord),

    #[error("{0:?} owns more than one home base")]
    DuplicateHomeBase(Owner),
}

/// The phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Setup: placing structures on the player's own side.
    PlaceOwn,
    /// Setup: placing resource nodes on the opponent's side.
    PlaceEnemy,
    Play,
}

/// Occupancy of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    /// Owner of the unit standing here, if any.
    pub unit: Option<Player>,
    /// Owner of the structure built here, if any.
    pub structure: Option<Owner>,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        unit: None,
        structure: None,
    };
}

/// Fixed-size occupancy arena indexed by `Coord::index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    pub const fn empty() -> Self {
        Board {
            cells: [Cell::EMPTY; CELL_COUNT],
        }
    }

    #[inline]
    pub fn cell(&self, coord: Coord) -> Cell {
        self.cells[coord.index()]
    }

    #[inline]
    pub fn unit_owner(&self, coord: Coord) -> Option<Player> {
        self.cells[coord.index()].unit
    }

    #[inline]
    pub fn structure_owner(&self, coord: Coord) -> Option<Owner> {
        self.cells[coord.index()].structure
    }

    #[inline]
    fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        &mut self.cells[coord.index()]
    }
}

/// Per-owner holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub owner: Owner,
    /// Stored resources. Only an unchecked build can push this below zero.
    pub resources: i32,
    pub units: Vec<Unit>,
    /// Shared between clones; copied on the rare write.
    pub structures: Arc<Vec<Structure>>,
    /// Set once this owner's queen has been destroyed in combat.
    #[serde(default)]
    pub royal_lost: bool,
}

impl Inventory {
    pub fn new(owner: Owner) -> Self {
        Inventory {
            owner,
            resources: 0,
            units: Vec::new(),
            structures: Arc::new(Vec::new()),
            royal_lost: false,
        }
    }
}

/// Complete game state at a point in time.
///
/// Mutation goes through methods that keep the board arena and the
/// inventories in agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StateSnapshot", into = "StateSnapshot")]
pub struct GameState {
    board: Board,
    inventories: [Inventory; 3],
    pub whose_turn: Player,
    pub phase: Phase,
}

/// Serialized shape of a state. The board is derived, so it is rebuilt
/// (and validated) on the way in.
#[derive(Serialize, Deserialize)]
struct StateSnapshot {
    whose_turn: Player,
    phase: Phase,
    inventories: [Inventory; 3],
}

impl From<GameState> for StateSnapshot {
    fn from(state: GameState) -> Self {
        StateSnapshot {
            whose_turn: state.whose_turn,
            phase: state.phase,
            inventories: state.inventories,
        }
    }
}

impl TryFrom<StateSnapshot> for GameState {
    type Error = StateError;

    fn try_from(snapshot: StateSnapshot) -> Result<Self, Self::Error> {
        let mut state = GameState::new(snapshot.whose_turn, snapshot.phase);
        for (slot, inventory) in snapshot.inventories.into_iter().enumerate() {
            if inventory.owner.index() != slot {
                return Err(StateError::MisplacedInventory {
                    slot,
                    found: inventory.owner,
                });
            }
            for unit in &inventory.units {
                if Owner::Player(unit.owner) != inventory.owner {
                    return Err(StateError::ForeignUnit {
                        coord: unit.coord,
                        inventory: inventory.owner,
                    });
                }
                state.add_unit(*unit)?;
            }
            for structure in inventory.structures.iter() {
                if structure.owner != inventory.owner {
                    return Err(StateError::ForeignStructure {
                        coord: structure.coord,
                        inventory: inventory.owner,
                    });
                }
                state.add_structure(*structure)?;
            }
            let target = &mut state.inventories[slot];
            target.resources = inventory.resources;
            target.royal_lost = inventory.royal_lost;
        }
        state.check_consistency()?;
        Ok(state)
    }
}

impl GameState {
    /// Creates a state with an empty board and empty inventories.
    pub fn new(whose_turn: Player, phase: Phase) -> Self {
        GameState {
            board: Board::empty(),
            inventories: [
                Inventory::new(Owner::Player(Player::One)),
                Inventory::new(Owner::Player(Player::Two)),
                Inventory::new(Owner::Neutral),
            ],
            whose_turn,
            phase,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn inventory(&self, owner: impl Into<Owner>) -> &Inventory {
        &self.inventories[owner.into().index()]
    }

    pub fn inventories(&self) -> &[Inventory; 3] {
        &self.inventories
    }

    pub fn units(&self, player: Player) -> &[Unit] {
        &self.inventories[player.index()].units
    }

    /// Every unit on the board, Player One's first.
    pub fn all_units(&self) -> impl Iterator<Item = &Unit> {
        self.inventories.iter().flat_map(|inv| inv.units.iter())
    }

    pub fn structures(&self, owner: impl Into<Owner>) -> &[Structure] {
        &self.inventories[owner.into().index()].structures
    }

    pub fn all_structures(&self) -> impl Iterator<Item = &Structure> {
        self.inventories.iter().flat_map(|inv| inv.structures.iter())
    }

    pub fn resources(&self, owner: impl Into<Owner>) -> i32 {
        self.inventories[owner.into().index()].resources
    }

    pub fn set_resources(&mut self, owner: impl Into<Owner>, amount: i32) {
        self.inventories[owner.into().index()].resources = amount;
    }

    pub fn adjust_resources(&mut self, owner: impl Into<Owner>, delta: i32) {
        self.inventories[owner.into().index()].resources += delta;
    }

    pub fn royal_lost(&self, player: Player) -> bool {
        self.inventories[player.index()].royal_lost
    }

    pub(crate) fn mark_royal_lost(&mut self, player: Player) {
        self.inventories[player.index()].royal_lost = true;
    }

    pub fn unit_at(&self, coord: Coord) -> Option<&Unit> {
        if !coord.on_board() {
            return None;
        }
        let owner = self.board.unit_owner(coord)?;
        self.inventories[owner.index()]
            .units
            .iter()
            .find(|u| u.coord == coord)
    }

    /// Mutable access to a unit. Callers must not change its coordinate;
    /// use [`GameState::move_unit`] for that.
    pub(crate) fn unit_at_mut(&mut self, coord: Coord) -> Option<&mut Unit> {
        if !coord.on_board() {
            return None;
        }
        let owner = self.board.unit_owner(coord)?;
        self.inventories[owner.index()]
            .units
            .iter_mut()
            .find(|u| u.coord == coord)
    }

    pub fn structure_at(&self, coord: Coord) -> Option<&Structure> {
        if !coord.on_board() {
            return None;
        }
        let owner = self.board.structure_owner(coord)?;
        self.inventories[owner.index()]
            .structures
            .iter()
            .find(|s| s.coord == coord)
    }

    /// Adds a unit to its owner's inventory and the board.
    pub fn add_unit(&mut self, unit: Unit) -> Result<(), StateError> {
        if !unit.coord.on_board() {
            return Err(StateError::OffBoard(unit.coord));
        }
        let cell = self.board.cell_mut(unit.coord);
        if cell.unit.is_some() {
            return Err(StateError::UnitOccupied(unit.coord));
        }
        cell.unit = Some(unit.owner);
        self.inventories[unit.owner.index()].units.push(unit);
        Ok(())
    }

    /// Adds a structure to its owner's inventory and the board.
    pub fn add_structure(&mut self, structure: Structure) -> Result<(), StateError> {
        if !structure.coord.on_board() {
            return Err(StateError::OffBoard(structure.coord));
        }
        let cell = self.board.cell_mut(structure.coord);
        if cell.structure.is_some() {
            return Err(StateError::StructureOccupied(structure.coord));
        }
        cell.structure = Some(structure.owner);
        Arc::make_mut(&mut self.inventories[structure.owner.index()].structures).push(structure);
        Ok(())
    }

    /// Relocates the unit at `from` to `to`. Moving onto its own cell is a no-op.
    pub fn move_unit(&mut self, from: Coord, to: Coord) -> Result<(), StateError> {
        if !to.on_board() {
            return Err(StateError::OffBoard(to));
        }
        if from == to {
            return match self.unit_at(from) {
                Some(_) => Ok(()),
                None => Err(StateError::NoUnit(from)),
            };
        }
        if self.board.unit_owner(to).is_some() {
            return Err(StateError::UnitOccupied(to));
        }
        let unit = self.unit_at_mut(from).ok_or(StateError::NoUnit(from))?;
        unit.coord = to;
        let owner = unit.owner;
        self.board.cell_mut(from).unit = None;
        self.board.cell_mut(to).unit = Some(owner);
        Ok(())
    }

    /// Removes and returns the unit at `coord`, preserving the order of
    /// the remaining units.
    pub fn remove_unit(&mut self, coord: Coord) -> Option<Unit> {
        if !coord.on_board() {
            return None;
        }
        let owner = self.board.unit_owner(coord)?;
        let units = &mut self.inventories[owner.index()].units;
        let pos = units.iter().position(|u| u.coord == coord)?;
        self.board.cell_mut(coord).unit = None;
        Some(units.remove(pos))
    }

    /// The player's home base, if it still stands.
    pub fn home_base(&self, player: Player) -> Option<&Structure> {
        self.structures(player)
            .iter()
            .find(|s| s.kind == StructureKind::HomeBase)
    }

    /// Cells where the player's workers may deposit resources.
    pub fn deposit_points(&self, player: Player) -> impl Iterator<Item = Coord> + '_ {
        self.structures(player)
            .iter()
            .filter(|s| s.kind.is_deposit())
            .map(|s| s.coord)
    }

    /// Cells holding a resource node, whoever owns it.
    pub fn resource_nodes(&self) -> impl Iterator<Item = Coord> + '_ {
        self.all_structures()
            .filter(|s| s.kind == StructureKind::ResourceNode)
            .map(|s| s.coord)
    }

    /// The player's first queen, if any.
    pub fn queen(&self, player: Player) -> Option<&Unit> {
        self.units(player).iter().find(|u| u.caste == Caste::Queen)
    }

    /// Clears every unit's has-acted flag.
    pub fn reset_actions(&mut self) {
        for inventory in self.inventories.iter_mut() {
            for unit in inventory.units.iter_mut() {
                unit.has_acted = false;
            }
        }
    }

    /// Verifies that the board arena matches the inventories, that unit
    /// health is within caste bounds, and that no one owns two home bases.
    pub fn check_consistency(&self) -> Result<(), StateError> {
        let mut expected = Board::empty();
        for inventory in &self.inventories {
            for unit in &inventory.units {
                if Owner::Player(unit.owner) != inventory.owner {
                    return Err(StateError::ForeignUnit {
                        coord: unit.coord,
                        inventory: inventory.owner,
                    });
                }
                let max = unit.caste.stats().max_health;
                if unit.health > max {
                    return Err(StateError::OverHealth {
                        coord: unit.coord,
                        health: unit.health,
                        max,
                    });
                }
                if !unit.coord.on_board() {
                    return Err(StateError::OffBoard(unit.coord));
                }
                let cell = expected.cell_mut(unit.coord);
                if cell.unit.is_some() {
                    return Err(StateError::UnitOccupied(unit.coord));
                }
                cell.unit = Some(unit.owner);
            }
            let homes = inventory
                .structures
                .iter()
                .filter(|s| s.kind == StructureKind::HomeBase)
                .count();
            if homes > 1 {
                return Err(StateError::DuplicateHomeBase(inventory.owner));
            }
            for structure in inventory.structures.iter() {
                if structure.owner != inventory.owner {
                    return Err(StateError::ForeignStructure {
                        coord: structure.coord,
                        inventory: inventory.owner,
                    });
                }
                if !structure.coord.on_board() {
                    return Err(StateError::OffBoard(structure.coord));
                }
                let cell = expected.cell_mut(structure.coord);
                if cell.structure.is_some() {
                    return Err(StateError::StructureOccupied(structure.coord));
                }
                cell.structure = Some(structure.owner);
            }
        }
        for idx in 0..CELL_COUNT {
            if expected.cells[idx] != self.board.cells[idx] {
                return Err(StateError::BoardMismatch(Coord::from_index(idx)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: u8, y: u8) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn empty_state_has_no_units() {
        let state = GameState::new(Player::One, Phase::Play);
        assert_eq!(state.all_units().count(), 0);
        assert_eq!(state.all_structures().count(), 0);
        assert_eq!(state.inventory(Owner::Neutral).owner, Owner::Neutral);
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn add_unit_updates_board() {
        let mut state = GameState::new(Player::One, Phase::Play);
        state
            .add_unit(Unit::new(Player::Two, Caste::Worker, c(3, 7)))
            .unwrap();
        assert_eq!(state.board().unit_owner(c(3, 7)), Some(Player::Two));
        assert_eq!(state.unit_at(c(3, 7)).unwrap().caste, Caste::Worker);
        assert!(state.unit_at(c(3, 6)).is_none());
    }

    #[test]
    fn add_unit_rejects_duplicate_and_off_board() {
        let mut state = GameState::new(Player::One, Phase::Play);
        state
            .add_unit(Unit::new(Player::One, Caste::Worker, c(1, 1)))
            .unwrap();
        assert_eq!(
            state.add_unit(Unit::new(Player::Two, Caste::Drone, c(1, 1))),
            Err(StateError::UnitOccupied(c(1, 1)))
        );
        assert_eq!(
            state.add_unit(Unit::new(Player::One, Caste::Drone, c(10, 1))),
            Err(StateError::OffBoard(c(10, 1)))
        );
    }

    #[test]
    fn unit_and_structure_share_a_cell() {
        let mut state = GameState::new(Player::One, Phase::Play);
        state
            .add_structure(Structure::new(Owner::Neutral, StructureKind::ResourceNode, c(2, 8)))
            .unwrap();
        state
            .add_unit(Unit::new(Player::One, Caste::Worker, c(2, 8)))
            .unwrap();
        let cell = state.board().cell(c(2, 8));
        assert_eq!(cell.unit, Some(Player::One));
        assert_eq!(cell.structure, Some(Owner::Neutral));
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn move_and_remove_keep_board_in_sync() {
        let mut state = GameState::new(Player::One, Phase::Play);
        state
            .add_unit(Unit::new(Player::One, Caste::Worker, c(0, 0)))
            .unwrap();
        state
            .add_unit(Unit::new(Player::One, Caste::Drone, c(5, 5)))
            .unwrap();
        state.move_unit(c(0, 0), c(0, 2)).unwrap();
        assert!(state.unit_at(c(0, 0)).is_none());
        assert_eq!(state.unit_at(c(0, 2)).unwrap().caste, Caste::Worker);
        assert_eq!(
            state.move_unit(c(0, 2), c(5, 5)),
            Err(StateError::UnitOccupied(c(5, 5)))
        );

        let removed = state.remove_unit(c(0, 2)).unwrap();
        assert_eq!(removed.caste, Caste::Worker);
        assert_eq!(state.units(Player::One).len(), 1);
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn clones_share_structures_until_written() {
        let mut state = GameState::new(Player::One, Phase::Play);
        state
            .add_structure(Structure::new(Player::One.into(), StructureKind::HomeBase, c(0, 0)))
            .unwrap();
        let mut clone = state.clone();
        assert!(Arc::ptr_eq(
            &state.inventory(Player::One).structures,
            &clone.inventory(Player::One).structures
        ));
        clone
            .add_structure(Structure::new(Player::One.into(), StructureKind::FallbackBase, c(4, 2)))
            .unwrap();
        assert_eq!(state.structures(Player::One).len(), 1);
        assert_eq!(clone.structures(Player::One).len(), 2);
    }

    #[test]
    fn lookups_by_role() {
        let mut state = GameState::new(Player::One, Phase::Play);
        state
            .add_structure(Structure::new(Player::One.into(), StructureKind::HomeBase, c(0, 0)))
            .unwrap();
        state
            .add_structure(Structure::new(Player::One.into(), StructureKind::FallbackBase, c(4, 2)))
            .unwrap();
        state
            .add_structure(Structure::new(Owner::Neutral, StructureKind::ResourceNode, c(9, 9)))
            .unwrap();
        state
            .add_unit(Unit::new(Player::One, Caste::Queen, c(1, 1)))
            .unwrap();

        assert_eq!(state.home_base(Player::One).unwrap().coord, c(0, 0));
        assert!(state.home_base(Player::Two).is_none());
        let deposits: Vec<Coord> = state.deposit_points(Player::One).collect();
        assert_eq!(deposits, vec![c(0, 0), c(4, 2)]);
        let nodes: Vec<Coord> = state.resource_nodes().collect();
        assert_eq!(nodes, vec![c(9, 9)]);
        assert_eq!(state.queen(Player::One).unwrap().coord, c(1, 1));
    }

    #[test]
    fn second_home_base_is_inconsistent() {
        let mut state = GameState::new(Player::One, Phase::Play);
        state
            .add_structure(Structure::new(Player::Two.into(), StructureKind::HomeBase, c(9, 9)))
            .unwrap();
        state
            .add_structure(Structure::new(Player::Two.into(), StructureKind::HomeBase, c(5, 9)))
            .unwrap();
        assert_eq!(
            state.check_consistency(),
            Err(StateError::DuplicateHomeBase(Player::Two.into()))
        );

        let json = serde_json::to_string(&state).unwrap();
        assert!(serde_json::from_str::<GameState>(&json).is_err());
    }

    #[test]
    fn json_roundtrip_rebuilds_board() {
        let mut state = GameState::new(Player::Two, Phase::Play);
        state.set_resources(Player::Two, 4);
        state
            .add_structure(Structure::new(Owner::Neutral, StructureKind::ResourceNode, c(3, 3)))
            .unwrap();
        let mut worker = Unit::new(Player::Two, Caste::Worker, c(3, 3));
        worker.carrying = true;
        state.add_unit(worker).unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        assert_eq!(back.board().unit_owner(c(3, 3)), Some(Player::Two));
    }

    #[test]
    fn deserialize_rejects_stacked_units() {
        let json = r#"{
            "whose_turn": "One",
            "phase": "Play",
            "inventories": [
                {"owner": {"Player": "One"}, "resources": 0, "structures": [], "units": [
                    {"owner": "One", "caste": "Worker", "coord": {"x": 1, "y": 1}, "health": 4, "carrying": false, "has_acted": false},
                    {"owner": "One", "caste": "Drone", "coord": {"x": 1, "y": 1}, "health": 5, "carrying": false, "has_acted": false}
                ]},
                {"owner": {"Player": "Two"}, "resources": 0, "units": [], "structures": []},
                {"owner": "Neutral", "resources": 0, "units": [], "structures": []}
            ]
        }"#;
        let err = serde_json::from_str::<GameState>(json).unwrap_err();
        assert!(err.to_string().contains("already holds a unit"));
    }
}

//! Build-move generation.
//!
//! Units are built on the player's own home base while it is clear of
//! units. Fallback bases are built under a worker that has not yet acted
//! and is standing on an empty cell.

use crate::board::{
    BuildTarget, Caste, GameState, Move, Player, StructureKind, BUILDABLE_CASTES,
};

fn affordable(state: &GameState, player: Player, target: BuildTarget) -> bool {
    target
        .cost()
        .is_some_and(|cost| cost <= state.resources(player))
}

/// All build moves available to `player`: units first, then structures.
pub fn build_moves(state: &GameState, player: Player) -> Vec<Move> {
    let mut moves = Vec::new();

    if let Some(home) = state.home_base(player) {
        if state.unit_at(home.coord).is_none() {
            for caste in BUILDABLE_CASTES {
                if affordable(state, player, BuildTarget::Unit(caste)) {
                    moves.push(Move::build_unit(home.coord, caste));
                }
            }
        }
    }

    let fallback = BuildTarget::Structure(StructureKind::FallbackBase);
    if affordable(state, player, fallback) {
        for worker in state.units(player) {
            if worker.caste == Caste::Worker
                && !worker.has_acted
                && state.structure_at(worker.coord).is_none()
            {
                moves.push(Move::build_structure(worker.coord, StructureKind::FallbackBase));
            }
        }
    }

    moves
}

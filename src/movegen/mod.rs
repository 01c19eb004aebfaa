//! Legal move generation.
//!
//! Enumerates the moves available to the player whose turn it is: walks
//! for every ready unit, builds, and always ending the turn.

pub mod build;
pub mod movement;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{GameState, Move, Phase};

/// Produces the candidate moves for a state.
///
/// The search explores moves in exactly the order returned, so ties are
/// broken toward earlier moves.
pub trait MoveGenerator: Sync {
    fn legal_moves(&self, state: &GameState) -> Vec<Move>;
}

/// The standard rules: walk moves, then builds, then `End`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMoves;

impl MoveGenerator for StandardMoves {
    fn legal_moves(&self, state: &GameState) -> Vec<Move> {
        legal_moves(state)
    }
}

/// Generates every legal move for `state.whose_turn`.
///
/// Outside the play phase only `End` is offered.
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    if state.phase != Phase::Play {
        return vec![Move::End];
    }

    let player = state.whose_turn;
    let mut moves = Vec::new();
    for unit in state.units(player) {
        moves.extend(movement::walk_moves(state, unit));
    }
    moves.extend(build::build_moves(state, player));
    moves.push(Move::End);
    moves
}

/// Picks one legal move uniformly at random.
pub fn random_move(state: &GameState, rng: &mut impl Rng) -> Move {
    legal_moves(state)
        .choose(rng)
        .cloned()
        .unwrap_or(Move::End)
}

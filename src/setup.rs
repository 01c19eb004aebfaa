//! Setup-phase placement.
//!
//! During the two setup phases each player picks cells for structures:
//! first their own home base, fallback base and obstacles inside their
//! territory, then the resource nodes they hand to the opponent's side.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Coord, GameState, Phase, Player, CELL_COUNT};

/// Cells chosen while placing one's own structures.
pub const OWN_PLACEMENTS: usize = 11;

/// Cells chosen while placing resource nodes on the opponent's side.
pub const ENEMY_PLACEMENTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("need {needed} free cells in {side:?}'s territory, only {available} available")]
    NotEnoughCells {
        side: Player,
        needed: usize,
        available: usize,
    },
}

fn free_cells(state: &GameState, side: Player) -> Vec<Coord> {
    (0..CELL_COUNT)
        .map(Coord::from_index)
        .filter(|c| side.owns_row(c.y) && state.structure_at(*c).is_none())
        .collect()
}

/// Chooses placement cells for `player` in the current setup phase.
///
/// Cells are distinct and free of structures. Outside setup the answer is
/// the single cell `(0, 0)`.
pub fn place<R: Rng + ?Sized>(
    state: &GameState,
    player: Player,
    rng: &mut R,
) -> Result<Vec<Coord>, SetupError> {
    let (side, needed) = match state.phase {
        Phase::PlaceOwn => (player, OWN_PLACEMENTS),
        Phase::PlaceEnemy => (player.opponent(), ENEMY_PLACEMENTS),
        Phase::Play => return Ok(vec![Coord::new(0, 0)]),
    };

    let free = free_cells(state, side);
    if free.len() < needed {
        return Err(SetupError::NotEnoughCells {
            side,
            needed,
            available: free.len(),
        });
    }
    Ok(free.choose_multiple(rng, needed).copied().collect())
}

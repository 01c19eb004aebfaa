//! Walk-move generation.
//!
//! A breadth-first search from each ready unit finds one shortest path to
//! every cell it can end on within its movement allowance.

use std::collections::VecDeque;

use crate::board::{Caste, Coord, GameState, Move, StructureKind, Unit, CELL_COUNT};

fn is_obstacle(state: &GameState, coord: Coord) -> bool {
    state
        .structure_at(coord)
        .is_some_and(|s| s.kind == StructureKind::Obstacle)
}

/// Returns whether `unit` may pass through `coord` on the way somewhere else.
fn can_pass(state: &GameState, unit: &Unit, coord: Coord) -> bool {
    if state.board().unit_owner(coord).is_some() {
        return false;
    }
    if unit.caste == Caste::Queen && !unit.owner.owns_row(coord.y) {
        return false;
    }
    !is_obstacle(state, coord) || unit.caste.stats().ignores_obstacles
}

/// Returns whether `unit` may finish its move on `coord`.
fn can_stop(state: &GameState, unit: &Unit, coord: Coord) -> bool {
    can_pass(state, unit, coord) && !is_obstacle(state, coord)
}

/// All walk moves for one unit, in breadth-first discovery order.
///
/// Returns an empty list if the unit has already acted this turn.
pub fn walk_moves(state: &GameState, unit: &Unit) -> Vec<Move> {
    if unit.has_acted {
        return Vec::new();
    }

    let reach = unit.caste.stats().movement;
    let mut parent: [Option<Coord>; CELL_COUNT] = [None; CELL_COUNT];
    let mut seen = [false; CELL_COUNT];
    seen[unit.coord.index()] = true;

    let mut queue = VecDeque::new();
    queue.push_back((unit.coord, 0u8));
    let mut moves = Vec::new();

    while let Some((at, steps)) = queue.pop_front() {
        if steps >= reach {
            continue;
        }
        for next in at.neighbors() {
            if seen[next.index()] || !can_pass(state, unit, next) {
                continue;
            }
            seen[next.index()] = true;
            parent[next.index()] = Some(at);
            queue.push_back((next, steps + 1));
            if can_stop(state, unit, next) {
                moves.push(Move::walk(trace_path(&parent, unit.coord, next)));
            }
        }
    }
    moves
}

fn trace_path(parent: &[Option<Coord>; CELL_COUNT], start: Coord, end: Coord) -> Vec<Coord> {
    let mut path = vec![end];
    let mut at = end;
    while at != start {
        match parent[at.index()] {
            Some(prev) => {
                path.push(prev);
                at = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

//! The hypothetical move applier.
//!
//! Computes the successor of a state under one move without touching the
//! input: the state is cloned first and only the clone is mutated.
//! Legality (enough resources, reachable destination, free build cell) is
//! the move generator's job; this module trusts it and only reports moves
//! it cannot carry out at all.

use tracing::trace;

use crate::board::{
    BuildTarget, Caste, Coord, GameState, Move, Owner, Player, StateError, Structure,
    StructureKind, Unit,
};

use super::combat::{resolve_combat, AttackPolicy};

/// Moves that cannot be applied to a state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error("move has an empty path")]
    EmptyPath,

    #[error("no unit at {0}")]
    NoUnit(Coord),

    #[error("unit at {coord} belongs to {owner:?}, but {to_move:?} is to move")]
    NotOwnUnit {
        coord: Coord,
        owner: Player,
        to_move: Player,
    },

    #[error("{0:?} cannot be built")]
    NotBuildable(BuildTarget),

    #[error(transparent)]
    State(#[from] StateError),
}

/// Returns the state that results from playing `mv` in `state`.
pub fn apply<P>(state: &GameState, mv: &Move, policy: &P) -> Result<GameState, ApplyError>
where
    P: AttackPolicy + ?Sized,
{
    let mut next = state.clone();
    match mv {
        Move::End => {
            next.whose_turn = state.whose_turn.opponent();
        }
        Move::Move { path } => {
            let (from, to) = match (path.first(), path.last()) {
                (Some(&from), Some(&to)) => (from, to),
                _ => return Err(ApplyError::EmptyPath),
            };
            apply_walk(&mut next, from, to, policy)?;
        }
        Move::Build { at, target } => {
            apply_build(&mut next, *at, *target)?;
        }
    }
    Ok(next)
}

fn apply_walk<P>(state: &mut GameState, from: Coord, to: Coord, policy: &P) -> Result<(), ApplyError>
where
    P: AttackPolicy + ?Sized,
{
    let unit = state.unit_at(from).ok_or(ApplyError::NoUnit(from))?;
    if unit.owner != state.whose_turn {
        return Err(ApplyError::NotOwnUnit {
            coord: from,
            owner: unit.owner,
            to_move: state.whose_turn,
        });
    }
    let owner = unit.owner;

    state.move_unit(from, to)?;

    let structure = state.structure_at(to).copied();
    let unit = state.unit_at_mut(to).ok_or(ApplyError::NoUnit(to))?;
    let mut deposited = false;
    if unit.caste == Caste::Worker {
        if unit.carrying {
            if is_friendly_deposit(structure.as_ref(), owner) {
                unit.carrying = false;
                deposited = true;
            }
        } else if structure.is_some_and(|s| s.kind == StructureKind::ResourceNode) {
            unit.carrying = true;
            trace!(%to, "worker picked up a resource");
        }
    }
    if deposited {
        state.adjust_resources(owner, 1);
        trace!(%to, resources = state.resources(owner), "worker deposited a resource");
    }

    resolve_combat(state, to, policy);

    if let Some(unit) = state.unit_at_mut(to) {
        unit.has_acted = true;
    }
    Ok(())
}

fn is_friendly_deposit(structure: Option<&Structure>, player: Player) -> bool {
    structure.is_some_and(|s| s.kind.is_deposit() && s.owner == Owner::Player(player))
}

fn apply_build(state: &mut GameState, at: Coord, target: BuildTarget) -> Result<(), ApplyError> {
    let cost = target.cost().ok_or(ApplyError::NotBuildable(target))?;
    let player = state.whose_turn;
    match target {
        BuildTarget::Unit(caste) => {
            let mut unit = Unit::new(player, caste, at);
            // Fresh units wait until the next turn.
            unit.has_acted = true;
            state.add_unit(unit)?;
        }
        BuildTarget::Structure(kind) => {
            state.add_structure(Structure::new(Owner::Player(player), kind, at))?;
        }
    }
    state.adjust_resources(player, -cost);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Phase;
    use crate::resolve::combat::PriorityPolicy;

    fn c(x: u8, y: u8) -> Coord {
        Coord::new(x, y)
    }

    fn policy() -> PriorityPolicy {
        PriorityPolicy::default()
    }

    /// Player One with a home base at (0,0), a fallback base at (4,2), a
    /// resource node at (0,5), and a worker on the home base.
    fn economy_state() -> GameState {
        let mut state = GameState::new(Player::One, Phase::Play);
        state.set_resources(Player::One, 10);
        state
            .add_structure(Structure::new(Player::One.into(), StructureKind::HomeBase, c(0, 0)))
            .unwrap();
        state
            .add_structure(Structure::new(Player::One.into(), StructureKind::FallbackBase, c(4, 2)))
            .unwrap();
        state
            .add_structure(Structure::new(Owner::Neutral, StructureKind::ResourceNode, c(0, 5)))
            .unwrap();
        state
            .add_unit(Unit::new(Player::One, Caste::Worker, c(0, 0)))
            .unwrap();
        state
    }

    #[test]
    fn end_toggles_turn_only() {
        let state = economy_state();
        let next = apply(&state, &Move::End, &policy()).unwrap();
        assert_eq!(next.whose_turn, Player::Two);
        let mut expected = state.clone();
        expected.whose_turn = Player::Two;
        assert_eq!(next, expected);
    }

    #[test]
    fn walk_relocates_and_marks_acted() {
        let state = economy_state();
        let mv = Move::walk([c(0, 0), c(0, 1), c(0, 2)]);
        let next = apply(&state, &mv, &policy()).unwrap();
        let worker = next.unit_at(c(0, 2)).unwrap();
        assert!(worker.has_acted);
        assert!(next.unit_at(c(0, 0)).is_none());
        // Input untouched.
        assert!(state.unit_at(c(0, 0)).is_some());
        assert!(!state.unit_at(c(0, 0)).unwrap().has_acted);
    }

    #[test]
    fn apply_is_referentially_transparent() {
        let state = economy_state();
        let snapshot = state.clone();
        let mv = Move::walk([c(0, 0), c(0, 1)]);
        let a = apply(&state, &mv, &policy()).unwrap();
        let b = apply(&state, &mv, &policy()).unwrap();
        assert_eq!(a, b);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn worker_picks_up_on_resource_node() {
        let mut state = economy_state();
        state.move_unit(c(0, 0), c(0, 3)).unwrap();
        let next = apply(&state, &Move::walk([c(0, 3), c(0, 4), c(0, 5)]), &policy()).unwrap();
        assert!(next.unit_at(c(0, 5)).unwrap().carrying);
        assert_eq!(next.resources(Player::One), 10);
    }

    #[test]
    fn carrying_worker_deposits_at_home_or_fallback() {
        for base in [c(0, 0), c(4, 2)] {
            let mut state = economy_state();
            state.move_unit(c(0, 0), c(2, 2)).unwrap();
            state.unit_at_mut(c(2, 2)).unwrap().carrying = true;
            let next = apply(&state, &Move::walk([c(2, 2), base]), &policy()).unwrap();
            let worker = next.unit_at(base).unwrap();
            assert!(!worker.carrying);
            assert_eq!(next.resources(Player::One), 11);
        }
    }

    #[test]
    fn enemy_base_accepts_no_deposit() {
        let mut state = economy_state();
        state
            .add_structure(Structure::new(Player::Two.into(), StructureKind::HomeBase, c(5, 9)))
            .unwrap();
        state.move_unit(c(0, 0), c(5, 8)).unwrap();
        state.unit_at_mut(c(5, 8)).unwrap().carrying = true;
        let next = apply(&state, &Move::walk([c(5, 8), c(5, 9)]), &policy()).unwrap();
        assert!(next.unit_at(c(5, 9)).unwrap().carrying);
        assert_eq!(next.resources(Player::One), 10);
    }

    #[test]
    fn moving_triggers_combat() {
        let mut state = economy_state();
        state
            .add_unit(Unit::new(Player::Two, Caste::Worker, c(1, 3)))
            .unwrap();
        let next = apply(&state, &Move::walk([c(0, 0), c(0, 1), c(0, 2)]), &policy()).unwrap();
        // (0,2) to (1,3) is a diagonal step, beyond a worker's reach.
        assert_eq!(next.unit_at(c(1, 3)).unwrap().health, 4);

        let next = apply(&state, &Move::walk([c(0, 0), c(1, 0), c(1, 1), c(1, 2)]), &policy()).unwrap();
        assert_eq!(next.unit_at(c(1, 3)).unwrap().health, 3);
    }

    #[test]
    fn build_worker_spends_resources() {
        let mut state = economy_state();
        state.move_unit(c(0, 0), c(1, 0)).unwrap();
        state.set_resources(Player::One, 1);
        let next = apply(&state, &Move::build_unit(c(0, 0), Caste::Worker), &policy()).unwrap();
        assert_eq!(next.resources(Player::One), 0);
        assert_eq!(next.units(Player::One).len(), 2);
        let built = next.unit_at(c(0, 0)).unwrap();
        assert_eq!(built.caste, Caste::Worker);
        assert_eq!(built.owner, Player::One);
    }

    #[test]
    fn build_structure_spends_resources() {
        let state = economy_state();
        let next = apply(
            &state,
            &Move::build_structure(c(3, 3), StructureKind::FallbackBase),
            &policy(),
        )
        .unwrap();
        assert_eq!(next.resources(Player::One), 7);
        let built = next.structure_at(c(3, 3)).unwrap();
        assert_eq!(built.kind, StructureKind::FallbackBase);
        assert_eq!(built.owner, Owner::Player(Player::One));
        assert_eq!(state.structures(Player::One).len(), 2);
    }

    #[test]
    fn unchecked_build_may_overdraw() {
        let mut state = economy_state();
        state.set_resources(Player::One, 0);
        let next = apply(&state, &Move::build_unit(c(5, 1), Caste::MeleeSoldier), &policy()).unwrap();
        assert_eq!(next.resources(Player::One), -2);
    }

    #[test]
    fn impossible_moves_are_errors() {
        let state = economy_state();
        assert_eq!(
            apply(&state, &Move::walk(Vec::new()), &policy()),
            Err(ApplyError::EmptyPath)
        );
        assert_eq!(
            apply(&state, &Move::walk([c(7, 7), c(7, 8)]), &policy()),
            Err(ApplyError::NoUnit(c(7, 7)))
        );
        assert_eq!(
            apply(&state, &Move::build_unit(c(1, 1), Caste::Queen), &policy()),
            Err(ApplyError::NotBuildable(BuildTarget::Unit(Caste::Queen)))
        );
        assert_eq!(
            apply(&state, &Move::build_unit(c(0, 0), Caste::Worker), &policy()),
            Err(ApplyError::State(StateError::UnitOccupied(c(0, 0))))
        );

        let mut theirs = state.clone();
        theirs.whose_turn = Player::Two;
        assert!(matches!(
            apply(&theirs, &Move::walk([c(0, 0), c(0, 1)]), &policy()),
            Err(ApplyError::NotOwnUnit { .. })
        ));
    }
}

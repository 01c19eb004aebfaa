//! Win detection shared by the evaluator and the search.

use crate::board::{GameState, Player, StructureKind, ALL_PLAYERS};
use crate::config::VictoryThresholds;

/// Returns true if `player` has already won in `state`.
///
/// A player wins by standing on an enemy home base whose capture progress
/// has reached the threshold, by the enemy queen having fallen, or by
/// stockpiling the resource goal.
pub fn has_won(state: &GameState, player: Player, thresholds: &VictoryThresholds) -> bool {
    let enemy = player.opponent();

    let base_taken = state.structures(enemy).iter().any(|s| {
        s.kind == StructureKind::HomeBase
            && s.capture_progress >= thresholds.capture_threshold
            && state.board().unit_owner(s.coord) == Some(player)
    });
    if base_taken {
        return true;
    }

    if state.royal_lost(enemy) || state.queen(enemy).is_some_and(|q| q.health == 0) {
        return true;
    }

    state.resources(player) >= thresholds.resource_goal
}

/// Returns the winning player, checking Player One first.
pub fn winner(state: &GameState, thresholds: &VictoryThresholds) -> Option<Player> {
    ALL_PLAYERS
        .into_iter()
        .find(|&p| has_won(state, p, thresholds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Caste, Coord, Phase, Structure, Unit};

    fn base_state() -> GameState {
        let mut state = GameState::new(Player::One, Phase::Play);
        state
            .add_structure(Structure::new(Player::One.into(), StructureKind::HomeBase, Coord::new(0, 0)))
            .unwrap();
        state
            .add_structure(Structure::new(Player::Two.into(), StructureKind::HomeBase, Coord::new(9, 9)))
            .unwrap();
        state
            .add_unit(Unit::new(Player::One, Caste::Queen, Coord::new(1, 1)))
            .unwrap();
        state
            .add_unit(Unit::new(Player::Two, Caste::Queen, Coord::new(8, 8)))
            .unwrap();
        state
    }

    #[test]
    fn nobody_wins_at_start() {
        let state = base_state();
        let t = VictoryThresholds::default();
        assert!(!has_won(&state, Player::One, &t));
        assert!(!has_won(&state, Player::Two, &t));
        assert_eq!(winner(&state, &t), None);
    }

    #[test]
    fn resource_goal_wins() {
        let mut state = base_state();
        let t = VictoryThresholds::default();
        state.set_resources(Player::Two, 11);
        assert!(has_won(&state, Player::Two, &t));
        assert!(!has_won(&state, Player::One, &t));
        assert_eq!(winner(&state, &t), Some(Player::Two));
    }

    #[test]
    fn dead_queen_loses() {
        let mut state = GameState::new(Player::One, Phase::Play);
        let mut queen = Unit::new(Player::Two, Caste::Queen, Coord::new(5, 5));
        queen.health = 0;
        state.add_unit(queen).unwrap();
        assert!(has_won(&state, Player::One, &VictoryThresholds::default()));
    }

    #[test]
    fn lost_royal_marker_loses() {
        let mut state = base_state();
        state.remove_unit(Coord::new(8, 8));
        assert!(!has_won(&state, Player::One, &VictoryThresholds::default()));
        state.mark_royal_lost(Player::Two);
        assert!(has_won(&state, Player::One, &VictoryThresholds::default()));
    }

    #[test]
    fn capture_needs_progress_and_occupation() {
        let t = VictoryThresholds::default();
        let mut state = GameState::new(Player::One, Phase::Play);
        let mut hill = Structure::new(Player::Two.into(), StructureKind::HomeBase, Coord::new(9, 9));
        hill.capture_progress = 2;
        state.add_structure(hill).unwrap();
        assert!(!has_won(&state, Player::One, &t));

        state
            .add_unit(Unit::new(Player::One, Caste::MeleeSoldier, Coord::new(9, 9)))
            .unwrap();
        assert!(has_won(&state, Player::One, &t));

        let strict = VictoryThresholds {
            capture_threshold: 3,
            ..t
        };
        assert!(!has_won(&state, Player::One, &strict));
    }
}

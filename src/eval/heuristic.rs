//! Heuristic position evaluation.
//!
//! Scores a state from one player's perspective using handcrafted
//! features: colony composition, stored resources, worker progress toward
//! their current goal, military pressure, queen placement, and how many
//! units have used their action. The raw score is squashed into `[0, 1]`
//! with an arctangent so that every non-terminal state lands strictly
//! between a loss (0.0) and a win (1.0).

use std::f64::consts::{FRAC_PI_2, PI};

use crate::board::{Caste, Coord, GameState, Player, NON_ROYAL_CASTES};
use crate::config::{EngineConfig, Weights};
use crate::resolve::victory::has_won;

/// The individual terms of a player's raw score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub composition: f64,
    pub resources: f64,
    pub carrying: f64,
    pub positional: f64,
    pub military: f64,
    pub royal: f64,
    pub activity: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.composition
            + self.resources
            + self.carrying
            + self.positional
            + self.military
            + self.royal
            + self.activity
    }
}

/// Maps a raw score onto `(0, 1)`, with 0.5 for a raw score of zero.
pub fn squash(raw: f64, scale: f64) -> f64 {
    let v = ((raw / scale).atan() + FRAC_PI_2) / PI;
    v.clamp(f64::EPSILON, 1.0 - f64::EPSILON)
}

/// Nearest goal distance, or `None` if there are no goals.
#[inline]
fn nearest(from: Coord, goals: &[Coord]) -> Option<u32> {
    goals.iter().map(|g| from.manhattan(*g)).min()
}

fn composition_score(state: &GameState, player: Player, weights: &Weights) -> f64 {
    let units = state.units(player);
    let mut score = 0.0;
    for caste in NON_ROYAL_CASTES {
        let Some(table) = weights.composition.table(caste) else {
            continue;
        };
        let (count, health) = units
            .iter()
            .filter(|u| u.caste == caste)
            .fold((0usize, 0.0f64), |(n, h), u| (n + 1, h + u.health_fraction()));
        if count == 0 {
            score += table.lookup(0.0);
        } else {
            score += table.lookup(count as f64) * (health / count as f64);
        }
    }
    score
}

fn worker_scores(state: &GameState, player: Player, weights: &Weights) -> (f64, f64) {
    let nodes: Vec<Coord> = state.resource_nodes().collect();
    let deposits: Vec<Coord> = state.deposit_points(player).collect();

    let mut carrying = 0.0;
    let mut positional = 0.0;
    for worker in state.units(player).iter().filter(|u| u.caste == Caste::Worker) {
        let goals = if worker.carrying {
            carrying += weights.carrying;
            &deposits
        } else {
            &nodes
        };
        match nearest(worker.coord, goals) {
            Some(0) => positional += weights.arrival_bonus,
            Some(d) => positional -= weights.distance * d as f64,
            None => {}
        }
    }
    (carrying, positional)
}

fn military_score(state: &GameState, player: Player, weights: &Weights) -> f64 {
    let enemy_home = state.home_base(player.opponent()).map(|s| s.coord);
    let mut score = 0.0;
    for unit in state.units(player).iter().filter(|u| u.caste.is_military()) {
        if let Some(home) = enemy_home {
            score -= weights.advance * unit.coord.manhattan(home) as f64;
        }
        if player.is_advanced_row(unit.coord.y) {
            score += weights.frontier_bonus;
        }
    }
    score
}

fn royal_score(state: &GameState, player: Player, weights: &Weights) -> f64 {
    let Some(queen) = state.queen(player) else {
        return 0.0;
    };
    let on_goal = state.deposit_points(player).any(|c| c == queen.coord)
        || state.resource_nodes().any(|c| c == queen.coord);
    if on_goal {
        -weights.royal_safety
    } else {
        weights.royal_safety
    }
}

/// Computes every raw sub-score for `player`.
pub fn player_score(state: &GameState, player: Player, weights: &Weights) -> ScoreBreakdown {
    let (carrying, positional) = worker_scores(state, player, weights);
    let acted = state.units(player).iter().filter(|u| u.has_acted).count();
    ScoreBreakdown {
        composition: composition_score(state, player, weights),
        resources: weights.resources.lookup(state.resources(player).max(0) as f64),
        carrying,
        positional,
        military: military_score(state, player, weights),
        royal: royal_score(state, player, weights),
        activity: weights.activity * acted as f64,
    }
}

/// Evaluates `state` for `player`.
///
/// Returns exactly 1.0 if `player` has won, exactly 0.0 if the opponent
/// has, and a value strictly between otherwise.
pub fn evaluate(state: &GameState, player: Player, config: &EngineConfig) -> f64 {
    if has_won(state, player, &config.victory) {
        return 1.0;
    }
    if has_won(state, player.opponent(), &config.victory) {
        return 0.0;
    }

    let weights = &config.weights;
    let mut raw = player_score(state, player, weights).total();
    if weights.opponent_factor != 0.0 {
        raw -= weights.opponent_factor * player_score(state, player.opponent(), weights).total();
    }
    squash(raw, weights.scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Owner, Phase, Structure, StructureKind, Unit};
    use crate::config::EngineConfig;

    fn c(x: u8, y: u8) -> Coord {
        Coord::new(x, y)
    }

    /// Home base (0,0), fallback (4,2), resource node (0,5), lone worker on home.
    fn economy_state() -> GameState {
        let mut state = GameState::new(Player::One, Phase::Play);
        state.set_resources(Player::One, 3);
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
    fn squash_is_centered_and_bounded() {
        assert!((squash(0.0, 100.0) - 0.5).abs() < 1e-12);
        assert!(squash(1e300, 1.0) < 1.0);
        assert!(squash(-1e300, 1.0) > 0.0);
        assert!(squash(10.0, 100.0) > squash(5.0, 100.0));
        assert!((squash(100.0, 100.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn breakdown_matches_hand_computation() {
        let state = economy_state();
        let weights = Weights::default();
        let s = player_score(&state, Player::One, &weights);
        assert_eq!(s.composition, 100_000.0);
        assert_eq!(s.resources, 1500.0);
        assert_eq!(s.carrying, 0.0);
        assert_eq!(s.positional, -25.0);
        assert_eq!(s.military, 0.0);
        assert_eq!(s.royal, 0.0);
        assert_eq!(s.activity, 0.0);
        assert_eq!(s.total(), 101_475.0);
    }

    #[test]
    fn carrying_worker_heads_home() {
        let mut state = economy_state();
        state.move_unit(c(0, 0), c(3, 2)).unwrap();
        state.unit_at_mut(c(3, 2)).unwrap().carrying = true;
        let s = player_score(&state, Player::One, &Weights::default());
        assert_eq!(s.carrying, 100.0);
        // Nearest deposit is the fallback base one step away.
        assert_eq!(s.positional, -5.0);
    }

    #[test]
    fn worker_on_goal_earns_bonus() {
        let mut state = economy_state();
        state.move_unit(c(0, 0), c(0, 5)).unwrap();
        let s = player_score(&state, Player::One, &Weights::default());
        assert_eq!(s.positional, 5.0);
    }

    #[test]
    fn damaged_units_count_less() {
        let mut state = economy_state();
        state.unit_at_mut(c(0, 0)).unwrap().health = 2;
        let s = player_score(&state, Player::One, &Weights::default());
        assert_eq!(s.composition, 50_000.0);
    }

    #[test]
    fn second_worker_adds_little() {
        let mut state = economy_state();
        let one = player_score(&state, Player::One, &Weights::default()).composition;
        state
            .add_unit(Unit::new(Player::One, Caste::Worker, c(2, 2)))
            .unwrap();
        let two = player_score(&state, Player::One, &Weights::default()).composition;
        assert!(two > one);
        assert!(two - one < one / 100.0);
    }

    #[test]
    fn queen_should_stay_off_goals() {
        let mut state = economy_state();
        state
            .add_unit(Unit::new(Player::One, Caste::Queen, c(4, 2)))
            .unwrap();
        let weights = Weights::default();
        assert_eq!(player_score(&state, Player::One, &weights).royal, -20_000.0);
        state.move_unit(c(4, 2), c(5, 2)).unwrap();
        assert_eq!(player_score(&state, Player::One, &weights).royal, 20_000.0);
    }

    #[test]
    fn military_pushes_toward_enemy_base() {
        let mut state = economy_state();
        state
            .add_structure(Structure::new(Player::Two.into(), StructureKind::HomeBase, c(5, 9)))
            .unwrap();
        state
            .add_unit(Unit::new(Player::One, Caste::MeleeSoldier, c(5, 3)))
            .unwrap();
        let weights = Weights::default();
        let back = player_score(&state, Player::One, &weights).military;
        assert_eq!(back, -12.0);
        state.move_unit(c(5, 3), c(5, 6)).unwrap();
        let forward = player_score(&state, Player::One, &weights).military;
        assert_eq!(forward, -6.0 + 10.0);
    }

    #[test]
    fn activity_counts_acted_units() {
        let mut state = economy_state();
        state.unit_at_mut(c(0, 0)).unwrap().has_acted = true;
        assert_eq!(player_score(&state, Player::One, &Weights::default()).activity, 1.0);
    }

    #[test]
    fn terminal_scores_are_exact() {
        let config = EngineConfig::default();
        let mut state = economy_state();
        let mut queen = Unit::new(Player::Two, Caste::Queen, c(9, 9));
        queen.health = 0;
        state.add_unit(queen).unwrap();
        assert_eq!(evaluate(&state, Player::One, &config), 1.0);
        assert_eq!(evaluate(&state, Player::Two, &config), 0.0);
    }

    #[test]
    fn dead_queen_wins_regardless_of_weights() {
        let mut config = EngineConfig::default();
        config.weights.royal_safety = -1e9;
        config.weights.distance = 1e6;
        let mut state = economy_state();
        let mut queen = Unit::new(Player::Two, Caste::Queen, c(9, 9));
        queen.health = 0;
        state.add_unit(queen).unwrap();
        assert_eq!(evaluate(&state, Player::One, &config), 1.0);
    }

    #[test]
    fn non_terminal_scores_are_strictly_inside() {
        let config = EngineConfig::default();
        let state = economy_state();
        let v = evaluate(&state, Player::One, &config);
        assert!(v > 0.0 && v < 1.0);
        let w = evaluate(&state, Player::Two, &config);
        assert!(w > 0.0 && w < 1.0);
        assert!(v > w);
    }

    #[test]
    fn opponent_factor_subtracts_their_score() {
        let mut config = EngineConfig::default();
        let mut state = economy_state();
        state.set_resources(Player::Two, 5);
        let alone = evaluate(&state, Player::One, &config);
        config.weights.opponent_factor = 1.0;
        let relative = evaluate(&state, Player::One, &config);
        assert!(relative < alone);
    }

    #[test]
    fn negative_resources_score_as_zero() {
        let mut state = economy_state();
        state.set_resources(Player::One, -3);
        assert_eq!(player_score(&state, Player::One, &Weights::default()).resources, 0.0);
    }
}

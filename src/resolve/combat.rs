//! Combat resolution after a unit moves.
//!
//! The moved unit strikes one enemy within its caste range, measured from
//! the attacker's own cell to each candidate's cell. Which enemy is struck
//! is left to an [`AttackPolicy`].

use tracing::{trace, warn};

use crate::board::{Caste, Coord, GameState, Unit};

/// Chooses which in-range enemy an attacker strikes.
pub trait AttackPolicy: Sync {
    /// Returns the coordinate of the chosen target. `candidates` is never
    /// empty and lists enemies in their owner's inventory order.
    fn choose_target(&self, attacker: &Unit, candidates: &[&Unit]) -> Option<Coord>;
}

/// Strict caste priority; the first candidate of the best caste is struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityPolicy {
    order: [Caste; 5],
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        PriorityPolicy {
            order: [
                Caste::Queen,
                Caste::MeleeSoldier,
                Caste::RangedSoldier,
                Caste::Drone,
                Caste::Worker,
            ],
        }
    }
}

impl PriorityPolicy {
    /// Builds a policy from a custom order. Returns `None` unless every
    /// caste appears exactly once.
    pub fn with_order(order: [Caste; 5]) -> Option<Self> {
        for (i, caste) in order.iter().enumerate() {
            if order[..i].contains(caste) {
                return None;
            }
        }
        Some(PriorityPolicy { order })
    }

    fn rank(&self, caste: Caste) -> usize {
        self.order
            .iter()
            .position(|&c| c == caste)
            .unwrap_or(self.order.len())
    }
}

impl AttackPolicy for PriorityPolicy {
    fn choose_target(&self, _attacker: &Unit, candidates: &[&Unit]) -> Option<Coord> {
        candidates
            .iter()
            .min_by_key(|u| self.rank(u.caste))
            .map(|u| u.coord)
    }
}

/// What happened when a unit attacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatOutcome {
    pub target: Coord,
    pub damage: u8,
    pub remaining_health: u8,
    pub destroyed: bool,
}

/// Enemy units within range of the unit at `attacker`.
pub fn attack_candidates(state: &GameState, attacker: Coord) -> Vec<&Unit> {
    let Some(unit) = state.unit_at(attacker) else {
        return Vec::new();
    };
    state
        .units(unit.owner.opponent())
        .iter()
        .filter(|enemy| unit.in_range(enemy.coord))
        .collect()
}

/// Lets the unit at `attacker` strike an enemy, mutating `state` in place.
///
/// Only called on a successor state the caller owns. Returns `None` when no
/// enemy is in range or the policy declines to pick a valid target.
pub fn resolve_combat<P>(state: &mut GameState, attacker: Coord, policy: &P) -> Option<CombatOutcome>
where
    P: AttackPolicy + ?Sized,
{
    let unit = *state.unit_at(attacker)?;
    let candidates = attack_candidates(state, attacker);
    if candidates.is_empty() {
        return None;
    }

    let target = policy.choose_target(&unit, &candidates)?;
    if !candidates.iter().any(|c| c.coord == target) {
        warn!(%attacker, %target, "attack policy chose a target out of range; skipping attack");
        return None;
    }

    let damage = unit.caste.stats().attack;
    let victim = state.unit_at_mut(target)?;
    victim.health = victim.health.saturating_sub(damage);
    let remaining_health = victim.health;
    let (victim_owner, victim_caste) = (victim.owner, victim.caste);

    let destroyed = remaining_health == 0;
    if destroyed {
        state.remove_unit(target);
        if victim_caste == Caste::Queen {
            state.mark_royal_lost(victim_owner);
        }
    }

    trace!(%attacker, %target, damage, remaining_health, destroyed, "combat resolved");
    Some(CombatOutcome {
        target,
        damage,
        remaining_health,
        destroyed,
    })
}

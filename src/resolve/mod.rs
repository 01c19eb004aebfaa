//! Move resolution.
//!
//! Applies a single move to a state, resolves the combat it triggers, and
//! detects when a player has won.

pub mod apply;
pub mod combat;
pub mod victory;

pub use apply::{apply, ApplyError};
pub use combat::{attack_candidates, resolve_combat, AttackPolicy, CombatOutcome, PriorityPolicy};
pub use victory::{has_won, winner};

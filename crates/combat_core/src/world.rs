//! Per-tick world inputs supplied by the host.
//!
//! These are pure data snapshots with no behavior. The host owns enemies
//! and the player; the combat core reads a fresh frame every tick and
//! never mutates or retains it across ticks.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, option_fixed_serde, Fixed, Vec3Fixed};

/// Unique identifier for enemies, assigned by the host.
pub type EnemyId = u64;

/// Default hit radius for enemies that don't declare one.
pub const DEFAULT_HIT_RADIUS: f64 = 1.5;

/// Read-only snapshot of one enemy for a single tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Host-assigned identifier, stable across ticks.
    pub id: EnemyId,
    /// World position.
    pub position: Vec3Fixed,
    /// Velocity, when the host tracks it (used for predictive missile lead).
    pub velocity: Option<Vec3Fixed>,
    /// Remaining health. Targetable iff > 0.
    #[serde(with = "fixed_serde")]
    pub health: Fixed,
    /// Collision radius override.
    #[serde(default, with = "option_fixed_serde")]
    pub hit_radius: Option<Fixed>,
    /// Boss flag, consulted by boss-only weapons and boss-immune effects.
    #[serde(default)]
    pub is_boss: bool,
}

impl EnemySnapshot {
    /// Create a basic enemy snapshot at a position with the given health.
    #[must_use]
    pub fn new(id: EnemyId, position: Vec3Fixed, health: Fixed) -> Self {
        Self {
            id,
            position,
            velocity: None,
            health,
            hit_radius: None,
            is_boss: false,
        }
    }

    /// Whether this enemy can be targeted (alive).
    #[must_use]
    pub fn is_targetable(&self) -> bool {
        self.health > Fixed::ZERO
    }

    /// Effective hit radius, defaulting to 1.5 units.
    #[must_use]
    pub fn hit_radius(&self) -> Fixed {
        self.hit_radius
            .unwrap_or_else(|| Fixed::from_num(DEFAULT_HIT_RADIUS))
    }
}

/// Player state for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFrame {
    /// Player ship position.
    pub position: Vec3Fixed,
    /// Point the player is aiming at, used when no target is locked.
    pub aim: Vec3Fixed,
}

/// Complete world input for one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldFrame {
    /// Player state. `None` while the player is dead or not yet spawned;
    /// firing without a player is a silent no-op.
    pub player: Option<PlayerFrame>,
    /// All enemies the host currently tracks.
    pub enemies: Vec<EnemySnapshot>,
}

/// Discrete input signals for one tick.
///
/// `fire` is a held-level signal; the rest are edge signals the input
/// adapter asserts for exactly one tick per press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Fire button held this tick.
    pub fire: bool,
    /// Switch weapon family (gun <-> missile).
    pub switch_weapon: bool,
    /// Toggle auto-lock targeting.
    pub toggle_lock: bool,
    /// Cycle to the next locked target.
    pub cycle_next: bool,
    /// Cycle to the previous locked target.
    pub cycle_prev: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targetable_requires_positive_health() {
        let mut enemy = EnemySnapshot::new(1, Vec3Fixed::ZERO, Fixed::from_num(10));
        assert!(enemy.is_targetable());

        enemy.health = Fixed::ZERO;
        assert!(!enemy.is_targetable());
    }

    #[test]
    fn test_hit_radius_default() {
        let mut enemy = EnemySnapshot::new(1, Vec3Fixed::ZERO, Fixed::from_num(10));
        assert_eq!(enemy.hit_radius(), Fixed::from_num(1.5));

        enemy.hit_radius = Some(Fixed::from_num(4));
        assert_eq!(enemy.hit_radius(), Fixed::from_num(4));
    }
}

//! Telemetry events produced by a simulation tick.
//!
//! Events are queued into the tick output in deterministic order and are
//! complete before `tick` returns; nothing is deferred across ticks.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed, Vec3Fixed};
use crate::weapons::WeaponFamily;
use crate::world::EnemyId;

/// Why an enemy took damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageReason {
    /// Plain gun shot.
    Gun,
    /// Continuous beam application.
    Beam,
    /// Proximity/explosive shell.
    Explosive,
    /// Homing missile.
    Missile,
    /// MULTI-LOCK volley shot.
    MultiLock,
    /// Orbital strike impact.
    ThorStrike,
    /// Screen-clearing detonation.
    Smartbomb,
}

/// Why an enemy was killed outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillReason {
    /// Caught in a gravity well collapse.
    GravityCollapse,
}

/// One telemetry event from a simulation tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// An enemy took damage. The host owns health bookkeeping.
    EnemyDamage {
        /// Damaged enemy.
        id: EnemyId,
        /// Damage amount.
        #[serde(with = "fixed_serde")]
        amount: Fixed,
        /// Source tag.
        reason: DamageReason,
    },
    /// An enemy must be destroyed outright.
    EnemyKill {
        /// Killed enemy.
        id: EnemyId,
        /// Source tag.
        reason: KillReason,
    },
    /// An enemy is shoved downward by an orbital strike impact.
    EnemyPushDown {
        /// Shoved enemy.
        id: EnemyId,
        /// Downward force magnitude.
        #[serde(with = "fixed_serde")]
        force: Fixed,
    },
    /// An enemy is being pulled toward a gravity anchor this tick.
    EnemyPull {
        /// Pulled enemy.
        id: EnemyId,
        /// Unit direction of the pull.
        direction: Vec3Fixed,
        /// Pull strength already scaled by the tick delta.
        #[serde(with = "fixed_serde")]
        strength: Fixed,
    },
    /// A weapon fired this tick.
    WeaponFired {
        /// Family the shot came from.
        family: WeaponFamily,
        /// Display name of the weapon.
        weapon: String,
    },
    /// Player damage was mitigated by ACTIVE ARMOR at this point.
    ArmorBurst {
        /// Impact position.
        position: Vec3Fixed,
    },
}

//! Passive buff stat records.
//!
//! Passives are timed modifiers independent of the active weapon. Their
//! coefficients are polled by the movement/health systems outside the core;
//! the core only owns the countdown timers and the MULTI-LOCK side effects.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed};

/// Enum key for passive buff variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PassiveKind {
    /// Forces the gun family and fires one shot per locked target.
    MultiLock,
    /// Movement/roll/boost multipliers.
    Overdrive,
    /// Mitigates player-directed damage.
    ActiveArmor,
}

impl PassiveKind {
    /// All passive variants in table order.
    pub const ALL: [PassiveKind; 3] = [
        PassiveKind::MultiLock,
        PassiveKind::Overdrive,
        PassiveKind::ActiveArmor,
    ];

    /// Stable index into the config table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Display/pickup name for this variant.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PassiveKind::MultiLock => "MULTI-LOCK",
            PassiveKind::Overdrive => "OVERDRIVE",
            PassiveKind::ActiveArmor => "ACTIVE ARMOR",
        }
    }

    /// Resolve a pickup name to a variant. Unknown names return `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

/// Immutable stat record for one passive buff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveSpec {
    /// Which variant this record describes.
    pub kind: PassiveKind,
    /// Buff duration from pickup.
    pub duration_ms: u32,
    /// Movement speed multiplier while active.
    #[serde(with = "fixed_serde")]
    pub movement_mult: Fixed,
    /// Barrel-roll speed multiplier while active.
    #[serde(with = "fixed_serde")]
    pub roll_mult: Fixed,
    /// Evade cooldown multiplier while active.
    #[serde(with = "fixed_serde")]
    pub evade_cooldown_mult: Fixed,
    /// Boost speed multiplier while active.
    #[serde(with = "fixed_serde")]
    pub boost_mult: Fixed,
    /// Boost cooldown multiplier while active.
    #[serde(with = "fixed_serde")]
    pub boost_cooldown_mult: Fixed,
    /// Fraction of player-directed damage absorbed while active.
    #[serde(with = "fixed_serde")]
    pub damage_reduction: Fixed,
    /// Forces the active weapon family to Gun on pickup.
    pub forces_gun_family: bool,
    /// Asserts the weapon-switch lock for the buff's duration.
    pub locks_weapon_switch: bool,
}

impl PassiveSpec {
    /// Create a neutral spec (all multipliers 1, no reduction, no flags).
    #[must_use]
    pub fn new(kind: PassiveKind, duration_ms: u32) -> Self {
        Self {
            kind,
            duration_ms,
            movement_mult: Fixed::ONE,
            roll_mult: Fixed::ONE,
            evade_cooldown_mult: Fixed::ONE,
            boost_mult: Fixed::ONE,
            boost_cooldown_mult: Fixed::ONE,
            damage_reduction: Fixed::ZERO,
            forces_gun_family: false,
            locks_weapon_switch: false,
        }
    }

    /// Builder method to set the Overdrive movement coefficients.
    #[must_use]
    pub const fn with_movement(
        mut self,
        movement: Fixed,
        roll: Fixed,
        evade_cooldown: Fixed,
        boost: Fixed,
        boost_cooldown: Fixed,
    ) -> Self {
        self.movement_mult = movement;
        self.roll_mult = roll;
        self.evade_cooldown_mult = evade_cooldown;
        self.boost_mult = boost;
        self.boost_cooldown_mult = boost_cooldown;
        self
    }

    /// Builder method to set the damage-reduction fraction.
    #[must_use]
    pub const fn with_damage_reduction(mut self, fraction: Fixed) -> Self {
        self.damage_reduction = fraction;
        self
    }

    /// Builder method to set the MULTI-LOCK weapon side effects.
    #[must_use]
    pub const fn forcing_gun(mut self) -> Self {
        self.forces_gun_family = true;
        self.locks_weapon_switch = true;
        self
    }
}

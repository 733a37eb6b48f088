//! Passive buff timers and modifier queries.
//!
//! The manager owns one countdown per active passive. Modifier queries are
//! pull-based: they are evaluated from the current buff set on every call
//! rather than cached, so an expiry is visible to callers within the same
//! tick it happens.

use std::collections::BTreeMap;

use crate::data::{CombatConfig, PassiveKind};
use crate::math::Fixed;

/// Active passive buffs keyed by kind, each with a remaining duration.
#[derive(Debug, Clone, Default)]
pub struct PassiveBuffs {
    remaining_ms: BTreeMap<PassiveKind, u32>,
}

impl PassiveBuffs {
    /// Create an empty buff set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate a passive, (re)setting its timer to the configured duration.
    pub fn activate(&mut self, kind: PassiveKind, config: &CombatConfig) {
        let duration = config.passive(kind).duration_ms;
        self.remaining_ms.insert(kind, duration);
        tracing::debug!(passive = kind.name(), duration_ms = duration, "passive activated");
    }

    /// Advance all countdowns, removing buffs that reach zero.
    pub fn tick(&mut self, delta_ms: u32) {
        self.remaining_ms.retain(|kind, remaining| {
            if *remaining > delta_ms {
                *remaining -= delta_ms;
                true
            } else {
                tracing::debug!(passive = kind.name(), "passive expired");
                false
            }
        });
    }

    /// Whether a passive is currently active.
    #[must_use]
    pub fn is_active(&self, kind: PassiveKind) -> bool {
        self.remaining_ms.contains_key(&kind)
    }

    /// Remaining duration of a passive, if active.
    #[must_use]
    pub fn remaining_ms(&self, kind: PassiveKind) -> Option<u32> {
        self.remaining_ms.get(&kind).copied()
    }

    /// Whether any active passive asserts the weapon-switch lock.
    #[must_use]
    pub fn locks_weapon_switch(&self, config: &CombatConfig) -> bool {
        self.remaining_ms
            .keys()
            .any(|kind| config.passive(*kind).locks_weapon_switch)
    }

    /// Movement speed multiplier (1 when no movement passive is active).
    #[must_use]
    pub fn movement_multiplier(&self, config: &CombatConfig) -> Fixed {
        self.overdrive_coeff(config, |spec| spec.movement_mult)
    }

    /// Barrel-roll speed multiplier.
    #[must_use]
    pub fn roll_multiplier(&self, config: &CombatConfig) -> Fixed {
        self.overdrive_coeff(config, |spec| spec.roll_mult)
    }

    /// Evade cooldown multiplier.
    #[must_use]
    pub fn evade_cooldown_multiplier(&self, config: &CombatConfig) -> Fixed {
        self.overdrive_coeff(config, |spec| spec.evade_cooldown_mult)
    }

    /// Boost speed multiplier.
    #[must_use]
    pub fn boost_multiplier(&self, config: &CombatConfig) -> Fixed {
        self.overdrive_coeff(config, |spec| spec.boost_mult)
    }

    /// Boost cooldown multiplier.
    #[must_use]
    pub fn boost_cooldown_multiplier(&self, config: &CombatConfig) -> Fixed {
        self.overdrive_coeff(config, |spec| spec.boost_cooldown_mult)
    }

    /// Fraction of player-directed damage absorbed (0 when inactive).
    #[must_use]
    pub fn damage_reduction(&self, config: &CombatConfig) -> Fixed {
        if self.is_active(PassiveKind::ActiveArmor) {
            config.passive(PassiveKind::ActiveArmor).damage_reduction
        } else {
            Fixed::ZERO
        }
    }

    fn overdrive_coeff(
        &self,
        config: &CombatConfig,
        pick: impl Fn(&crate::data::PassiveSpec) -> Fixed,
    ) -> Fixed {
        if self.is_active(PassiveKind::Overdrive) {
            pick(config.passive(PassiveKind::Overdrive))
        } else {
            Fixed::ONE
        }
    }
}

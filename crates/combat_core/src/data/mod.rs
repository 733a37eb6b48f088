//! Data-driven weapon and passive definitions.
//!
//! The combat core is configured by one immutable stat table,
//! [`CombatConfig`]. The table ships with built-in defaults; callers may
//! override individual records before engine construction. Once the engine
//! owns the table it never changes, and every lookup is enum-keyed so
//! unknown configuration names fail closed at the command surface.

pub mod gun_data;
pub mod missile_data;
pub mod passive_data;

pub use gun_data::{BeamSpec, ChainSpec, GravitySpec, GunKind, GunSpec};
pub use missile_data::{MissileKind, MissilePayload, MissileSpec};
pub use passive_data::{PassiveKind, PassiveSpec};

use serde::{Deserialize, Serialize};

use crate::error::{CombatError, Result};
use crate::math::{fixed_serde, Fixed};

/// Immutable configuration table for the combat core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatConfig {
    /// One record per gun variant, indexed by [`GunKind::index`].
    guns: [GunSpec; 5],
    /// One record per missile variant, indexed by [`MissileKind::index`].
    missiles: [MissileSpec; 5],
    /// One record per passive variant, indexed by [`PassiveKind::index`].
    passives: [PassiveSpec; 3],
    /// Lock-on range for targeting.
    #[serde(with = "fixed_serde")]
    pub lock_range: Fixed,
    /// Minimum interval between target-cycle inputs.
    pub cycle_cooldown_ms: u32,
    /// Debounce window for the weapon-switch input.
    pub switch_debounce_ms: u32,
    /// Debounce window for the lock-toggle input.
    pub lock_toggle_debounce_ms: u32,
    /// Stagger between MULTI-LOCK volley shots.
    pub multi_lock_stagger_ms: u32,
    /// Whether auto-lock starts enabled.
    pub auto_lock_default: bool,
}

impl CombatConfig {
    /// Look up the stat record for a gun variant.
    #[must_use]
    pub fn gun(&self, kind: GunKind) -> &GunSpec {
        &self.guns[kind.index()]
    }

    /// Look up the stat record for a missile variant.
    #[must_use]
    pub fn missile(&self, kind: MissileKind) -> &MissileSpec {
        &self.missiles[kind.index()]
    }

    /// Look up the stat record for a passive variant.
    #[must_use]
    pub fn passive(&self, kind: PassiveKind) -> &PassiveSpec {
        &self.passives[kind.index()]
    }

    /// Replace one gun record before engine construction.
    pub fn set_gun(&mut self, spec: GunSpec) {
        self.guns[spec.kind.index()] = spec;
    }

    /// Replace one missile record before engine construction.
    pub fn set_missile(&mut self, spec: MissileSpec) {
        self.missiles[spec.kind.index()] = spec;
    }

    /// Replace one passive record before engine construction.
    pub fn set_passive(&mut self, spec: PassiveSpec) {
        self.passives[spec.kind.index()] = spec;
    }

    /// Validate the table.
    ///
    /// A bad table is a host wiring bug (spec error category: usage error),
    /// so this fails loudly instead of degrading.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::InvalidConfig`] for records that cannot drive
    /// a sane simulation: continuous guns without beam geometry, shot guns
    /// without lifetime, damage-reduction fractions outside `[0, 1]`, or
    /// zero-duration passives.
    pub fn validate(&self) -> Result<()> {
        for (slot, spec) in GunKind::ALL.iter().zip(self.guns.iter()) {
            if spec.kind != *slot {
                return Err(invalid(spec.kind.name(), "record stored in wrong table slot"));
            }
            if spec.is_continuous() && spec.beam.is_none() {
                return Err(invalid(spec.kind.name(), "continuous gun without beam geometry"));
            }
            if !spec.is_continuous() && spec.lifetime_ms == 0 {
                return Err(invalid(spec.kind.name(), "shot gun with zero lifetime"));
            }
        }

        for (slot, spec) in MissileKind::ALL.iter().zip(self.missiles.iter()) {
            if spec.kind != *slot {
                return Err(invalid(spec.kind.name(), "record stored in wrong table slot"));
            }
            if spec.lifetime_ms == 0 {
                return Err(invalid(spec.kind.name(), "missile with zero lifetime"));
            }
            if !spec.unlimited && spec.max_ammo == Some(0) {
                return Err(invalid(spec.kind.name(), "empty magazine with no unlimited flag"));
            }
            if let MissilePayload::ScreenClear {
                effect_duration_ms: 0,
                ..
            } = spec.payload
            {
                return Err(invalid(spec.kind.name(), "screen clear with zero duration"));
            }
        }

        for (slot, spec) in PassiveKind::ALL.iter().zip(self.passives.iter()) {
            if spec.kind != *slot {
                return Err(invalid(spec.kind.name(), "record stored in wrong table slot"));
            }
            if spec.duration_ms == 0 {
                return Err(invalid(spec.kind.name(), "passive with zero duration"));
            }
            if spec.damage_reduction < Fixed::ZERO || spec.damage_reduction > Fixed::ONE {
                return Err(invalid(spec.kind.name(), "damage reduction outside [0, 1]"));
            }
        }

        if self.lock_range <= Fixed::ZERO {
            return Err(invalid("lock_range", "must be positive"));
        }

        Ok(())
    }
}

fn invalid(entry: &str, message: &str) -> CombatError {
    CombatError::InvalidConfig {
        entry: entry.to_string(),
        message: message.to_string(),
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        let f = Fixed::from_num::<f64>;

        let guns = [
            GunSpec::new(GunKind::Rapid, f(10.0), 150, f(80.0)).with_lifetime(2000),
            GunSpec::new(GunKind::Flak, f(16.0), 400, f(60.0))
                .with_lifetime(1800)
                .with_explosion_radius(f(6.0))
                .with_powerup_duration(15_000),
            GunSpec::new(GunKind::Lightning, f(8.0), 120, f(90.0))
                .with_lifetime(1500)
                .with_chain(ChainSpec {
                    count: 3,
                    range: f(12.0),
                })
                .with_powerup_duration(15_000)
                .locked(),
            GunSpec::new(GunKind::Beam, f(3.0), 0, Fixed::ZERO)
                .with_lifetime(0)
                .with_beam(BeamSpec {
                    range: f(60.0),
                    width: f(2.0),
                })
                .with_powerup_duration(12_000)
                .locked(),
            GunSpec::new(GunKind::Gravity, f(5.0), 900, f(50.0))
                .with_lifetime(2500)
                .with_gravity(GravitySpec {
                    radius: f(25.0),
                    strength: f(30.0),
                    collapse_delay_ms: 2000,
                })
                .with_powerup_duration(12_000)
                .locked(),
        ];

        let missiles = [
            MissileSpec::new(MissileKind::Hellfire, f(40.0), 500, f(50.0))
                .with_turn_rate(f(4.0))
                .with_lifetime(5000)
                .with_ammo(8, Some(1500)),
            MissileSpec::new(MissileKind::Smartbomb, f(60.0), 800, Fixed::ZERO)
                .with_lifetime(1200)
                .with_ammo(1, None)
                .with_powerup_duration(20_000)
                .with_payload(MissilePayload::ScreenClear {
                    effect_duration_ms: 1200,
                    boss_immune: true,
                }),
            MissileSpec::new(MissileKind::Buster, f(250.0), 1200, f(40.0))
                .with_turn_rate(f(2.5))
                .with_lifetime(6000)
                .with_lead_factor(f(0.5))
                .boss_only()
                .with_ammo(3, Some(4000))
                .with_powerup_duration(20_000),
            MissileSpec::new(MissileKind::Barrage, f(25.0), 900, f(55.0))
                .with_turn_rate(f(5.0))
                .with_lifetime(4000)
                .with_lead_factor(f(0.6))
                .with_ammo(4, Some(2500))
                .with_powerup_duration(20_000)
                .with_payload(MissilePayload::Volley {
                    count: 4,
                    stagger_ms: 80,
                }),
            MissileSpec::new(MissileKind::Thor, f(120.0), 1500, Fixed::ZERO)
                .with_lifetime(1000)
                .with_ammo(2, Some(5000))
                .with_powerup_duration(20_000)
                .with_payload(MissilePayload::OrbitalStrike {
                    down_force: f(50.0),
                }),
        ];

        let passives = [
            PassiveSpec::new(PassiveKind::MultiLock, 8000).forcing_gun(),
            PassiveSpec::new(PassiveKind::Overdrive, 10_000).with_movement(
                f(1.4),
                f(1.3),
                f(0.6),
                f(1.5),
                f(0.5),
            ),
            PassiveSpec::new(PassiveKind::ActiveArmor, 10_000).with_damage_reduction(f(0.9)),
        ];

        Self {
            guns,
            missiles,
            passives,
            lock_range: f(150.0),
            cycle_cooldown_ms: 200,
            switch_debounce_ms: 300,
            lock_toggle_debounce_ms: 300,
            multi_lock_stagger_ms: 40,
            auto_lock_default: true,
        }
    }
}

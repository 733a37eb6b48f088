//! Gun weapon stat records.
//!
//! Guns are the rapid-fire weapon family. Each variant is identified by a
//! [`GunKind`] and described by an immutable [`GunSpec`] resolved from the
//! config table at engine construction.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, option_fixed_serde, Fixed};

/// Enum key for gun variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum GunKind {
    /// Default fast single-shot gun.
    #[default]
    Rapid,
    /// Slow proximity-burst shells with a large hit radius.
    Flak,
    /// High rate-of-fire arc gun. Chain parameters are declared but inert.
    Lightning,
    /// Continuous beam, fire-held rather than discrete shots.
    Beam,
    /// Shots that attach a gravity well to the first enemy struck.
    Gravity,
}

impl GunKind {
    /// All gun variants in table order.
    pub const ALL: [GunKind; 5] = [
        GunKind::Rapid,
        GunKind::Flak,
        GunKind::Lightning,
        GunKind::Beam,
        GunKind::Gravity,
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
            GunKind::Rapid => "RAPID",
            GunKind::Flak => "FLAK",
            GunKind::Lightning => "LIGHTNING",
            GunKind::Beam => "BEAM",
            GunKind::Gravity => "GRAVITY",
        }
    }

    /// Resolve a pickup name to a variant.
    ///
    /// Unknown names return `None`; pickup commands treat that as a
    /// silent no-op rather than an error.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

/// Chain-lightning parameters.
///
/// Declared by the LIGHTNING gun but currently inert: no arcing behavior
/// consumes them. Kept as pass-through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSpec {
    /// Maximum number of chained arcs.
    pub count: u32,
    /// Maximum arc distance between enemies.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
}

/// Beam geometry for continuous guns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamSpec {
    /// Beam reach along its axis.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Beam half-width added to each enemy's hit radius.
    #[serde(with = "fixed_serde")]
    pub width: Fixed,
}

/// Gravity well parameters for gravity-attaching guns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GravitySpec {
    /// Pull radius around the anchor enemy.
    #[serde(with = "fixed_serde")]
    pub radius: Fixed,
    /// Pull strength coefficient.
    #[serde(with = "fixed_serde")]
    pub strength: Fixed,
    /// Pull-phase duration before the well collapses.
    pub collapse_delay_ms: u32,
}

/// Immutable stat record for one gun variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GunSpec {
    /// Which variant this record describes.
    pub kind: GunKind,
    /// Damage per shot (per beam application for continuous guns).
    #[serde(with = "fixed_serde")]
    pub damage: Fixed,
    /// Minimum interval between shots. 0 denotes a continuous weapon.
    pub fire_interval_ms: u32,
    /// Projectile speed in units per second.
    #[serde(with = "fixed_serde")]
    pub shot_speed: Fixed,
    /// Projectile lifetime.
    pub lifetime_ms: u32,
    /// Hit radius override for proximity shells.
    #[serde(default, with = "option_fixed_serde")]
    pub explosion_radius: Option<Fixed>,
    /// Declared-but-inert chain parameters.
    #[serde(default)]
    pub chain: Option<ChainSpec>,
    /// Beam geometry for continuous guns.
    #[serde(default)]
    pub beam: Option<BeamSpec>,
    /// Gravity well parameters for gravity-attaching guns.
    #[serde(default)]
    pub gravity: Option<GravitySpec>,
    /// Powerup countdown; on expiry the gun family reverts to RAPID.
    #[serde(default)]
    pub powerup_duration_ms: Option<u32>,
    /// Whether picking this gun up requires a prior unlock.
    #[serde(default)]
    pub requires_unlock: bool,
}

impl GunSpec {
    /// Create a spec with the basic projectile stats set.
    #[must_use]
    pub fn new(kind: GunKind, damage: Fixed, fire_interval_ms: u32, shot_speed: Fixed) -> Self {
        Self {
            kind,
            damage,
            fire_interval_ms,
            shot_speed,
            lifetime_ms: 2000,
            explosion_radius: None,
            chain: None,
            beam: None,
            gravity: None,
            powerup_duration_ms: None,
            requires_unlock: false,
        }
    }

    /// Builder method to set projectile lifetime.
    #[must_use]
    pub const fn with_lifetime(mut self, lifetime_ms: u32) -> Self {
        self.lifetime_ms = lifetime_ms;
        self
    }

    /// Builder method to set an explosion hit radius.
    #[must_use]
    pub const fn with_explosion_radius(mut self, radius: Fixed) -> Self {
        self.explosion_radius = Some(radius);
        self
    }

    /// Builder method to set inert chain parameters.
    #[must_use]
    pub const fn with_chain(mut self, chain: ChainSpec) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Builder method to set beam geometry.
    #[must_use]
    pub const fn with_beam(mut self, beam: BeamSpec) -> Self {
        self.beam = Some(beam);
        self
    }

    /// Builder method to set gravity well parameters.
    #[must_use]
    pub const fn with_gravity(mut self, gravity: GravitySpec) -> Self {
        self.gravity = Some(gravity);
        self
    }

    /// Builder method to set the powerup countdown.
    #[must_use]
    pub const fn with_powerup_duration(mut self, duration_ms: u32) -> Self {
        self.powerup_duration_ms = Some(duration_ms);
        self
    }

    /// Builder method to gate this gun behind an unlock.
    #[must_use]
    pub const fn locked(mut self) -> Self {
        self.requires_unlock = true;
        self
    }

    /// Whether this gun is continuous (beam-style) rather than shot-based.
    #[must_use]
    pub const fn is_continuous(&self) -> bool {
        self.fire_interval_ms == 0
    }
}

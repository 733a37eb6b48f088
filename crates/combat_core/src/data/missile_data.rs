//! Missile weapon stat records.
//!
//! Missiles are the heavy, ammo-limited weapon family. Payload variants
//! select the effect the fire command produces: a homing missile, a
//! staggered volley, a screen-clearing detonation, or an orbital strike.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed};

/// Enum key for missile variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum MissileKind {
    /// Default homing missile.
    #[default]
    Hellfire,
    /// Screen-clearing detonation.
    Smartbomb,
    /// Heavy boss-only torpedo.
    Buster,
    /// Staggered volley across multiple locked targets.
    Barrage,
    /// Orbital strike called down on the locked target.
    Thor,
}

impl MissileKind {
    /// All missile variants in table order.
    pub const ALL: [MissileKind; 5] = [
        MissileKind::Hellfire,
        MissileKind::Smartbomb,
        MissileKind::Buster,
        MissileKind::Barrage,
        MissileKind::Thor,
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
            MissileKind::Hellfire => "HELLFIRE",
            MissileKind::Smartbomb => "SMARTBOMB",
            MissileKind::Buster => "BUSTER",
            MissileKind::Barrage => "BARRAGE",
            MissileKind::Thor => "THOR",
        }
    }

    /// Resolve a pickup name to a variant. Unknown names return `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

/// What firing this missile weapon actually produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MissilePayload {
    /// One homing missile at the current target.
    #[default]
    Homing,
    /// One homing missile per locked target, spawned with a stagger.
    Volley {
        /// Maximum number of targets engaged per fire command.
        count: u32,
        /// Delay between consecutive spawns.
        stagger_ms: u32,
    },
    /// Full-screen detonation that damages every live enemy.
    ScreenClear {
        /// Sweep duration from trigger to expiry.
        effect_duration_ms: u32,
        /// Bosses shrug the detonation off when set.
        boss_immune: bool,
    },
    /// Impact -> push -> explode strike on the locked target.
    OrbitalStrike {
        /// Downward force carried on the impact hit event.
        #[serde(with = "fixed_serde")]
        down_force: Fixed,
    },
}

/// Immutable stat record for one missile variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissileSpec {
    /// Which variant this record describes.
    pub kind: MissileKind,
    /// Damage per hit.
    #[serde(with = "fixed_serde")]
    pub damage: Fixed,
    /// Minimum interval between fire commands.
    pub fire_interval_ms: u32,
    /// Missile speed in units per second.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Homing turn rate in radians-equivalent per second (direction lerp rate).
    #[serde(with = "fixed_serde")]
    pub turn_rate: Fixed,
    /// Missile lifetime.
    pub lifetime_ms: u32,
    /// Predictive lead factor applied to the target's velocity.
    #[serde(with = "fixed_serde")]
    pub lead_factor: Fixed,
    /// Boss-only missiles never register hits against non-boss targets.
    #[serde(default)]
    pub boss_only: bool,
    /// Magazine size. `None` together with `unlimited` bypasses ammo.
    #[serde(default)]
    pub max_ammo: Option<u32>,
    /// Reload time once the magazine is empty. `None` means no auto-refill.
    #[serde(default)]
    pub reload_ms: Option<u32>,
    /// Unlimited-ammo weapons never touch the ammo state machine.
    #[serde(default)]
    pub unlimited: bool,
    /// Powerup countdown; on expiry the family reverts to HELLFIRE.
    #[serde(default)]
    pub powerup_duration_ms: Option<u32>,
    /// Effect produced on fire.
    #[serde(default)]
    pub payload: MissilePayload,
}

impl MissileSpec {
    /// Create a homing missile spec with the basic stats set.
    #[must_use]
    pub fn new(kind: MissileKind, damage: Fixed, fire_interval_ms: u32, speed: Fixed) -> Self {
        Self {
            kind,
            damage,
            fire_interval_ms,
            speed,
            turn_rate: Fixed::from_num(4),
            lifetime_ms: 5000,
            lead_factor: Fixed::from_num(0.8),
            boss_only: false,
            max_ammo: None,
            reload_ms: None,
            unlimited: false,
            powerup_duration_ms: None,
            payload: MissilePayload::Homing,
        }
    }

    /// Builder method to set the homing turn rate.
    #[must_use]
    pub const fn with_turn_rate(mut self, turn_rate: Fixed) -> Self {
        self.turn_rate = turn_rate;
        self
    }

    /// Builder method to set missile lifetime.
    #[must_use]
    pub const fn with_lifetime(mut self, lifetime_ms: u32) -> Self {
        self.lifetime_ms = lifetime_ms;
        self
    }

    /// Builder method to set the predictive lead factor.
    #[must_use]
    pub const fn with_lead_factor(mut self, lead_factor: Fixed) -> Self {
        self.lead_factor = lead_factor;
        self
    }

    /// Builder method to restrict hits to boss targets.
    #[must_use]
    pub const fn boss_only(mut self) -> Self {
        self.boss_only = true;
        self
    }

    /// Builder method to set the magazine and optional reload time.
    #[must_use]
    pub const fn with_ammo(mut self, max_ammo: u32, reload_ms: Option<u32>) -> Self {
        self.max_ammo = Some(max_ammo);
        self.reload_ms = reload_ms;
        self
    }

    /// Builder method to bypass the ammo state machine entirely.
    #[must_use]
    pub const fn unlimited(mut self) -> Self {
        self.unlimited = true;
        self
    }

    /// Builder method to set the powerup countdown.
    #[must_use]
    pub const fn with_powerup_duration(mut self, duration_ms: u32) -> Self {
        self.powerup_duration_ms = Some(duration_ms);
        self
    }

    /// Builder method to set the payload.
    #[must_use]
    pub const fn with_payload(mut self, payload: MissilePayload) -> Self {
        self.payload = payload;
        self
    }
}

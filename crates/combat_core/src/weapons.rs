//! Weapon family selection, fire gating, ammo and powerups.
//!
//! The controller owns which weapon is active and whether it may fire this
//! tick. It never spawns effects itself; the engine asks it for permission
//! and then drives the effect simulator.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::data::{CombatConfig, GunKind, MissileKind, MissileSpec};

/// The two disjoint weapon families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WeaponFamily {
    /// Rapid-fire projectile/beam weapons.
    #[default]
    Gun,
    /// Heavy ammo-limited weapons.
    Missile,
}

impl WeaponFamily {
    /// The other family.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            WeaponFamily::Gun => WeaponFamily::Missile,
            WeaponFamily::Missile => WeaponFamily::Gun,
        }
    }
}

/// Reload phase of the missile magazine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReloadPhase {
    /// Magazine available (possibly empty with no reload defined).
    #[default]
    Ready,
    /// Waiting out the reload timer.
    Reloading {
        /// Simulation time the reload began.
        started_ms: u64,
    },
}

/// Ammo state for the current missile loadout.
///
/// Unlimited-ammo weapons bypass this state machine entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AmmoState {
    /// Rounds remaining. Never goes negative (unsigned by construction).
    pub count: u32,
    /// Current reload phase.
    pub phase: ReloadPhase,
}

impl AmmoState {
    fn full(spec: &MissileSpec) -> Self {
        Self {
            count: spec.max_ammo.unwrap_or(0),
            phase: ReloadPhase::Ready,
        }
    }
}

/// Active weapon state: family, current definitions, ammo, powerup timers.
#[derive(Debug, Clone)]
pub struct WeaponController {
    family: WeaponFamily,
    gun: GunKind,
    missile: MissileKind,
    ammo: AmmoState,
    gun_powerup_expires_ms: Option<u64>,
    missile_powerup_expires_ms: Option<u64>,
    last_fire_ms: Option<u64>,
    last_switch_ms: Option<u64>,
    switch_debounce_ms: u32,
}

impl WeaponController {
    /// Create a controller holding the default loadout (RAPID / HELLFIRE).
    #[must_use]
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            family: WeaponFamily::Gun,
            gun: GunKind::Rapid,
            missile: MissileKind::Hellfire,
            ammo: AmmoState::full(config.missile(MissileKind::Hellfire)),
            gun_powerup_expires_ms: None,
            missile_powerup_expires_ms: None,
            last_fire_ms: None,
            last_switch_ms: None,
            switch_debounce_ms: config.switch_debounce_ms,
        }
    }

    /// The active weapon family.
    #[must_use]
    pub const fn family(&self) -> WeaponFamily {
        self.family
    }

    /// The current gun variant.
    #[must_use]
    pub const fn gun_kind(&self) -> GunKind {
        self.gun
    }

    /// The current missile variant.
    #[must_use]
    pub const fn missile_kind(&self) -> MissileKind {
        self.missile
    }

    /// Current missile ammo state.
    #[must_use]
    pub const fn ammo(&self) -> AmmoState {
        self.ammo
    }

    /// Force the active family, bypassing debounce and locks.
    ///
    /// Used by the MULTI-LOCK passive, which asserts the Gun family on
    /// pickup.
    pub fn force_family(&mut self, family: WeaponFamily) {
        self.family = family;
    }

    /// Toggle the active family.
    ///
    /// Debounced, and a no-op while a weapon-switch lock is asserted.
    /// Returns whether the switch applied.
    pub fn switch_family(&mut self, now_ms: u64, switch_locked: bool) -> bool {
        if switch_locked {
            return false;
        }
        if let Some(last) = self.last_switch_ms {
            if now_ms.saturating_sub(last) < u64::from(self.switch_debounce_ms) {
                return false;
            }
        }
        self.last_switch_ms = Some(now_ms);
        self.family = self.family.other();
        tracing::debug!(family = ?self.family, "weapon family switched");
        true
    }

    /// Advance reload and powerup timers.
    ///
    /// Powerup expiry reverts the family's weapon to its default atomically
    /// within this call; there is no partial cancellation state.
    pub fn tick(&mut self, now_ms: u64, config: &CombatConfig) {
        if let Some(expires) = self.gun_powerup_expires_ms {
            if now_ms >= expires {
                tracing::debug!(gun = self.gun.name(), "gun powerup expired");
                self.gun = GunKind::Rapid;
                self.gun_powerup_expires_ms = None;
            }
        }

        if let Some(expires) = self.missile_powerup_expires_ms {
            if now_ms >= expires {
                tracing::debug!(missile = self.missile.name(), "missile powerup expired");
                self.missile = MissileKind::Hellfire;
                self.missile_powerup_expires_ms = None;
                self.ammo = AmmoState::full(config.missile(MissileKind::Hellfire));
            }
        }

        if let ReloadPhase::Reloading { started_ms } = self.ammo.phase {
            let spec = config.missile(self.missile);
            if let Some(reload_ms) = spec.reload_ms {
                if now_ms.saturating_sub(started_ms) >= u64::from(reload_ms) {
                    self.ammo = AmmoState::full(spec);
                }
            } else {
                // Reloading with no reload time defined cannot complete;
                // treat as a ready-but-empty magazine.
                self.ammo.phase = ReloadPhase::Ready;
            }
        }
    }

    /// Whether the fire-rate gate permits a shot right now.
    ///
    /// An interval of 0 denotes a continuous weapon; the engine tracks its
    /// active flag from fire-held instead of calling this.
    #[must_use]
    pub fn fire_permitted(&self, now_ms: u64, interval_ms: u32) -> bool {
        match self.last_fire_ms {
            Some(last) => now_ms.saturating_sub(last) >= u64::from(interval_ms),
            None => true,
        }
    }

    /// Record a successful fire for rate gating.
    pub fn note_fired(&mut self, now_ms: u64) {
        self.last_fire_ms = Some(now_ms);
    }

    /// Consume one round for the current missile, advancing the ammo
    /// machine. Returns whether a round was available.
    pub fn try_consume_ammo(&mut self, now_ms: u64, spec: &MissileSpec) -> bool {
        if spec.unlimited || spec.max_ammo.is_none() {
            return true;
        }
        if matches!(self.ammo.phase, ReloadPhase::Reloading { .. }) {
            return false;
        }
        if self.ammo.count == 0 {
            return false;
        }

        self.ammo.count -= 1;
        if self.ammo.count == 0 && spec.reload_ms.is_some() {
            self.ammo.phase = ReloadPhase::Reloading { started_ms: now_ms };
        }
        true
    }

    /// Replace the gun loadout from a powerup pickup.
    ///
    /// Rejected (no-op) when the gun is gated behind an unmet unlock.
    /// Returns whether the pickup applied.
    pub fn pickup_gun(
        &mut self,
        kind: GunKind,
        now_ms: u64,
        config: &CombatConfig,
        unlocked: &BTreeSet<GunKind>,
    ) -> bool {
        let spec = config.gun(kind);
        if spec.requires_unlock && !unlocked.contains(&kind) {
            tracing::debug!(gun = kind.name(), "gun pickup rejected: not unlocked");
            return false;
        }
        self.gun = kind;
        self.gun_powerup_expires_ms = spec
            .powerup_duration_ms
            .map(|duration| now_ms + u64::from(duration));
        tracing::debug!(gun = kind.name(), "gun powerup picked up");
        true
    }

    /// Replace the missile loadout from a powerup pickup, resetting ammo
    /// to the new weapon's magazine.
    pub fn pickup_missile(&mut self, kind: MissileKind, now_ms: u64, config: &CombatConfig) {
        let spec = config.missile(kind);
        self.missile = kind;
        self.ammo = AmmoState::full(spec);
        self.missile_powerup_expires_ms = spec
            .powerup_duration_ms
            .map(|duration| now_ms + u64::from(duration));
        tracing::debug!(missile = kind.name(), "missile powerup picked up");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Fixed;

    fn controller() -> (CombatConfig, WeaponController) {
        let config = CombatConfig::default();
        let weapons = WeaponController::new(&config);
        (config, weapons)
    }

    #[test]
    fn test_switch_debounced() {
        let (_, mut weapons) = controller();
        assert_eq!(weapons.family(), WeaponFamily::Gun);

        assert!(weapons.switch_family(100, false));
        assert_eq!(weapons.family(), WeaponFamily::Missile);

        // Inside the 300 ms window
        assert!(!weapons.switch_family(300, false));
        assert!(weapons.switch_family(450, false));
        assert_eq!(weapons.family(), WeaponFamily::Gun);
    }

    #[test]
    fn test_switch_lock_blocks() {
        let (_, mut weapons) = controller();
        assert!(!weapons.switch_family(1000, true));
        assert_eq!(weapons.family(), WeaponFamily::Gun);
    }

    #[test]
    fn test_fire_rate_gating() {
        let (_, mut weapons) = controller();
        assert!(weapons.fire_permitted(0, 150));
        weapons.note_fired(0);
        assert!(!weapons.fire_permitted(100, 150));
        assert!(weapons.fire_permitted(150, 150));
    }

    #[test]
    fn test_ammo_decrements_and_reloads() {
        let (config, mut weapons) = controller();
        let spec = *config.missile(MissileKind::Hellfire);

        for _ in 0..8 {
            assert!(weapons.try_consume_ammo(1000, &spec));
        }
        // Magazine hit zero with a reload defined
        assert!(matches!(
            weapons.ammo().phase,
            ReloadPhase::Reloading { started_ms: 1000 }
        ));
        assert!(!weapons.try_consume_ammo(1100, &spec));

        weapons.tick(1000 + 1500, &config);
        assert_eq!(weapons.ammo().count, 8);
        assert_eq!(weapons.ammo().phase, ReloadPhase::Ready);
    }

    #[test]
    fn test_no_reload_stays_empty() {
        let (config, mut weapons) = controller();
        weapons.pickup_missile(MissileKind::Smartbomb, 0, &config);
        let spec = *config.missile(MissileKind::Smartbomb);

        assert!(weapons.try_consume_ammo(100, &spec));
        assert!(!weapons.try_consume_ammo(200, &spec));

        // Never auto-refills without a reload time
        weapons.tick(60_000, &config);
        // Smartbomb powerup expired by then, which reverts to Hellfire
        assert_eq!(weapons.missile_kind(), MissileKind::Hellfire);
        assert_eq!(weapons.ammo().count, 8);
    }

    #[test]
    fn test_unlimited_bypasses_ammo() {
        let (mut config, _) = controller();
        let unlimited = MissileSpec::new(
            MissileKind::Hellfire,
            Fixed::from_num(40),
            500,
            Fixed::from_num(50),
        )
        .unlimited();
        config.set_missile(unlimited);
        let mut weapons = WeaponController::new(&config);
        let before = weapons.ammo();

        for _ in 0..100 {
            assert!(weapons.try_consume_ammo(0, config.missile(MissileKind::Hellfire)));
        }
        assert_eq!(weapons.ammo(), before);
    }

    #[test]
    fn test_gun_pickup_unlock_gate() {
        let (config, mut weapons) = controller();
        let unlocked = BTreeSet::new();

        assert!(!weapons.pickup_gun(GunKind::Gravity, 0, &config, &unlocked));
        assert_eq!(weapons.gun_kind(), GunKind::Rapid);

        let mut unlocked = BTreeSet::new();
        unlocked.insert(GunKind::Gravity);
        assert!(weapons.pickup_gun(GunKind::Gravity, 0, &config, &unlocked));
        assert_eq!(weapons.gun_kind(), GunKind::Gravity);
    }

    #[test]
    fn test_gun_powerup_expiry_reverts() {
        let (config, mut weapons) = controller();
        let unlocked: BTreeSet<GunKind> = [GunKind::Flak].into_iter().collect();
        weapons.pickup_gun(GunKind::Flak, 0, &config, &unlocked);
        assert_eq!(weapons.gun_kind(), GunKind::Flak);

        weapons.tick(14_999, &config);
        assert_eq!(weapons.gun_kind(), GunKind::Flak);

        weapons.tick(15_000, &config);
        assert_eq!(weapons.gun_kind(), GunKind::Rapid);
    }
}

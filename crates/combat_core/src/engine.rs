//! Combat engine: the single tick-stepped entry point.
//!
//! The engine owns every subsystem (targeting, weapons, buffs, effects)
//! and advances them in a fixed order each tick: clock, buff timers,
//! weapon timers, targeting refresh, input edges, fire handling, deferred
//! spawns, effect simulation, damage resolution. Identical configuration,
//! inputs, and world frames always produce identical outputs.
//!
//! The simulation clock is explicit: the engine never reads wall time.
//! Gameplay preconditions that fail (no target, empty magazine, locked
//! pickup) are silent no-ops; host wiring mistakes (an invalid config
//! table) fail loudly at construction.

use std::collections::BTreeSet;

use crate::buffs::PassiveBuffs;
use crate::damage::{apply_player_damage, resolve_effect_events};
use crate::data::{CombatConfig, GunKind, MissileKind, MissilePayload, MissileSpec, PassiveKind};
use crate::effects::{
    multi_lock_speed, EffectCtx, EffectKind, EffectSimulator, RenderSnapshot, StrikePhase,
};
use crate::error::Result;
use crate::events::CombatEvent;
use crate::math::{Fixed, Vec3Fixed};
use crate::targeting::TargetingSystem;
use crate::weapons::{AmmoState, WeaponController, WeaponFamily};
use crate::world::{InputFrame, PlayerFrame, WorldFrame};

/// An effect spawn deferred to a future tick (staggered volleys).
#[derive(Debug, Clone)]
struct ScheduledSpawn {
    at_ms: u64,
    kind: EffectKind,
}

/// Everything a tick produces: telemetry events plus the render snapshot.
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    /// Telemetry events in deterministic order.
    pub events: Vec<CombatEvent>,
    /// Positional state of every live effect, for the rendering layer.
    pub snapshot: RenderSnapshot,
}

/// Tick-stepped combat core.
#[derive(Debug, Clone)]
pub struct CombatEngine {
    config: CombatConfig,
    clock_ms: u64,
    targeting: TargetingSystem,
    weapons: WeaponController,
    buffs: PassiveBuffs,
    effects: EffectSimulator,
    pending_spawns: Vec<ScheduledSpawn>,
    unlocked_guns: BTreeSet<GunKind>,
}

impl CombatEngine {
    /// Build an engine over a validated configuration table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CombatError::InvalidConfig`] when the table fails
    /// validation; a bad table is a wiring bug, not a gameplay state.
    pub fn new(config: CombatConfig) -> Result<Self> {
        config.validate()?;
        let targeting = TargetingSystem::new(
            config.lock_range,
            config.cycle_cooldown_ms,
            config.lock_toggle_debounce_ms,
            config.auto_lock_default,
        );
        let weapons = WeaponController::new(&config);
        Ok(Self {
            config,
            clock_ms: 0,
            targeting,
            weapons,
            buffs: PassiveBuffs::new(),
            effects: EffectSimulator::new(),
            pending_spawns: Vec::new(),
            unlocked_guns: BTreeSet::new(),
        })
    }

    /// The configuration table the engine was built with.
    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Current simulation time.
    #[must_use]
    pub const fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Read access to targeting state.
    #[must_use]
    pub fn targeting(&self) -> &TargetingSystem {
        &self.targeting
    }

    /// The active weapon family.
    #[must_use]
    pub fn weapon_family(&self) -> WeaponFamily {
        self.weapons.family()
    }

    /// The current gun variant.
    #[must_use]
    pub fn gun_kind(&self) -> GunKind {
        self.weapons.gun_kind()
    }

    /// The current missile variant.
    #[must_use]
    pub fn missile_kind(&self) -> MissileKind {
        self.weapons.missile_kind()
    }

    /// Current missile ammo state.
    #[must_use]
    pub fn ammo(&self) -> AmmoState {
        self.weapons.ammo()
    }

    /// Whether a passive buff is currently active.
    #[must_use]
    pub fn passive_active(&self, kind: PassiveKind) -> bool {
        self.buffs.is_active(kind)
    }

    /// Movement speed multiplier from active passives.
    #[must_use]
    pub fn movement_multiplier(&self) -> Fixed {
        self.buffs.movement_multiplier(&self.config)
    }

    /// Barrel-roll speed multiplier from active passives.
    #[must_use]
    pub fn roll_multiplier(&self) -> Fixed {
        self.buffs.roll_multiplier(&self.config)
    }

    /// Evade cooldown multiplier from active passives.
    #[must_use]
    pub fn evade_cooldown_multiplier(&self) -> Fixed {
        self.buffs.evade_cooldown_multiplier(&self.config)
    }

    /// Boost speed multiplier from active passives.
    #[must_use]
    pub fn boost_multiplier(&self) -> Fixed {
        self.buffs.boost_multiplier(&self.config)
    }

    /// Boost cooldown multiplier from active passives.
    #[must_use]
    pub fn boost_cooldown_multiplier(&self) -> Fixed {
        self.buffs.boost_cooldown_multiplier(&self.config)
    }

    /// Advance the simulation one tick.
    pub fn tick(&mut self, delta_ms: u32, world: &WorldFrame, inputs: &InputFrame) -> TickOutput {
        self.clock_ms += u64::from(delta_ms);
        let now = self.clock_ms;

        self.buffs.tick(delta_ms);
        self.weapons.tick(now, &self.config);

        match world.player {
            Some(player) => self.targeting.refresh(&world.enemies, player.position),
            None => self.targeting.clear_locks(),
        }

        if inputs.toggle_lock {
            self.targeting.toggle_auto_lock(now);
        }
        if inputs.cycle_next {
            self.targeting.cycle_next(now);
        }
        if inputs.cycle_prev {
            self.targeting.cycle_prev(now);
        }

        if inputs.switch_weapon {
            let locked = self.buffs.locks_weapon_switch(&self.config);
            self.weapons.switch_family(now, locked);
        }

        let mut events = Vec::new();
        self.handle_fire(inputs.fire, world.player, &mut events);
        self.flush_scheduled_spawns();

        let resolved_player = world.player.map(|player| PlayerFrame {
            position: player.position,
            aim: self
                .targeting
                .current_target()
                .map_or(player.aim, |t| t.enemy.position),
        });
        let ctx = EffectCtx {
            now_ms: now,
            dt: Fixed::from_num(delta_ms) / Fixed::from_num(1000),
            enemies: &world.enemies,
            player: resolved_player,
        };
        let effect_events = self.effects.advance(&ctx);
        resolve_effect_events(effect_events, &mut events);

        TickOutput {
            events,
            snapshot: self.effects.render_snapshot(),
        }
    }

    /// Apply incoming player damage through the mitigation pipeline.
    ///
    /// Returns the final amount the host should subtract from player
    /// health, plus an [`CombatEvent::ArmorBurst`] when mitigation fired.
    #[must_use]
    pub fn apply_player_damage(
        &self,
        amount: Fixed,
        position: Vec3Fixed,
    ) -> (Fixed, Option<CombatEvent>) {
        let mut events = Vec::new();
        let mitigated = apply_player_damage(amount, position, &self.buffs, &self.config, &mut events);
        (mitigated, events.pop())
    }

    /// Mark a gun variant as unlocked for powerup pickups.
    pub fn unlock_gun(&mut self, kind: GunKind) {
        self.unlocked_guns.insert(kind);
    }

    /// Pick up a gun powerup. Silent no-op when the gun is still locked.
    pub fn pickup_gun_powerup(&mut self, kind: GunKind) -> bool {
        self.weapons
            .pickup_gun(kind, self.clock_ms, &self.config, &self.unlocked_guns)
    }

    /// Pick up a missile powerup, replacing the loadout and magazine.
    pub fn pickup_missile_powerup(&mut self, kind: MissileKind) {
        self.weapons.pickup_missile(kind, self.clock_ms, &self.config);
    }

    /// Pick up a passive powerup, starting (or restarting) its countdown.
    pub fn pickup_passive(&mut self, kind: PassiveKind) {
        self.buffs.activate(kind, &self.config);
        if self.config.passive(kind).forces_gun_family {
            self.weapons.force_family(WeaponFamily::Gun);
        }
    }

    /// Resolve a pickup by display name across all three tables.
    ///
    /// Unknown names are logged and ignored; the caller gets `false`
    /// rather than an error because pickup identifiers flow in from
    /// level data, not host code.
    pub fn pickup_by_name(&mut self, name: &str) -> bool {
        if let Some(kind) = GunKind::from_name(name) {
            return self.pickup_gun_powerup(kind);
        }
        if let Some(kind) = MissileKind::from_name(name) {
            self.pickup_missile_powerup(kind);
            return true;
        }
        if let Some(kind) = PassiveKind::from_name(name) {
            self.pickup_passive(kind);
            return true;
        }
        tracing::debug!(name, "unknown pickup ignored");
        false
    }

    fn handle_fire(
        &mut self,
        fire_held: bool,
        player: Option<PlayerFrame>,
        events: &mut Vec<CombatEvent>,
    ) {
        let continuous_gun = self.weapons.family() == WeaponFamily::Gun
            && self.config.gun(self.weapons.gun_kind()).is_continuous();

        // The beam lives exactly as long as fire is held on a continuous gun
        if !fire_held || player.is_none() || !continuous_gun {
            self.effects.stop_beam();
        }
        if !fire_held {
            return;
        }
        let Some(player) = player else {
            return;
        };

        match self.weapons.family() {
            WeaponFamily::Gun => self.fire_gun(player, events),
            WeaponFamily::Missile => self.fire_missile(player, events),
        }
    }

    fn fire_gun(&mut self, player: PlayerFrame, events: &mut Vec<CombatEvent>) {
        let spec = *self.config.gun(self.weapons.gun_kind());
        let now = self.clock_ms;

        // The beam takes precedence over MULTI-LOCK: volley shots inherit
        // the gun's projectile speed, which a continuous gun lacks.
        if spec.is_continuous() {
            let Some(beam) = spec.beam else {
                return;
            };
            if !self.effects.beam_active() {
                let aim = self
                    .targeting
                    .current_target()
                    .map_or(player.aim, |t| t.enemy.position);
                self.effects.spawn(
                    now,
                    EffectKind::Beam {
                        spec: beam,
                        damage: spec.damage,
                        origin: player.position,
                        aim,
                        last_hit_ms: std::collections::BTreeMap::new(),
                    },
                );
                events.push(CombatEvent::WeaponFired {
                    family: WeaponFamily::Gun,
                    weapon: spec.kind.name().to_string(),
                });
            }
            return;
        }

        if !self.weapons.fire_permitted(now, spec.fire_interval_ms) {
            return;
        }

        // MULTI-LOCK replaces the single shot with one homing shot per
        // locked target, staggered across upcoming ticks.
        if self.buffs.is_active(PassiveKind::MultiLock) && !self.targeting.lock_all().is_empty() {
            let stagger = u64::from(self.config.multi_lock_stagger_ms);
            let speed = multi_lock_speed(spec.shot_speed);
            let shots: Vec<EffectKind> = self
                .targeting
                .lock_all()
                .iter()
                .map(|target| EffectKind::MultiLockShot {
                    position: player.position,
                    target: target.enemy.id,
                    speed,
                    damage: spec.damage,
                    lifetime_ms: spec.lifetime_ms,
                })
                .collect();
            for (i, kind) in shots.into_iter().enumerate() {
                self.schedule_spawn(now + i as u64 * stagger, kind);
            }
            self.weapons.note_fired(now);
            events.push(CombatEvent::WeaponFired {
                family: WeaponFamily::Gun,
                weapon: spec.kind.name().to_string(),
            });
            return;
        }

        let aim = self
            .targeting
            .current_target()
            .map_or(player.aim, |t| t.enemy.position);
        let direction = (aim - player.position).normalize();
        if direction == Vec3Fixed::ZERO {
            return;
        }

        self.effects.spawn(
            now,
            EffectKind::GunShot {
                position: player.position,
                direction,
                speed: spec.shot_speed,
                damage: spec.damage,
                lifetime_ms: spec.lifetime_ms,
                explosion_radius: spec.explosion_radius,
                gravity: spec.gravity,
            },
        );
        self.weapons.note_fired(now);
        events.push(CombatEvent::WeaponFired {
            family: WeaponFamily::Gun,
            weapon: spec.kind.name().to_string(),
        });
    }

    fn fire_missile(&mut self, player: PlayerFrame, events: &mut Vec<CombatEvent>) {
        let spec = *self.config.missile(self.weapons.missile_kind());
        let now = self.clock_ms;

        if !self.weapons.fire_permitted(now, spec.fire_interval_ms) {
            return;
        }

        match spec.payload {
            MissilePayload::Homing => {
                let Some(target) = self.targeting.current_target() else {
                    return;
                };
                let target_id = target.enemy.id;
                let target_position = target.enemy.position;
                if !self.weapons.try_consume_ammo(now, &spec) {
                    return;
                }
                let kind = homing_missile(&spec, player.position, target_position, target_id);
                self.effects.spawn(now, kind);
            }
            MissilePayload::Volley { count, stagger_ms } => {
                let targets: Vec<_> = self
                    .targeting
                    .lock_multiple(count as usize)
                    .iter()
                    .map(|t| (t.enemy.id, t.enemy.position))
                    .collect();
                if targets.is_empty() {
                    return;
                }
                if !self.weapons.try_consume_ammo(now, &spec) {
                    return;
                }
                for (i, (id, position)) in targets.into_iter().enumerate() {
                    let kind = homing_missile(&spec, player.position, position, id);
                    self.schedule_spawn(now + i as u64 * u64::from(stagger_ms), kind);
                }
            }
            MissilePayload::ScreenClear {
                effect_duration_ms,
                boss_immune,
            } => {
                // No target required: the detonation sweeps everything
                if !self.weapons.try_consume_ammo(now, &spec) {
                    return;
                }
                self.effects.spawn(
                    now,
                    EffectKind::ScreenClear {
                        damage: spec.damage,
                        effect_duration_ms,
                        boss_immune,
                        progress: Fixed::ZERO,
                        detonated: false,
                    },
                );
            }
            MissilePayload::OrbitalStrike { down_force } => {
                let Some(target) = self.targeting.current_target() else {
                    return;
                };
                let target_id = target.enemy.id;
                let target_position = target.enemy.position;
                if !self.weapons.try_consume_ammo(now, &spec) {
                    return;
                }
                self.effects.spawn(
                    now,
                    EffectKind::OrbitalStrike {
                        target: target_id,
                        position: target_position,
                        damage: spec.damage,
                        down_force,
                        phase: StrikePhase::Impact,
                        phase_started_ms: now,
                    },
                );
            }
        }

        self.weapons.note_fired(now);
        events.push(CombatEvent::WeaponFired {
            family: WeaponFamily::Missile,
            weapon: spec.kind.name().to_string(),
        });
    }

    fn schedule_spawn(&mut self, at_ms: u64, kind: EffectKind) {
        if at_ms <= self.clock_ms {
            self.effects.spawn(self.clock_ms, kind);
        } else {
            self.pending_spawns.push(ScheduledSpawn { at_ms, kind });
        }
    }

    fn flush_scheduled_spawns(&mut self) {
        let now = self.clock_ms;
        let mut due: Vec<ScheduledSpawn> = Vec::new();
        self.pending_spawns.retain_mut(|spawn| {
            if spawn.at_ms <= now {
                due.push(spawn.clone());
                false
            } else {
                true
            }
        });
        // Preserve schedule order when several spawns fall due at once
        due.sort_by_key(|spawn| spawn.at_ms);
        for spawn in due {
            self.effects.spawn(now, spawn.kind);
        }
    }
}

/// Build a homing missile effect with its initial velocity toward the
/// target's current position.
fn homing_missile(
    spec: &MissileSpec,
    origin: Vec3Fixed,
    target_position: Vec3Fixed,
    target: crate::world::EnemyId,
) -> EffectKind {
    let direction = (target_position - origin).normalize();
    EffectKind::Missile {
        position: origin,
        velocity: direction.scale(spec.speed),
        target,
        speed: spec.speed,
        turn_rate: spec.turn_rate,
        damage: spec.damage,
        lifetime_ms: spec.lifetime_ms,
        lead_factor: spec.lead_factor,
        boss_only: spec.boss_only,
    }
}

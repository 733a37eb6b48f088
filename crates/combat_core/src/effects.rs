//! Live effect instances and their per-tick update/hit-test logic.
//!
//! Every spawned projectile, beam, well, strike, or detonation is one
//! [`Effect`] owned exclusively by the [`EffectSimulator`] until expiry.
//! All variants share one tick contract: advance by the frame delta and
//! report expiry plus any hit/pull/kill events, which the damage pipeline
//! then converts into the external event surface.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::data::{BeamSpec, GravitySpec};
use crate::events::{DamageReason, KillReason};
use crate::math::{fixed_serde, fixed_sqrt, Fixed, Vec3Fixed};
use crate::world::{EnemyId, EnemySnapshot, PlayerFrame};

/// Contact radius for point projectiles without an explosion radius.
const POINT_HIT_RADIUS: f64 = 1.5;

/// Hit distance for multi-lock shots.
const MULTI_LOCK_HIT_RADIUS: f64 = 2.0;

/// Default hit radius used by missiles when the target declares none.
const MISSILE_HIT_RADIUS: f64 = 2.0;

/// Speed multiplier applied to multi-lock shots over the base gun speed.
const MULTI_LOCK_SPEED_FACTOR: f64 = 1.2;

/// Per-enemy cooldown between beam damage applications.
const BEAM_HIT_COOLDOWN_MS: u64 = 100;

/// Duration of the orbital strike push phase.
const STRIKE_PUSH_DURATION_MS: u64 = 800;

/// Gravity well phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WellPhase {
    /// Dragging nearby enemies toward the anchor.
    Pull,
    /// Terminal sweep; reached exactly once, then the well is destroyed.
    Collapse,
}

/// Orbital strike phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrikePhase {
    /// One-shot impact hit.
    Impact,
    /// Visual push, 800 ms.
    Pushing,
    /// Expired.
    Explode,
}

/// Raw event emitted by an effect during `advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectEvent {
    /// An enemy was struck.
    Hit {
        /// Struck enemy.
        enemy: EnemyId,
        /// Damage amount.
        amount: Fixed,
        /// Source tag.
        reason: DamageReason,
        /// Downward force for push-down impacts (orbital strikes).
        push_down: Option<Fixed>,
    },
    /// An enemy must die outright.
    Kill {
        /// Killed enemy.
        enemy: EnemyId,
        /// Source tag.
        reason: KillReason,
    },
    /// An enemy is pulled toward a gravity anchor.
    Pull {
        /// Pulled enemy.
        enemy: EnemyId,
        /// Unit direction of the pull.
        direction: Vec3Fixed,
        /// Pull strength, already delta-scaled.
        strength: Fixed,
    },
}

/// Read-only context for one simulator step.
#[derive(Debug, Clone, Copy)]
pub struct EffectCtx<'a> {
    /// Simulation clock after this tick's advance.
    pub now_ms: u64,
    /// Frame delta in seconds (fixed-point).
    pub dt: Fixed,
    /// This tick's enemy snapshots.
    pub enemies: &'a [EnemySnapshot],
    /// Player state with `aim` already resolved to the locked target's
    /// position when one exists.
    pub player: Option<PlayerFrame>,
}

impl EffectCtx<'_> {
    fn enemy(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.enemies.iter().find(|e| e.id == id)
    }
}

/// Tagged state for one live effect instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectKind {
    /// Straight-line gun projectile.
    GunShot {
        /// Current position.
        position: Vec3Fixed,
        /// Unit travel direction, fixed at spawn.
        direction: Vec3Fixed,
        /// Speed in units per second.
        speed: Fixed,
        /// Damage on hit.
        damage: Fixed,
        /// Lifetime budget.
        lifetime_ms: u32,
        /// Hit radius override for proximity shells.
        explosion_radius: Option<Fixed>,
        /// When set, the first hit attaches a gravity well instead of
        /// dealing damage.
        gravity: Option<GravitySpec>,
    },
    /// Homing shot bound to one locked target.
    MultiLockShot {
        /// Current position.
        position: Vec3Fixed,
        /// Fixed target chosen at spawn.
        target: EnemyId,
        /// Speed in units per second (1.2x the base gun speed).
        speed: Fixed,
        /// Damage on hit.
        damage: Fixed,
        /// Lifetime budget.
        lifetime_ms: u32,
    },
    /// Singleton continuous beam.
    Beam {
        /// Beam geometry.
        spec: BeamSpec,
        /// Damage per application (rate = damage x 10 per second).
        damage: Fixed,
        /// Axis origin, re-derived each tick.
        origin: Vec3Fixed,
        /// Axis aim point, re-derived each tick.
        aim: Vec3Fixed,
        /// Per-enemy last application time.
        last_hit_ms: BTreeMap<EnemyId, u64>,
    },
    /// Gravity well anchored to one enemy.
    GravityWell {
        /// Anchor enemy.
        anchor: EnemyId,
        /// Last known anchor position, kept if the anchor disappears.
        anchor_position: Vec3Fixed,
        /// Well parameters.
        spec: GravitySpec,
        /// Base damage of the spawning gun.
        damage: Fixed,
        /// Current phase.
        phase: WellPhase,
        /// Every enemy pulled at least once during the Pull phase.
        affected: BTreeSet<EnemyId>,
    },
    /// Homing missile.
    Missile {
        /// Current position.
        position: Vec3Fixed,
        /// Current velocity (magnitude held at `speed`).
        velocity: Vec3Fixed,
        /// Homing target.
        target: EnemyId,
        /// Speed in units per second.
        speed: Fixed,
        /// Direction lerp rate per second.
        turn_rate: Fixed,
        /// Damage on hit.
        damage: Fixed,
        /// Lifetime budget.
        lifetime_ms: u32,
        /// Predictive lead factor.
        lead_factor: Fixed,
        /// Boss-only missiles pass through non-boss targets.
        boss_only: bool,
    },
    /// Orbital strike phase machine.
    OrbitalStrike {
        /// Strike target.
        target: EnemyId,
        /// Target's last known position, for rendering.
        position: Vec3Fixed,
        /// Impact damage.
        damage: Fixed,
        /// Downward force carried on the impact hit.
        down_force: Fixed,
        /// Current phase.
        phase: StrikePhase,
        /// When the current phase began.
        phase_started_ms: u64,
    },
    /// Screen-clearing detonation sweep.
    ScreenClear {
        /// Damage dealt to each enemy at detonation.
        damage: Fixed,
        /// Sweep duration.
        effect_duration_ms: u32,
        /// Bosses are spared when set.
        boss_immune: bool,
        /// Sweep progress in [0, 1].
        progress: Fixed,
        /// One-shot detonation flag.
        detonated: bool,
    },
}

/// One live effect instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    /// Unique instance id.
    pub id: u64,
    /// Simulation time this effect spawned.
    pub spawned_ms: u64,
    /// Variant state.
    pub kind: EffectKind,
}

/// Positional descriptor of one live effect, for the rendering layer.
///
/// Pure data: variant tag plus whatever position/phase the renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectVisual {
    /// Gun projectile at a position.
    GunShot {
        /// Current position.
        position: Vec3Fixed,
    },
    /// Multi-lock shot chasing a target.
    MultiLockShot {
        /// Current position.
        position: Vec3Fixed,
        /// Chased enemy.
        target: EnemyId,
    },
    /// Active beam from origin toward aim.
    Beam {
        /// Axis origin.
        origin: Vec3Fixed,
        /// Axis aim point.
        aim: Vec3Fixed,
    },
    /// Gravity well around an anchor.
    GravityWell {
        /// Anchor enemy.
        anchor: EnemyId,
        /// Anchor position.
        position: Vec3Fixed,
        /// Current phase.
        phase: WellPhase,
    },
    /// Missile at a position.
    Missile {
        /// Current position.
        position: Vec3Fixed,
        /// Chased enemy.
        target: EnemyId,
    },
    /// Orbital strike on a target.
    OrbitalStrike {
        /// Strike target.
        target: EnemyId,
        /// Strike position.
        position: Vec3Fixed,
        /// Current phase.
        phase: StrikePhase,
    },
    /// Screen-clear sweep.
    ScreenClear {
        /// Sweep progress in [0, 1].
        #[serde(with = "fixed_serde")]
        progress: Fixed,
    },
}

/// Snapshot of all live effects after a tick, for the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// One descriptor per live effect, in spawn order.
    pub effects: Vec<(u64, EffectVisual)>,
}

/// Owns and advances every live effect instance.
#[derive(Debug, Clone, Default)]
pub struct EffectSimulator {
    effects: Vec<Effect>,
    next_id: u64,
}

impl EffectSimulator {
    /// Create an empty simulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All live effects, in spawn order.
    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Whether a beam instance is currently active.
    #[must_use]
    pub fn beam_active(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e.kind, EffectKind::Beam { .. }))
    }

    /// Spawn an effect, assigning it the next instance id.
    ///
    /// Beam spawns are ignored while a beam is already active (singleton
    /// invariant); every other variant always spawns.
    pub fn spawn(&mut self, now_ms: u64, kind: EffectKind) -> Option<u64> {
        if matches!(kind, EffectKind::Beam { .. }) && self.beam_active() {
            return None;
        }
        self.next_id += 1;
        let id = self.next_id;
        tracing::trace!(id, ?kind, "effect spawned");
        self.effects.push(Effect {
            id,
            spawned_ms: now_ms,
            kind,
        });
        Some(id)
    }

    /// Remove the active beam, if any. Called when fire is released.
    pub fn stop_beam(&mut self) {
        self.effects
            .retain(|e| !matches!(e.kind, EffectKind::Beam { .. }));
    }

    /// Advance every live effect one tick, removing expired instances.
    ///
    /// Gravity-attach requests from gun shots are resolved within the same
    /// step: the well spawns before the function returns.
    pub fn advance(&mut self, ctx: &EffectCtx<'_>) -> Vec<EffectEvent> {
        let mut events = Vec::new();
        let mut hit_this_tick: BTreeSet<EnemyId> = BTreeSet::new();
        let mut pending_wells: Vec<(EnemyId, GravitySpec, Fixed)> = Vec::new();

        self.effects.retain_mut(|effect| {
            let expired = advance_effect(
                effect,
                ctx,
                &mut events,
                &mut hit_this_tick,
                &mut pending_wells,
            );
            if expired {
                tracing::trace!(id = effect.id, "effect expired");
            }
            !expired
        });

        for (anchor, spec, damage) in pending_wells {
            let anchor_position = ctx
                .enemy(anchor)
                .map(|e| e.position)
                .unwrap_or(Vec3Fixed::ZERO);
            self.spawn(
                ctx.now_ms,
                EffectKind::GravityWell {
                    anchor,
                    anchor_position,
                    spec,
                    damage,
                    phase: WellPhase::Pull,
                    affected: BTreeSet::new(),
                },
            );
        }

        events
    }

    /// Build the render snapshot for this tick's live effects.
    #[must_use]
    pub fn render_snapshot(&self) -> RenderSnapshot {
        let effects = self
            .effects
            .iter()
            .map(|effect| {
                let visual = match &effect.kind {
                    EffectKind::GunShot { position, .. } => {
                        EffectVisual::GunShot { position: *position }
                    }
                    EffectKind::MultiLockShot {
                        position, target, ..
                    } => EffectVisual::MultiLockShot {
                        position: *position,
                        target: *target,
                    },
                    EffectKind::Beam { origin, aim, .. } => EffectVisual::Beam {
                        origin: *origin,
                        aim: *aim,
                    },
                    EffectKind::GravityWell {
                        anchor,
                        anchor_position,
                        phase,
                        ..
                    } => EffectVisual::GravityWell {
                        anchor: *anchor,
                        position: *anchor_position,
                        phase: *phase,
                    },
                    EffectKind::Missile {
                        position, target, ..
                    } => EffectVisual::Missile {
                        position: *position,
                        target: *target,
                    },
                    EffectKind::OrbitalStrike {
                        target,
                        position,
                        phase,
                        ..
                    } => EffectVisual::OrbitalStrike {
                        target: *target,
                        position: *position,
                        phase: *phase,
                    },
                    EffectKind::ScreenClear { progress, .. } => {
                        EffectVisual::ScreenClear { progress: *progress }
                    }
                };
                (effect.id, visual)
            })
            .collect();

        RenderSnapshot { effects }
    }
}

/// Advance one effect. Returns whether it expired.
fn advance_effect(
    effect: &mut Effect,
    ctx: &EffectCtx<'_>,
    events: &mut Vec<EffectEvent>,
    hit_this_tick: &mut BTreeSet<EnemyId>,
    pending_wells: &mut Vec<(EnemyId, GravitySpec, Fixed)>,
) -> bool {
    let age_ms = ctx.now_ms.saturating_sub(effect.spawned_ms);

    match &mut effect.kind {
        EffectKind::GunShot {
            position,
            direction,
            speed,
            damage,
            lifetime_ms,
            explosion_radius,
            gravity,
        } => {
            *position = *position + direction.scale(*speed * ctx.dt);

            let radius = explosion_radius.unwrap_or_else(|| Fixed::from_num(POINT_HIT_RADIUS));
            for enemy in ctx.enemies {
                if !enemy.is_targetable() || hit_this_tick.contains(&enemy.id) {
                    continue;
                }
                if position.distance(enemy.position) < radius {
                    hit_this_tick.insert(enemy.id);
                    if let Some(spec) = gravity {
                        pending_wells.push((enemy.id, *spec, *damage));
                    } else {
                        let reason = if explosion_radius.is_some() {
                            DamageReason::Explosive
                        } else {
                            DamageReason::Gun
                        };
                        events.push(EffectEvent::Hit {
                            enemy: enemy.id,
                            amount: *damage,
                            reason,
                            push_down: None,
                        });
                    }
                    return true;
                }
            }

            age_ms > u64::from(*lifetime_ms)
        }

        EffectKind::MultiLockShot {
            position,
            target,
            speed,
            damage,
            lifetime_ms,
        } => {
            let Some(enemy) = ctx.enemy(*target) else {
                return true;
            };

            let direction = (enemy.position - *position).normalize();
            *position = *position + direction.scale(*speed * ctx.dt);

            if position.distance(enemy.position) < Fixed::from_num(MULTI_LOCK_HIT_RADIUS) {
                events.push(EffectEvent::Hit {
                    enemy: *target,
                    amount: *damage,
                    reason: DamageReason::MultiLock,
                    push_down: None,
                });
                return true;
            }

            age_ms > u64::from(*lifetime_ms)
        }

        EffectKind::Beam {
            spec,
            damage,
            origin,
            aim,
            last_hit_ms,
        } => {
            let Some(player) = ctx.player else {
                return false;
            };
            *origin = player.position;
            *aim = player.aim;

            let axis = (*aim - *origin).normalize();
            if axis == Vec3Fixed::ZERO {
                return false;
            }

            for enemy in ctx.enemies {
                if !enemy.is_targetable() {
                    continue;
                }
                let to_enemy = enemy.position - *origin;
                let along = to_enemy.dot(axis);
                if along < Fixed::ZERO || along > spec.range {
                    continue;
                }
                let perp_sq = (to_enemy.dot(to_enemy) - along * along).max(Fixed::ZERO);
                if fixed_sqrt(perp_sq) >= spec.width + enemy.hit_radius() {
                    continue;
                }
                let ready = match last_hit_ms.get(&enemy.id) {
                    Some(last) => ctx.now_ms.saturating_sub(*last) >= BEAM_HIT_COOLDOWN_MS,
                    None => true,
                };
                if ready {
                    last_hit_ms.insert(enemy.id, ctx.now_ms);
                    events.push(EffectEvent::Hit {
                        enemy: enemy.id,
                        amount: *damage,
                        reason: DamageReason::Beam,
                        push_down: None,
                    });
                }
            }

            // The beam only expires when fire is released
            false
        }

        EffectKind::GravityWell {
            anchor,
            anchor_position,
            spec,
            damage: _,
            phase,
            affected,
        } => {
            if let Some(enemy) = ctx.enemy(*anchor) {
                *anchor_position = enemy.position;
            }

            if age_ms >= u64::from(spec.collapse_delay_ms) {
                *phase = WellPhase::Collapse;
                events.push(EffectEvent::Kill {
                    enemy: *anchor,
                    reason: KillReason::GravityCollapse,
                });
                for id in affected.iter() {
                    if *id != *anchor {
                        events.push(EffectEvent::Kill {
                            enemy: *id,
                            reason: KillReason::GravityCollapse,
                        });
                    }
                }
                return true;
            }

            for enemy in ctx.enemies {
                if enemy.id == *anchor || !enemy.is_targetable() {
                    continue;
                }
                let dist = enemy.position.distance(*anchor_position);
                if dist < spec.radius {
                    let strength = (Fixed::ONE - dist / spec.radius) * spec.strength * ctx.dt;
                    let direction = (*anchor_position - enemy.position).normalize();
                    affected.insert(enemy.id);
                    events.push(EffectEvent::Pull {
                        enemy: enemy.id,
                        direction,
                        strength,
                    });
                }
            }

            false
        }

        EffectKind::Missile {
            position,
            velocity,
            target,
            speed,
            turn_rate,
            damage,
            lifetime_ms,
            lead_factor,
            boss_only,
        } => {
            if let Some(enemy) = ctx.enemy(*target) {
                // Predictive lead toward where the target is heading
                let aim_point = match enemy.velocity {
                    Some(vel) if *speed > Fixed::ZERO => {
                        let travel_time = position.distance(enemy.position) / *speed;
                        enemy.position + vel.scale(travel_time * *lead_factor)
                    }
                    _ => enemy.position,
                };

                let desired = (aim_point - *position).normalize();
                let current = velocity.normalize();
                let blend = (*turn_rate * ctx.dt).min(Fixed::ONE);
                let direction = current.lerp(desired, blend).normalize();
                *velocity = direction.scale(*speed);
            }
            *position = *position + velocity.scale(ctx.dt);

            if let Some(enemy) = ctx.enemy(*target) {
                // Boss-only weapons pass through non-boss targets: an
                // explicit miss, not an error
                if !*boss_only || enemy.is_boss {
                    let radius = enemy
                        .hit_radius
                        .unwrap_or_else(|| Fixed::from_num(MISSILE_HIT_RADIUS));
                    if position.distance(enemy.position) < radius {
                        events.push(EffectEvent::Hit {
                            enemy: *target,
                            amount: *damage,
                            reason: DamageReason::Missile,
                            push_down: None,
                        });
                        return true;
                    }
                }
            }

            age_ms > u64::from(*lifetime_ms)
        }

        EffectKind::OrbitalStrike {
            target,
            position,
            damage,
            down_force,
            phase,
            phase_started_ms,
        } => match phase {
            StrikePhase::Impact => {
                if let Some(enemy) = ctx.enemy(*target) {
                    *position = enemy.position;
                    events.push(EffectEvent::Hit {
                        enemy: *target,
                        amount: *damage,
                        reason: DamageReason::ThorStrike,
                        push_down: Some(*down_force),
                    });
                }
                *phase = StrikePhase::Pushing;
                *phase_started_ms = ctx.now_ms;
                false
            }
            StrikePhase::Pushing => {
                if ctx.now_ms.saturating_sub(*phase_started_ms) >= STRIKE_PUSH_DURATION_MS {
                    *phase = StrikePhase::Explode;
                    true
                } else {
                    false
                }
            }
            StrikePhase::Explode => true,
        },

        EffectKind::ScreenClear {
            damage,
            effect_duration_ms,
            boss_immune,
            progress,
            detonated,
        } => {
            *progress = Fixed::from_num(age_ms) / Fixed::from_num(*effect_duration_ms);

            if !*detonated && *progress > Fixed::from_num(0.5) {
                *detonated = true;
                for enemy in ctx.enemies {
                    if !enemy.is_targetable() {
                        continue;
                    }
                    if *boss_immune && enemy.is_boss {
                        continue;
                    }
                    events.push(EffectEvent::Hit {
                        enemy: enemy.id,
                        amount: *damage,
                        reason: DamageReason::Smartbomb,
                        push_down: None,
                    });
                }
            }

            *progress >= Fixed::ONE
        }
    }
}

/// Speed for a multi-lock shot derived from the base gun speed.
#[must_use]
pub fn multi_lock_speed(base_speed: Fixed) -> Fixed {
    base_speed * Fixed::from_num(MULTI_LOCK_SPEED_FACTOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(n: f64) -> Fixed {
        Fixed::from_num(n)
    }

    fn enemy_at(id: u64, x: f64) -> EnemySnapshot {
        EnemySnapshot::new(id, Vec3Fixed::new(fx(x), Fixed::ZERO, Fixed::ZERO), fx(50.0))
    }

    fn ctx<'a>(now_ms: u64, delta_ms: u32, enemies: &'a [EnemySnapshot]) -> EffectCtx<'a> {
        EffectCtx {
            now_ms,
            dt: fx(f64::from(delta_ms) / 1000.0),
            enemies,
            player: None,
        }
    }

    fn gun_shot(speed: f64, damage: f64) -> EffectKind {
        EffectKind::GunShot {
            position: Vec3Fixed::ZERO,
            direction: Vec3Fixed::new(Fixed::ONE, Fixed::ZERO, Fixed::ZERO),
            speed: fx(speed),
            damage: fx(damage),
            lifetime_ms: 2000,
            explosion_radius: None,
            gravity: None,
        }
    }

    #[test]
    fn test_gun_shot_travels_and_hits() {
        let mut sim = EffectSimulator::new();
        sim.spawn(0, gun_shot(80.0, 10.0));
        let enemies = vec![enemy_at(1, 8.0)];

        // 50 ms steps: 4 units per step, contact at ~8 units
        let mut hits = Vec::new();
        for step in 1..=5u64 {
            hits.extend(sim.advance(&ctx(step * 50, 50, &enemies)));
            if !hits.is_empty() {
                break;
            }
        }

        assert_eq!(
            hits,
            vec![EffectEvent::Hit {
                enemy: 1,
                amount: fx(10.0),
                reason: DamageReason::Gun,
                push_down: None,
            }]
        );
        assert!(sim.effects().is_empty());
    }

    #[test]
    fn test_gun_shot_expires_on_lifetime() {
        let mut sim = EffectSimulator::new();
        sim.spawn(0, gun_shot(80.0, 10.0));

        let events = sim.advance(&ctx(2100, 2100, &[]));
        assert!(events.is_empty());
        assert!(sim.effects().is_empty());
    }

    #[test]
    fn test_gun_shot_skips_enemy_already_hit_this_tick() {
        let mut sim = EffectSimulator::new();
        sim.spawn(0, gun_shot(80.0, 10.0));
        sim.spawn(0, gun_shot(80.0, 10.0));
        let enemies = vec![enemy_at(1, 4.0)];

        let events = sim.advance(&ctx(50, 50, &enemies));
        // Both shots reach the enemy, only the first registers
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_beam_singleton_and_cooldown() {
        let mut sim = EffectSimulator::new();
        let beam = EffectKind::Beam {
            spec: BeamSpec {
                range: fx(60.0),
                width: fx(2.0),
            },
            damage: fx(3.0),
            origin: Vec3Fixed::ZERO,
            aim: Vec3Fixed::ZERO,
            last_hit_ms: BTreeMap::new(),
        };
        assert!(sim.spawn(0, beam.clone()).is_some());
        assert!(sim.spawn(0, beam).is_none());

        let enemies = vec![enemy_at(7, 20.0)];
        let player = PlayerFrame {
            position: Vec3Fixed::ZERO,
            aim: Vec3Fixed::new(fx(50.0), Fixed::ZERO, Fixed::ZERO),
        };
        let step = |now| EffectCtx {
            now_ms: now,
            dt: fx(0.05),
            enemies: &enemies,
            player: Some(player),
        };

        let first = sim.advance(&step(50));
        assert_eq!(first.len(), 1);

        // 50 ms later the per-enemy cooldown still gates
        assert!(sim.advance(&step(100)).is_empty());

        let third = sim.advance(&step(150));
        assert_eq!(third.len(), 1);

        sim.stop_beam();
        assert!(!sim.beam_active());
    }

    #[test]
    fn test_gravity_well_pull_then_collapse() {
        let mut sim = EffectSimulator::new();
        let spec = GravitySpec {
            radius: fx(25.0),
            strength: fx(30.0),
            collapse_delay_ms: 2000,
        };
        sim.spawn(
            0,
            EffectKind::GravityWell {
                anchor: 1,
                anchor_position: Vec3Fixed::ZERO,
                spec,
                damage: fx(5.0),
                phase: WellPhase::Pull,
                affected: BTreeSet::new(),
            },
        );

        let near = enemy_at(2, 10.0);
        let far = enemy_at(3, 100.0);
        let enemies = vec![enemy_at(1, 0.0), near, far];

        let pulls = sim.advance(&ctx(50, 50, &enemies));
        assert!(matches!(
            pulls.as_slice(),
            [EffectEvent::Pull { enemy: 2, .. }]
        ));

        // Collapse kills anchor and every recorded affected enemy
        let kills = sim.advance(&ctx(2000, 50, &enemies));
        let killed: Vec<EnemyId> = kills
            .iter()
            .filter_map(|e| match e {
                EffectEvent::Kill { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .collect();
        assert_eq!(killed, vec![1, 2]);
        assert!(sim.effects().is_empty());
    }

    #[test]
    fn test_gravity_well_reentry_rerecorded() {
        let mut sim = EffectSimulator::new();
        let spec = GravitySpec {
            radius: fx(25.0),
            strength: fx(30.0),
            collapse_delay_ms: 2000,
        };
        sim.spawn(
            0,
            EffectKind::GravityWell {
                anchor: 1,
                anchor_position: Vec3Fixed::ZERO,
                spec,
                damage: fx(5.0),
                phase: WellPhase::Pull,
                affected: BTreeSet::new(),
            },
        );
        let anchor = enemy_at(1, 0.0);

        // In range, then out, then the collapse sweep still includes it
        sim.advance(&ctx(50, 50, &[anchor.clone(), enemy_at(2, 10.0)]));
        sim.advance(&ctx(100, 50, &[anchor.clone(), enemy_at(2, 90.0)]));
        let kills = sim.advance(&ctx(2000, 50, &[anchor, enemy_at(2, 90.0)]));

        let killed: Vec<EnemyId> = kills
            .iter()
            .filter_map(|e| match e {
                EffectEvent::Kill { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .collect();
        assert_eq!(killed, vec![1, 2]);
    }

    #[test]
    fn test_boss_only_missile_passes_through() {
        let mut sim = EffectSimulator::new();
        sim.spawn(
            0,
            EffectKind::Missile {
                position: Vec3Fixed::ZERO,
                velocity: Vec3Fixed::new(fx(40.0), Fixed::ZERO, Fixed::ZERO),
                target: 1,
                speed: fx(40.0),
                turn_rate: fx(2.5),
                damage: fx(250.0),
                lifetime_ms: 6000,
                lead_factor: fx(0.5),
                boss_only: true,
            },
        );
        let enemies = vec![enemy_at(1, 5.0)];

        let mut all_events = Vec::new();
        let mut now = 0u64;
        while !sim.effects().is_empty() {
            now += 50;
            all_events.extend(sim.advance(&ctx(now, 50, &enemies)));
        }

        // Expired via lifetime, never via hit
        assert!(all_events.is_empty());
        assert!(now > 6000);
    }

    #[test]
    fn test_missile_hits_boss() {
        let mut sim = EffectSimulator::new();
        sim.spawn(
            0,
            EffectKind::Missile {
                position: Vec3Fixed::ZERO,
                velocity: Vec3Fixed::new(fx(40.0), Fixed::ZERO, Fixed::ZERO),
                target: 1,
                speed: fx(40.0),
                turn_rate: fx(2.5),
                damage: fx(250.0),
                lifetime_ms: 6000,
                lead_factor: fx(0.5),
                boss_only: true,
            },
        );
        let mut boss = enemy_at(1, 5.0);
        boss.is_boss = true;
        let enemies = vec![boss];

        let mut hit = false;
        let mut now = 0u64;
        while !sim.effects().is_empty() && now < 6000 {
            now += 50;
            if !sim.advance(&ctx(now, 50, &enemies)).is_empty() {
                hit = true;
            }
        }
        assert!(hit);
    }

    #[test]
    fn test_orbital_strike_phases() {
        let mut sim = EffectSimulator::new();
        sim.spawn(
            0,
            EffectKind::OrbitalStrike {
                target: 1,
                position: Vec3Fixed::ZERO,
                damage: fx(120.0),
                down_force: fx(50.0),
                phase: StrikePhase::Impact,
                phase_started_ms: 0,
            },
        );
        let enemies = vec![enemy_at(1, 30.0)];

        let impact = sim.advance(&ctx(50, 50, &enemies));
        assert!(matches!(
            impact.as_slice(),
            [EffectEvent::Hit {
                enemy: 1,
                reason: DamageReason::ThorStrike,
                push_down: Some(_),
                ..
            }]
        ));

        // Push phase is visual only
        assert!(sim.advance(&ctx(400, 350, &enemies)).is_empty());
        assert_eq!(sim.effects().len(), 1);

        sim.advance(&ctx(900, 500, &enemies));
        assert!(sim.effects().is_empty());
    }

    #[test]
    fn test_screen_clear_detonates_once_sparing_bosses() {
        let mut sim = EffectSimulator::new();
        sim.spawn(
            0,
            EffectKind::ScreenClear {
                damage: fx(60.0),
                effect_duration_ms: 1200,
                boss_immune: true,
                progress: Fixed::ZERO,
                detonated: false,
            },
        );
        let mut boss = enemy_at(3, 40.0);
        boss.is_boss = true;
        let enemies = vec![enemy_at(1, 10.0), enemy_at(2, 20.0), boss];

        assert!(sim.advance(&ctx(300, 300, &enemies)).is_empty());

        let hits = sim.advance(&ctx(700, 400, &enemies));
        let ids: Vec<EnemyId> = hits
            .iter()
            .filter_map(|e| match e {
                EffectEvent::Hit { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![1, 2]);

        // One-shot: no second detonation
        assert!(sim.advance(&ctx(1100, 400, &enemies)).is_empty());

        sim.advance(&ctx(1300, 200, &enemies));
        assert!(sim.effects().is_empty());
    }
}

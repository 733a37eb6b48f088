//! Test fixtures and helpers.
//!
//! Pre-built world frames and enemy configurations for consistent
//! testing across crates.

use combat_core::prelude::*;
use fixed::types::I32F32;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// An enemy on the x axis with 100 health.
#[must_use]
pub fn enemy_on_axis(id: EnemyId, x: f64) -> EnemySnapshot {
    EnemySnapshot::new(
        id,
        Vec3Fixed::new(fixed_f(x), Fixed::ZERO, Fixed::ZERO),
        fixed(100),
    )
}

/// A boss on the x axis with 1000 health and a 4-unit hit radius.
#[must_use]
pub fn boss_on_axis(id: EnemyId, x: f64) -> EnemySnapshot {
    let mut boss = EnemySnapshot::new(
        id,
        Vec3Fixed::new(fixed_f(x), Fixed::ZERO, Fixed::ZERO),
        fixed(1000),
    );
    boss.is_boss = true;
    boss.hit_radius = Some(fixed(4));
    boss
}

/// A world frame with the player at the origin aiming down +x.
#[must_use]
pub fn world_on_axis(enemies: Vec<EnemySnapshot>) -> WorldFrame {
    WorldFrame {
        player: Some(PlayerFrame {
            position: Vec3Fixed::ZERO,
            aim: Vec3Fixed::new(fixed(100), Fixed::ZERO, Fixed::ZERO),
        }),
        enemies,
    }
}

/// An input frame with only the fire button held.
#[must_use]
pub fn fire_held() -> InputFrame {
    InputFrame {
        fire: true,
        ..InputFrame::default()
    }
}

/// An input frame asserting the switch-weapon edge.
#[must_use]
pub fn press_switch() -> InputFrame {
    InputFrame {
        switch_weapon: true,
        ..InputFrame::default()
    }
}

/// Run an engine through a scripted input sequence at a fixed tick rate,
/// collecting every event in order.
///
/// Used by determinism tests: two engines fed the same script must
/// produce identical event streams.
pub fn run_script(
    engine: &mut CombatEngine,
    world: &WorldFrame,
    delta_ms: u32,
    script: &[InputFrame],
) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    for inputs in script {
        events.extend(engine.tick(delta_ms, world, inputs).events);
    }
    events
}

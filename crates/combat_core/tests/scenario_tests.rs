//! End-to-end weapon scenarios driven through the public engine surface.
//!
//! Each test builds an engine from the default config table, feeds it
//! scripted inputs and static world frames, and checks the event stream
//! the host would observe.

use combat_core::prelude::*;
use combat_test_utils::{
    boss_on_axis, enemy_on_axis, fire_held, fixed, fixed_f, press_switch, world_on_axis,
};

fn engine() -> CombatEngine {
    CombatEngine::new(CombatConfig::default()).expect("default table must validate")
}

fn damage_events(events: &[CombatEvent]) -> Vec<(EnemyId, Fixed, DamageReason)> {
    events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::EnemyDamage { id, amount, reason } => Some((*id, *amount, *reason)),
            _ => None,
        })
        .collect()
}

fn fired_weapons(events: &[CombatEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::WeaponFired { weapon, .. } => Some(weapon.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_hellfire_magazine_drains_and_reloads() {
    let mut engine = engine();
    let world = world_on_axis(vec![enemy_on_axis(1, 100.0)]);
    engine.tick(50, &world, &press_switch());
    assert_eq!(engine.weapon_family(), WeaponFamily::Missile);

    // Eight rounds at a 500 ms interval empty the magazine by 3.6 s
    let mut all_events = Vec::new();
    for _ in 0..72 {
        all_events.extend(engine.tick(50, &world, &fire_held()).events);
    }
    assert_eq!(engine.ammo().count, 0);
    assert!(matches!(engine.ammo().phase, ReloadPhase::Reloading { .. }));
    assert_eq!(fired_weapons(&all_events).len(), 8);

    // In-flight missiles landed on the target
    assert!(damage_events(&all_events)
        .iter()
        .any(|(id, amount, reason)| {
            *id == 1 && *amount == fixed(40) && *reason == DamageReason::Missile
        }));

    // The 1.5 s reload refills the full magazine
    for _ in 0..30 {
        engine.tick(50, &world, &InputFrame::default());
    }
    assert_eq!(engine.ammo().count, 8);
    assert_eq!(engine.ammo().phase, ReloadPhase::Ready);
}

#[test]
fn test_smartbomb_sweeps_everything_but_bosses_once() {
    let mut engine = engine();
    let world = world_on_axis(vec![
        enemy_on_axis(1, 10.0),
        enemy_on_axis(2, 70.0),
        boss_on_axis(3, 40.0),
    ]);
    engine.tick(50, &world, &press_switch());
    engine.pickup_missile_powerup(MissileKind::Smartbomb);
    assert_eq!(engine.ammo().count, 1);

    let mut all_events = Vec::new();
    for _ in 0..30 {
        all_events.extend(engine.tick(50, &world, &fire_held()).events);
    }

    // One round, one detonation: holding fire cannot trigger a second
    assert_eq!(fired_weapons(&all_events), vec!["SMARTBOMB".to_string()]);
    assert_eq!(engine.ammo().count, 0);

    let hits = damage_events(&all_events);
    let swept: Vec<EnemyId> = hits
        .iter()
        .filter(|(_, _, reason)| *reason == DamageReason::Smartbomb)
        .map(|(id, _, _)| *id)
        .collect();
    assert_eq!(swept, vec![1, 2]);
}

#[test]
fn test_smartbomb_empty_magazine_stays_empty_until_revert() {
    let mut engine = engine();
    let world = world_on_axis(vec![enemy_on_axis(1, 50.0)]);
    engine.tick(50, &world, &press_switch());
    engine.pickup_missile_powerup(MissileKind::Smartbomb);

    engine.tick(50, &world, &fire_held());
    assert_eq!(engine.ammo().count, 0);

    // No reload time defined: zero stays zero while the powerup lasts
    for _ in 0..100 {
        engine.tick(50, &world, &InputFrame::default());
    }
    assert_eq!(engine.missile_kind(), MissileKind::Smartbomb);
    assert_eq!(engine.ammo().count, 0);

    // Powerup expiry reverts to the default loadout with a fresh magazine
    for _ in 0..310 {
        engine.tick(50, &world, &InputFrame::default());
    }
    assert_eq!(engine.missile_kind(), MissileKind::Hellfire);
    assert_eq!(engine.ammo().count, 8);
}

#[test]
fn test_barrage_volley_engages_each_locked_target() {
    let mut engine = engine();
    let world = world_on_axis(vec![enemy_on_axis(1, 30.0), enemy_on_axis(2, 50.0)]);
    engine.tick(50, &world, &press_switch());
    engine.pickup_missile_powerup(MissileKind::Barrage);

    let mut all_events = engine.tick(50, &world, &fire_held()).events;
    for _ in 0..30 {
        all_events.extend(engine.tick(50, &world, &InputFrame::default()).events);
    }

    // One fire command, one round, two missiles (one per locked target)
    assert_eq!(fired_weapons(&all_events), vec!["BARRAGE".to_string()]);
    assert_eq!(engine.ammo().count, 3);

    let struck: Vec<EnemyId> = damage_events(&all_events)
        .iter()
        .filter(|(_, _, reason)| *reason == DamageReason::Missile)
        .map(|(id, _, _)| *id)
        .collect();
    assert!(struck.contains(&1));
    assert!(struck.contains(&2));
}

#[test]
fn test_thor_strike_hits_with_down_force_then_expires() {
    let mut engine = engine();
    let world = world_on_axis(vec![enemy_on_axis(1, 40.0)]);
    engine.tick(50, &world, &press_switch());
    engine.pickup_missile_powerup(MissileKind::Thor);

    let out = engine.tick(50, &world, &fire_held());
    assert!(out.events.contains(&CombatEvent::EnemyDamage {
        id: 1,
        amount: fixed(120),
        reason: DamageReason::ThorStrike,
    }));
    assert!(out.events.contains(&CombatEvent::EnemyPushDown {
        id: 1,
        force: fixed(50),
    }));

    // Push phase holds the visual for 800 ms, then the strike is gone
    let mid = engine.tick(400, &world, &InputFrame::default());
    assert_eq!(mid.snapshot.effects.len(), 1);
    let done = engine.tick(500, &world, &InputFrame::default());
    assert!(done.snapshot.effects.is_empty());
}

#[test]
fn test_gravity_shot_attaches_well_that_pulls_and_collapses() {
    let mut engine = engine();
    engine.unlock_gun(GunKind::Gravity);
    assert!(engine.pickup_gun_powerup(GunKind::Gravity));
    let world = world_on_axis(vec![enemy_on_axis(1, 20.0), enemy_on_axis(2, 28.0)]);

    let mut all_events = engine.tick(50, &world, &fire_held()).events;
    for _ in 0..48 {
        all_events.extend(engine.tick(50, &world, &InputFrame::default()).events);
    }

    // The bystander inside the well radius was dragged toward the anchor
    assert!(all_events
        .iter()
        .any(|e| matches!(e, CombatEvent::EnemyPull { id: 2, .. })));

    // Collapse kills the anchor first, then everything it touched
    let killed: Vec<EnemyId> = all_events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::EnemyKill {
                id,
                reason: KillReason::GravityCollapse,
            } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(killed, vec![1, 2]);
}

#[test]
fn test_cycle_redirects_fire_to_new_target() {
    let mut engine = engine();
    let off_axis = EnemySnapshot::new(
        1,
        Vec3Fixed::new(fixed(30), fixed(10), Fixed::ZERO),
        fixed(100),
    );
    let world = world_on_axis(vec![off_axis, enemy_on_axis(2, 60.0)]);

    let inputs = InputFrame {
        fire: true,
        cycle_next: true,
        ..InputFrame::default()
    };
    let mut all_events = engine.tick(50, &world, &inputs).events;
    assert_eq!(
        engine.targeting().current_target().map(|t| t.enemy.id),
        Some(2)
    );

    for _ in 0..20 {
        all_events.extend(engine.tick(50, &world, &InputFrame::default()).events);
    }

    // The shot flew past the nearer off-axis enemy to the cycled lock
    let hits = damage_events(&all_events);
    assert_eq!(hits.first().map(|(id, _, _)| *id), Some(2));
    assert!(!hits.iter().any(|(id, _, _)| *id == 1));
}

#[test]
fn test_flak_powerup_expires_back_to_rapid() {
    let mut engine = engine();
    assert!(engine.pickup_gun_powerup(GunKind::Flak));
    assert_eq!(engine.gun_kind(), GunKind::Flak);
    let world = world_on_axis(vec![]);

    for _ in 0..299 {
        engine.tick(50, &world, &InputFrame::default());
    }
    assert_eq!(engine.gun_kind(), GunKind::Flak);

    engine.tick(50, &world, &InputFrame::default());
    assert_eq!(engine.gun_kind(), GunKind::Rapid);
}

#[test]
fn test_flak_proximity_hit_reports_explosive() {
    let mut engine = engine();
    assert!(engine.pickup_gun_powerup(GunKind::Flak));
    // Offset just inside the 6-unit burst radius but outside point contact
    let offset = EnemySnapshot::new(
        1,
        Vec3Fixed::new(fixed(30), fixed(4), Fixed::ZERO),
        fixed(100),
    );
    let world = world_on_axis(vec![offset]);

    let mut all_events = Vec::new();
    for _ in 0..20 {
        all_events.extend(engine.tick(50, &world, &fire_held()).events);
        if !damage_events(&all_events).is_empty() {
            break;
        }
    }

    let hits = damage_events(&all_events);
    assert_eq!(hits[0], (1, fixed(16), DamageReason::Explosive));
}

#[test]
fn test_multi_lock_pickup_forces_gun_family() {
    let mut engine = engine();
    let world = world_on_axis(vec![enemy_on_axis(1, 40.0)]);
    engine.tick(50, &world, &press_switch());
    assert_eq!(engine.weapon_family(), WeaponFamily::Missile);

    assert!(engine.pickup_by_name("MULTI-LOCK"));
    assert_eq!(engine.weapon_family(), WeaponFamily::Gun);

    // The switch input is dead while the passive runs
    engine.tick(400, &world, &press_switch());
    assert_eq!(engine.weapon_family(), WeaponFamily::Gun);

    // 8 s later the lock falls away and switching works again
    for _ in 0..160 {
        engine.tick(50, &world, &InputFrame::default());
    }
    engine.tick(50, &world, &press_switch());
    assert_eq!(engine.weapon_family(), WeaponFamily::Missile);
}

#[test]
fn test_overdrive_modifiers_apply_and_expire() {
    let mut engine = engine();
    let world = world_on_axis(vec![]);
    assert!(engine.pickup_by_name("OVERDRIVE"));

    assert_eq!(engine.movement_multiplier(), fixed_f(1.4));
    assert_eq!(engine.roll_multiplier(), fixed_f(1.3));
    assert_eq!(engine.evade_cooldown_multiplier(), fixed_f(0.6));
    assert_eq!(engine.boost_multiplier(), fixed_f(1.5));
    assert_eq!(engine.boost_cooldown_multiplier(), fixed_f(0.5));

    for _ in 0..201 {
        engine.tick(50, &world, &InputFrame::default());
    }
    assert_eq!(engine.movement_multiplier(), Fixed::ONE);
    assert_eq!(engine.boost_multiplier(), Fixed::ONE);
}

#[test]
fn test_buster_ignores_normal_enemy_but_kills_boss() {
    let mut engine = engine();
    engine.tick(50, &world_on_axis(vec![]), &press_switch());
    engine.pickup_missile_powerup(MissileKind::Buster);

    // Against a plain enemy the torpedo passes straight through
    let plain = world_on_axis(vec![enemy_on_axis(1, 30.0)]);
    let mut all_events = engine.tick(50, &plain, &fire_held()).events;
    for _ in 0..140 {
        all_events.extend(engine.tick(50, &plain, &InputFrame::default()).events);
    }
    assert!(damage_events(&all_events).is_empty());
    assert_eq!(engine.ammo().count, 2);

    // Against a boss it connects for full damage
    let boss_world = world_on_axis(vec![boss_on_axis(1, 30.0)]);
    let mut boss_events = Vec::new();
    for _ in 0..60 {
        boss_events.extend(engine.tick(50, &boss_world, &fire_held()).events);
        if !damage_events(&boss_events).is_empty() {
            break;
        }
    }
    let hits = damage_events(&boss_events);
    assert_eq!(hits[0], (1, fixed(250), DamageReason::Missile));
}

//! # Combat Core
//!
//! Deterministic combat-resolution core for Vector Strike.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//! - No wall-clock reads (the host supplies every tick delta)
//!
//! This separation enables:
//! - Identical simulation across platforms
//! - Replay and demo systems
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`engine`] - Tick-stepped orchestrator and command surface
//! - [`targeting`] - Distance-ranked target selection and lock cycling
//! - [`weapons`] - Weapon families, fire gating, ammo, powerups
//! - [`effects`] - Live projectile/beam/well/strike simulation
//! - [`buffs`] - Passive buff timers and modifier queries
//! - [`damage`] - Damage resolution and player-damage mitigation
//! - [`data`] - Immutable weapon/passive configuration tables
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod buffs;
pub mod damage;
pub mod data;
pub mod effects;
pub mod engine;
pub mod error;
pub mod events;
pub mod math;
pub mod targeting;
pub mod weapons;
pub mod world;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::buffs::PassiveBuffs;
    pub use crate::data::{
        CombatConfig, GunKind, GunSpec, MissileKind, MissilePayload, MissileSpec, PassiveKind,
        PassiveSpec,
    };
    pub use crate::effects::{EffectVisual, RenderSnapshot};
    pub use crate::engine::{CombatEngine, TickOutput};
    pub use crate::error::{CombatError, Result};
    pub use crate::events::{CombatEvent, DamageReason, KillReason};
    pub use crate::math::{Fixed, Vec3Fixed};
    pub use crate::targeting::TargetingSystem;
    pub use crate::weapons::{AmmoState, ReloadPhase, WeaponFamily};
    pub use crate::world::{EnemyId, EnemySnapshot, InputFrame, PlayerFrame, WorldFrame};
}

//! Damage resolution pipeline.
//!
//! Converts raw effect events into the external event surface, and applies
//! ACTIVE ARMOR mitigation to player-directed damage. These are pure
//! functions over the buff state; the caller owns all health bookkeeping.

use crate::buffs::PassiveBuffs;
use crate::data::CombatConfig;
use crate::effects::EffectEvent;
use crate::events::CombatEvent;
use crate::math::{Fixed, Vec3Fixed};

/// Convert one tick's effect events into ordered combat events.
pub fn resolve_effect_events(effect_events: Vec<EffectEvent>, out: &mut Vec<CombatEvent>) {
    for event in effect_events {
        match event {
            EffectEvent::Hit {
                enemy,
                amount,
                reason,
                push_down,
            } => {
                out.push(CombatEvent::EnemyDamage {
                    id: enemy,
                    amount,
                    reason,
                });
                if let Some(force) = push_down {
                    out.push(CombatEvent::EnemyPushDown { id: enemy, force });
                }
            }
            EffectEvent::Kill { enemy, reason } => {
                out.push(CombatEvent::EnemyKill { id: enemy, reason });
            }
            EffectEvent::Pull {
                enemy,
                direction,
                strength,
            } => {
                out.push(CombatEvent::EnemyPull {
                    id: enemy,
                    direction,
                    strength,
                });
            }
        }
    }
}

/// Apply ACTIVE ARMOR mitigation to incoming player damage.
///
/// Returns the final mitigated amount. When the buff is active, an
/// [`CombatEvent::ArmorBurst`] is queued at the impact point; when it is
/// inactive the amount passes through unmodified and no event fires.
pub fn apply_player_damage(
    amount: Fixed,
    position: Vec3Fixed,
    buffs: &PassiveBuffs,
    config: &CombatConfig,
    out: &mut Vec<CombatEvent>,
) -> Fixed {
    let reduction = buffs.damage_reduction(config);
    if reduction == Fixed::ZERO {
        return amount;
    }

    let mitigated = amount * (Fixed::ONE - reduction);
    tracing::debug!(%amount, %mitigated, "player damage mitigated");
    out.push(CombatEvent::ArmorBurst { position });
    mitigated
}

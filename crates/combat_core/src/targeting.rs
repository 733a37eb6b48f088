//! Target selection and lock-on cycling.
//!
//! The targeting system ranks live enemies by distance from the player and
//! exposes the current lock, multi-lock sets, and rate-limited cycling.
//! The ranked list is ephemeral: it is recomputed from the world frame
//! every tick and never persisted.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed, Vec3Fixed};
use crate::world::EnemySnapshot;

/// One ranked targeting entry, recomputed every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    /// The ranked enemy.
    pub enemy: EnemySnapshot,
    /// Distance from the player this tick.
    #[serde(with = "fixed_serde")]
    pub distance: Fixed,
}

/// Distance-ranked target selection state.
#[derive(Debug, Clone)]
pub struct TargetingSystem {
    lock_range: Fixed,
    cycle_cooldown_ms: u32,
    toggle_debounce_ms: u32,
    auto_lock: bool,
    targets: Vec<TargetSnapshot>,
    index: usize,
    last_cycle_ms: Option<u64>,
    last_toggle_ms: Option<u64>,
}

impl TargetingSystem {
    /// Create a targeting system with the given tuning values.
    #[must_use]
    pub fn new(
        lock_range: Fixed,
        cycle_cooldown_ms: u32,
        toggle_debounce_ms: u32,
        auto_lock: bool,
    ) -> Self {
        Self {
            lock_range,
            cycle_cooldown_ms,
            toggle_debounce_ms,
            auto_lock,
            targets: Vec::new(),
            index: 0,
            last_cycle_ms: None,
            last_toggle_ms: None,
        }
    }

    /// Rebuild the ranked list from this tick's world frame.
    ///
    /// Keeps only enemies with health > 0 inside lock range, sorted by
    /// ascending distance (ties broken by id for deterministic order).
    /// The cycle index is clamped so a shrinking list never leaves a
    /// stale out-of-range selection.
    pub fn refresh(&mut self, enemies: &[EnemySnapshot], player_position: Vec3Fixed) {
        self.targets.clear();
        for enemy in enemies {
            if !enemy.is_targetable() {
                continue;
            }
            let distance = player_position.distance(enemy.position);
            if distance < self.lock_range {
                self.targets.push(TargetSnapshot {
                    enemy: enemy.clone(),
                    distance,
                });
            }
        }
        self.targets
            .sort_by(|a, b| a.distance.cmp(&b.distance).then(a.enemy.id.cmp(&b.enemy.id)));

        if self.targets.is_empty() {
            self.index = 0;
        } else {
            self.index = self.index.min(self.targets.len() - 1);
        }
    }

    /// The current lock, if auto-lock is enabled and anything is in range.
    #[must_use]
    pub fn current_target(&self) -> Option<&TargetSnapshot> {
        if !self.auto_lock {
            return None;
        }
        self.targets.get(self.index)
    }

    /// Whether auto-lock is currently enabled.
    #[must_use]
    pub const fn auto_lock(&self) -> bool {
        self.auto_lock
    }

    /// Toggle auto-lock, debounced. Returns whether the toggle applied.
    pub fn toggle_auto_lock(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_toggle_ms {
            if now_ms.saturating_sub(last) < u64::from(self.toggle_debounce_ms) {
                return false;
            }
        }
        self.last_toggle_ms = Some(now_ms);
        self.auto_lock = !self.auto_lock;
        tracing::debug!(auto_lock = self.auto_lock, "lock toggled");
        true
    }

    /// Advance the lock to the next ranked target, rate-limited.
    pub fn cycle_next(&mut self, now_ms: u64) -> bool {
        if !self.cycle_permitted(now_ms) || self.targets.is_empty() {
            return false;
        }
        self.last_cycle_ms = Some(now_ms);
        self.index = (self.index + 1) % self.targets.len();
        true
    }

    /// Retreat the lock to the previous ranked target, rate-limited.
    pub fn cycle_prev(&mut self, now_ms: u64) -> bool {
        if !self.cycle_permitted(now_ms) || self.targets.is_empty() {
            return false;
        }
        self.last_cycle_ms = Some(now_ms);
        self.index = (self.index + self.targets.len() - 1) % self.targets.len();
        true
    }

    /// First `max_n` ranked targets, for multi-target missiles.
    #[must_use]
    pub fn lock_multiple(&self, max_n: usize) -> &[TargetSnapshot] {
        &self.targets[..max_n.min(self.targets.len())]
    }

    /// The entire ranked list, for the MULTI-LOCK passive.
    #[must_use]
    pub fn lock_all(&self) -> &[TargetSnapshot] {
        &self.targets
    }

    /// Reset the locked set and cycle index.
    pub fn clear_locks(&mut self) {
        self.targets.clear();
        self.index = 0;
    }

    fn cycle_permitted(&self, now_ms: u64) -> bool {
        match self.last_cycle_ms {
            Some(last) => now_ms.saturating_sub(last) >= u64::from(self.cycle_cooldown_ms),
            None => true,
        }
    }
}

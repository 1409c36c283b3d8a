//! Melee attack resolution and the attack cooldown.
//!
//! Finding the target is a spatial query owned by the coordinator; this
//! module only decides what an attempt costs and what it deals.
//!
//! ## Cooldown timing
//!
//! The cooldown is started during action resolution and then decremented
//! once at the end of the same tick, so a cooldown of `n` ticks blocks the
//! next `n - 1` attempts.

use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;

/// Countdown of ticks until the next attack is allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    /// Ticks left. Zero means ready.
    remaining: u32,
}

impl Cooldown {
    /// A ready cooldown.
    pub const fn new() -> Self {
        Self { remaining: 0 }
    }

    /// Ticks left before the next attack.
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether an attack may be attempted now.
    pub const fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    /// Start a cooldown of `ticks`.
    pub const fn trigger(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    /// Advance by one tick, stopping at zero.
    pub const fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Make the attack available immediately.
    pub const fn clear(&mut self) {
        self.remaining = 0;
    }
}

/// What an attack attempt amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackAttempt {
    /// The cooldown had not expired; nothing happened.
    CoolingDown,
    /// No living enemy in range.
    Missed,
    /// The target takes `damage`.
    Hit {
        /// Hit points to remove from the target.
        damage: i32,
    },
}

/// Attack parameters shared by all agents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackProfile {
    /// Reach on the ground plane.
    pub range: f32,
    /// Damage per hit.
    pub damage: i32,
    /// Cooldown length in ticks.
    pub cooldown_ticks: u32,
    /// Whether a miss also starts the cooldown.
    pub cooldown_on_miss: bool,
}

impl AttackProfile {
    /// Build the profile from agent configuration.
    pub const fn from_config(config: &AgentConfig) -> Self {
        Self {
            range: config.attack_range,
            damage: config.damage,
            cooldown_ticks: config.attack_cooldown_ticks,
            cooldown_on_miss: config.cooldown_on_miss,
        }
    }

    /// Resolve one attempt against `cooldown`.
    ///
    /// `has_target` tells whether the coordinator found a living enemy in
    /// range. Starts the cooldown on a hit, and on a miss when
    /// `cooldown_on_miss` is set.
    pub const fn attempt(&self, cooldown: &mut Cooldown, has_target: bool) -> AttackAttempt {
        if !cooldown.is_ready() {
            return AttackAttempt::CoolingDown;
        }
        if has_target {
            cooldown.trigger(self.cooldown_ticks);
            return AttackAttempt::Hit {
                damage: self.damage,
            };
        }
        if self.cooldown_on_miss {
            cooldown.trigger(self.cooldown_ticks);
        }
        AttackAttempt::Missed
    }
}

impl Default for AttackProfile {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}

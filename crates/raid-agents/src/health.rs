//! Hit-point ledger with a one-way alive/dead state.
//!
//! Within an episode a death is final: [`Health::damage`] is the only way
//! in, and [`Health::revive`] (invoked by episode reset) is the only way
//! out. Healing a dead agent is a no-op.
//!
//! All arithmetic saturates. No panics, no silent wraparound.

use serde::{Deserialize, Serialize};

/// Result of a [`Health::damage`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing happened: already dead or a non-positive amount.
    Ignored,
    /// Damage applied, the agent is still alive.
    Wounded {
        /// Hit points left after the hit.
        remaining: i32,
    },
    /// This hit killed the agent. Returned exactly once per death.
    Killed,
}

/// Per-agent hit points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Current hit points, within `0..=max_hp`.
    hp: i32,
    /// Maximum hit points.
    max_hp: i32,
    /// Set when hit points reached zero through damage.
    dead: bool,
}

impl Health {
    /// Create a full-health ledger.
    ///
    /// A non-positive `max_hp` yields an agent that starts with zero hit
    /// points and is therefore never alive.
    pub fn new(max_hp: i32) -> Self {
        Self {
            hp: max_hp.max(0),
            max_hp,
            dead: false,
        }
    }

    /// Current hit points.
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// Maximum hit points.
    pub const fn max_hp(&self) -> i32 {
        self.max_hp
    }

    /// Whether the agent is alive: not dead and above zero hit points.
    pub const fn is_alive(&self) -> bool {
        !self.dead && self.hp > 0
    }

    /// Whether the agent died this episode.
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Health as a fraction of max health, or 0 when `max_hp <= 0`.
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }

    /// Apply `amount` damage.
    ///
    /// No-op when already dead or `amount <= 0`. Hit points clamp at zero;
    /// reaching zero flips the dead flag and reports [`DamageOutcome::Killed`]
    /// for this call only.
    pub fn damage(&mut self, amount: i32) -> DamageOutcome {
        if self.dead || amount <= 0 {
            return DamageOutcome::Ignored;
        }

        self.hp = self.hp.saturating_sub(amount).max(0);

        if self.hp == 0 {
            self.dead = true;
            return DamageOutcome::Killed;
        }
        DamageOutcome::Wounded { remaining: self.hp }
    }

    /// Heal by `amount`, clamped at max. Returns the hit points restored.
    ///
    /// No-op when dead or `amount <= 0`.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.dead || amount <= 0 {
            return 0;
        }
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp.max(0));
        self.hp.saturating_sub(before).max(0)
    }

    /// Restore max hit points and clear the dead flag.
    ///
    /// Only episode reset calls this.
    pub fn revive(&mut self) {
        self.hp = self.max_hp.max(0);
        self.dead = false;
    }
}

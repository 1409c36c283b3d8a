//! The per-agent observation vector.
//!
//! The vector length is a compile-time constant: an observation assembled
//! without access to the environment still has [`OBSERVATION_LEN`] slots,
//! with the environment-derived ones left at zero.

use serde::{Deserialize, Serialize};

/// Number of slots in every observation.
pub const OBSERVATION_LEN: usize = 17;

/// Slot indices, in fixed field order.
pub mod slot {
    /// Health as a fraction of max health.
    pub const HEALTH: usize = 0;
    /// 1 when carrying anything.
    pub const CARRYING: usize = 1;
    /// 1 when carrying iron.
    pub const CARRYING_IRON: usize = 2;
    /// 1 when carrying mana.
    pub const CARRYING_MANA: usize = 3;
    /// Normalized `x` position.
    pub const POS_X: usize = 4;
    /// Normalized `z` position.
    pub const POS_Z: usize = 5;
    /// 1 when inside the own base zone.
    pub const IN_OWN_BASE: usize = 6;
    /// 1 when inside the enemy base zone.
    pub const IN_ENEMY_BASE: usize = 7;
    /// 1 when inside the own camp zone.
    pub const AT_OWN_CAMP: usize = 8;
    /// 1 when inside the enemy camp zone.
    pub const AT_ENEMY_CAMP: usize = 9;
    /// Own camp iron stock, normalized.
    pub const OWN_IRON: usize = 10;
    /// Own camp mana stock, normalized.
    pub const OWN_MANA: usize = 11;
    /// Enemy camp iron stock, normalized.
    pub const ENEMY_IRON: usize = 12;
    /// Enemy camp mana stock, normalized.
    pub const ENEMY_MANA: usize = 13;
    /// Living allies nearby, normalized.
    pub const ALLY_DENSITY: usize = 14;
    /// Living enemies nearby, normalized.
    pub const ENEMY_DENSITY: usize = 15;
    /// Fraction of the episode still remaining.
    pub const TIME_REMAINING: usize = 16;

    /// First slot that needs the environment to be filled.
    pub const FIRST_ENVIRONMENT: usize = POS_X;
}

/// A fixed-length observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation(pub [f32; OBSERVATION_LEN]);

impl Default for Observation {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Observation {
    /// An observation with every slot at zero.
    pub const fn zeroed() -> Self {
        Self([0.0; OBSERVATION_LEN])
    }

    /// Read slot `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied()
    }

    /// Write slot `index`. Out-of-range writes are ignored.
    pub fn set(&mut self, index: usize, value: f32) {
        if let Some(cell) = self.0.get_mut(index) {
            *cell = value;
        }
    }

    /// Write a boolean flag as `0.0` / `1.0`.
    pub fn set_flag(&mut self, index: usize, flag: bool) {
        self.set(index, if flag { 1.0 } else { 0.0 });
    }

    /// Number of slots (always [`OBSERVATION_LEN`]).
    pub const fn len(&self) -> usize {
        OBSERVATION_LEN
    }

    /// Always `false`; present for slice-like ergonomics.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Borrow the raw slots.
    pub const fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_has_fixed_length() {
        let obs = Observation::zeroed();
        assert_eq!(obs.len(), OBSERVATION_LEN);
        assert_eq!(obs.as_slice().len(), 17);
    }

    #[test]
    fn out_of_range_set_is_ignored() {
        let mut obs = Observation::zeroed();
        obs.set(OBSERVATION_LEN, 1.0);
        assert_eq!(obs, Observation::zeroed());
        assert_eq!(obs.get(OBSERVATION_LEN), None);
    }

    #[test]
    fn flags_encode_as_unit_values() {
        let mut obs = Observation::zeroed();
        obs.set_flag(slot::AT_ENEMY_CAMP, true);
        assert_eq!(obs.get(slot::AT_ENEMY_CAMP), Some(1.0));
        obs.set_flag(slot::AT_ENEMY_CAMP, false);
        assert_eq!(obs.get(slot::AT_ENEMY_CAMP), Some(0.0));
    }
}

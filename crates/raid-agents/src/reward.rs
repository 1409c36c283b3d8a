//! Per-agent reward accumulation.
//!
//! Rewards are added by the coordinator (stock shaping, terminal outcome)
//! and drained by whoever trains or logs the policy. The episode total is
//! kept separately so a summary can report it after draining.

/// Pending and episode-cumulative reward for one agent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RewardAccumulator {
    /// Reward added since the last [`RewardAccumulator::take_pending`].
    pending: f32,
    /// Reward added since the last episode reset.
    episode_total: f32,
}

impl RewardAccumulator {
    /// An empty accumulator.
    pub const fn new() -> Self {
        Self {
            pending: 0.0,
            episode_total: 0.0,
        }
    }

    /// Add `amount`. Non-finite amounts are ignored.
    pub fn add(&mut self, amount: f32) {
        if !amount.is_finite() {
            return;
        }
        self.pending += amount;
        self.episode_total += amount;
    }

    /// Reward not yet drained.
    pub const fn pending(&self) -> f32 {
        self.pending
    }

    /// Reward accumulated over the current episode.
    pub const fn episode_total(&self) -> f32 {
        self.episode_total
    }

    /// Drain and return the pending reward.
    pub const fn take_pending(&mut self) -> f32 {
        let pending = self.pending;
        self.pending = 0.0;
        pending
    }

    /// Close the episode: return its total and forget everything.
    pub const fn end_episode(&mut self) -> f32 {
        let total = self.episode_total;
        self.clear();
        total
    }

    /// Forget everything; called on episode reset.
    pub const fn clear(&mut self) {
        self.pending = 0.0;
        self.episode_total = 0.0;
    }
}

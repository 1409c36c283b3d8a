//! Shared run-control state.
//!
//! [`RunControl`] is wrapped in an `Arc` and shared between the run loop
//! and whoever may want to stop it (a Ctrl-C handler, a test). All mutable
//! fields are atomics so the tick loop never takes a lock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::Serialize;

use crate::config::RuntimeConfig;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEndReason {
    /// Reached the configured `max_ticks`.
    MaxTicksReached,
    /// Reached the configured `max_episodes`.
    MaxEpisodesReached,
    /// A stop was requested.
    StopRequested,
}

/// Stop flag, pacing and limits for one run.
#[derive(Debug)]
pub struct RunControl {
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,
    /// Pause between ticks in milliseconds (0 = as fast as possible).
    tick_interval_ms: AtomicU64,
    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,
    /// Maximum number of completed episodes (0 = unlimited).
    max_episodes: u64,
}

impl RunControl {
    /// Create control state with explicit limits.
    pub const fn new(tick_interval_ms: u64, max_ticks: u64, max_episodes: u64) -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            max_ticks,
            max_episodes,
        }
    }

    /// Create control state from the `runtime` configuration section.
    pub const fn from_config(runtime: &RuntimeConfig) -> Self {
        Self::new(runtime.tick_interval_ms, runtime.max_ticks, runtime.max_episodes)
    }

    /// Request a clean stop before the next tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Current pause between ticks.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Change the pause between ticks, returning the previous value.
    pub fn set_tick_interval_ms(&self, ms: u64) -> u64 {
        self.tick_interval_ms.swap(ms, Ordering::AcqRel)
    }

    /// Configured tick limit.
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Configured episode limit.
    pub const fn max_episodes(&self) -> u64 {
        self.max_episodes
    }

    /// Whether `ticks` completed ticks exhaust the limit.
    pub const fn tick_limit_reached(&self, ticks: u64) -> bool {
        self.max_ticks > 0 && ticks >= self.max_ticks
    }

    /// Whether `episodes` completed episodes exhaust the limit.
    pub const fn episode_limit_reached(&self, episodes: u64) -> bool {
        self.max_episodes > 0 && episodes >= self.max_episodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limits_are_unbounded() {
        let control = RunControl::new(0, 0, 0);
        assert!(!control.tick_limit_reached(u64::MAX));
        assert!(!control.episode_limit_reached(u64::MAX));
    }

    #[test]
    fn limits_trigger_at_the_boundary() {
        let control = RunControl::new(0, 5, 2);
        assert!(!control.tick_limit_reached(4));
        assert!(control.tick_limit_reached(5));
        assert!(!control.episode_limit_reached(1));
        assert!(control.episode_limit_reached(2));
    }

    #[test]
    fn stop_and_interval_are_shared() {
        let control = RunControl::from_config(&RuntimeConfig::default());
        assert!(!control.is_stop_requested());
        control.request_stop();
        assert!(control.is_stop_requested());
        assert_eq!(control.set_tick_interval_ms(250), 0);
        assert_eq!(control.tick_interval_ms(), 250);
        assert_eq!(control.max_ticks(), 6000);
    }
}

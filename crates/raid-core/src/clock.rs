//! Episode clock.
//!
//! The clock is the single source of truth for time in the environment.
//! It counts completed steps in the current episode, the episode index and
//! the total number of ticks ever run. All counters use checked arithmetic.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// A counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid clock configuration (e.g. zero steps per episode).
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Step counter for the running episode plus lifetime totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeClock {
    /// Steps completed in the current episode.
    step: u64,
    /// Step count at which the episode times out.
    max_steps: u64,
    /// One-based index of the current episode; zero before the first reset.
    episode: u64,
    /// Ticks completed across every episode.
    total_ticks: u64,
}

impl EpisodeClock {
    /// Create a clock for episodes of at most `max_steps` steps.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `max_steps` is 0.
    pub fn new(max_steps: u64) -> Result<Self, ClockError> {
        if max_steps == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "max_steps must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            step: 0,
            max_steps,
            episode: 0,
            total_ticks: 0,
        })
    }

    /// Start a new episode: zero the step counter and bump the index.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the episode index overflows.
    pub fn begin_episode(&mut self) -> Result<u64, ClockError> {
        self.episode = self
            .episode
            .checked_add(1)
            .ok_or(ClockError::TickOverflow)?;
        self.step = 0;
        Ok(self.episode)
    }

    /// Complete one step. Returns the new step count.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if a counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.step = self.step.checked_add(1).ok_or(ClockError::TickOverflow)?;
        self.total_ticks = self
            .total_ticks
            .checked_add(1)
            .ok_or(ClockError::TickOverflow)?;
        Ok(self.step)
    }

    /// Steps completed in the current episode.
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// Configured episode length.
    pub const fn max_steps(&self) -> u64 {
        self.max_steps
    }

    /// One-based index of the current episode.
    pub const fn episode(&self) -> u64 {
        self.episode
    }

    /// Ticks completed across all episodes.
    pub const fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Fraction of the episode still remaining, in `[0, 1]`.
    #[allow(clippy::cast_precision_loss)]
    pub fn time_remaining(&self) -> f32 {
        let max = (self.max_steps as f32).max(1.0);
        (1.0 - self.step as f32 / max).clamp(0.0, 1.0)
    }
}

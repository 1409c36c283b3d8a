//! The run loop.
//!
//! [`run`] drives [`EnvironmentCoordinator::step`] at a fixed rate until a
//! tick limit, an episode limit or a stop request ends the run. Episodes
//! restart on their own inside the coordinator, so the loop only counts
//! them. A [`TickCallback`] sees every [`TickReport`]; that is where
//! telemetry hooks in.

use std::sync::Arc;

use raid_types::{Team, TeamPair};
use serde::Serialize;
use tracing::{info, warn};

use crate::control::{RunControl, RunEndReason};
use crate::coordinator::{CoordinatorError, EnvironmentCoordinator, TickReport};
use crate::decision::DecisionSource;
use crate::episode::{EpisodeSummary, Outcome};

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying coordinator error.
        #[from]
        source: CoordinatorError,
    },
}

/// Callback invoked after each tick.
pub trait TickCallback: Send {
    /// Called after a tick completes.
    fn on_tick(&mut self, report: &TickReport, env: &EnvironmentCoordinator);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _report: &TickReport, _env: &EnvironmentCoordinator) {}
}

/// Totals for a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Why the run ended.
    pub end_reason: RunEndReason,
    /// Ticks executed.
    pub ticks: u64,
    /// Episodes completed.
    pub episodes: u64,
    /// Episodes won per team.
    pub wins: TeamPair<u64>,
    /// Episodes that ended in a tie.
    pub ties: u64,
    /// Summary of the last completed episode.
    pub last_episode: Option<EpisodeSummary>,
}

impl RunSummary {
    const fn new() -> Self {
        Self {
            end_reason: RunEndReason::StopRequested,
            ticks: 0,
            episodes: 0,
            wins: TeamPair::new(0, 0),
            ties: 0,
            last_episode: None,
        }
    }

    fn record_episode(&mut self, summary: &EpisodeSummary) {
        self.episodes = self.episodes.saturating_add(1);
        match summary.outcome {
            Outcome::Winner(team) => {
                let wins = self.wins.get_mut(team);
                *wins = wins.saturating_add(1);
            }
            Outcome::Tie => self.ties = self.ties.saturating_add(1),
        }
        self.last_episode = Some(summary.clone());
    }

    /// Episodes won by `team`.
    pub const fn wins_for(&self, team: Team) -> u64 {
        *self.wins.get(team)
    }
}

/// Run the environment until a limit or a stop request ends the run.
///
/// The coordinator must already have had its first episode reset.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails.
pub async fn run(
    env: &mut EnvironmentCoordinator,
    policy: &mut dyn DecisionSource,
    control: &Arc<RunControl>,
    callback: &mut dyn TickCallback,
) -> Result<RunSummary, RunnerError> {
    let mut summary = RunSummary::new();

    info!(
        max_ticks = control.max_ticks(),
        max_episodes = control.max_episodes(),
        tick_interval_ms = control.tick_interval_ms(),
        agents = env.agent_count(),
        "run starting"
    );

    loop {
        if control.is_stop_requested() {
            info!(ticks = summary.ticks, "stop requested");
            summary.end_reason = RunEndReason::StopRequested;
            return Ok(summary);
        }

        let report = env.step(policy)?;
        summary.ticks = summary.ticks.saturating_add(1);
        if let Some(episode) = &report.episode_end {
            summary.record_episode(episode);
        }

        callback.on_tick(&report, env);

        if control.tick_limit_reached(summary.ticks) {
            info!(ticks = summary.ticks, "tick limit reached");
            summary.end_reason = RunEndReason::MaxTicksReached;
            return Ok(summary);
        }
        if control.episode_limit_reached(summary.episodes) {
            info!(episodes = summary.episodes, "episode limit reached");
            summary.end_reason = RunEndReason::MaxEpisodesReached;
            return Ok(summary);
        }

        let interval_ms = control.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

/// Log the end of a run.
pub fn log_run_end(summary: &RunSummary) {
    info!(
        reason = ?summary.end_reason,
        ticks = summary.ticks,
        episodes = summary.episodes,
        red_wins = summary.wins.red,
        blue_wins = summary.wins.blue,
        ties = summary.ties,
        "run ended"
    );
    if summary.episodes == 0 {
        warn!("run ended before any episode completed");
    }
}

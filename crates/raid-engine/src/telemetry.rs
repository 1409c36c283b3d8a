//! Tick callback that reports the run through `tracing`.
//!
//! Purely observational: it reads each [`TickReport`] and never feeds
//! anything back into the environment. Stock movements and deaths go out at
//! `debug`, episode results at `info`, and a progress line every
//! `progress_every` ticks.

use raid_core::{EnvironmentCoordinator, TickCallback, TickReport};
use raid_ledger::StockChangeKind;
use raid_types::{Team, TeamPair};
use tracing::{debug, info};

/// Counters gathered across the whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryTotals {
    /// Deaths per team.
    pub deaths: TeamPair<u64>,
    /// Units taken out of each team's camp (world and direct pickups).
    pub pickups: TeamPair<u64>,
    /// Units deposited into each team's camp.
    pub deposits: TeamPair<u64>,
}

/// Logs tick reports and keeps run-wide counters.
#[derive(Debug)]
pub struct TelemetryCallback {
    progress_every: u64,
    totals: TelemetryTotals,
}

impl TelemetryCallback {
    /// Create a callback that logs a progress line every `progress_every`
    /// ticks (0 disables progress lines).
    pub const fn new(progress_every: u64) -> Self {
        Self {
            progress_every,
            totals: TelemetryTotals {
                deaths: TeamPair::new(0, 0),
                pickups: TeamPair::new(0, 0),
                deposits: TeamPair::new(0, 0),
            },
        }
    }

    /// Counters so far.
    pub const fn totals(&self) -> &TelemetryTotals {
        &self.totals
    }
}

const fn bump(counter: &mut u64) {
    *counter = counter.saturating_add(1);
}

impl TickCallback for TelemetryCallback {
    fn on_tick(&mut self, report: &TickReport, env: &EnvironmentCoordinator) {
        for event in &report.stock_events {
            match event.kind {
                StockChangeKind::WorldPickup | StockChangeKind::DirectPickup => {
                    bump(self.totals.pickups.get_mut(event.team));
                }
                StockChangeKind::Deposit => bump(self.totals.deposits.get_mut(event.team)),
                StockChangeKind::Reseed => {}
            }
            debug!(
                tick = report.tick,
                team = %event.team,
                kind = ?event.kind,
                iron = event.iron,
                mana = event.mana,
                "stock changed"
            );
        }

        for death in &report.deaths {
            bump(self.totals.deaths.get_mut(death.team));
            debug!(
                tick = report.tick,
                agent = %death.agent_id,
                team = %death.team,
                carried = ?death.carried,
                "agent died"
            );
        }

        if let Some(summary) = &report.episode_end {
            info!(
                episode = summary.episode,
                steps = summary.steps,
                outcome = ?summary.outcome,
                reason = ?summary.reason,
                red_total = summary.final_stocks.red.total(),
                blue_total = summary.final_stocks.blue.total(),
                red_mean_reward = summary.mean_reward.red,
                blue_mean_reward = summary.mean_reward.blue,
                "episode finished"
            );
        }

        if self.progress_every > 0 && report.tick.checked_rem(self.progress_every) == Some(0) {
            info!(
                tick = report.tick,
                episode = report.episode,
                step = report.step,
                red_total = env.camp(Team::Red).total(),
                blue_total = env.camp(Team::Blue).total(),
                "progress"
            );
        }
    }
}

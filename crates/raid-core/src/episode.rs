//! Episode lifecycle, termination rules and end-of-episode summaries.

use raid_types::{Team, TeamPair};
use serde::Serialize;

/// Where the coordinator is in the episode lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodePhase {
    /// No episode has been reset yet; stepping is refused.
    #[default]
    NotStarted,
    /// Stocks, pickups and agents are being restored.
    Resetting,
    /// Ticks are being processed.
    Running,
    /// A terminal condition fired and rewards are being settled.
    TerminalPending,
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// One team won.
    Winner(Team),
    /// Nobody won.
    Tie,
}

impl Outcome {
    /// The winning team, if any.
    pub const fn winner(self) -> Option<Team> {
        match self {
            Self::Winner(team) => Some(team),
            Self::Tie => None,
        }
    }
}

/// Which rule ended the episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// A team has no living agents.
    Elimination,
    /// A team's camp reached the stock threshold.
    StockThreshold,
    /// The step budget ran out.
    Timeout,
}

/// A fired terminal condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Termination {
    /// Result of the episode.
    pub outcome: Outcome,
    /// Rule that produced it.
    pub reason: TerminationReason,
}

/// Check the terminal conditions in priority order.
///
/// 1. Red has no living agents: Blue wins.
/// 2. Blue has no living agents: Red wins.
/// 3. Red's camp total reaches `threshold`: Red wins.
/// 4. Blue's camp total reaches `threshold`: Blue wins.
/// 5. `step >= max_steps`: tie.
///
/// The first rule that fires decides the outcome, so a simultaneous wipe of
/// both teams goes to Blue and a step that both crosses the threshold and
/// exhausts the budget is a win, not a tie.
pub fn evaluate(
    alive: &TeamPair<bool>,
    totals: &TeamPair<u32>,
    threshold: u32,
    step: u64,
    max_steps: u64,
) -> Option<Termination> {
    for team in Team::ALL {
        if !*alive.get(team) {
            return Some(Termination {
                outcome: Outcome::Winner(team.enemy()),
                reason: TerminationReason::Elimination,
            });
        }
    }
    for team in Team::ALL {
        if *totals.get(team) >= threshold {
            return Some(Termination {
                outcome: Outcome::Winner(team),
                reason: TerminationReason::StockThreshold,
            });
        }
    }
    if step >= max_steps {
        return Some(Termination {
            outcome: Outcome::Tie,
            reason: TerminationReason::Timeout,
        });
    }
    None
}

/// Stock counters of one camp at the end of an episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StockSnapshot {
    /// Iron in the camp.
    pub iron: u32,
    /// Mana in the camp.
    pub mana: u32,
}

impl StockSnapshot {
    /// Iron plus mana.
    pub const fn total(self) -> u32 {
        self.iron.saturating_add(self.mana)
    }
}

/// What is reported when an episode ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    /// Episode number, starting at 1.
    pub episode: u64,
    /// Steps played.
    pub steps: u64,
    /// Result.
    pub outcome: Outcome,
    /// Rule that ended the episode.
    pub reason: TerminationReason,
    /// Camp stocks when the episode ended.
    pub final_stocks: TeamPair<StockSnapshot>,
    /// Mean cumulative reward per agent, per team.
    pub mean_reward: TeamPair<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH_ALIVE: TeamPair<bool> = TeamPair::new(true, true);

    #[test]
    fn nothing_fires_mid_episode() {
        assert_eq!(evaluate(&BOTH_ALIVE, &TeamPair::new(100, 100), 200, 10, 100), None);
    }

    #[test]
    fn wiped_team_loses() {
        let result = evaluate(&TeamPair::new(true, false), &TeamPair::new(0, 0), 200, 1, 100);
        assert_eq!(
            result,
            Some(Termination {
                outcome: Outcome::Winner(Team::Red),
                reason: TerminationReason::Elimination,
            })
        );
    }

    #[test]
    fn double_wipe_goes_to_blue() {
        let result = evaluate(&TeamPair::new(false, false), &TeamPair::new(0, 0), 200, 1, 100);
        assert_eq!(result.map(|t| t.outcome), Some(Outcome::Winner(Team::Blue)));
    }

    #[test]
    fn elimination_beats_threshold() {
        let result = evaluate(&TeamPair::new(true, false), &TeamPair::new(0, 500), 200, 1, 100);
        assert_eq!(result.map(|t| t.outcome), Some(Outcome::Winner(Team::Red)));
    }

    #[test]
    fn red_threshold_checked_before_blue() {
        let result = evaluate(&BOTH_ALIVE, &TeamPair::new(200, 300), 200, 1, 100);
        assert_eq!(
            result,
            Some(Termination {
                outcome: Outcome::Winner(Team::Red),
                reason: TerminationReason::StockThreshold,
            })
        );
    }

    #[test]
    fn threshold_beats_timeout() {
        let result = evaluate(&BOTH_ALIVE, &TeamPair::new(0, 200), 200, 100, 100);
        assert_eq!(result.map(|t| t.outcome), Some(Outcome::Winner(Team::Blue)));
    }

    #[test]
    fn timeout_is_a_tie() {
        let result = evaluate(&BOTH_ALIVE, &TeamPair::new(199, 199), 200, 100, 100);
        assert_eq!(
            result,
            Some(Termination {
                outcome: Outcome::Tie,
                reason: TerminationReason::Timeout,
            })
        );
        assert_eq!(Outcome::Tie.winner(), None);
    }

    #[test]
    fn summary_serializes() {
        let summary = EpisodeSummary {
            episode: 3,
            steps: 42,
            outcome: Outcome::Winner(Team::Blue),
            reason: TerminationReason::StockThreshold,
            final_stocks: TeamPair::new(
                StockSnapshot { iron: 80, mana: 0 },
                StockSnapshot { iron: 20, mana: 180 },
            ),
            mean_reward: TeamPair::new(-1.0, 1.0),
        };
        let json = serde_json::to_value(&summary).ok();
        let json = json.as_ref();
        assert_eq!(
            json.and_then(|v| v.pointer("/outcome/winner")).and_then(|v| v.as_str()),
            Some("blue")
        );
        assert_eq!(
            json.and_then(|v| v.pointer("/final_stocks/blue/mana")).and_then(serde_json::Value::as_u64),
            Some(180)
        );
        assert_eq!(summary.final_stocks.blue.total(), 200);
    }
}

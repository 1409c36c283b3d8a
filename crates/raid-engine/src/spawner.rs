//! Agent spawner for populating both teams at startup.
//!
//! Creates `agents_per_team` agents per team through an [`AgentFactory`]
//! so names stay unique, places each on its team's spawn grid and
//! registers it with the coordinator. Red is spawned first, so the roster
//! order matches registration order.

use raid_agents::AgentFactory;
use raid_core::EnvironmentCoordinator;
use raid_types::{AgentId, Team, TeamPair};
use raid_world::{SpawnGrid, spawn_position};
use tracing::{info, warn};

use crate::error::EngineError;

/// Result of spawning both teams.
#[derive(Debug, Default)]
pub struct SpawnResult {
    /// Registered agent ids per team, in registration order.
    pub ids: TeamPair<Vec<AgentId>>,
    /// Every name handed out, Red first.
    pub names: Vec<String>,
}

impl SpawnResult {
    /// Total number of agents spawned.
    pub fn len(&self) -> usize {
        self.ids.red.len().saturating_add(self.ids.blue.len())
    }

    /// Whether no agent was spawned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Spawn and register `per_team` agents for each team.
///
/// # Errors
///
/// Returns [`EngineError::Spawner`] if a name collides and
/// [`EngineError::Coordinator`] if registration fails.
pub fn spawn_teams(
    env: &mut EnvironmentCoordinator,
    factory: &mut AgentFactory,
    per_team: usize,
) -> Result<SpawnResult, EngineError> {
    if per_team == 0 {
        warn!("agents_per_team is 0, both rosters stay empty");
    }

    let grid = SpawnGrid {
        step: env.config().spatial.spawn_grid_step,
        cols: env.config().spatial.spawn_grid_cols,
    };
    let agent_config = env.config().agents.clone();
    let mut result = SpawnResult::default();

    for team in Team::ALL {
        for index in 0..per_team {
            let position = spawn_position(env.layout(), team, index, per_team, grid, 0.0);
            let name = AgentFactory::default_name(team, index);
            let agent = factory.create(name.clone(), team, position, &agent_config)?;
            let id = env.register_agent(agent)?;
            result.ids.get_mut(team).push(id);
            result.names.push(name);
        }
        info!(team = %team, count = per_team, "team spawned");
    }

    Ok(result)
}

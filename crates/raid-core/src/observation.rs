//! Per-agent observation assembly.
//!
//! Every agent gets an [`Observation`] of exactly
//! [`OBSERVATION_LEN`](raid_types::OBSERVATION_LEN) slots each tick. The
//! agent-local slots (health and cargo) come from the agent itself; the rest
//! come from an [`EnvQuery`]. Without an environment those slots stay at
//! zero and the vector keeps its length.

use raid_agents::Agent;
use raid_types::observation::slot;
use raid_types::{AgentId, Observation, Position, Resource, Team};

/// Stock counters as seen from one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockView {
    /// Iron in the own camp.
    pub own_iron: u32,
    /// Mana in the own camp.
    pub own_mana: u32,
    /// Iron in the enemy camp.
    pub enemy_iron: u32,
    /// Mana in the enemy camp.
    pub enemy_mana: u32,
}

/// The environment queries an observation needs.
pub trait EnvQuery {
    /// Map a position into `[0, 1]` on each ground axis.
    fn normalize_position(&self, p: Position) -> (f32, f32);

    /// Whether `p` is inside `team`'s own base.
    fn in_own_base(&self, team: Team, p: Position) -> bool;

    /// Whether `p` is inside the enemy base.
    fn in_enemy_base(&self, team: Team, p: Position) -> bool;

    /// Whether `p` is inside `team`'s own camp.
    fn at_own_camp(&self, team: Team, p: Position) -> bool;

    /// Whether `p` is inside the enemy camp.
    fn at_enemy_camp(&self, team: Team, p: Position) -> bool;

    /// Stock counters from `team`'s point of view.
    fn stocks(&self, team: Team) -> StockView;

    /// Stock count that maps to 1.0.
    fn stock_normalizer(&self) -> f32;

    /// Normalized `(allies, enemies)` densities around `p`.
    fn local_densities(&self, team: Team, p: Position) -> (f32, f32);

    /// Fraction of the episode still remaining.
    fn time_remaining(&self) -> f32;
}

/// What a decision source sees for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    /// The observed agent.
    pub agent_id: AgentId,
    /// Its team.
    pub team: Team,
    /// Whether it can act this tick.
    pub alive: bool,
    /// Its world position.
    pub position: Position,
    /// The encoded observation vector.
    pub observation: Observation,
}

/// Build the observation for `agent`.
///
/// `env` is optional: without it only the agent-local slots are filled.
#[allow(clippy::cast_precision_loss)]
pub fn assemble(agent: &Agent, env: Option<&dyn EnvQuery>) -> Observation {
    let mut obs = Observation::zeroed();

    obs.set(slot::HEALTH, agent.health.fraction());
    obs.set_flag(slot::CARRYING, agent.carry.has_item());
    obs.set_flag(slot::CARRYING_IRON, agent.carry.is_carrying(Resource::Iron));
    obs.set_flag(slot::CARRYING_MANA, agent.carry.is_carrying(Resource::Mana));

    let Some(env) = env else {
        return obs;
    };

    let team = agent.team;
    let p = agent.position;

    let (nx, nz) = env.normalize_position(p);
    obs.set(slot::POS_X, nx);
    obs.set(slot::POS_Z, nz);

    obs.set_flag(slot::IN_OWN_BASE, env.in_own_base(team, p));
    obs.set_flag(slot::IN_ENEMY_BASE, env.in_enemy_base(team, p));
    obs.set_flag(slot::AT_OWN_CAMP, env.at_own_camp(team, p));
    obs.set_flag(slot::AT_ENEMY_CAMP, env.at_enemy_camp(team, p));

    let stocks = env.stocks(team);
    let norm = env.stock_normalizer();
    let scale = |count: u32| {
        if norm > 0.0 {
            (count as f32 / norm).clamp(0.0, 1.0)
        } else {
            0.0
        }
    };
    obs.set(slot::OWN_IRON, scale(stocks.own_iron));
    obs.set(slot::OWN_MANA, scale(stocks.own_mana));
    obs.set(slot::ENEMY_IRON, scale(stocks.enemy_iron));
    obs.set(slot::ENEMY_MANA, scale(stocks.enemy_mana));

    let (allies, enemies) = env.local_densities(team, p);
    obs.set(slot::ALLY_DENSITY, allies);
    obs.set(slot::ENEMY_DENSITY, enemies);

    obs.set(slot::TIME_REMAINING, env.time_remaining());
    obs
}

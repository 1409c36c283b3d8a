//! The environment coordinator.
//!
//! [`EnvironmentCoordinator`] owns everything that changes during an
//! episode: the arena layout, both camps, the agents and their rosters, the
//! episode clock and the death-drop handler. One call to
//! [`EnvironmentCoordinator::step`] runs a full tick:
//!
//! 1. **Perceive** -- build an observation for every registered agent in
//!    roster order (Red then Blue, registration order within a team).
//! 2. **Decide** -- hand the perceptions to a [`DecisionSource`].
//! 3. **Resolve** -- apply each living agent's movement, then its verb, in
//!    roster order. Deaths are handled on the spot. Every cooldown ticks.
//! 4. **Heal** -- living agents standing in their own base regain health.
//! 5. **Advance** -- bump the clock and apply stock shaping rewards.
//! 6. **Terminate** -- evaluate the terminal rules; on a terminal tick,
//!    settle rewards, summarise and reset straight away.
//!
//! All observations for a tick are computed before any action of that
//! tick, and sequential resolution means the first agent in roster order
//! wins any race for a lone token.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use raid_agents::{Agent, AttackAttempt, AttackProfile, DeathNotice};
use raid_ledger::{Camp, StockChanged};
use raid_types::{Action, AgentId, Movement, Observation, Position, Team, TeamPair, Verb};
use raid_world::{ArenaLayout, SpawnGrid, WorldError, separate_pair, spawn_position, step_target};

use crate::clock::{ClockError, EpisodeClock};
use crate::config::{ConfigError, EnvironmentConfig};
use crate::death_drop::{DeathDropHandler, DropOutcome};
use crate::decision::{DecisionError, DecisionSource};
use crate::episode::{
    EpisodePhase, EpisodeSummary, Outcome, StockSnapshot, Termination, evaluate,
};
use crate::observation::{EnvQuery, Perception, StockView, assemble};

/// Errors returned by the coordinator.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// `step` was called before the first `reset_episode`.
    #[error("episode not started: call reset_episode before step")]
    EpisodeNotStarted,

    /// An agent with this id is already registered.
    #[error("agent already registered: {0}")]
    DuplicateAgent(AgentId),

    /// No agent with this id is registered.
    #[error("agent not registered: {0}")]
    UnknownAgent(AgentId),

    /// The decision source failed.
    #[error("decision error: {0}")]
    Decision(#[from] DecisionError),

    /// The episode clock failed.
    #[error("clock error: {0}")]
    Clock(#[from] ClockError),

    /// The configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The arena geometry is invalid.
    #[error("world error: {0}")]
    World(#[from] WorldError),
}

/// Everything that happened during one tick.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Ticks completed since construction, this one included.
    pub tick: u64,
    /// Episode the tick belonged to.
    pub episode: u64,
    /// Step count within that episode after the tick.
    pub step: u64,
    /// Reward drained from every registered agent, in roster order.
    pub rewards: Vec<(AgentId, f32)>,
    /// Agents that died this tick.
    pub deaths: Vec<DeathNotice>,
    /// Stock notifications from both camps, Red first. Reseeds show up in
    /// the first report of the episode they start.
    pub stock_events: Vec<StockChanged>,
    /// Set when the tick ended the episode; the next episode has already
    /// been reset.
    pub episode_end: Option<EpisodeSummary>,
}

/// Owns and advances the environment.
#[derive(Debug)]
pub struct EnvironmentCoordinator {
    config: EnvironmentConfig,
    layout: ArenaLayout,
    camps: TeamPair<Camp>,
    agents: BTreeMap<AgentId, Agent>,
    rosters: TeamPair<Vec<AgentId>>,
    clock: EpisodeClock,
    phase: EpisodePhase,
    /// Camp totals at the end of the previous tick, for shaping.
    last_totals: TeamPair<u32>,
    attack: AttackProfile,
    grid: SpawnGrid,
    death_drop: DeathDropHandler,
}

impl EnvironmentCoordinator {
    /// Build a coordinator from validated configuration.
    ///
    /// No episode is running until [`Self::reset_episode`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Config`] if `config` does not validate,
    /// or the layout or clock error it produces.
    pub fn new(config: EnvironmentConfig) -> Result<Self, CoordinatorError> {
        config.validate()?;
        let layout = ArenaLayout::from_config(&config.arena)?;
        let clock = EpisodeClock::new(config.episode.max_steps)?;
        let [half_x, half_z] = config.spatial.pickup_footprint;
        let camps = TeamPair::from_fn(|team| {
            Camp::new(team, layout.camp(team).center)
                .with_pickup_visuals(config.episode.pickup_visuals)
                .with_deposit_rule(config.episode.deposit_rule)
                .with_footprint(half_x, half_z)
        });
        let grid = SpawnGrid {
            step: config.spatial.spawn_grid_step,
            cols: config.spatial.spawn_grid_cols,
        };
        let attack = AttackProfile::from_config(&config.agents);

        Ok(Self {
            config,
            layout,
            camps,
            agents: BTreeMap::new(),
            rosters: TeamPair::default(),
            clock,
            phase: EpisodePhase::NotStarted,
            last_totals: TeamPair::default(),
            attack,
            grid,
            death_drop: DeathDropHandler::new(),
        })
    }

    // ---------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------

    /// Register `agent` at the end of its team's roster.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::DuplicateAgent`] if its id is taken.
    pub fn register_agent(&mut self, agent: Agent) -> Result<AgentId, CoordinatorError> {
        let id = agent.id;
        if self.agents.contains_key(&id) {
            return Err(CoordinatorError::DuplicateAgent(id));
        }
        self.rosters.get_mut(agent.team).push(id);
        tracing::debug!(agent = %agent.name, team = %agent.team, "agent registered");
        self.agents.insert(id, agent);
        Ok(id)
    }

    /// Move agent `id` to `team`'s roster.
    ///
    /// The agent is removed from both rosters and appended to the new one,
    /// so it appears exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::UnknownAgent`] if `id` is not registered.
    pub fn switch_registration(&mut self, id: AgentId, team: Team) -> Result<(), CoordinatorError> {
        let agent = self
            .agents
            .get_mut(&id)
            .ok_or(CoordinatorError::UnknownAgent(id))?;
        for roster in [&mut self.rosters.red, &mut self.rosters.blue] {
            roster.retain(|other| *other != id);
        }
        self.rosters.get_mut(team).push(id);
        if agent.team != team {
            tracing::debug!(agent = %agent.name, from = %agent.team, to = %team, "agent switched team");
        }
        agent.team = team;
        Ok(())
    }

    /// Remove agent `id` from the environment and return it.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::UnknownAgent`] if `id` is not registered.
    pub fn unregister_agent(&mut self, id: AgentId) -> Result<Agent, CoordinatorError> {
        let agent = self
            .agents
            .remove(&id)
            .ok_or(CoordinatorError::UnknownAgent(id))?;
        for roster in [&mut self.rosters.red, &mut self.rosters.blue] {
            roster.retain(|other| *other != id);
        }
        tracing::debug!(agent = %agent.name, team = %agent.team, "agent unregistered");
        Ok(agent)
    }

    /// Derive the arena bounds from every anchor point plus `margin`.
    ///
    /// Returns `false` and keeps the old bounds if that is not possible.
    pub fn recompute_bounds(&mut self, margin: f32) -> bool {
        self.layout.recompute_bounds(margin)
    }

    // ---------------------------------------------------------------------
    // Episode lifecycle
    // ---------------------------------------------------------------------

    /// Start a fresh episode.
    ///
    /// Zeroes the step counter, reseeds both camps, respawns the visible
    /// pickups and puts every registered agent, dead or alive, back on its
    /// team's spawn grid at full health with nothing carried. Returns the
    /// new episode index.
    ///
    /// Missing spawn points and empty rosters are logged, not fatal.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Clock`] if the episode index overflows.
    pub fn reset_episode(&mut self) -> Result<u64, CoordinatorError> {
        self.phase = EpisodePhase::Resetting;
        let episode = self.clock.begin_episode()?;

        let seeds = TeamPair::new(
            (self.config.episode.initial_iron_red, 0),
            (0, self.config.episode.initial_mana_blue),
        );
        for team in Team::ALL {
            let camp = self.camps.get_mut(team);
            let (iron, mana) = *seeds.get(team);
            camp.set_anchor(self.layout.camp(team).center);
            camp.reseed(iron, mana);
            let _ = camp.spawn_initial_world_pickups(self.config.episode.visible_pickups_per_camp);
        }

        for team in Team::ALL {
            let roster = self.rosters.get(team);
            if roster.is_empty() {
                tracing::warn!(%team, "no agents registered, nothing to reset for this team");
                continue;
            }
            if self.layout.spawns(team).is_empty() {
                tracing::warn!(%team, "no spawn points configured, spawning at base centre");
            }
            let team_size = roster.len();
            for (index, id) in roster.iter().enumerate() {
                let Some(agent) = self.agents.get_mut(id) else {
                    continue;
                };
                let position = spawn_position(
                    &self.layout,
                    team,
                    index,
                    team_size,
                    self.grid,
                    agent.position.y,
                );
                agent.reset_for_episode(position);
            }
        }

        self.death_drop.reset();
        self.last_totals = self.camps.map(Camp::total);
        self.phase = EpisodePhase::Running;

        tracing::info!(
            episode,
            red_agents = self.rosters.red.len(),
            blue_agents = self.rosters.blue.len(),
            red_iron = self.camps.red.iron(),
            blue_mana = self.camps.blue.mana(),
            "episode reset"
        );
        Ok(episode)
    }

    /// Run one tick with actions from `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::EpisodeNotStarted`] before the first
    /// reset, [`CoordinatorError::Decision`] if the policy fails and
    /// [`CoordinatorError::Clock`] on counter overflow.
    pub fn step(
        &mut self,
        policy: &mut dyn DecisionSource,
    ) -> Result<TickReport, CoordinatorError> {
        if self.phase == EpisodePhase::NotStarted {
            return Err(CoordinatorError::EpisodeNotStarted);
        }
        let tick = self.clock.total_ticks().saturating_add(1);
        let episode = self.clock.episode();

        let perceptions = self.perceptions();
        let decisions = policy.collect_decisions(tick, &perceptions)?;

        let mut deaths = Vec::new();
        for id in self.roster_order() {
            let action = decisions.get(&id).copied().unwrap_or(Action::IDLE);
            self.resolve_action(id, action, tick, &mut deaths);
        }

        self.apply_base_heal();
        let step = self.clock.advance()?;
        self.apply_shaping();

        let termination = evaluate(
            &TeamPair::from_fn(|team| self.team_alive(team)),
            &self.camps.map(Camp::total),
            self.config.episode.win_stock_threshold,
            step,
            self.clock.max_steps(),
        );
        if let Some(termination) = termination {
            self.phase = EpisodePhase::TerminalPending;
            self.apply_terminal_rewards(termination);
        }

        let rewards = self.drain_rewards();
        let mut stock_events = self.camps.red.drain_events();
        stock_events.append(&mut self.camps.blue.drain_events());

        // Reseed events of the next episode stay queued for the next report.
        let episode_end = match termination {
            Some(termination) => {
                let summary = self.close_episode(termination, step);
                let _ = self.reset_episode()?;
                Some(summary)
            }
            None => None,
        };

        Ok(TickReport {
            tick,
            episode,
            step,
            rewards,
            deaths,
            stock_events,
            episode_end,
        })
    }

    // ---------------------------------------------------------------------
    // Agent-facing operations
    // ---------------------------------------------------------------------

    /// Move agent `id` to `target`, clamped to the bounds.
    ///
    /// The vertical axis is kept. With overlap prevention on, living
    /// same-team neighbours closer than the minimum separation are then
    /// pushed apart one by one in roster order. Returns `false` if the
    /// agent is unknown or dead.
    pub fn try_move(&mut self, id: AgentId, target: Position) -> bool {
        let bounds = self.layout.bounds();
        let Some(agent) = self.agents.get_mut(&id).filter(|a| a.is_alive()) else {
            return false;
        };
        let mut clamped = bounds.clamp(target);
        clamped.y = agent.position.y;
        agent.position = clamped;
        let team = agent.team;

        let min_separation = self.config.spatial.min_separation;
        if !self.config.spatial.prevent_overlap || min_separation <= 0.0 {
            return true;
        }
        for other_id in self.rosters.get(team) {
            if *other_id == id {
                continue;
            }
            let Some(other) = self.agents.get(other_id).filter(|a| a.is_alive()) else {
                continue;
            };
            let Some(mover) = self.agents.get(&id) else {
                break;
            };
            let Some((moved, pushed)) =
                separate_pair(mover.position, other.position, min_separation, &bounds)
            else {
                continue;
            };
            if let Some(mover) = self.agents.get_mut(&id) {
                mover.position = moved;
            }
            if let Some(other) = self.agents.get_mut(other_id) {
                other.position = pushed;
            }
        }
        true
    }

    /// Let agent `id` take one unit of the enemy's home resource.
    ///
    /// Only works inside the enemy camp. The nearest available world
    /// token within the pick radius is preferred; failing that the unit
    /// comes straight from stock.
    pub fn try_pickup(&mut self, id: AgentId) -> bool {
        let Some(agent) = self.agents.get_mut(&id).filter(|a| a.is_alive()) else {
            return false;
        };
        let team = agent.team;
        if !self.layout.at_enemy_camp(team, agent.position) {
            return false;
        }
        let camp = self.camps.get_mut(team.enemy());
        let radius = self.config.spatial.world_pick_radius;

        if let Some(token) = camp.try_pick_world(agent.position, &mut agent.carry, radius) {
            agent.held_token = Some(token);
            tracing::debug!(agent = %agent.name, %team, token = %token, "picked world token");
            return true;
        }
        if camp.try_pick_direct(&mut agent.carry) {
            agent.held_token = None;
            tracing::debug!(agent = %agent.name, %team, "picked from stock");
            return true;
        }
        false
    }

    /// Let agent `id` deposit its cargo into its own camp.
    ///
    /// Only works inside the own camp. A consumed token stays taken.
    pub fn try_drop(&mut self, id: AgentId) -> bool {
        let Some(agent) = self.agents.get_mut(&id) else {
            return false;
        };
        let team = agent.team;
        if !self.layout.at_own_camp(team, agent.position) {
            return false;
        }
        let camp = self.camps.get_mut(team);
        if !camp.try_drop_at_home(&agent.health, &mut agent.carry) {
            return false;
        }
        agent.held_token = None;
        tracing::debug!(
            agent = %agent.name,
            %team,
            iron = camp.iron(),
            mana = camp.mana(),
            "deposited at home camp"
        );
        true
    }

    // ---------------------------------------------------------------------
    // Spatial queries
    // ---------------------------------------------------------------------

    /// Nearest living enemy of `team` within `range` of `p`.
    ///
    /// Candidates are scanned in roster order and only a strictly closer
    /// one replaces the current best, so the first found wins exact ties.
    pub fn nearest_enemy_in_range(&self, team: Team, p: Position, range: f32) -> Option<AgentId> {
        let r2 = range * range;
        let mut best: Option<(AgentId, f32)> = None;
        for id in self.rosters.get(team.enemy()) {
            let Some(enemy) = self.agents.get(id).filter(|a| a.is_alive()) else {
                continue;
            };
            let d2 = enemy.position.ground_distance_sq(p);
            if d2 <= r2 && best.is_none_or(|(_, best_d2)| d2 < best_d2) {
                best = Some((*id, d2));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Normalized counts of living allies and enemies of `team` within the
    /// density radius of `p`.
    ///
    /// An agent standing at `p` counts itself. Each count is divided by the
    /// density cap (at least one) and clamped to `[0, 1]`.
    #[allow(clippy::cast_precision_loss)]
    pub fn local_densities(&self, team: Team, p: Position) -> (f32, f32) {
        let radius = self.config.spatial.local_density_radius;
        let r2 = radius * radius;
        let count = |side: Team| {
            self.rosters
                .get(side)
                .iter()
                .filter_map(|id| self.agents.get(id))
                .filter(|a| a.is_alive() && a.position.ground_distance_sq(p) <= r2)
                .count()
        };
        let cap = self.config.spatial.density_normalize_cap.max(1) as f32;
        let norm = |n: usize| (n as f32 / cap).clamp(0.0, 1.0);
        (norm(count(team)), norm(count(team.enemy())))
    }

    /// Whether any registered agent of `team` is alive.
    pub fn team_alive(&self, team: Team) -> bool {
        self.rosters
            .get(team)
            .iter()
            .filter_map(|id| self.agents.get(id))
            .any(Agent::is_alive)
    }

    /// Observation for agent `id`, if registered.
    pub fn observe(&self, id: AgentId) -> Option<Observation> {
        self.agents.get(&id).map(|agent| assemble(agent, Some(self)))
    }

    /// Perceptions of every registered agent in roster order.
    pub fn perceptions(&self) -> Vec<Perception> {
        self.roster_order()
            .into_iter()
            .filter_map(|id| self.agents.get(&id))
            .map(|agent| Perception {
                agent_id: agent.id,
                team: agent.team,
                alive: agent.is_alive(),
                position: agent.position,
                observation: assemble(agent, Some(self)),
            })
            .collect()
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Registered agent `id`.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Registered agent `id`, mutably.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Number of registered agents.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Camp of `team`.
    pub const fn camp(&self, team: Team) -> &Camp {
        self.camps.get(team)
    }

    /// Camp of `team`, mutably.
    pub const fn camp_mut(&mut self, team: Team) -> &mut Camp {
        self.camps.get_mut(team)
    }

    /// Roster of `team` in registration order.
    pub fn roster(&self, team: Team) -> &[AgentId] {
        self.rosters.get(team)
    }

    /// Every registered agent, Red roster first.
    pub fn roster_order(&self) -> Vec<AgentId> {
        self.rosters
            .red
            .iter()
            .chain(self.rosters.blue.iter())
            .copied()
            .collect()
    }

    /// The episode clock.
    pub const fn clock(&self) -> &EpisodeClock {
        &self.clock
    }

    /// The arena layout.
    pub const fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    /// Current lifecycle phase.
    pub const fn phase(&self) -> EpisodePhase {
        self.phase
    }

    /// The configuration this coordinator was built from.
    pub const fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Tick internals
    // ---------------------------------------------------------------------

    fn resolve_action(
        &mut self,
        id: AgentId,
        action: Action,
        tick: u64,
        deaths: &mut Vec<DeathNotice>,
    ) {
        let Some(agent) = self.agents.get(&id) else {
            return;
        };
        if agent.is_alive() {
            if self.config.agents.log_actions {
                tracing::debug!(
                    agent = %agent.name,
                    tick,
                    movement = ?action.movement,
                    verb = ?action.verb,
                    "action"
                );
            }
            let from = agent.position;
            if action.movement != Movement::Idle {
                let target = step_target(from, action.movement, self.config.agents.move_step);
                let _ = self.try_move(id, target);
            }
            match action.verb {
                Verb::None => {}
                Verb::Attack => self.resolve_attack(id, tick, deaths),
                Verb::Pick => {
                    let _ = self.try_pickup(id);
                }
                Verb::Drop => {
                    let _ = self.try_drop(id);
                }
            }
        }
        if let Some(agent) = self.agents.get_mut(&id) {
            agent.cooldown.tick();
        }
    }

    fn resolve_attack(&mut self, id: AgentId, tick: u64, deaths: &mut Vec<DeathNotice>) {
        let Some(attacker) = self.agents.get(&id) else {
            return;
        };
        let target = self.nearest_enemy_in_range(attacker.team, attacker.position, self.attack.range);
        let Some(attacker) = self.agents.get_mut(&id) else {
            return;
        };
        let attempt = self.attack.attempt(&mut attacker.cooldown, target.is_some());
        let (AttackAttempt::Hit { damage }, Some(target)) = (attempt, target) else {
            return;
        };
        let Some(victim) = self.agents.get_mut(&target) else {
            return;
        };
        let Some(notice) = victim.take_hit(damage, Some(id), tick) else {
            return;
        };
        let outcome = self.death_drop.handle(&notice, victim, &mut self.camps);
        if outcome != DropOutcome::Nothing {
            tracing::debug!(agent = %notice.agent_id, ?outcome, "death drop");
        }
        deaths.push(notice);
    }

    fn apply_base_heal(&mut self) {
        let amount = self.config.spatial.base_heal_per_tick;
        if amount <= 0 {
            return;
        }
        for agent in self.agents.values_mut() {
            if agent.is_alive() && self.layout.in_own_base(agent.team, agent.position) {
                let _ = agent.health.heal(amount);
            }
        }
    }

    fn apply_shaping(&mut self) {
        let totals = self.camps.map(Camp::total);
        if self.config.rewards.use_shaping {
            for team in Team::ALL {
                let sign = match totals.get(team).cmp(self.last_totals.get(team)) {
                    Ordering::Greater => 1.0,
                    Ordering::Less => -1.0,
                    Ordering::Equal => continue,
                };
                self.add_team_reward(team, self.config.rewards.stock_delta_reward * sign);
            }
        }
        self.last_totals = totals;
    }

    fn apply_terminal_rewards(&mut self, termination: Termination) {
        let rewards = self.config.rewards;
        match termination.outcome {
            Outcome::Winner(winner) => {
                self.add_team_reward(winner, rewards.win_reward);
                self.add_team_reward(winner.enemy(), rewards.loss_penalty);
            }
            Outcome::Tie => {
                for team in Team::ALL {
                    self.add_team_reward(team, rewards.timeout_penalty);
                }
            }
        }
    }

    /// Reward every registered agent of `team`, dead ones included.
    fn add_team_reward(&mut self, team: Team, amount: f32) {
        for id in self.rosters.get(team) {
            if let Some(agent) = self.agents.get_mut(id) {
                agent.rewards.add(amount);
            }
        }
    }

    fn drain_rewards(&mut self) -> Vec<(AgentId, f32)> {
        let mut rewards = Vec::with_capacity(self.agents.len());
        for id in self.rosters.red.iter().chain(self.rosters.blue.iter()) {
            if let Some(agent) = self.agents.get_mut(id) {
                rewards.push((*id, agent.rewards.take_pending()));
            }
        }
        rewards
    }

    /// Tell every agent the episode is over and summarise it.
    #[allow(clippy::cast_precision_loss)]
    fn close_episode(&mut self, termination: Termination, steps: u64) -> EpisodeSummary {
        let mut mean_reward = TeamPair::new(0.0_f32, 0.0_f32);
        for team in Team::ALL {
            let mut total = 0.0_f32;
            let mut count: usize = 0;
            for id in self.rosters.get(team) {
                if let Some(agent) = self.agents.get_mut(id) {
                    total += agent.rewards.end_episode();
                    count = count.saturating_add(1);
                }
            }
            if count > 0 {
                *mean_reward.get_mut(team) = total / count as f32;
            }
        }

        let final_stocks = self.camps.map(|camp| StockSnapshot {
            iron: camp.iron(),
            mana: camp.mana(),
        });
        let summary = EpisodeSummary {
            episode: self.clock.episode(),
            steps,
            outcome: termination.outcome,
            reason: termination.reason,
            final_stocks,
            mean_reward,
        };

        tracing::info!(
            episode = summary.episode,
            steps,
            outcome = ?summary.outcome,
            reason = ?summary.reason,
            red_iron = summary.final_stocks.red.iron,
            red_mana = summary.final_stocks.red.mana,
            blue_iron = summary.final_stocks.blue.iron,
            blue_mana = summary.final_stocks.blue.mana,
            "episode ended"
        );
        summary
    }
}

impl EnvQuery for EnvironmentCoordinator {
    fn normalize_position(&self, p: Position) -> (f32, f32) {
        self.layout.normalize(p)
    }

    fn in_own_base(&self, team: Team, p: Position) -> bool {
        self.layout.in_own_base(team, p)
    }

    fn in_enemy_base(&self, team: Team, p: Position) -> bool {
        self.layout.in_enemy_base(team, p)
    }

    fn at_own_camp(&self, team: Team, p: Position) -> bool {
        self.layout.at_own_camp(team, p)
    }

    fn at_enemy_camp(&self, team: Team, p: Position) -> bool {
        self.layout.at_enemy_camp(team, p)
    }

    fn stocks(&self, team: Team) -> StockView {
        let own = self.camps.get(team);
        let enemy = self.camps.get(team.enemy());
        StockView {
            own_iron: own.iron(),
            own_mana: own.mana(),
            enemy_iron: enemy.iron(),
            enemy_mana: enemy.mana(),
        }
    }

    fn stock_normalizer(&self) -> f32 {
        self.config.spatial.stock_normalizer
    }

    fn local_densities(&self, team: Team, p: Position) -> (f32, f32) {
        Self::local_densities(self, team, p)
    }

    fn time_remaining(&self) -> f32 {
        self.clock.time_remaining()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use raid_agents::{AgentConfig, AgentFactory};
    use raid_types::OBSERVATION_LEN;

    use super::*;
    use crate::decision::{ActionBuffer, IdlePolicy};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn coordinator(per_team: usize) -> (EnvironmentCoordinator, Vec<AgentId>, Vec<AgentId>) {
        let mut env = EnvironmentCoordinator::new(EnvironmentConfig::default()).unwrap();
        let mut factory = AgentFactory::new();
        let mut ids = TeamPair::new(Vec::new(), Vec::new());
        for team in Team::ALL {
            for index in 0..per_team {
                let agent = factory
                    .create(
                        AgentFactory::default_name(team, index),
                        team,
                        Position::default(),
                        &AgentConfig::default(),
                    )
                    .unwrap();
                ids.get_mut(team).push(env.register_agent(agent).unwrap());
            }
        }
        let _ = env.reset_episode().unwrap();
        (env, ids.red, ids.blue)
    }

    #[test]
    fn stepping_before_reset_fails() {
        let mut env = EnvironmentCoordinator::new(EnvironmentConfig::default()).unwrap();
        assert!(matches!(
            env.step(&mut IdlePolicy),
            Err(CoordinatorError::EpisodeNotStarted)
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EnvironmentConfig::default();
        config.episode.max_steps = 0;
        assert!(matches!(
            EnvironmentCoordinator::new(config),
            Err(CoordinatorError::Config(_))
        ));
    }

    #[test]
    fn reset_places_agents_on_the_spawn_grid() {
        let (env, red, blue) = coordinator(3);
        assert_eq!(env.phase(), EpisodePhase::Running);
        assert_eq!(env.clock().episode(), 1);
        assert_eq!(env.camp(Team::Red).iron(), 100);
        assert_eq!(env.camp(Team::Blue).mana(), 100);

        let first = env.agent(red[0]).unwrap().position;
        assert!(close(first.x, -20.6));
        assert!(close(first.z, -1.5));
        let second = env.agent(red[1]).unwrap().position;
        assert!(close(second.x, -20.0));
        assert!(close(second.z, 1.5));
        let blue_first = env.agent(blue[0]).unwrap().position;
        assert!(close(blue_first.x, 19.4));
    }

    #[test]
    fn registration_is_unique_and_switchable() {
        let (mut env, red, _) = coordinator(2);
        let agent = env.agent(red[0]).cloned().unwrap();
        assert!(matches!(
            env.register_agent(agent),
            Err(CoordinatorError::DuplicateAgent(_))
        ));

        env.switch_registration(red[0], Team::Blue).unwrap();
        assert_eq!(env.roster(Team::Red), &[red[1]]);
        assert_eq!(env.roster(Team::Blue).last(), Some(&red[0]));
        assert_eq!(env.agent(red[0]).unwrap().team, Team::Blue);

        env.switch_registration(red[0], Team::Blue).unwrap();
        assert_eq!(
            env.roster(Team::Blue).iter().filter(|id| **id == red[0]).count(),
            1
        );

        let removed = env.unregister_agent(red[1]).unwrap();
        assert_eq!(removed.id, red[1]);
        assert!(env.roster(Team::Red).is_empty());
        assert!(matches!(
            env.unregister_agent(red[1]),
            Err(CoordinatorError::UnknownAgent(_))
        ));
    }

    #[test]
    fn move_is_clamped_to_bounds() {
        let (mut env, red, _) = coordinator(1);
        assert!(env.try_move(red[0], Position::new(-100.0, 3.0, 50.0)));
        let p = env.agent(red[0]).unwrap().position;
        assert!(close(p.x, -25.0));
        assert!(close(p.z, 5.0));
        assert!(close(p.y, 0.0));
    }

    #[test]
    fn pickup_requires_the_enemy_camp() {
        let (mut env, red, _) = coordinator(1);
        assert!(!env.try_pickup(red[0]));
        assert!(env.try_move(red[0], Position::ground(12.0, 0.0)));
        assert!(env.try_pickup(red[0]));
        assert_eq!(env.camp(Team::Blue).mana(), 99);
        assert!(env.agent(red[0]).unwrap().carry.is_carrying(raid_types::Resource::Mana));
        assert!(!env.try_drop(red[0]));

        assert!(env.try_move(red[0], Position::ground(-12.0, 0.0)));
        assert!(env.try_drop(red[0]));
        assert_eq!(env.camp(Team::Red).mana(), 1);
        assert_eq!(env.camp(Team::Red).total(), 101);
        assert!(!env.agent(red[0]).unwrap().carry.has_item());
    }

    #[test]
    fn attack_hits_nearest_enemy_and_respects_cooldown() {
        let (mut env, red, blue) = coordinator(1);
        assert!(env.try_move(red[0], Position::ground(0.0, 0.0)));
        assert!(env.try_move(blue[0], Position::ground(1.0, 0.0)));

        let mut buffer = ActionBuffer::new();
        buffer.set(red[0], Action::new(Movement::Idle, Verb::Attack));
        let _ = env.step(&mut buffer).unwrap();
        assert_eq!(env.agent(blue[0]).unwrap().health.hp(), 90);
        assert_eq!(env.agent(red[0]).unwrap().cooldown.remaining(), 7);

        buffer.set(red[0], Action::new(Movement::Idle, Verb::Attack));
        let _ = env.step(&mut buffer).unwrap();
        assert_eq!(env.agent(blue[0]).unwrap().health.hp(), 90);
    }

    #[test]
    fn dead_agents_are_invisible_to_queries() {
        let (mut env, red, blue) = coordinator(2);
        assert!(env.try_move(blue[0], Position::ground(0.0, 0.0)));
        let _ = env.agent_mut(blue[0]).unwrap().take_hit(1000, None, 0);

        assert_eq!(
            env.nearest_enemy_in_range(Team::Red, Position::ground(0.0, 0.0), 1.0),
            None
        );
        let (_, enemies) = env.local_densities(Team::Red, Position::ground(0.0, 0.0));
        assert!(close(enemies, 0.0));
        assert!(env.team_alive(Team::Blue));

        let _ = env.agent_mut(blue[1]).unwrap().take_hit(1000, None, 0);
        assert!(!env.team_alive(Team::Blue));
        assert!(env.team_alive(Team::Red));
        assert!(!env.try_move(blue[0], Position::ground(1.0, 0.0)));
        assert_eq!(env.roster(Team::Red).len(), red.len());
    }

    #[test]
    fn density_counts_self_and_caps() {
        let (mut env, red, _) = coordinator(2);
        for id in &red {
            assert!(env.try_move(*id, Position::ground(0.0, 0.0)));
        }
        let (allies, _) = env.local_densities(Team::Red, Position::ground(0.0, 0.0));
        assert!(close(allies, 0.4));
    }

    #[test]
    fn observations_cover_every_agent() {
        let (env, red, _) = coordinator(2);
        let perceptions = env.perceptions();
        assert_eq!(perceptions.len(), 4);
        assert_eq!(perceptions[0].agent_id, red[0]);
        assert!(perceptions.iter().all(|p| p.observation.len() == OBSERVATION_LEN));
        assert!(env.observe(red[1]).is_some());
    }

    #[test]
    fn shaping_rewards_follow_the_sign_of_the_stock_delta() {
        let mut config = EnvironmentConfig::default();
        config.rewards.use_shaping = true;
        let mut env = EnvironmentCoordinator::new(config).unwrap();
        let mut factory = AgentFactory::new();
        let mut ids = Vec::new();
        for team in Team::ALL {
            let agent = factory
                .create(
                    AgentFactory::default_name(team, 0),
                    team,
                    Position::default(),
                    &AgentConfig::default(),
                )
                .unwrap();
            ids.push(env.register_agent(agent).unwrap());
        }
        let _ = env.reset_episode().unwrap();

        assert!(env.try_move(ids[0], Position::ground(12.0, 0.0)));
        assert!(env.try_pickup(ids[0]));
        let report = env.step(&mut IdlePolicy).unwrap();
        assert!(close(report.rewards[0].1, 0.0));
        assert!(close(report.rewards[1].1, -0.01));

        let report = env.step(&mut IdlePolicy).unwrap();
        assert!(report.rewards.iter().all(|(_, r)| close(*r, 0.0)));
    }

    #[test]
    fn base_heal_restores_living_agents_at_home() {
        let (mut env, red, _) = coordinator(1);
        let _ = env.agent_mut(red[0]).unwrap().take_hit(5, None, 0);
        let _ = env.step(&mut IdlePolicy).unwrap();
        assert_eq!(env.agent(red[0]).unwrap().health.hp(), 96);
    }
}

//! Decision source trait and built-in policies.
//!
//! During the decision phase of a step the coordinator presents every
//! registered agent's [`Perception`] and collects one [`Action`] per agent.
//! The [`DecisionSource`] trait abstracts where actions come from: a learned
//! policy, a script, a human, or a test.
//!
//! Built-in sources:
//!
//! - [`IdlePolicy`] -- every agent idles.
//! - [`RandomWalkPolicy`] -- seeded random movement, no verbs.
//! - [`RaiderPolicy`] -- scripted steal/carry/deposit loop with self-defence.
//! - [`ActionBuffer`] -- actions pushed in from outside (raw branch indices
//!   from a learned policy, or fixed scripts in tests).

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use raid_types::actions::MOVEMENT_CHOICES;
use raid_types::observation::slot;
use raid_types::{Action, ActionDecodeError, AgentId, Movement, Position, TeamPair, Verb};
use raid_world::ArenaLayout;

use crate::config::PolicyKind;
use crate::observation::Perception;

/// Errors that can occur during the decision phase.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    /// A raw action index could not be decoded.
    #[error("invalid action for agent {agent_id}: {source}")]
    Decode {
        /// The agent the action was meant for.
        agent_id: AgentId,
        /// The decoding failure.
        source: ActionDecodeError,
    },
}

/// A source of agent actions.
pub trait DecisionSource {
    /// Collect actions for the given tick.
    ///
    /// `perceptions` is in roster order and covers every registered agent,
    /// dead ones included. Agents missing from the returned map idle.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError`] if the decision process fails entirely.
    fn collect_decisions(
        &mut self,
        tick: u64,
        perceptions: &[Perception],
    ) -> Result<BTreeMap<AgentId, Action>, DecisionError>;
}

/// Build the configured built-in decision source.
pub fn build_policy(
    kind: PolicyKind,
    seed: u64,
    layout: &ArenaLayout,
) -> Box<dyn DecisionSource + Send> {
    match kind {
        PolicyKind::Idle => Box::new(IdlePolicy),
        PolicyKind::RandomWalk => Box::new(RandomWalkPolicy::new(seed)),
        PolicyKind::Raider => Box::new(RaiderPolicy::new(layout)),
    }
}

/// A decision source that always returns [`Action::IDLE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl DecisionSource for IdlePolicy {
    fn collect_decisions(
        &mut self,
        _tick: u64,
        perceptions: &[Perception],
    ) -> Result<BTreeMap<AgentId, Action>, DecisionError> {
        Ok(perceptions
            .iter()
            .map(|p| (p.agent_id, Action::IDLE))
            .collect())
    }
}

/// Random movement with no verbs, reproducible from a seed.
///
/// Draws happen in roster order, one per living agent.
#[derive(Debug, Clone)]
pub struct RandomWalkPolicy {
    rng: StdRng,
}

impl RandomWalkPolicy {
    /// Create a policy seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DecisionSource for RandomWalkPolicy {
    fn collect_decisions(
        &mut self,
        _tick: u64,
        perceptions: &[Perception],
    ) -> Result<BTreeMap<AgentId, Action>, DecisionError> {
        let mut decisions = BTreeMap::new();
        for perception in perceptions.iter().filter(|p| p.alive) {
            let index = self.rng.random_range(0..MOVEMENT_CHOICES);
            let movement = Movement::from_index(index).map_err(|source| DecisionError::Decode {
                agent_id: perception.agent_id,
                source,
            })?;
            decisions.insert(perception.agent_id, Action::new(movement, Verb::None));
        }
        Ok(decisions)
    }
}

/// Scripted raider.
///
/// Empty-handed agents walk to the enemy camp and pick; carriers walk home
/// and drop. Anyone with an enemy nearby and nothing better to do attacks.
#[derive(Debug, Clone)]
pub struct RaiderPolicy {
    /// Camp centre per team.
    camps: TeamPair<Position>,
    /// Distance under which an agent counts as arrived.
    arrive_tolerance: f32,
}

impl RaiderPolicy {
    /// Create a raider that navigates `layout`'s camps.
    pub fn new(layout: &ArenaLayout) -> Self {
        Self {
            camps: TeamPair::from_fn(|team| layout.camp(team).center),
            arrive_tolerance: 0.5,
        }
    }

    fn decide(&self, perception: &Perception) -> Action {
        if !perception.alive {
            return Action::IDLE;
        }
        let flag = |index: usize| perception.observation.get(index).is_some_and(|v| v > 0.5);
        let carrying = flag(slot::CARRYING);

        let target = if carrying {
            *self.camps.get(perception.team)
        } else {
            *self.camps.get(perception.team.enemy())
        };
        let movement = self.head_towards(perception.position, target);

        let verb = if carrying && flag(slot::AT_OWN_CAMP) {
            Verb::Drop
        } else if !carrying && flag(slot::AT_ENEMY_CAMP) {
            Verb::Pick
        } else if perception
            .observation
            .get(slot::ENEMY_DENSITY)
            .is_some_and(|v| v > 0.0)
        {
            Verb::Attack
        } else {
            Verb::None
        };
        Action::new(movement, verb)
    }

    fn head_towards(&self, from: Position, to: Position) -> Movement {
        let dx = to.x - from.x;
        let dz = to.z - from.z;
        if dx.abs().max(dz.abs()) <= self.arrive_tolerance {
            return Movement::Idle;
        }
        if dx.abs() >= dz.abs() {
            if dx > 0.0 {
                Movement::Right
            } else {
                Movement::Left
            }
        } else if dz > 0.0 {
            Movement::Forward
        } else {
            Movement::Back
        }
    }
}

impl DecisionSource for RaiderPolicy {
    fn collect_decisions(
        &mut self,
        _tick: u64,
        perceptions: &[Perception],
    ) -> Result<BTreeMap<AgentId, Action>, DecisionError> {
        Ok(perceptions
            .iter()
            .map(|p| (p.agent_id, self.decide(p)))
            .collect())
    }
}

/// Actions supplied from outside the environment.
///
/// Queued actions are consumed by the next call to
/// [`DecisionSource::collect_decisions`]; agents without a queued action
/// idle. Raw branch indices are decoded on the way in.
#[derive(Debug, Clone, Default)]
pub struct ActionBuffer {
    pending: BTreeMap<AgentId, Action>,
}

impl ActionBuffer {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
        }
    }

    /// Queue `action` for `agent_id`, replacing any earlier one.
    pub fn set(&mut self, agent_id: AgentId, action: Action) {
        self.pending.insert(agent_id, action);
    }

    /// Queue an action given as raw `(movement, verb)` branch indices.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Decode`] if either index is out of range.
    pub fn set_raw(
        &mut self,
        agent_id: AgentId,
        movement: usize,
        verb: usize,
    ) -> Result<(), DecisionError> {
        let action = Action::from_indices(movement, verb)
            .map_err(|source| DecisionError::Decode { agent_id, source })?;
        self.set(agent_id, action);
        Ok(())
    }

    /// Number of queued actions.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl DecisionSource for ActionBuffer {
    fn collect_decisions(
        &mut self,
        _tick: u64,
        _perceptions: &[Perception],
    ) -> Result<BTreeMap<AgentId, Action>, DecisionError> {
        Ok(std::mem::take(&mut self.pending))
    }
}

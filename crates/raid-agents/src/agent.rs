//! The agent record and its factory.
//!
//! An [`Agent`] owns its health, cargo slot, cooldown, reward accumulator
//! and the id of the world token backing its cargo. Everything that needs
//! other agents or the camps (targeting, separation, stock) lives in the
//! coordinator.

use std::collections::BTreeSet;

use raid_types::{AgentId, PickupId, Position, Team};

use crate::carry::Carry;
use crate::combat::Cooldown;
use crate::config::AgentConfig;
use crate::death::DeathNotice;
use crate::error::AgentError;
use crate::health::{DamageOutcome, Health};
use crate::reward::RewardAccumulator;

/// One member of a team.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Unique identifier.
    pub id: AgentId,
    /// Unique display name.
    pub name: String,
    /// The team this agent plays for.
    pub team: Team,
    /// Current world position.
    pub position: Position,
    /// Hit points.
    pub health: Health,
    /// Cargo slot.
    pub carry: Carry,
    /// Attack cooldown.
    pub cooldown: Cooldown,
    /// World token whose pickup filled the cargo slot, if any.
    pub held_token: Option<PickupId>,
    /// Reward bookkeeping.
    pub rewards: RewardAccumulator,
}

impl Agent {
    /// Whether the agent can act and be targeted.
    pub const fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    /// Apply a hit of `amount` damage.
    ///
    /// Returns a [`DeathNotice`] when this hit is the killing one. The
    /// notice captures cargo and token before anything is cleared.
    pub fn take_hit(
        &mut self,
        amount: i32,
        attacker: Option<AgentId>,
        tick: u64,
    ) -> Option<DeathNotice> {
        match self.health.damage(amount) {
            DamageOutcome::Killed => {
                tracing::debug!(
                    agent = %self.name,
                    team = %self.team,
                    tick,
                    carried = ?self.carry.carried(),
                    "agent killed"
                );
                Some(DeathNotice {
                    agent_id: self.id,
                    team: self.team,
                    position: self.position,
                    carried: self.carry.carried(),
                    held_token: self.held_token,
                    killer: attacker,
                    tick,
                })
            }
            DamageOutcome::Ignored | DamageOutcome::Wounded { .. } => None,
        }
    }

    /// Restore the agent for a fresh episode at `position`.
    ///
    /// Revives, empties the cargo, forgets the held token, clears the
    /// cooldown and discards pending rewards.
    pub fn reset_for_episode(&mut self, position: Position) {
        self.position = position;
        self.health.revive();
        let _ = self.carry.drop_item();
        self.held_token = None;
        self.cooldown.clear();
        self.rewards.clear();
    }
}

/// Creates agents and enforces name uniqueness.
#[derive(Debug, Default)]
pub struct AgentFactory {
    /// Names currently in use.
    names_in_use: BTreeSet<String>,
}

impl AgentFactory {
    /// Create an empty factory.
    pub const fn new() -> Self {
        Self {
            names_in_use: BTreeSet::new(),
        }
    }

    /// Create a full-health agent at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::DuplicateName`] if the name is already taken.
    pub fn create(
        &mut self,
        name: String,
        team: Team,
        position: Position,
        config: &AgentConfig,
    ) -> Result<Agent, AgentError> {
        if self.names_in_use.contains(&name) {
            return Err(AgentError::DuplicateName(name));
        }
        self.names_in_use.insert(name.clone());

        Ok(Agent {
            id: AgentId::new(),
            name,
            team,
            position,
            health: Health::new(config.max_hp),
            carry: Carry::new(),
            cooldown: Cooldown::new(),
            held_token: None,
            rewards: RewardAccumulator::new(),
        })
    }

    /// Conventional name for the `index`-th agent of `team`, e.g. `red-3`.
    pub fn default_name(team: Team, index: usize) -> String {
        format!("{team}-{index}")
    }

    /// Release a name so it can be reused. Returns whether it was in use.
    pub fn release_name(&mut self, name: &str) -> bool {
        self.names_in_use.remove(name)
    }

    /// Check whether a name is currently in use.
    pub fn is_name_taken(&self, name: &str) -> bool {
        self.names_in_use.contains(name)
    }
}

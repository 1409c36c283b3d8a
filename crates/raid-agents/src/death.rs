//! Death notification.
//!
//! When a hit takes an agent to zero hit points, exactly one
//! [`DeathNotice`] is produced. It snapshots what the drop handler needs:
//! where the agent fell, what it carried, and which world token backed
//! that cargo. The notice is data only; consuming it is the drop
//! handler's job.

use raid_types::{AgentId, PickupId, Position, Resource, Team};

/// Snapshot of an agent at the moment of death.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathNotice {
    /// The agent who died.
    pub agent_id: AgentId,
    /// The dead agent's team.
    pub team: Team,
    /// Where the agent fell.
    pub position: Position,
    /// Cargo held at death, if any.
    pub carried: Option<Resource>,
    /// World token that produced the cargo, if it came from one.
    pub held_token: Option<PickupId>,
    /// The attacker that landed the killing hit, if known.
    pub killer: Option<AgentId>,
    /// Tick on which the death happened.
    pub tick: u64,
}

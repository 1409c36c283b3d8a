//! Cargo handling for agents that die mid-episode.
//!
//! A [`DeathNotice`] is consumed in the same tick it is produced. The dying
//! agent's cargo slot is emptied and the unit goes back into the world:
//! a token-backed unit re-arms its token where the agent fell, a unit
//! picked straight from stock becomes a fresh token in the owning camp's
//! registry. Stock counters are never touched here, and either kind of
//! token is marked as already debited so taking it again leaves them
//! alone too.

use std::collections::BTreeSet;

use raid_agents::{Agent, DeathNotice};
use raid_ledger::Camp;
use raid_types::{AgentId, PickupId, TeamPair};

/// What happened to a dead agent's cargo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The agent carried nothing, or this death was already handled.
    Nothing,
    /// The carried token became available again.
    Rearmed(PickupId),
    /// A fresh token was registered in the owning camp.
    Spawned(PickupId),
    /// The cargo was discarded; the owning camp has no pickup visuals.
    Lost,
}

/// Consumes death notices, at most once per agent per episode.
#[derive(Debug, Default)]
pub struct DeathDropHandler {
    handled: BTreeSet<AgentId>,
}

impl DeathDropHandler {
    /// A handler with nothing handled yet.
    pub const fn new() -> Self {
        Self {
            handled: BTreeSet::new(),
        }
    }

    /// Forget handled deaths; called on episode reset.
    pub fn reset(&mut self) {
        self.handled.clear();
    }

    /// Release the cargo of the agent described by `notice`.
    ///
    /// The agent's own carry slot and held token are authoritative; the
    /// notice supplies identity and the death position.
    pub fn handle(
        &mut self,
        notice: &DeathNotice,
        agent: &mut Agent,
        camps: &mut TeamPair<Camp>,
    ) -> DropOutcome {
        if !self.handled.insert(notice.agent_id) {
            return DropOutcome::Nothing;
        }

        let held = agent.held_token.take();
        let Some(resource) = agent.carry.drop_item() else {
            return DropOutcome::Nothing;
        };

        let camp = camps.get_mut(resource.home_team());
        if let Some(token) = held {
            match camp.rearm_token(token, notice.position) {
                Ok(true) => {
                    tracing::debug!(
                        agent = %notice.agent_id,
                        %resource,
                        token = %token,
                        "carried token re-armed at death position"
                    );
                    return DropOutcome::Rearmed(token);
                }
                Ok(false) => {}
                Err(error) => {
                    tracing::warn!(agent = %notice.agent_id, %error, "carried token not registered");
                }
            }
        }

        match camp.spawn_dropped_token(resource, notice.position) {
            Some(id) => {
                tracing::debug!(
                    agent = %notice.agent_id,
                    %resource,
                    token = %id,
                    "dropped cargo spawned as a fresh token"
                );
                DropOutcome::Spawned(id)
            }
            None => {
                tracing::debug!(agent = %notice.agent_id, %resource, "dropped cargo discarded");
                DropOutcome::Lost
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use raid_agents::{AgentConfig, AgentFactory};
    use raid_types::{Position, Resource, Team};

    use super::*;

    fn camps(visuals: bool) -> TeamPair<Camp> {
        TeamPair::from_fn(|team| {
            let mut camp = Camp::new(team, Position::default()).with_pickup_visuals(visuals);
            match team {
                Team::Red => camp.reseed(100, 0),
                Team::Blue => camp.reseed(0, 100),
            }
            camp
        })
    }

    fn raider() -> Agent {
        AgentFactory::new()
            .create(
                "red-0".to_owned(),
                Team::Red,
                Position::ground(10.0, 1.0),
                &AgentConfig::default(),
            )
            .unwrap()
    }

    fn kill(agent: &mut Agent) -> DeathNotice {
        agent.take_hit(1000, None, 5).unwrap()
    }

    #[test]
    fn token_backed_cargo_rearms_the_token() {
        let mut camps = camps(true);
        assert_eq!(camps.blue.spawn_initial_world_pickups(1), 1);
        let token = camps.blue.pickups()[0].id;

        let mut agent = raider();
        assert!(camps.blue.take_token(token, &mut agent.carry));
        agent.held_token = Some(token);
        let notice = kill(&mut agent);

        let mut handler = DeathDropHandler::new();
        assert_eq!(
            handler.handle(&notice, &mut agent, &mut camps),
            DropOutcome::Rearmed(token)
        );
        assert!(!agent.carry.has_item());
        assert_eq!(agent.held_token, None);
        let rearmed = camps.blue.pickup(token).unwrap();
        assert!(rearmed.is_available());
        assert_eq!(rearmed.position, Position::ground(10.0, 1.0));
        assert_eq!(camps.blue.mana(), 99);
    }

    #[test]
    fn direct_cargo_spawns_a_token_without_touching_stock() {
        let mut camps = camps(true);
        let mut agent = raider();
        assert!(camps.blue.try_pick_direct(&mut agent.carry));
        let notice = kill(&mut agent);

        let mut handler = DeathDropHandler::new();
        let outcome = handler.handle(&notice, &mut agent, &mut camps);
        let DropOutcome::Spawned(id) = outcome else {
            panic!("expected a spawned token, got {outcome:?}");
        };
        let token = camps.blue.pickup(id).unwrap();
        assert_eq!(token.resource, Resource::Mana);
        assert!(token.is_available());
        assert!(token.stock_debited());
        assert_eq!(camps.blue.mana(), 99);
        assert_eq!(camps.red.total(), 100);
    }

    #[test]
    fn cargo_is_lost_without_visuals() {
        let mut camps = camps(false);
        let mut agent = raider();
        assert!(camps.blue.try_pick_direct(&mut agent.carry));
        let notice = kill(&mut agent);

        let mut handler = DeathDropHandler::new();
        assert_eq!(handler.handle(&notice, &mut agent, &mut camps), DropOutcome::Lost);
        assert!(!agent.carry.has_item());
        assert!(camps.blue.pickups().is_empty());
    }

    #[test]
    fn each_death_is_handled_once() {
        let mut camps = camps(true);
        let mut agent = raider();
        assert!(camps.blue.try_pick_direct(&mut agent.carry));
        let notice = kill(&mut agent);

        let mut handler = DeathDropHandler::new();
        assert!(matches!(
            handler.handle(&notice, &mut agent, &mut camps),
            DropOutcome::Spawned(_)
        ));
        assert_eq!(handler.handle(&notice, &mut agent, &mut camps), DropOutcome::Nothing);
        assert_eq!(camps.blue.pickups().len(), 1);

        handler.reset();
        assert_eq!(handler.handle(&notice, &mut agent, &mut camps), DropOutcome::Nothing);
    }
}

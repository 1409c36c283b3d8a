//! End-to-end episode scenarios driven through the public coordinator API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use raid_agents::{AgentConfig, AgentFactory, Carry};
use raid_core::observation::assemble;
use raid_ledger::StockChangeKind;
use raid_core::{
    ActionBuffer, EnvironmentConfig, EnvironmentCoordinator, IdlePolicy, Outcome,
    RandomWalkPolicy, StockSnapshot, TerminationReason,
};
use raid_types::{
    Action, AgentId, Movement, OBSERVATION_LEN, Position, Resource, Team, Verb,
};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

struct Arena {
    env: EnvironmentCoordinator,
    red: Vec<AgentId>,
    blue: Vec<AgentId>,
}

fn arena(config: EnvironmentConfig, per_team: usize) -> Arena {
    let agent_config = config.agents.clone();
    let mut env = EnvironmentCoordinator::new(config).unwrap();
    let mut factory = AgentFactory::new();
    let mut red = Vec::new();
    let mut blue = Vec::new();
    for team in Team::ALL {
        for index in 0..per_team {
            let agent = factory
                .create(
                    AgentFactory::default_name(team, index),
                    team,
                    Position::default(),
                    &agent_config,
                )
                .unwrap();
            let id = env.register_agent(agent).unwrap();
            match team {
                Team::Red => red.push(id),
                Team::Blue => blue.push(id),
            }
        }
    }
    let _ = env.reset_episode().unwrap();
    Arena { env, red, blue }
}

fn reward_of(rewards: &[(AgentId, f32)], id: AgentId) -> Option<f32> {
    rewards.iter().find(|(agent, _)| *agent == id).map(|(_, r)| *r)
}

#[test]
fn threshold_win_then_reset_restores_everything() {
    let Arena { mut env, red, blue } = arena(EnvironmentConfig::default(), 1);
    env.camp_mut(Team::Red).reseed(100, 99);
    let _ = env.agent_mut(blue[0]).unwrap().take_hit(30, None, 0);

    let mut script = ActionBuffer::new();
    assert!(env.try_move(red[0], Position::ground(12.0, 0.0)));
    script.set(red[0], Action::new(Movement::Idle, Verb::Pick));
    let report = env.step(&mut script).unwrap();
    assert!(report.episode_end.is_none());
    assert_eq!(env.camp(Team::Blue).mana(), 99);

    assert!(env.try_move(red[0], Position::ground(-12.0, 0.0)));
    script.set(red[0], Action::new(Movement::Idle, Verb::Drop));
    let report = env.step(&mut script).unwrap();

    let summary = report.episode_end.unwrap();
    assert_eq!(summary.episode, 1);
    assert_eq!(summary.steps, 2);
    assert_eq!(summary.outcome, Outcome::Winner(Team::Red));
    assert_eq!(summary.reason, TerminationReason::StockThreshold);
    assert_eq!(summary.final_stocks.red, StockSnapshot { iron: 100, mana: 100 });
    assert_eq!(summary.final_stocks.blue, StockSnapshot { iron: 0, mana: 99 });
    assert!(close(reward_of(&report.rewards, red[0]).unwrap(), 1.0));
    assert!(close(reward_of(&report.rewards, blue[0]).unwrap(), -1.0));
    assert!(close(summary.mean_reward.red, 1.0));

    assert_eq!(env.clock().episode(), 2);
    assert_eq!(env.clock().step(), 0);
    assert_eq!((env.camp(Team::Red).iron(), env.camp(Team::Red).mana()), (100, 0));
    assert_eq!((env.camp(Team::Blue).iron(), env.camp(Team::Blue).mana()), (0, 100));
    for id in [red[0], blue[0]] {
        let agent = env.agent(id).unwrap();
        assert_eq!(agent.health.hp(), 100);
        assert!(!agent.carry.has_item());
        assert_eq!(agent.held_token, None);
        assert!(close(agent.rewards.episode_total(), 0.0));
    }
    let red_spawn = env.agent(red[0]).unwrap().position;
    assert!(close(red_spawn.x, -20.0));
    assert!(close(red_spawn.z, -1.5));
}

#[test]
fn timeout_is_a_tie_with_the_tie_penalty() {
    let mut config = EnvironmentConfig::default();
    config.episode.max_steps = 5;
    let Arena { mut env, red, blue } = arena(config, 2);

    for _ in 0..4 {
        let report = env.step(&mut IdlePolicy).unwrap();
        assert!(report.episode_end.is_none());
        assert!(report.rewards.iter().all(|(_, r)| close(*r, 0.0)));
    }
    let report = env.step(&mut IdlePolicy).unwrap();
    let summary = report.episode_end.unwrap();
    assert_eq!(summary.outcome, Outcome::Tie);
    assert_eq!(summary.reason, TerminationReason::Timeout);
    assert_eq!(report.rewards.len(), 4);
    for id in red.iter().chain(blue.iter()) {
        assert!(close(reward_of(&report.rewards, *id).unwrap(), -0.1));
    }
}

#[test]
fn reseed_events_belong_to_the_episode_they_start() {
    let mut config = EnvironmentConfig::default();
    config.episode.max_steps = 2;
    let Arena { mut env, red, .. } = arena(config, 1);

    let first = env.step(&mut IdlePolicy).unwrap();
    assert_eq!(first.episode, 1);
    assert_eq!(first.stock_events.len(), 2);
    assert!(first.stock_events.iter().all(|e| e.kind == StockChangeKind::Reseed));

    let mut script = ActionBuffer::new();
    assert!(env.try_move(red[0], Position::ground(12.0, 0.0)));
    script.set(red[0], Action::new(Movement::Idle, Verb::Pick));
    let last = env.step(&mut script).unwrap();
    assert!(last.episode_end.is_some());
    assert_eq!(last.stock_events.len(), 1);
    assert_eq!(last.stock_events[0].kind, StockChangeKind::DirectPickup);
    assert_eq!(last.stock_events[0].mana, 99);

    let next = env.step(&mut IdlePolicy).unwrap();
    assert_eq!(next.episode, 2);
    assert_eq!(next.stock_events.len(), 2);
    assert!(next.stock_events.iter().all(|e| e.kind == StockChangeKind::Reseed));
    assert_eq!(next.stock_events[1].mana, 100);
}

#[test]
fn killing_the_last_carrier_wins_by_elimination() {
    let mut config = EnvironmentConfig::default();
    config.agents.damage = 100;
    let Arena { mut env, red, blue } = arena(config, 1);

    let mut script = ActionBuffer::new();
    assert!(env.try_move(blue[0], Position::ground(-12.0, 0.0)));
    script.set(blue[0], Action::new(Movement::Idle, Verb::Pick));
    let _ = env.step(&mut script).unwrap();
    assert_eq!(env.camp(Team::Red).iron(), 99);
    assert!(env.agent(blue[0]).unwrap().carry.is_carrying(Resource::Iron));

    assert!(env.try_move(red[0], Position::ground(-12.5, 0.0)));
    script.set(red[0], Action::new(Movement::Idle, Verb::Attack));
    script.set(blue[0], Action::new(Movement::Right, Verb::None));
    let report = env.step(&mut script).unwrap();

    assert_eq!(report.deaths.len(), 1);
    let death = report.deaths[0];
    assert_eq!(death.agent_id, blue[0]);
    assert_eq!(death.killer, Some(red[0]));
    assert_eq!(death.carried, Some(Resource::Iron));

    let summary = report.episode_end.unwrap();
    assert_eq!(summary.outcome, Outcome::Winner(Team::Red));
    assert_eq!(summary.reason, TerminationReason::Elimination);
    assert_eq!(summary.final_stocks.red.iron, 99);

    assert!(env.agent(blue[0]).unwrap().is_alive());
    assert!(env.team_alive(Team::Blue));
}

#[test]
fn movement_stops_exactly_at_the_boundary() {
    let Arena { mut env, blue, .. } = arena(EnvironmentConfig::default(), 1);
    assert!(env.try_move(blue[0], Position::ground(24.6, 0.0)));

    let mut script = ActionBuffer::new();
    script.set(blue[0], Action::new(Movement::Right, Verb::None));
    let _ = env.step(&mut script).unwrap();
    let p = env.agent(blue[0]).unwrap().position;
    assert!(close(p.x, 25.0));

    script.set(blue[0], Action::new(Movement::Right, Verb::None));
    let _ = env.step(&mut script).unwrap();
    assert!(close(env.agent(blue[0]).unwrap().position.x, 25.0));
}

#[test]
fn same_team_agents_are_pushed_apart_symmetrically() {
    let Arena { mut env, red, .. } = arena(EnvironmentConfig::default(), 2);
    assert!(env.try_move(red[0], Position::ground(0.0, 0.0)));
    assert!(env.try_move(red[1], Position::ground(0.3, 0.0)));

    let a = env.agent(red[0]).unwrap().position;
    let b = env.agent(red[1]).unwrap().position;
    assert!(close(a.ground_distance(b), 0.4));
    assert!(close(a.x, -0.05));
    assert!(close(b.x, 0.35));
}

#[test]
fn enemies_are_not_separated() {
    let Arena { mut env, red, blue } = arena(EnvironmentConfig::default(), 1);
    assert!(env.try_move(red[0], Position::ground(0.0, 0.0)));
    assert!(env.try_move(blue[0], Position::ground(0.1, 0.0)));
    assert!(close(env.agent(red[0]).unwrap().position.x, 0.0));
    assert!(close(env.agent(blue[0]).unwrap().position.x, 0.1));
}

#[test]
fn first_in_roster_order_wins_a_lone_token() {
    let mut config = EnvironmentConfig::default();
    config.episode.visible_pickups_per_camp = 1;
    let Arena { mut env, red, .. } = arena(config, 2);

    env.camp_mut(Team::Blue).reseed(0, 1);
    assert_eq!(env.camp_mut(Team::Blue).spawn_initial_world_pickups(1), 1);
    let token = env.camp(Team::Blue).pickups()[0].clone();
    for id in &red {
        assert!(env.try_move(*id, token.position));
    }

    let mut script = ActionBuffer::new();
    for id in &red {
        script.set(*id, Action::new(Movement::Idle, Verb::Pick));
    }
    let report = env.step(&mut script).unwrap();

    let winner = env.agent(red[0]).unwrap();
    assert!(winner.carry.is_carrying(Resource::Mana));
    assert_eq!(winner.held_token, Some(token.id));
    assert!(!env.agent(red[1]).unwrap().carry.has_item());
    assert_eq!(env.camp(Team::Blue).mana(), 0);
    assert!(env.camp(Team::Blue).pickup(token.id).unwrap().is_taken());
    assert!(report.episode_end.is_none());
}

#[test]
fn taking_a_token_twice_decrements_once() {
    let mut config = EnvironmentConfig::default();
    config.episode.visible_pickups_per_camp = 2;
    let Arena { mut env, .. } = arena(config, 1);

    let camp = env.camp_mut(Team::Red);
    let token = camp.pickups()[0].id;
    let mut first = Carry::new();
    let mut second = Carry::new();
    assert!(camp.take_token(token, &mut first));
    assert!(!camp.take_token(token, &mut second));
    assert_eq!(camp.iron(), 99);
    assert!(first.is_carrying(Resource::Iron));
    assert!(!second.has_item());
}

#[test]
fn dropped_cargo_costs_the_camp_one_unit() {
    let mut config = EnvironmentConfig::default();
    config.agents.damage = 100;
    let Arena { mut env, red, blue } = arena(config, 2);
    let _ = env.camp_mut(Team::Blue).drain_events();

    let mut script = ActionBuffer::new();
    assert!(env.try_move(red[0], Position::ground(12.0, 0.0)));
    script.set(red[0], Action::new(Movement::Idle, Verb::Pick));
    let _ = env.step(&mut script).unwrap();
    assert_eq!(env.camp(Team::Blue).mana(), 99);
    assert_eq!(env.agent(red[0]).unwrap().held_token, None);

    assert!(env.try_move(blue[0], Position::ground(12.5, 0.0)));
    script.set(blue[0], Action::new(Movement::Idle, Verb::Attack));
    let report = env.step(&mut script).unwrap();
    assert_eq!(report.deaths.len(), 1);
    assert_eq!(report.deaths[0].agent_id, red[0]);
    assert!(report.episode_end.is_none());
    let dropped = env.camp(Team::Blue).pickups()[0].clone();
    assert!(dropped.is_available());
    assert_eq!(env.camp(Team::Blue).mana(), 99);

    assert!(env.try_move(red[1], dropped.position));
    script.set(red[1], Action::new(Movement::Idle, Verb::Pick));
    let report = env.step(&mut script).unwrap();
    let second = env.agent(red[1]).unwrap();
    assert!(second.carry.is_carrying(Resource::Mana));
    assert_eq!(second.held_token, Some(dropped.id));
    assert_eq!(env.camp(Team::Blue).mana(), 99);
    assert!(report.stock_events.is_empty());
}

#[test]
fn stocks_never_go_negative() {
    let Arena { mut env, red, .. } = arena(EnvironmentConfig::default(), 1);
    env.camp_mut(Team::Blue).reseed(0, 1);
    assert!(env.try_move(red[0], Position::ground(12.0, 0.0)));
    assert!(env.try_pickup(red[0]));
    let _ = env.agent_mut(red[0]).unwrap().carry.drop_item();
    assert!(!env.try_pickup(red[0]));
    assert_eq!(env.camp(Team::Blue).mana(), 0);
    assert_eq!(env.camp(Team::Blue).iron(), 0);
}

#[test]
fn observations_keep_their_length() {
    let Arena { mut env, blue, .. } = arena(EnvironmentConfig::default(), 3);
    let _ = env.agent_mut(blue[1]).unwrap().take_hit(1000, None, 0);

    for perception in env.perceptions() {
        assert_eq!(perception.observation.len(), OBSERVATION_LEN);
    }
    let dead = env.agent(blue[1]).unwrap();
    assert_eq!(assemble(dead, None).len(), OBSERVATION_LEN);
    assert_eq!(env.observe(blue[1]).map(|o| o.len()), Some(OBSERVATION_LEN));
}

#[test]
fn dead_agents_take_no_actions() {
    let Arena { mut env, red, .. } = arena(EnvironmentConfig::default(), 2);
    assert!(env.try_move(red[0], Position::ground(12.0, 0.0)));
    let _ = env.agent_mut(red[0]).unwrap().take_hit(1000, None, 0);

    let mut script = ActionBuffer::new();
    script.set(red[0], Action::new(Movement::Right, Verb::Pick));
    let report = env.step(&mut script).unwrap();

    let dead = env.agent(red[0]).unwrap();
    assert!(close(dead.position.x, 12.0));
    assert!(!dead.carry.has_item());
    assert_eq!(env.camp(Team::Blue).mana(), 100);
    assert!(report.episode_end.is_none());
}

#[test]
fn seeded_random_walk_is_reproducible() {
    let mut first = arena(EnvironmentConfig::default(), 3);
    let mut second = arena(EnvironmentConfig::default(), 3);
    let mut policy_a = RandomWalkPolicy::new(11);
    let mut policy_b = RandomWalkPolicy::new(11);

    for _ in 0..40 {
        let _ = first.env.step(&mut policy_a).unwrap();
        let _ = second.env.step(&mut policy_b).unwrap();
    }
    let positions = |arena: &Arena| -> Vec<Position> {
        arena
            .red
            .iter()
            .chain(arena.blue.iter())
            .filter_map(|id| arena.env.agent(*id).map(|a| a.position))
            .collect()
    };
    assert_eq!(positions(&first), positions(&second));
}

#[test]
fn stepping_before_the_first_reset_is_an_error() {
    let mut env = EnvironmentCoordinator::new(EnvironmentConfig::default()).unwrap();
    let agent = AgentFactory::new()
        .create(
            "red-0".to_owned(),
            Team::Red,
            Position::default(),
            &AgentConfig::default(),
        )
        .unwrap();
    let _ = env.register_agent(agent).unwrap();
    assert!(env.step(&mut IdlePolicy).is_err());
}

//! Episode clock, coordinator and run loop for the camp-raid environment.
//!
//! This crate owns the tick: it perceives, collects decisions, resolves
//! actions in roster order, settles rewards and restarts episodes when a
//! terminal rule fires.
//!
//! # Modules
//!
//! - [`clock`] -- Episode step counter and lifetime tick totals.
//! - [`config`] -- Loading `camp-raid-config.yaml` into strongly-typed
//!   structs.
//! - [`control`] -- Shared stop flag, pacing and run limits.
//! - [`coordinator`] -- [`EnvironmentCoordinator`], the tick and episode
//!   state machine.
//! - [`death_drop`] -- Releasing a dead agent's cargo back into the world.
//! - [`decision`] -- [`DecisionSource`] trait and the built-in policies.
//! - [`episode`] -- Episode phases, termination rules and summaries.
//! - [`observation`] -- Fixed-length per-agent observation assembly.
//! - [`runner`] -- The async run loop.
//!
//! # Example
//!
//! ```
//! use raid_agents::{AgentConfig, AgentFactory};
//! use raid_core::{EnvironmentConfig, EnvironmentCoordinator, IdlePolicy};
//! use raid_types::{Position, Team};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut env = EnvironmentCoordinator::new(EnvironmentConfig::default())?;
//! let mut factory = AgentFactory::new();
//! for team in Team::ALL {
//!     let name = AgentFactory::default_name(team, 0);
//!     let agent = factory.create(name, team, Position::default(), &AgentConfig::default())?;
//!     env.register_agent(agent)?;
//! }
//! env.reset_episode()?;
//!
//! let report = env.step(&mut IdlePolicy)?;
//! assert_eq!(report.step, 1);
//! assert_eq!(report.rewards.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! [`DecisionSource`]: decision::DecisionSource

pub mod clock;
pub mod config;
pub mod control;
pub mod coordinator;
pub mod death_drop;
pub mod decision;
pub mod episode;
pub mod observation;
pub mod runner;

pub use clock::{ClockError, EpisodeClock};
pub use config::{
    ConfigError, EnvironmentConfig, EpisodeConfig, PolicyKind, RewardConfig, RuntimeConfig,
    SpatialConfig,
};
pub use control::{RunControl, RunEndReason};
pub use coordinator::{CoordinatorError, EnvironmentCoordinator, TickReport};
pub use death_drop::{DeathDropHandler, DropOutcome};
pub use decision::{
    ActionBuffer, DecisionError, DecisionSource, IdlePolicy, RaiderPolicy, RandomWalkPolicy,
    build_policy,
};
pub use episode::{
    EpisodePhase, EpisodeSummary, Outcome, StockSnapshot, Termination, TerminationReason,
};
pub use observation::{EnvQuery, Perception, StockView};
pub use runner::{NoOpCallback, RunSummary, RunnerError, TickCallback, log_run_end, run};

//! Agent state and per-agent mechanics for the camp-raid environment.
//!
//! This crate holds everything an agent exclusively owns. It performs no
//! spatial queries and touches no camp stock; the coordinator in
//! `raid-core` drives these types.
//!
//! # Modules
//!
//! - [`agent`] -- The [`Agent`] record and the name-unique [`AgentFactory`]
//! - [`carry`] -- Single-slot cargo holder ([`Carry`])
//! - [`combat`] -- Attack profile and tick-based cooldown
//! - [`config`] -- Tunable per-agent parameters ([`AgentConfig`])
//! - [`death`] -- One-shot death notification ([`DeathNotice`])
//! - [`error`] -- Error types for agent management ([`AgentError`])
//! - [`health`] -- Hit-point ledger with alive/dead state ([`Health`])
//! - [`reward`] -- Per-agent reward accumulation ([`RewardAccumulator`])

pub mod agent;
pub mod carry;
pub mod combat;
pub mod config;
pub mod death;
pub mod error;
pub mod health;
pub mod reward;

// Re-export primary types at crate root for convenience.
pub use agent::{Agent, AgentFactory};
pub use carry::Carry;
pub use combat::{AttackAttempt, AttackProfile, Cooldown};
pub use config::AgentConfig;
pub use death::DeathNotice;
pub use error::AgentError;
pub use health::{DamageOutcome, Health};
pub use reward::RewardAccumulator;
